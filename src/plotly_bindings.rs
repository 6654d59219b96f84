//! Thin indirection over the plotly JS bindings so the crate still type-
//! checks when built for a non-WASM target (rust-analyzer, clippy, the
//! native test runs).

#[cfg(target_family = "wasm")]
pub use plotly::bindings::react;

/// Stand-in for non-WASM builds; the real binding only exists in the
/// browser.
#[cfg(not(target_family = "wasm"))]
pub async fn react(_id: &str, _plot: &plotly::Plot) {
    unreachable!("plotly rendering requires a WASM target");
}
