//! Page setup: one application context per page, then the chart, the
//! update relay and the input source wired as a continuation of the
//! channel coming up.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::html::{Canvas, Div};
use leptos::*;
use shared::{AxisRange, Viewport};
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

use crate::bridge::{event, Bridge, BridgeError};
use crate::curve2d::{CurveChart, CANVAS_ID};
use crate::input::{ForwardedInput, InputMode, NativeInput, RotateController};
use crate::logging::{self, select_route};
use crate::relay::{SeriesTarget, UpdateRelay};
use crate::scatter3d::{ScatterChart, CONTAINER_ID};
use crate::{log_error, log_info};

/// Static per-view configuration. The remote-log flag is fixed per
/// variant; there is no runtime toggle.
pub struct ViewConfig {
    pub remote_log: bool,
}

pub const SCATTER_VIEW: ViewConfig = ViewConfig { remote_log: false };
pub const CURVE_VIEW: ViewConfig = ViewConfig { remote_log: true };

/// Pointer source for the scatter view. Forwarded coordinates work around
/// the web view's unreliable native pointer delivery.
pub const SCATTER_INPUT: InputMode = InputMode::Forwarded;

/// Which chart this page renders; the host selects via the query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Scatter,
    Curve,
}

impl ViewKind {
    pub fn from_query(query: &str) -> Self {
        if query.contains("view=curve") {
            Self::Curve
        } else {
            Self::Scatter
        }
    }

    fn detect() -> Self {
        let query = web_sys::window()
            .and_then(|window| window.location().search().ok())
            .unwrap_or_default();
        Self::from_query(&query)
    }
}

#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Bridge(#[from] BridgeError),
    #[error("element #{0} missing from the page")]
    MissingElement(&'static str),
    #[error("input binding failed: {0:?}")]
    Input(JsValue),
}

/// Page-lifetime state, created once before any chart wiring runs. The
/// bridge handle is set here and never reassigned.
pub struct AppContext {
    pub bridge: Bridge,
}

impl AppContext {
    pub async fn initialize(config: &ViewConfig) -> Result<Self, SetupError> {
        log_info!("opening channel to the host");
        let bridge = Bridge::connect().await?;
        logging::init_route(select_route(config.remote_log, true));
        log_info!("channel up, further output follows the configured log route");
        Ok(Self { bridge })
    }
}

#[component]
pub fn App() -> impl IntoView {
    match ViewKind::detect() {
        ViewKind::Scatter => view! { <ScatterView/> }.into_view(),
        ViewKind::Curve => view! { <CurveView/> }.into_view(),
    }
}

#[component]
fn ScatterView() -> impl IntoView {
    let (status, set_status) = create_signal("connecting to host".to_string());
    let container_ref = create_node_ref::<Div>();

    create_effect(move |_| {
        if container_ref.get().is_some() {
            spawn_local(async move {
                match setup_scatter().await {
                    Ok(()) => set_status.set("live".to_string()),
                    Err(err) => {
                        log_error!("scatter view setup failed: {err}");
                        set_status.set(format!("setup failed: {err}"));
                    }
                }
            });
        }
    });

    view! {
        <main class="container">
            <div id=CONTAINER_ID node_ref=container_ref></div>
            <p class="status">{move || status.get()}</p>
        </main>
    }
}

#[component]
fn CurveView() -> impl IntoView {
    let (status, set_status) = create_signal("connecting to host".to_string());
    let canvas_ref = create_node_ref::<Canvas>();

    create_effect(move |_| {
        if canvas_ref.get().is_some() {
            spawn_local(async move {
                match setup_curve().await {
                    Ok(()) => set_status.set("live".to_string()),
                    Err(err) => {
                        log_error!("curve view setup failed: {err}");
                        set_status.set(format!("setup failed: {err}"));
                    }
                }
            });
        }
    });

    view! {
        <main class="container">
            <canvas id=CANVAS_ID node_ref=canvas_ref width="640" height="480"></canvas>
            <p class="status">{move || status.get()}</p>
        </main>
    }
}

async fn setup_scatter() -> Result<(), SetupError> {
    let ctx = AppContext::initialize(&SCATTER_VIEW).await?;

    ctx.bridge
        .subscribe(event::VIEWPORT_CHANGED, |viewport: Viewport| {
            log_info!("viewport changed to {}x{}", viewport.width, viewport.height);
        });

    let chart = Rc::new(RefCell::new(ScatterChart::new()));
    SeriesTarget::redraw(&mut *chart.borrow_mut());

    UpdateRelay::new(Rc::clone(&chart)).wire(&ctx.bridge);

    let controller = RotateController::new(Rc::clone(&chart));
    match SCATTER_INPUT {
        InputMode::Forwarded => ForwardedInput::bind(&ctx.bridge, controller),
        InputMode::Native => {
            let container = web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| document.get_element_by_id(CONTAINER_ID))
                .ok_or(SetupError::MissingElement(CONTAINER_ID))?;
            NativeInput::bind(&container, controller).map_err(SetupError::Input)?;
        }
    }

    ctx.bridge.done_initiation();
    log_info!("scatter view wired");
    Ok(())
}

async fn setup_curve() -> Result<(), SetupError> {
    let ctx = AppContext::initialize(&CURVE_VIEW).await?;

    let canvas = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(CANVAS_ID))
        .and_then(|element| element.dyn_into::<web_sys::HtmlCanvasElement>().ok())
        .ok_or(SetupError::MissingElement(CANVAS_ID))?;

    let chart = Rc::new(RefCell::new(CurveChart::new(canvas)));
    SeriesTarget::redraw(&mut *chart.borrow_mut());

    let resized = Rc::clone(&chart);
    ctx.bridge
        .subscribe(event::VIEWPORT_CHANGED, move |viewport: Viewport| {
            log_info!("viewport changed to {}x{}", viewport.width, viewport.height);
            resized.borrow_mut().resize(viewport);
        });

    UpdateRelay::new(Rc::clone(&chart)).wire(&ctx.bridge);

    let x_target = Rc::clone(&chart);
    ctx.bridge
        .subscribe(event::INPUT_RANGE_UPDATED, move |range: AxisRange| {
            x_target.borrow_mut().set_x_range(range);
        });
    let y_target = Rc::clone(&chart);
    ctx.bridge
        .subscribe(event::OUTPUT_RANGE_UPDATED, move |range: AxisRange| {
            y_target.borrow_mut().set_y_range(range);
        });

    log_info!("curve view wired");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_string_selects_the_view() {
        assert_eq!(ViewKind::from_query(""), ViewKind::Scatter);
        assert_eq!(ViewKind::from_query("?foo=bar"), ViewKind::Scatter);
        assert_eq!(ViewKind::from_query("?view=curve"), ViewKind::Curve);
        assert_eq!(ViewKind::from_query("?a=1&view=curve"), ViewKind::Curve);
    }

    #[test]
    fn remote_logging_is_static_per_view() {
        assert!(!SCATTER_VIEW.remote_log);
        assert!(CURVE_VIEW.remote_log);
    }
}
