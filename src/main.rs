mod app;
mod bridge;
mod curve2d;
mod input;
mod logging;
mod plotly_bindings;
mod relay;
mod scatter3d;

use app::App;
use leptos::*;

fn main() {
    console_error_panic_hook::set_once();
    mount_to_body(|| {
        view! { <App/> }
    })
}
