//! Channel to the host process.
//!
//! The web view's runtime injects IPC globals into the page; this module
//! wraps them in a `Bridge` handle so that nothing else runs before the
//! channel exists. Host-to-page traffic arrives as named events, page-to-
//! host traffic goes out as fire-and-forget commands.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;

use crate::log_warn;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["window", "__TAURI__", "tauri"])]
    async fn invoke(cmd: &str, args: JsValue) -> JsValue;

    #[wasm_bindgen(js_namespace = ["window", "__TAURI__", "event"])]
    async fn listen(event: &str, handler: &js_sys::Function) -> JsValue;
}

/// Event names the host emits, one namespace for the whole page.
pub mod event {
    use const_format::concatcp;

    pub const NAMESPACE: &str = "playground://";

    pub const VIEWPORT_CHANGED: &str = concatcp!(NAMESPACE, "viewport-changed");
    pub const TRAINING_DATA_UPDATED: &str = concatcp!(NAMESPACE, "training-data-updated");
    pub const TESTING_DATA_UPDATED: &str = concatcp!(NAMESPACE, "testing-data-updated");
    pub const PREDICTION_UPDATED: &str = concatcp!(NAMESPACE, "prediction-updated");
    pub const INPUT_RANGE_UPDATED: &str = concatcp!(NAMESPACE, "input-range-updated");
    pub const OUTPUT_RANGE_UPDATED: &str = concatcp!(NAMESPACE, "output-range-updated");
    pub const MOUSE_DOWN: &str = concatcp!(NAMESPACE, "mouse-down");
    pub const MOUSE_MOVE: &str = concatcp!(NAMESPACE, "mouse-move");
    pub const MOUSE_UP: &str = concatcp!(NAMESPACE, "mouse-up");
}

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("no browser window in this context")]
    NoWindow,
    #[error("host runtime does not expose the ipc globals")]
    HostRuntimeMissing,
}

/// Handle to the host side of the channel, created once per page. There is
/// no retry and no timeout: if the globals are missing the page stays
/// non-functional, which is the host's problem to notice.
#[derive(Clone)]
pub struct Bridge {
    _guard: (),
}

/// The envelope the runtime wraps around every event delivery.
#[derive(Deserialize)]
struct SignalEnvelope<T> {
    payload: T,
}

#[derive(Serialize)]
struct LogArgs<'a> {
    message: &'a str,
}

impl Bridge {
    /// Opens the channel. Async so that callers express all dependent
    /// wiring as a continuation of this step.
    pub async fn connect() -> Result<Self, BridgeError> {
        let window = web_sys::window().ok_or(BridgeError::NoWindow)?;
        let ipc = js_sys::Reflect::get(&window, &JsValue::from_str("__TAURI__"))
            .map_err(|_| BridgeError::HostRuntimeMissing)?;
        if ipc.is_undefined() || ipc.is_null() {
            return Err(BridgeError::HostRuntimeMissing);
        }
        // a partially injected runtime would pass here and break inside a
        // handler instead, so both bound members are checked up front
        for path in [["tauri", "invoke"], ["event", "listen"]] {
            let mut member = ipc.clone();
            for key in path {
                member = js_sys::Reflect::get(&member, &JsValue::from_str(key))
                    .map_err(|_| BridgeError::HostRuntimeMissing)?;
            }
            if !member.is_function() {
                return Err(BridgeError::HostRuntimeMissing);
            }
        }
        Ok(Self { _guard: () })
    }

    /// Registers a page-lifetime handler for a host signal. Payloads that
    /// fail to decode are logged and dropped, halting that delivery only.
    pub fn subscribe<T, F>(&self, event_name: &'static str, mut handler: F)
    where
        T: DeserializeOwned + 'static,
        F: FnMut(T) + 'static,
    {
        let callback = Closure::<dyn FnMut(JsValue)>::new(move |raw: JsValue| {
            match serde_wasm_bindgen::from_value::<SignalEnvelope<T>>(raw) {
                Ok(envelope) => handler(envelope.payload),
                Err(err) => log_warn!("dropping undecodable {event_name} payload: {err}"),
            }
        });
        spawn_local(async move {
            let _unlisten = listen(event_name, callback.as_ref().unchecked_ref()).await;
            // the subscription lives until page unload
            callback.forget();
        });
    }

    /// Fire-and-forget command into the host.
    pub fn call(&self, cmd: &'static str, args: JsValue) {
        spawn_local(async move {
            let _ = invoke(cmd, args).await;
        });
    }

    /// Tells the host the page finished wiring and can receive data.
    pub fn done_initiation(&self) {
        self.call("done_initiation", JsValue::NULL);
    }
}

/// Ships one log line to the host. Free function rather than a method so
/// the remote log sink can use it without holding a bridge handle.
pub(crate) fn forward_log(message: String) {
    spawn_local(async move {
        let args = serde_wasm_bindgen::to_value(&LogArgs { message: &message })
            .unwrap_or(JsValue::NULL);
        let _ = invoke("log", args).await;
    });
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn install_runtime_stub(stub: &JsValue) {
        let window = web_sys::window().unwrap();
        js_sys::Reflect::set(&window, &JsValue::from_str("__TAURI__"), stub).unwrap();
    }

    fn function_member(target: &js_sys::Object, namespace: &str, name: &str) {
        let inner = js_sys::Object::new();
        let f = js_sys::Function::new_no_args("");
        js_sys::Reflect::set(&inner, &JsValue::from_str(name), &f).unwrap();
        js_sys::Reflect::set(target, &JsValue::from_str(namespace), &inner).unwrap();
    }

    #[wasm_bindgen_test]
    async fn missing_runtime_is_rejected() {
        install_runtime_stub(&JsValue::UNDEFINED);
        assert!(matches!(
            Bridge::connect().await,
            Err(BridgeError::HostRuntimeMissing)
        ));
    }

    #[wasm_bindgen_test]
    async fn partially_injected_runtime_is_rejected() {
        let stub = js_sys::Object::new();
        function_member(&stub, "tauri", "invoke");
        install_runtime_stub(&stub);
        assert!(matches!(
            Bridge::connect().await,
            Err(BridgeError::HostRuntimeMissing)
        ));

        function_member(&stub, "event", "listen");
        assert!(Bridge::connect().await.is_ok());

        install_runtime_stub(&JsValue::UNDEFINED);
    }
}
