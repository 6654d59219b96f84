//! Log shim for the embedded page.
//!
//! Messages either stay on the web console or are forwarded to the host
//! process through the bridge's `log` command. The route is picked once,
//! when the application context comes up; anything logged before that
//! falls back to the console.

use std::fmt;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        })
    }
}

/// Where log output ends up for the rest of the page's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogRoute {
    Console,
    Remote,
}

/// Remote logging requires both the per-view flag and a live bridge;
/// everything else stays local.
pub fn select_route(remote_enabled: bool, bridge_available: bool) -> LogRoute {
    if remote_enabled && bridge_available {
        LogRoute::Remote
    } else {
        LogRoute::Console
    }
}

pub trait LogSink: Send + Sync {
    fn write(&self, level: LogLevel, message: &str);
}

/// Plain web console output; plain stderr when built for a non-WASM
/// target, where the console import does not exist.
pub struct ConsoleSink;

impl LogSink for ConsoleSink {
    #[cfg(target_family = "wasm")]
    fn write(&self, level: LogLevel, message: &str) {
        let line = wasm_bindgen::JsValue::from_str(&format!("[{level}] {message}"));
        match level {
            LogLevel::Info => web_sys::console::log_1(&line),
            LogLevel::Warn => web_sys::console::warn_1(&line),
            LogLevel::Error => web_sys::console::error_1(&line),
        }
    }

    #[cfg(not(target_family = "wasm"))]
    fn write(&self, level: LogLevel, message: &str) {
        eprintln!("[{level}] {message}");
    }
}

/// Forwards every line to the host's `log` command. Nothing is mirrored to
/// the console; the host decides where the lines surface.
pub struct RemoteSink;

impl LogSink for RemoteSink {
    fn write(&self, level: LogLevel, message: &str) {
        crate::bridge::forward_log(format!("[{level}] {message}"));
    }
}

static LOGGER: OnceLock<Box<dyn LogSink>> = OnceLock::new();
static FALLBACK: ConsoleSink = ConsoleSink;

/// Installs the sink for the chosen route. First call wins; the route is
/// static per view and never toggled afterwards.
pub fn init_route(route: LogRoute) {
    let sink: Box<dyn LogSink> = match route {
        LogRoute::Console => Box::new(ConsoleSink),
        LogRoute::Remote => Box::new(RemoteSink),
    };
    let _ = LOGGER.set(sink);
}

pub fn sink() -> &'static dyn LogSink {
    LOGGER.get().map(|sink| sink.as_ref()).unwrap_or(&FALLBACK)
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::logging::sink().write($crate::logging::LogLevel::Info, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::logging::sink().write($crate::logging::LogLevel::Warn, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::logging::sink().write($crate::logging::LogLevel::Error, &format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        lines: Mutex<Vec<String>>,
    }

    impl LogSink for RecordingSink {
        fn write(&self, level: LogLevel, message: &str) {
            self.lines.lock().unwrap().push(format!("[{level}] {message}"));
        }
    }

    #[test]
    fn console_sink_is_usable_off_the_web_view() {
        ConsoleSink.write(LogLevel::Info, "smoke");
        ConsoleSink.write(LogLevel::Warn, "smoke");
        ConsoleSink.write(LogLevel::Error, "smoke");
    }

    #[test]
    fn each_line_reaches_exactly_one_sink() {
        let console = RecordingSink::default();
        let remote = RecordingSink::default();

        let sink: &dyn LogSink = match select_route(true, true) {
            LogRoute::Remote => &remote,
            LogRoute::Console => &console,
        };
        sink.write(LogLevel::Warn, "forwarded");

        assert_eq!(*remote.lines.lock().unwrap(), vec!["[WARN] forwarded"]);
        assert!(console.lines.lock().unwrap().is_empty());
    }

    #[test]
    fn remote_route_needs_flag_and_bridge() {
        assert_eq!(select_route(true, true), LogRoute::Remote);
        assert_eq!(select_route(true, false), LogRoute::Console);
        assert_eq!(select_route(false, true), LogRoute::Console);
        assert_eq!(select_route(false, false), LogRoute::Console);
    }

    #[test]
    fn levels_render_for_log_lines() {
        assert_eq!(LogLevel::Info.to_string(), "INFO");
        assert_eq!(LogLevel::Warn.to_string(), "WARN");
        assert_eq!(LogLevel::Error.to_string(), "ERROR");
    }
}
