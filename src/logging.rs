//! Logging abstraction layer.
//!
//! The crate logs through these macros so the backend can be chosen by the
//! embedding application: [`log`](https://docs.rs/log) (feature `log`,
//! enabled by default) or [`tracing`](https://docs.rs/tracing) (feature
//! `tracing`). Enable at most one of the two.
//!
//! | Macro        | Used for                                              |
//! |--------------|-------------------------------------------------------|
//! | `trace_log!` | per-node merge decisions, cache hits                  |
//! | `debug_log!` | merge/filter summaries, guard evaluation              |
//! | `info_log!`  | login, logout, route installation, allowed navigation |
//! | `warn_log!`  | denials, duplicate or malformed menu nodes            |
//! | `error_log!` | failed restoration, failed login                      |
//!
//! Structured events for the application's own diagnostics pipeline go
//! through [`DiagnosticSink`](crate::diagnostics::DiagnosticSink) instead;
//! the default [`LogSink`](crate::diagnostics::LogSink) forwards them here.
//!
//! ```ignore
//! use admin_navigator::{debug_log, warn_log};
//!
//! debug_log!("Merged {} routes", routes.len());
//! warn_log!("Menu path '{}' appears twice, keeping the first", path);
//! ```

/// Emit a **trace**-level log message.
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::trace!($($arg)*);
        #[cfg(feature = "log")]
        ::log::trace!($($arg)*);
    };
}

/// Emit a **debug**-level log message.
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!($($arg)*);
        #[cfg(feature = "log")]
        ::log::debug!($($arg)*);
    };
}

/// Emit an **info**-level log message.
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::info!($($arg)*);
        #[cfg(feature = "log")]
        ::log::info!($($arg)*);
    };
}

/// Emit a **warn**-level log message.
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::warn!($($arg)*);
        #[cfg(feature = "log")]
        ::log::warn!($($arg)*);
    };
}

/// Emit an **error**-level log message.
#[macro_export]
macro_rules! error_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::error!($($arg)*);
        #[cfg(feature = "log")]
        ::log::error!($($arg)*);
    };
}
