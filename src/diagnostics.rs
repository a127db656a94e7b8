//! Structured diagnostic events.
//!
//! Merge anomalies, permission denials and restoration failures are not
//! errors for the caller, but the application usually wants to see them.
//! The core reports them as [`DiagnosticEvent`]s to a [`DiagnosticSink`]
//! supplied by the embedding application.
//!
//! | Sink | Behaviour |
//! |------|-----------|
//! | [`LogSink`] | forwards each event to the logging macros (default) |
//! | [`CollectingSink`] | keeps events in memory, for tests and debug panels |
//! | [`NullSink`] | drops everything |

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Something noteworthy that happened inside the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticEvent {
    /// A menu node without a usable path was skipped.
    MalformedMenuNode {
        /// Path of the parent node, `None` at the top level.
        parent: Option<String>,
        /// Position among its siblings.
        index: usize,
        reason: String,
    },
    /// A menu path appeared more than once; the later node was dropped.
    DuplicateMenuPath { path: String },
    /// No component is registered for a convention module key.
    RouteResolutionMissing { path: String, module: String },
    /// A route was withheld from the user.
    PermissionDenied {
        path: String,
        required_roles: Vec<String>,
        required_auths: Vec<String>,
    },
    /// Session restoration failed and the session was torn down.
    SessionRestoreFailed { message: String },
    /// A restoration finished after the session it belonged to was replaced.
    RestoreDiscarded { epoch: u64 },
}

impl DiagnosticEvent {
    /// Short machine-readable name of the event.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedMenuNode { .. } => "malformed_menu_node",
            Self::DuplicateMenuPath { .. } => "duplicate_menu_path",
            Self::RouteResolutionMissing { .. } => "route_resolution_missing",
            Self::PermissionDenied { .. } => "permission_denied",
            Self::SessionRestoreFailed { .. } => "session_restore_failed",
            Self::RestoreDiscarded { .. } => "restore_discarded",
        }
    }
}

impl fmt::Display for DiagnosticEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedMenuNode {
                parent,
                index,
                reason,
            } => write!(
                f,
                "skipped menu node #{} under '{}': {}",
                index,
                parent.as_deref().unwrap_or("<root>"),
                reason
            ),
            Self::DuplicateMenuPath { path } => {
                write!(f, "duplicate menu path '{}' dropped", path)
            }
            Self::RouteResolutionMissing { path, module } => {
                write!(f, "no component for '{}' (module '{}')", path, module)
            }
            Self::PermissionDenied {
                path,
                required_roles,
                required_auths,
            } => write!(
                f,
                "route '{}' withheld (roles {:?}, auths {:?})",
                path, required_roles, required_auths
            ),
            Self::SessionRestoreFailed { message } => {
                write!(f, "session restore failed: {}", message)
            }
            Self::RestoreDiscarded { epoch } => {
                write!(f, "restoration for session epoch {} discarded", epoch)
            }
        }
    }
}

/// Receiver of [`DiagnosticEvent`]s.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, event: DiagnosticEvent);
}

/// Forwards events to the crate's logging macros.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn emit(&self, event: DiagnosticEvent) {
        match &event {
            DiagnosticEvent::SessionRestoreFailed { .. } => {
                crate::error_log!("{}", event);
            }
            DiagnosticEvent::MalformedMenuNode { .. }
            | DiagnosticEvent::DuplicateMenuPath { .. }
            | DiagnosticEvent::RouteResolutionMissing { .. } => {
                crate::warn_log!("{}", event);
            }
            DiagnosticEvent::PermissionDenied { .. } | DiagnosticEvent::RestoreDiscarded { .. } => {
                crate::debug_log!("{}", event);
            }
        }
    }
}

/// Drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&self, _event: DiagnosticEvent) {}
}

/// Records events in memory.
///
/// Clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    events: Arc<Mutex<Vec<DiagnosticEvent>>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every event recorded so far.
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of recorded events with the given [`kind`](DiagnosticEvent::kind).
    pub fn count(&self, kind: &str) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| e.kind() == kind)
            .count()
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl DiagnosticSink for CollectingSink {
    fn emit(&self, event: DiagnosticEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
