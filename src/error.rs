//! Errors and navigation outcomes.
//!
//! Two kinds of "failure" leave the core:
//!
//! - [`NavigationResult`]: the outcome of a navigation attempt. Redirecting
//!   to the login or forbidden page is a normal outcome, not an error.
//! - [`ShellError`]: a failed session operation (login, restoration, token
//!   refresh), returned as `Err` from [`SessionManager`](crate::session::SessionManager)
//!   methods.
//!
//! # Examples
//!
//! ```
//! use admin_navigator::NavigationResult;
//!
//! let result = NavigationResult::RedirectLogin {
//!     to: "/login?redirect=%2Fsystem%2Fuser".into(),
//!     return_path: "/system/user".into(),
//! };
//! assert!(result.is_redirect_login());
//! assert_eq!(result.redirect_path(), Some("/login?redirect=%2Fsystem%2Fuser"));
//! ```

use crate::config::ConfigError;
use crate::persistence::StoreError;
use crate::transport::TransportError;
use thiserror::Error;

/// Result alias for session operations.
pub type Result<T, E = ShellError> = std::result::Result<T, E>;

/// Outcome of one navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationResult {
    /// Navigation completed.
    Allowed {
        /// Final path after following route redirects.
        path: String,
        /// Name of the matched route; `None` for unknown or allow-listed paths.
        route: Option<String>,
    },
    /// No usable session; go to the login page.
    RedirectLogin {
        /// Login target including the return parameter.
        to: String,
        /// Path (and query) the user wanted.
        return_path: String,
    },
    /// The session lacks a role or permission for the target.
    RedirectForbidden { to: String, reason: String },
    /// A guard or middleware stopped the navigation.
    Blocked {
        reason: String,
        redirect: Option<String>,
    },
}

impl NavigationResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, NavigationResult::Allowed { .. })
    }

    pub fn is_redirect_login(&self) -> bool {
        matches!(self, NavigationResult::RedirectLogin { .. })
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self, NavigationResult::RedirectForbidden { .. })
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, NavigationResult::Blocked { .. })
    }

    /// Where the caller should go instead, if anywhere.
    pub fn redirect_path(&self) -> Option<&str> {
        match self {
            NavigationResult::RedirectLogin { to, .. }
            | NavigationResult::RedirectForbidden { to, .. } => Some(to),
            NavigationResult::Blocked {
                redirect: Some(path),
                ..
            } => Some(path),
            _ => None,
        }
    }
}

/// Coarse classification of a [`ShellError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    AuthenticationRequired,
    AuthorizationDenied,
    SessionRestoreFailed,
    RouteResolutionMissing,
    MalformedMenuNode,
    LoginFailed,
    Transport,
    Storage,
    Config,
}

/// Failure of a session operation.
#[derive(Debug, Error)]
pub enum ShellError {
    /// No token, or the token was rejected.
    #[error("authentication required")]
    AuthenticationRequired,

    /// The session is valid but lacks a role or permission.
    #[error("access to '{path}' denied")]
    AuthorizationDenied { path: String },

    /// User info or menus could not be loaded; the session was torn down.
    #[error("session restore failed: {0}")]
    SessionRestoreFailed(String),

    /// No component is registered for a route's module key.
    #[error("no component for '{path}' (module '{module}')")]
    RouteResolutionMissing { path: String, module: String },

    #[error("malformed menu node: {0}")]
    MalformedMenuNode(String),

    /// Credentials were rejected or the login call failed.
    #[error("login failed: {0}")]
    LoginFailed(#[source] TransportError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ShellError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ShellError::AuthenticationRequired => ErrorKind::AuthenticationRequired,
            ShellError::AuthorizationDenied { .. } => ErrorKind::AuthorizationDenied,
            ShellError::SessionRestoreFailed(_) => ErrorKind::SessionRestoreFailed,
            ShellError::RouteResolutionMissing { .. } => ErrorKind::RouteResolutionMissing,
            ShellError::MalformedMenuNode(_) => ErrorKind::MalformedMenuNode,
            ShellError::LoginFailed(_) => ErrorKind::LoginFailed,
            ShellError::Transport(_) => ErrorKind::Transport,
            ShellError::Storage(_) => ErrorKind::Storage,
            ShellError::Config(_) => ErrorKind::Config,
        }
    }
}
