//! Route guards for authentication and authorization.
//!
//! Guards are checked **before** navigation proceeds. They look at the
//! [`Session`] and the [`NavigationRequest`] and decide whether navigation
//! should continue, be denied, or be redirected elsewhere.
//!
//! Guard checks are synchronous: the session is already loaded by the time
//! guards run, so every check is a plain predicate over in-memory state.
//!
//! # Built-in guards
//!
//! | Guard | Purpose |
//! |-------|---------|
//! | [`AuthGuard`] | Requires an authenticated session |
//! | [`RoleGuard`] | Requires one of a set of roles |
//! | [`PermissionGuard`] | Requires one of a set of permissions (wildcard aware) |
//!
//! # Composition
//!
//! | Combinator | Logic |
//! |------------|-------|
//! | [`Guards`] | AND, all guards must allow |
//! | [`NotGuard`] | Invert, allow becomes deny and deny becomes allow |
//!
//! # Execution order
//!
//! Guards run in **priority order** (higher value first). The built-in guards
//! use: `AuthGuard` = 100, `RoleGuard` = 90, `PermissionGuard` = 80.
//! The first non-[`Continue`](NavigationAction::Continue) result
//! short-circuits evaluation.
//!
//! # Example
//!
//! ```
//! use admin_navigator::{Guards, AuthGuard, RoleGuard, RouteGuard, NavigationRequest, Session};
//!
//! let guard = Guards::builder()
//!     .guard(AuthGuard::new("/login"))
//!     .guard(RoleGuard::new(["admin"]).with_redirect("/403"))
//!     .build();
//!
//! let session = Session::default();
//! let action = guard.check(&session, &NavigationRequest::new("/system/user"));
//! assert_eq!(action.redirect_path(), Some("/login"));
//! ```

use crate::config::WILDCARD_PERMISSION;
use crate::navigator::NavigationRequest;
use crate::session::Session;

// ============================================================================
// NavigationAction
// ============================================================================

/// Result of a guard or middleware check.
///
/// ```
/// use admin_navigator::NavigationAction;
///
/// let action = NavigationAction::deny("Not authorized");
/// assert!(action.is_deny());
///
/// let action = NavigationAction::redirect("/login");
/// assert_eq!(action.redirect_path(), Some("/login"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationAction {
    /// Allow navigation to proceed.
    Continue,

    /// Deny navigation with a reason.
    Deny { reason: String },

    /// Redirect to a different path.
    Redirect { to: String, reason: Option<String> },
}

impl NavigationAction {
    pub fn allow() -> Self {
        Self::Continue
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self::Deny {
            reason: reason.into(),
        }
    }

    pub fn redirect(to: impl Into<String>) -> Self {
        Self::Redirect {
            to: to.into(),
            reason: None,
        }
    }

    pub fn redirect_with_reason(to: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Redirect {
            to: to.into(),
            reason: Some(reason.into()),
        }
    }

    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue)
    }

    pub fn is_deny(&self) -> bool {
        matches!(self, Self::Deny { .. })
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect { .. })
    }

    /// Get the redirect path, if this is a redirect action.
    pub fn redirect_path(&self) -> Option<&str> {
        match self {
            Self::Redirect { to, .. } => Some(to.as_str()),
            _ => None,
        }
    }
}

// ============================================================================
// RouteGuard trait
// ============================================================================

/// Trait for route guards that control access to routes.
///
/// ```
/// use admin_navigator::{RouteGuard, NavigationAction, NavigationRequest, Session};
///
/// struct ReadOnlyHours;
///
/// impl RouteGuard for ReadOnlyHours {
///     fn check(&self, session: &Session, request: &NavigationRequest) -> NavigationAction {
///         if request.path.ends_with("/edit") && !session.has_role(&["admin"]) {
///             NavigationAction::deny("Editing is closed")
///         } else {
///             NavigationAction::Continue
///         }
///     }
/// }
/// ```
pub trait RouteGuard: Send + Sync + 'static {
    /// Check if navigation should be allowed.
    fn check(&self, session: &Session, request: &NavigationRequest) -> NavigationAction;

    /// Guard name for debugging and error messages.
    fn name(&self) -> &'static str {
        "RouteGuard"
    }

    /// Priority for execution order. Higher runs first. Default is 0.
    fn priority(&self) -> i32 {
        0
    }
}

// ============================================================================
// guard_fn helper
// ============================================================================

/// Create a guard from a function or closure.
///
/// ```
/// use admin_navigator::{guard_fn, NavigationAction};
///
/// let maintenance = guard_fn(|_session, request| {
///     if request.path.starts_with("/system") {
///         NavigationAction::deny("Maintenance")
///     } else {
///         NavigationAction::Continue
///     }
/// });
/// ```
pub const fn guard_fn<F>(f: F) -> FnGuard<F>
where
    F: Fn(&Session, &NavigationRequest) -> NavigationAction + Send + Sync + 'static,
{
    FnGuard { f }
}

/// Guard created from a function or closure.
pub struct FnGuard<F> {
    f: F,
}

impl<F> RouteGuard for FnGuard<F>
where
    F: Fn(&Session, &NavigationRequest) -> NavigationAction + Send + Sync + 'static,
{
    fn check(&self, session: &Session, request: &NavigationRequest) -> NavigationAction {
        (self.f)(session, request)
    }
}

// ============================================================================
// AuthGuard
// ============================================================================

/// Requires an authenticated session.
pub struct AuthGuard {
    redirect_path: String,
}

impl AuthGuard {
    /// Redirect unauthenticated users to `redirect_path`.
    pub fn new(redirect_path: impl Into<String>) -> Self {
        Self {
            redirect_path: redirect_path.into(),
        }
    }
}

impl RouteGuard for AuthGuard {
    fn check(&self, session: &Session, _request: &NavigationRequest) -> NavigationAction {
        if session.is_authenticated() {
            NavigationAction::Continue
        } else {
            NavigationAction::redirect_with_reason(&self.redirect_path, "Authentication required")
        }
    }

    fn name(&self) -> &'static str {
        "AuthGuard"
    }

    fn priority(&self) -> i32 {
        100
    }
}

// ============================================================================
// RoleGuard
// ============================================================================

/// Requires at least one of the listed roles.
///
/// An empty role list places no requirement.
pub struct RoleGuard {
    roles: Vec<String>,
    redirect_path: Option<String>,
}

impl RoleGuard {
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            roles: roles.into_iter().map(Into::into).collect(),
            redirect_path: None,
        }
    }

    /// Redirect instead of denying when the role is missing.
    #[must_use]
    pub fn with_redirect(mut self, path: impl Into<String>) -> Self {
        self.redirect_path = Some(path.into());
        self
    }
}

impl RouteGuard for RoleGuard {
    fn check(&self, session: &Session, _request: &NavigationRequest) -> NavigationAction {
        if self.roles.is_empty() || session.has_role(self.roles.as_slice()) {
            NavigationAction::Continue
        } else if let Some(redirect) = &self.redirect_path {
            NavigationAction::redirect_with_reason(
                redirect,
                format!("Requires one of roles {:?}", self.roles),
            )
        } else {
            NavigationAction::deny(format!("Missing required role: {:?}", self.roles))
        }
    }

    fn name(&self) -> &'static str {
        "RoleGuard"
    }

    fn priority(&self) -> i32 {
        90
    }
}

// ============================================================================
// PermissionGuard
// ============================================================================

/// Requires the wildcard permission or at least one of the listed permissions.
///
/// An empty permission list places no requirement.
pub struct PermissionGuard {
    permissions: Vec<String>,
    wildcard: String,
    redirect_path: Option<String>,
}

impl PermissionGuard {
    pub fn new<I, S>(permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            permissions: permissions.into_iter().map(Into::into).collect(),
            wildcard: WILDCARD_PERMISSION.to_string(),
            redirect_path: None,
        }
    }

    /// Use a different wildcard permission string.
    #[must_use]
    pub fn with_wildcard(mut self, wildcard: impl Into<String>) -> Self {
        self.wildcard = wildcard.into();
        self
    }

    /// Redirect instead of denying when the permission is missing.
    #[must_use]
    pub fn with_redirect(mut self, path: impl Into<String>) -> Self {
        self.redirect_path = Some(path.into());
        self
    }
}

impl RouteGuard for PermissionGuard {
    fn check(&self, session: &Session, _request: &NavigationRequest) -> NavigationAction {
        if self.permissions.is_empty()
            || session.has_permission_with(self.permissions.as_slice(), &self.wildcard)
        {
            NavigationAction::Continue
        } else if let Some(redirect) = &self.redirect_path {
            NavigationAction::redirect_with_reason(
                redirect,
                format!("Missing permission: {:?}", self.permissions),
            )
        } else {
            NavigationAction::deny(format!("Missing permission: {:?}", self.permissions))
        }
    }

    fn name(&self) -> &'static str {
        "PermissionGuard"
    }

    fn priority(&self) -> i32 {
        80
    }
}

// ============================================================================
// Guard Composition
// ============================================================================

/// Combines multiple guards with AND logic.
///
/// All guards must return [`NavigationAction::Continue`] for navigation to proceed.
/// The first non-continue result is returned immediately (short-circuit).
/// Guards are executed in priority order (higher priority first).
pub struct Guards {
    guards: Vec<Box<dyn RouteGuard>>,
}

impl Guards {
    #[must_use]
    pub fn new(guards: Vec<Box<dyn RouteGuard>>) -> Self {
        Self { guards }
    }

    pub fn builder() -> GuardBuilder {
        GuardBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

impl RouteGuard for Guards {
    fn check(&self, session: &Session, request: &NavigationRequest) -> NavigationAction {
        let mut sorted: Vec<_> = self.guards.iter().collect();
        sorted.sort_by_key(|g| std::cmp::Reverse(g.priority()));

        for guard in sorted {
            let result = guard.check(session, request);
            if !matches!(result, NavigationAction::Continue) {
                return result;
            }
        }
        NavigationAction::Continue
    }

    fn name(&self) -> &'static str {
        "Guards"
    }

    fn priority(&self) -> i32 {
        self.guards.iter().map(|g| g.priority()).max().unwrap_or(0)
    }
}

/// Builder for [`Guards`] with fluent API.
#[must_use]
pub struct GuardBuilder {
    guards: Vec<Box<dyn RouteGuard>>,
}

impl GuardBuilder {
    pub fn new() -> Self {
        Self { guards: Vec::new() }
    }

    /// Add a guard to the composition.
    pub fn guard<G: RouteGuard>(mut self, guard: G) -> Self {
        self.guards.push(Box::new(guard));
        self
    }

    #[must_use]
    pub fn build(self) -> Guards {
        Guards::new(self.guards)
    }
}

impl Default for GuardBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// NotGuard
// ============================================================================

/// Inverts a guard result.
///
/// - `Continue` becomes `Deny`
/// - `Deny` becomes `Continue`
/// - `Redirect` is preserved as-is
///
/// ```
/// use admin_navigator::{NotGuard, AuthGuard};
///
/// // Only signed-out users may open the login page.
/// let guard = NotGuard::new(AuthGuard::new("/login"));
/// ```
pub struct NotGuard {
    guard: Box<dyn RouteGuard>,
}

impl NotGuard {
    pub fn new<G: RouteGuard>(guard: G) -> Self {
        Self {
            guard: Box::new(guard),
        }
    }
}

impl RouteGuard for NotGuard {
    fn check(&self, session: &Session, request: &NavigationRequest) -> NavigationAction {
        match self.guard.check(session, request) {
            NavigationAction::Continue => {
                NavigationAction::deny("Inverted: guard allowed but NOT expected")
            }
            NavigationAction::Deny { .. } => NavigationAction::Continue,
            redirect @ NavigationAction::Redirect { .. } => redirect,
        }
    }

    fn name(&self) -> &'static str {
        "NotGuard"
    }

    fn priority(&self) -> i32 {
        self.guard.priority()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn make_request(path: &str) -> NavigationRequest {
        NavigationRequest::new(path)
    }

    fn signed_in(roles: &[&str], permissions: &[&str]) -> Session {
        Session {
            token: Some("token".to_string()),
            authenticated: true,
            roles: roles.iter().map(|s| s.to_string()).collect(),
            permissions: permissions.iter().map(|s| s.to_string()).collect(),
            ..Session::default()
        }
    }

    // --- NavigationAction ---

    #[test]
    fn test_navigation_action_helpers() {
        assert!(NavigationAction::allow().is_continue());
        assert!(NavigationAction::deny("x").is_deny());
        let action = NavigationAction::redirect_with_reason("/login", "Auth required");
        assert!(action.is_redirect());
        assert_eq!(action.redirect_path(), Some("/login"));
        assert_eq!(NavigationAction::deny("x").redirect_path(), None);
    }

    #[test]
    fn test_guard_fn_helper() {
        let guard = guard_fn(|_session, _req| NavigationAction::Continue);
        assert_eq!(guard.name(), "RouteGuard");
        assert_eq!(guard.priority(), 0);
    }

    // --- AuthGuard ---

    #[test]
    fn test_auth_guard_allows_authenticated() {
        let guard = AuthGuard::new("/login");
        assert_eq!(guard.name(), "AuthGuard");
        assert_eq!(guard.priority(), 100);

        let result = guard.check(&signed_in(&[], &[]), &make_request("/dashboard"));
        assert!(result.is_continue());
    }

    #[test]
    fn test_auth_guard_redirects_unauthenticated() {
        let guard = AuthGuard::new("/login");
        let result = guard.check(&Session::default(), &make_request("/dashboard"));
        assert!(result.is_redirect());
        assert_eq!(result.redirect_path(), Some("/login"));
    }

    // --- RoleGuard ---

    #[test]
    fn test_role_guard_any_of() {
        let guard = RoleGuard::new(["admin", "editor"]);
        assert_eq!(guard.priority(), 90);
        let request = make_request("/data");
        assert!(guard.check(&signed_in(&["editor"], &[]), &request).is_continue());
        assert!(guard.check(&signed_in(&["user"], &[]), &request).is_deny());
    }

    #[test]
    fn test_role_guard_with_redirect() {
        let guard = RoleGuard::new(["admin"]).with_redirect("/403");
        let result = guard.check(&signed_in(&["user"], &[]), &make_request("/system"));
        assert_eq!(result.redirect_path(), Some("/403"));
    }

    #[test]
    fn test_role_guard_empty_requirement() {
        let guard = RoleGuard::new(Vec::<String>::new());
        assert!(guard
            .check(&signed_in(&[], &[]), &make_request("/"))
            .is_continue());
    }

    // --- PermissionGuard ---

    #[test]
    fn test_permission_guard_wildcard() {
        let guard = PermissionGuard::new(["system:user:list"]);
        let request = make_request("/system/user");
        assert!(guard.check(&signed_in(&[], &["*:*:*"]), &request).is_continue());
        assert!(guard
            .check(&signed_in(&[], &["system:user:list"]), &request)
            .is_continue());
        assert!(guard
            .check(&signed_in(&[], &["system:role:list"]), &request)
            .is_deny());
    }

    #[test]
    fn test_permission_guard_custom_wildcard() {
        let guard = PermissionGuard::new(["a"])
            .with_wildcard("all")
            .with_redirect("/forbidden");
        let request = make_request("/a");
        assert!(guard.check(&signed_in(&[], &["all"]), &request).is_continue());
        assert_eq!(
            guard
                .check(&signed_in(&[], &["*:*:*"]), &request)
                .redirect_path(),
            Some("/forbidden")
        );
    }

    // --- Guards composition ---

    #[test]
    fn test_guards_all_pass() {
        let guards = Guards::builder()
            .guard(AuthGuard::new("/login"))
            .guard(RoleGuard::new(["admin"]))
            .build();
        assert_eq!(guards.len(), 2);
        let result = guards.check(&signed_in(&["admin"], &[]), &make_request("/admin"));
        assert!(result.is_continue());
    }

    #[test]
    fn test_guards_priority_order() {
        // Auth (100) runs before Role (90) regardless of insertion order
        let guards = Guards::builder()
            .guard(RoleGuard::new(["admin"]).with_redirect("/role-denied"))
            .guard(AuthGuard::new("/auth-denied"))
            .build();

        let result = guards.check(&Session::default(), &make_request("/admin"));
        assert_eq!(result.redirect_path(), Some("/auth-denied"));
        assert_eq!(guards.priority(), 100);
    }

    // --- NotGuard ---

    #[test]
    fn test_not_guard_inverts() {
        let request = make_request("/login");
        let guard = NotGuard::new(guard_fn(|_, _| NavigationAction::Continue));
        assert!(guard.check(&Session::default(), &request).is_deny());

        let guard = NotGuard::new(guard_fn(|_, _| NavigationAction::deny("nope")));
        assert!(guard.check(&Session::default(), &request).is_continue());
    }

    #[test]
    fn test_not_guard_preserves_redirect() {
        let guard = NotGuard::new(guard_fn(|_, _| NavigationAction::redirect("/somewhere")));
        let result = guard.check(&Session::default(), &make_request("/test"));
        assert_eq!(result.redirect_path(), Some("/somewhere"));
    }
}
