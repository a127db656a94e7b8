//! Route middleware for cross-cutting navigation concerns.
//!
//! Middleware runs **before** and **after** an allowed navigation. Unlike
//! guards (which decide *if* navigation happens), middleware handles side
//! effects like updating the document title, analytics, progress indicators
//! and audit logging.
//!
//! # Execution order
//!
//! When multiple middleware are registered, they execute in **priority order**
//! (higher [`priority`](RouteMiddleware::priority) first) for `before_navigation`,
//! and in reverse order for `after_navigation` (onion model).
//!
//! # Creating middleware
//!
//! | Approach | When to use |
//! |----------|-------------|
//! | Implement [`RouteMiddleware`] | Full control, named, with custom priority |
//! | [`middleware_fn`] | Quick one-off from two closures |
//!
//! # Example
//!
//! ```
//! use admin_navigator::{RouteMiddleware, NavigationRequest, Session};
//!
//! struct AuditMiddleware;
//!
//! impl RouteMiddleware for AuditMiddleware {
//!     fn before_navigation(&self, session: &Session, request: &NavigationRequest) {
//!         let user = session.identity.as_ref().map_or("-", |u| u.username.as_str());
//!         println!("{user} opening {}", request.path);
//!     }
//!
//!     fn after_navigation(&self, _session: &Session, request: &NavigationRequest) {
//!         println!("opened {}", request.path);
//!     }
//! }
//! ```

use crate::navigator::NavigationRequest;
use crate::session::Session;

// ============================================================================
// RouteMiddleware trait
// ============================================================================

/// Hooks around an allowed navigation.
pub trait RouteMiddleware: Send + Sync + 'static {
    /// Called after the guards passed, before history changes.
    fn before_navigation(&self, session: &Session, request: &NavigationRequest);

    /// Called after history and visited views were updated.
    fn after_navigation(&self, session: &Session, request: &NavigationRequest);

    /// Middleware name for debugging.
    fn name(&self) -> &'static str {
        "RouteMiddleware"
    }

    /// Middleware priority (higher runs first for `before`, last for `after`).
    fn priority(&self) -> i32 {
        0
    }
}

// ============================================================================
// middleware_fn helper
// ============================================================================

/// Create middleware from two closures (before and after).
///
/// ```
/// use admin_navigator::middleware_fn;
///
/// let mw = middleware_fn(
///     |_session, request| println!("Before: {}", request.path),
///     |_session, request| println!("After: {}", request.path),
/// );
/// ```
pub const fn middleware_fn<B, A>(before: B, after: A) -> FnMiddleware<B, A>
where
    B: Fn(&Session, &NavigationRequest) + Send + Sync + 'static,
    A: Fn(&Session, &NavigationRequest) + Send + Sync + 'static,
{
    FnMiddleware { before, after }
}

/// Middleware created from two closures via [`middleware_fn`].
pub struct FnMiddleware<B, A> {
    before: B,
    after: A,
}

impl<B, A> RouteMiddleware for FnMiddleware<B, A>
where
    B: Fn(&Session, &NavigationRequest) + Send + Sync + 'static,
    A: Fn(&Session, &NavigationRequest) + Send + Sync + 'static,
{
    fn before_navigation(&self, session: &Session, request: &NavigationRequest) {
        (self.before)(session, request);
    }

    fn after_navigation(&self, session: &Session, request: &NavigationRequest) {
        (self.after)(session, request);
    }
}

// ============================================================================
// Tests
// ============================================================================
