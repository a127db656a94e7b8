//! Navigation pipeline: the guard every page change goes through.
//!
//! [`Navigator::navigate`] decides whether a target may be opened and, when it
//! may, commits the change to history, the active menu and the visited views.
//!
//! # Pipeline
//!
//! 1. Allow-listed paths (login, 403, 404) open without a session.
//! 2. Without a session the user is sent to the login page with a
//!    `redirect` parameter pointing back at the target.
//! 3. A session without identity or routes is restored through
//!    [`SessionManager::ensure_routes`]; a failed restore also ends at login.
//! 4. The target route is looked up in the merged tree (falling back to the
//!    route catalog). Route redirects are followed up to
//!    [`MAX_REDIRECT_DEPTH`] times. The role and permission requirements of
//!    the route and all its ancestors are checked; a miss ends at the
//!    forbidden page. Custom guards run afterwards, in priority order.
//! 5. The route is recorded as a visited view.
//! 6. History and the active menu are updated between the middleware hooks.
//!
//! A navigation that is overtaken by a newer one while waiting on the session
//! is blocked instead of committed.

use crate::config::ShellConfig;
use crate::diagnostics::DiagnosticEvent;
use crate::error::{NavigationResult, ShellError};
use crate::guards::{Guards, NavigationAction, PermissionGuard, RoleGuard, RouteGuard};
use crate::matching::{match_pattern, normalize_path, split_target};
use crate::params::{with_query, QueryParams, RouteParams};
use crate::persistence::KeyValueStore;
use crate::route::{MergedRoute, RouteMeta, RouteSource};
use crate::session::{Session, SessionManager};
use crate::state::RouterState;
use crate::transport::TransportError;
use crate::visited::{VisitedView, VisitedViews};
use crate::{debug_log, error_log, info_log, trace_log, warn_log};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[cfg(feature = "cache")]
use crate::cache::{RouteCache, RouteId};
#[cfg(feature = "middleware")]
use crate::middleware::RouteMiddleware;
#[cfg(feature = "cache")]
use std::sync::atomic::{AtomicU64, Ordering};

/// Maximum number of redirects followed by one navigation.
pub const MAX_REDIRECT_DEPTH: usize = 5;

// ============================================================================
// NavigationRequest
// ============================================================================

/// The navigation being decided, as seen by guards and middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    /// Path the user is leaving, `None` on the first navigation.
    pub from: Option<String>,
    /// Normalized target path, without the query.
    pub path: String,
    pub query: QueryParams,
    /// Values captured by `:param` segments of the matched route.
    pub params: RouteParams,
    /// Name of the matched route, once known.
    pub route: Option<String>,
    /// Metadata of the matched route; default until the route is resolved.
    pub meta: RouteMeta,
}

impl NavigationRequest {
    /// Parse a target such as `/system/user?page=2`.
    pub fn new(target: impl AsRef<str>) -> Self {
        let (path, query) = split_target(target.as_ref());
        Self {
            from: None,
            path: normalize_path(path).into_owned(),
            query: query.map(QueryParams::from_query_string).unwrap_or_default(),
            params: RouteParams::new(),
            route: None,
            meta: RouteMeta::default(),
        }
    }

    pub fn with_from(mut self, from: Option<String>) -> Self {
        self.from = from;
        self
    }

    /// Path with the query string re-attached.
    pub fn full_path(&self) -> String {
        with_query(&self.path, &self.query)
    }
}

/// One entry of the breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    pub title: String,
    pub path: String,
}

/// Kind of history change to perform once the pipeline allows a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NavigateOp {
    Push,
    Replace,
    Back,
    Forward,
}

/// Route chain for a target, root first.
struct Resolved {
    chain: Vec<MergedRoute>,
    params: RouteParams,
}

// ============================================================================
// Navigator
// ============================================================================

/// Decides and records navigations for one signed-in shell.
///
/// # Example
///
/// ```no_run
/// # async fn run(sessions: std::sync::Arc<admin_navigator::SessionManager>) {
/// use admin_navigator::Navigator;
///
/// let navigator = Navigator::new(sessions);
/// let result = navigator.navigate("/system/user").await;
/// if let Some(to) = result.redirect_path() {
///     println!("go to {to} instead");
/// }
/// # }
/// ```
pub struct Navigator {
    session: Arc<SessionManager>,
    catalog_routes: Vec<MergedRoute>,
    state: Mutex<RouterState>,
    views: Mutex<VisitedViews>,
    #[cfg(feature = "cache")]
    cache: Mutex<RouteCache>,
    /// Session epoch the cached chains were computed in.
    #[cfg(feature = "cache")]
    cache_epoch: AtomicU64,
    #[cfg(feature = "guard")]
    guards: Vec<Box<dyn RouteGuard>>,
    #[cfg(feature = "middleware")]
    middleware: Vec<Box<dyn RouteMiddleware>>,
}

impl Navigator {
    pub fn new(session: Arc<SessionManager>) -> Self {
        let catalog_routes = session
            .catalog()
            .routes()
            .iter()
            .map(MergedRoute::from)
            .collect();
        let views = VisitedViews::new(&session.config().home_path);
        Self {
            session,
            catalog_routes,
            state: Mutex::new(RouterState::new()),
            views: Mutex::new(views),
            #[cfg(feature = "cache")]
            cache: Mutex::new(RouteCache::new()),
            #[cfg(feature = "cache")]
            cache_epoch: AtomicU64::new(u64::MAX),
            #[cfg(feature = "guard")]
            guards: Vec::new(),
            #[cfg(feature = "middleware")]
            middleware: Vec::new(),
        }
    }

    /// Persist visited views to `store`, restoring tabs saved earlier in the session.
    pub fn with_store(self, store: Arc<dyn KeyValueStore>) -> Self {
        let views = VisitedViews::new(&self.session.config().home_path).with_store(store);
        Self {
            views: Mutex::new(views),
            ..self
        }
    }

    /// Register a guard that runs after the role and permission checks.
    #[cfg(feature = "guard")]
    pub fn with_guard<G: RouteGuard>(mut self, guard: G) -> Self {
        self.guards.push(Box::new(guard));
        self.guards
            .sort_by_key(|guard| std::cmp::Reverse(guard.priority()));
        self
    }

    #[cfg(feature = "middleware")]
    pub fn with_middleware<M: RouteMiddleware>(mut self, middleware: M) -> Self {
        self.middleware.push(Box::new(middleware));
        self.middleware
            .sort_by_key(|middleware| std::cmp::Reverse(middleware.priority()));
        self
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    fn config(&self) -> &ShellConfig {
        self.session.config()
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Navigate to `target` (path with an optional query string).
    pub async fn navigate(&self, target: &str) -> NavigationResult {
        self.navigate_with_pipeline(target.to_string(), NavigateOp::Push)
            .await
    }

    /// Navigate to `target`, replacing the current history entry.
    pub async fn replace(&self, target: &str) -> NavigationResult {
        self.navigate_with_pipeline(target.to_string(), NavigateOp::Replace)
            .await
    }

    /// Go back one history entry, re-running the guards on it.
    ///
    /// Returns `None` when there is nothing to go back to.
    pub async fn back(&self) -> Option<NavigationResult> {
        let target = self.state().peek_back_path().map(str::to_string)?;
        Some(self.navigate_with_pipeline(target, NavigateOp::Back).await)
    }

    /// Go forward one history entry, re-running the guards on it.
    pub async fn forward(&self) -> Option<NavigationResult> {
        let target = self.state().peek_forward_path().map(str::to_string)?;
        Some(self.navigate_with_pipeline(target, NavigateOp::Forward).await)
    }

    async fn navigate_with_pipeline(&self, target: String, op: NavigateOp) -> NavigationResult {
        let nav_id = self.state().start_navigation();
        let mut target = target;
        let mut op = op;

        for _ in 0..MAX_REDIRECT_DEPTH {
            let from = self.current_path();
            info_log!("Navigation {:?}: '{:?}' → '{}'", op, from, target);
            let mut request = NavigationRequest::new(&target).with_from(from);

            // Step 1: Allow-listed pages need no session
            if self.config().is_allow_listed(&request.path) {
                debug_log!("'{}' is allow-listed", request.path);
                let session = self.session.session().await;
                return self.commit(&session, &request, None, op, nav_id);
            }

            // Step 2: Require a session
            if !self.session.is_authenticated().await {
                debug_log!("No session, sending '{}' to login", request.path);
                return self.redirect_login(&request);
            }

            // Step 3: Restore identity and routes
            if let Err(e) = self.session.ensure_routes().await {
                warn_log!("Cannot open '{}': {}", request.path, e);
                return self.redirect_login(&request);
            }

            let session = self.session.session().await;

            // Step 4: Resolve the route, follow redirects, check requirements
            let resolved = self.resolve(&session, &request.path);
            if let Some(leaf) = resolved.chain.last() {
                if let Some(redirect) = &leaf.redirect {
                    if normalize_path(redirect) != request.path {
                        debug_log!("Route '{}' redirects to '{}'", request.path, redirect);
                        target = with_query(redirect, &request.query);
                        op = redirect_op(op);
                        continue;
                    }
                }
                request.route = Some(leaf.name.clone()).filter(|name| !name.is_empty());
                request.meta = leaf.meta.clone();
            }
            request.params = resolved.params;

            if let Err(reason) = self.check_requirements(&session, &request, &resolved.chain) {
                warn_log!("Navigation to '{}' forbidden: {}", request.path, reason);
                return NavigationResult::RedirectForbidden {
                    to: self.config().forbidden_path.clone(),
                    reason,
                };
            }

            #[cfg(feature = "guard")]
            {
                match self.run_guards(&session, &request) {
                    NavigationAction::Continue => {}
                    NavigationAction::Deny { reason } => {
                        warn_log!("Navigation to '{}' blocked: {}", request.path, reason);
                        return NavigationResult::Blocked {
                            reason,
                            redirect: None,
                        };
                    }
                    NavigationAction::Redirect { to, reason } => {
                        debug_log!(
                            "Guard redirecting from '{}' to '{}': {:?}",
                            request.path,
                            to,
                            reason
                        );
                        target = to;
                        op = redirect_op(op);
                        continue;
                    }
                }
            }

            let leaf = resolved.chain.last().map(|leaf| MergedRoute {
                path: request.path.clone(),
                ..leaf.clone_shallow()
            });
            return self.commit(&session, &request, leaf.as_ref(), op, nav_id);
        }

        error_log!(
            "Redirect loop detected (depth {}) navigating to '{}'",
            MAX_REDIRECT_DEPTH,
            target
        );
        NavigationResult::Blocked {
            reason: format!(
                "Redirect loop detected (depth {}): target '{}'",
                MAX_REDIRECT_DEPTH, target
            ),
            redirect: None,
        }
    }

    /// Steps 5 and 6: record the view and move history.
    fn commit(
        &self,
        session: &Session,
        request: &NavigationRequest,
        leaf: Option<&MergedRoute>,
        op: NavigateOp,
        nav_id: usize,
    ) -> NavigationResult {
        let mut state = self.state();
        if !state.is_navigation_current(nav_id) {
            debug_log!("Navigation to '{}' superseded", request.path);
            return NavigationResult::Blocked {
                reason: "superseded by a newer navigation".to_string(),
                redirect: None,
            };
        }

        #[cfg(feature = "middleware")]
        self.run_middleware_before(session, request);

        let full_path = request.full_path();
        let event = match op {
            NavigateOp::Push => Some(state.push(full_path)),
            NavigateOp::Replace => Some(state.replace(full_path)),
            NavigateOp::Back => state.back(),
            NavigateOp::Forward => state.forward(),
        };
        trace_log!("History change: {:?}", event);

        let active = request
            .meta
            .active_path
            .clone()
            .unwrap_or_else(|| request.path.clone());
        state.set_active_menu(Some(active));
        drop(state);

        if let Some(route) = leaf {
            if self.views().add_view(route) {
                trace_log!("Recorded visited view '{}'", route.path);
            }
        }

        #[cfg(feature = "middleware")]
        self.run_middleware_after(session, request);
        #[cfg(not(feature = "middleware"))]
        let _ = session;

        info_log!("Navigation complete: '{}'", request.path);
        NavigationResult::Allowed {
            path: request.path.clone(),
            route: request.route.clone(),
        }
    }

    fn redirect_login(&self, request: &NavigationRequest) -> NavigationResult {
        let return_path = request.full_path();
        let mut query = QueryParams::new();
        query.insert(self.config().redirect_param.clone(), return_path.clone());
        NavigationResult::RedirectLogin {
            to: with_query(&self.config().login_path, &query),
            return_path,
        }
    }

    /// Role and permission requirements of every route in `chain`.
    fn check_requirements(
        &self,
        session: &Session,
        request: &NavigationRequest,
        chain: &[MergedRoute],
    ) -> Result<(), String> {
        for route in chain.iter().filter(|route| route.meta.has_requirements()) {
            let guards = Guards::builder()
                .guard(RoleGuard::new(route.meta.roles.iter().cloned()))
                .guard(
                    PermissionGuard::new(route.meta.auths.iter().cloned())
                        .with_wildcard(&self.config().wildcard_permission),
                )
                .build();

            let reason = match guards.check(session, request) {
                NavigationAction::Continue => continue,
                NavigationAction::Deny { reason } => reason,
                NavigationAction::Redirect { reason, .. } => reason.unwrap_or_default(),
            };
            self.session.sink().emit(DiagnosticEvent::PermissionDenied {
                path: route.path.clone(),
                required_roles: route.meta.roles.clone(),
                required_auths: route.meta.auths.clone(),
            });
            return Err(reason);
        }
        Ok(())
    }

    /// Run the registered guards; the first non-`Continue` result wins.
    #[cfg(feature = "guard")]
    fn run_guards(&self, session: &Session, request: &NavigationRequest) -> NavigationAction {
        for guard in &self.guards {
            let result = guard.check(session, request);
            trace_log!(
                "Guard '{}' (priority {}) → {:?}",
                guard.name(),
                guard.priority(),
                result
            );
            if !result.is_continue() {
                debug_log!(
                    "Guard '{}' stopped navigation to '{}'",
                    guard.name(),
                    request.path
                );
                return result;
            }
        }
        NavigationAction::Continue
    }

    #[cfg(feature = "middleware")]
    fn run_middleware_before(&self, session: &Session, request: &NavigationRequest) {
        debug_log!(
            "Running {} before-middleware for '{}'",
            self.middleware.len(),
            request.path
        );
        for middleware in &self.middleware {
            trace_log!(
                "Middleware '{}' before_navigation for '{}'",
                middleware.name(),
                request.path
            );
            middleware.before_navigation(session, request);
        }
    }

    #[cfg(feature = "middleware")]
    fn run_middleware_after(&self, session: &Session, request: &NavigationRequest) {
        for middleware in self.middleware.iter().rev() {
            trace_log!(
                "Middleware '{}' after_navigation for '{}'",
                middleware.name(),
                request.path
            );
            middleware.after_navigation(session, request);
        }
    }

    // ========================================================================
    // Route lookup
    // ========================================================================

    /// Find `path` in the merged tree, then in the catalog.
    ///
    /// A whole chain comes from one tree, so ancestors present in both carry
    /// the requirements of the tree the target was found in.
    fn resolve(&self, session: &Session, path: &str) -> Resolved {
        #[cfg(feature = "cache")]
        {
            let mut cache = self.cache();
            let epoch = self.session.epoch();
            if self.cache_epoch.swap(epoch, Ordering::SeqCst) != epoch {
                cache.clear();
            }
            if let Some(ids) = cache.get(path) {
                let chain: Option<Vec<MergedRoute>> =
                    ids.iter().map(|id| self.lookup(session, id)).collect();
                if let Some(chain) = chain {
                    let params = chain
                        .last()
                        .and_then(|leaf| match_pattern(path, &leaf.path))
                        .unwrap_or_default();
                    return Resolved { chain, params };
                }
            }
        }

        let mut chain = Vec::new();
        let mut source = RouteSource::Installed;
        let params = find_chain(&session.merged_routes, path, &mut chain)
            .or_else(|| {
                chain.clear();
                source = RouteSource::Catalog;
                find_chain(&self.catalog_routes, path, &mut chain)
            })
            .unwrap_or_default();
        let chain: Vec<MergedRoute> = chain.into_iter().map(MergedRoute::clone_shallow).collect();

        #[cfg(feature = "cache")]
        if session.routes_installed {
            self.cache().insert(
                path.to_string(),
                chain
                    .iter()
                    .map(|route| RouteId::from_route(route).with_source(source))
                    .collect(),
            );
        }
        #[cfg(not(feature = "cache"))]
        let _ = source;

        Resolved { chain, params }
    }

    #[cfg(feature = "cache")]
    fn lookup(&self, session: &Session, id: &RouteId) -> Option<MergedRoute> {
        let tree = match id.source {
            RouteSource::Installed => &session.merged_routes,
            RouteSource::Catalog => &self.catalog_routes,
        };
        MergedRoute::find(tree, &id.path).map(MergedRoute::clone_shallow)
    }

    // ========================================================================
    // Session integration
    // ========================================================================

    /// Sign in, then navigate to `return_path` (or the home page).
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        return_path: Option<&str>,
    ) -> Result<NavigationResult, ShellError> {
        self.session.login(username, password).await?;
        let target = return_path
            .filter(|path| !path.is_empty())
            .unwrap_or(&self.config().home_path)
            .to_string();
        Ok(self.navigate(&target).await)
    }

    /// Sign out and forget history, tabs and cached lookups.
    pub async fn logout(&self) {
        self.session.logout().await;
        self.reset();
        info_log!("Signed out");
    }

    /// Turn a failed API call into a navigation outcome.
    ///
    /// 401 ends the session and returns to login with the current page as the
    /// return path; 403 leads to the forbidden page.
    pub async fn on_transport_error(&self, err: TransportError) -> NavigationResult {
        let current = self
            .current_path()
            .unwrap_or_else(|| self.config().home_path.clone());
        match self.session.handle_transport_error(err, &current).await {
            ShellError::AuthenticationRequired => {
                self.reset();
                self.redirect_login(&NavigationRequest::new(&current))
            }
            ShellError::AuthorizationDenied { path } => NavigationResult::RedirectForbidden {
                to: self.config().forbidden_path.clone(),
                reason: format!("Server refused access to '{}'", path),
            },
            other => NavigationResult::Blocked {
                reason: other.to_string(),
                redirect: None,
            },
        }
    }

    fn reset(&self) {
        self.state().clear();
        self.views().clear();
        #[cfg(feature = "cache")]
        self.cache().clear();
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Current path including its query, `None` before the first navigation.
    pub fn current_path(&self) -> Option<String> {
        self.state().current_path().map(str::to_string)
    }

    /// Sidebar entry to highlight.
    pub fn active_menu(&self) -> Option<String> {
        self.state().active_menu().map(str::to_string)
    }

    pub fn can_go_back(&self) -> bool {
        self.state().can_go_back()
    }

    pub fn can_go_forward(&self) -> bool {
        self.state().can_go_forward()
    }

    /// Snapshot of the open tabs.
    pub fn visited_views(&self) -> Vec<VisitedView> {
        self.views().views().to_vec()
    }

    /// Route names whose pages should be kept alive.
    pub fn cached_views(&self) -> Vec<String> {
        self.views().cached_views().to_vec()
    }

    /// Lock the tab strip for closing, pinning or reordering tabs.
    pub fn views(&self) -> MutexGuard<'_, VisitedViews> {
        self.views.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Title of the open page, falling back to the configured default.
    pub async fn page_title(&self) -> String {
        let default = &self.config().default_title;
        let Some(current) = self.current_path() else {
            return default.clone();
        };
        let (path, _) = split_target(&current);
        let session = self.session.session().await;
        self.resolve(&session, &normalize_path(path))
            .chain
            .last()
            .and_then(|leaf| leaf.meta.title.clone())
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| default.clone())
    }

    /// Titled ancestors of `path` in the installed routes, root first.
    pub async fn breadcrumb(&self, path: &str) -> Vec<Breadcrumb> {
        let (path, _) = split_target(path);
        let path = normalize_path(path);
        let session = self.session.session().await;
        let mut chain = Vec::new();
        if find_chain(&session.routes, &path, &mut chain).is_none() {
            return Vec::new();
        }
        chain
            .into_iter()
            .filter_map(|route| {
                let title = route.meta.title.as_ref().filter(|t| !t.is_empty())?;
                Some(Breadcrumb {
                    title: title.clone(),
                    path: route.path.clone(),
                })
            })
            .collect()
    }

    fn state(&self) -> MutexGuard<'_, RouterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(feature = "cache")]
    fn cache(&self) -> MutexGuard<'_, RouteCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("current_path", &self.current_path())
            .field("session", &self.session)
            .finish()
    }
}

/// A redirect replaces the entry being visited rather than moving through history.
fn redirect_op(op: NavigateOp) -> NavigateOp {
    match op {
        NavigateOp::Replace => NavigateOp::Replace,
        _ => NavigateOp::Push,
    }
}

/// Depth-first search for `path`, collecting the route and its ancestors.
fn find_chain<'a>(
    routes: &'a [MergedRoute],
    path: &str,
    out: &mut Vec<&'a MergedRoute>,
) -> Option<RouteParams> {
    for route in routes {
        out.push(route);
        if let Some(params) = match_pattern(path, &route.path) {
            return Some(params);
        }
        if let Some(params) = find_chain(&route.children, path, out) {
            return Some(params);
        }
        out.pop();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::CatalogRoute;

    #[test]
    fn test_request_parses_target() {
        let request = NavigationRequest::new("/system/user/?page=2");
        assert_eq!(request.path, "/system/user");
        assert_eq!(request.query.get("page"), Some("2"));
        assert_eq!(request.full_path(), "/system/user?page=2");
        assert!(request.from.is_none());
    }

    #[test]
    fn test_find_chain_collects_ancestors() {
        let tree: Vec<MergedRoute> = vec![MergedRoute::from(
            &CatalogRoute::new("/system", "System").children(vec![
                CatalogRoute::new("/system/user", "User"),
                CatalogRoute::new("/system/user/:id", "UserDetail"),
            ]),
        )];

        let mut chain = Vec::new();
        let params = find_chain(&tree, "/system/user/42", &mut chain).unwrap();
        let paths: Vec<_> = chain.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, ["/system", "/system/user/:id"]);
        assert_eq!(params.get("id").map(String::as_str), Some("42"));

        chain.clear();
        assert!(find_chain(&tree, "/missing", &mut chain).is_none());
        assert!(chain.is_empty());
    }

    struct Offline;

    #[async_trait::async_trait]
    impl crate::transport::AuthTransport for Offline {
        async fn login(&self, _: &str, _: &str) -> Result<crate::TokenPair, TransportError> {
            Err(TransportError::network("offline"))
        }
        async fn get_user_info(&self, _: &str) -> Result<crate::UserInfo, TransportError> {
            Err(TransportError::network("offline"))
        }
        async fn get_user_menus(
            &self,
            _: &str,
        ) -> Result<Vec<crate::MenuNode>, TransportError> {
            Err(TransportError::network("offline"))
        }
        async fn logout(&self, _: &str) -> Result<(), TransportError> {
            Err(TransportError::network("offline"))
        }
        async fn refresh_token(&self, _: &str) -> Result<crate::TokenPair, TransportError> {
            Err(TransportError::network("offline"))
        }
    }

    #[test]
    fn test_repeated_lookup_uses_the_same_tree() {
        let catalog = crate::RouteCatalog::new(vec![CatalogRoute::new("/reports", "Reports")
            .meta(RouteMeta::titled("Reports"))
            .children(vec![CatalogRoute::new("/reports/audit", "ReportsAudit")
                .meta(RouteMeta::titled("Audit"))])]);
        let sessions = SessionManager::new(
            Arc::new(Offline),
            Arc::new(catalog),
            Arc::new(ShellConfig::default()),
        );
        let navigator = Navigator::new(Arc::new(sessions));

        // same parent path installed with stricter requirements and no children
        let session = Session {
            merged_routes: vec![MergedRoute::from(
                &CatalogRoute::new("/reports", "Reports")
                    .meta(RouteMeta::titled("Reports").roles(["admin"])),
            )],
            routes_installed: true,
            ..Session::default()
        };

        let first = navigator.resolve(&session, "/reports/audit");
        let second = navigator.resolve(&session, "/reports/audit");

        assert_eq!(first.chain.len(), 2);
        assert!(first.chain[0].meta.roles.is_empty());
        assert_eq!(first.chain, second.chain);
        #[cfg(feature = "cache")]
        assert_eq!(navigator.cache().stats().hits, 1);
    }

    #[test]
    fn test_redirect_op() {
        assert_eq!(redirect_op(NavigateOp::Back), NavigateOp::Push);
        assert_eq!(redirect_op(NavigateOp::Replace), NavigateOp::Replace);
    }
}
