//! Role and permission filtering of merged routes.
//!
//! A route passes when the user satisfies both of its requirement lists:
//!
//! | Requirement | Passes when |
//! |-------------|-------------|
//! | `roles` empty | always |
//! | `roles` non-empty | the user holds at least one listed role |
//! | `auths` empty | always |
//! | `auths` non-empty | the user holds the wildcard or at least one listed permission |
//!
//! A denied route is dropped together with its subtree. The subtree is still
//! evaluated so every withheld route is reported to the diagnostics sink.

use crate::config::WILDCARD_PERMISSION;
use crate::diagnostics::{DiagnosticEvent, DiagnosticSink, LogSink};
use crate::route::{MergedRoute, RouteMeta};

/// Return `true` if a user with `roles` and `permissions` may open a route with `meta`.
pub fn is_route_allowed(
    meta: &RouteMeta,
    roles: &[String],
    permissions: &[String],
    wildcard: &str,
) -> bool {
    let roles_ok = meta.roles.is_empty() || meta.roles.iter().any(|r| roles.contains(r));
    let auths_ok = meta.auths.is_empty()
        || permissions.iter().any(|p| p == wildcard)
        || meta.auths.iter().any(|a| permissions.contains(a));
    roles_ok && auths_ok
}

/// Keep the routes the user may open, reporting denials to the log.
pub fn filter_routes(
    routes: &[MergedRoute],
    roles: &[String],
    permissions: &[String],
) -> Vec<MergedRoute> {
    filter_routes_with(routes, roles, permissions, WILDCARD_PERMISSION, &LogSink)
}

/// Keep the routes the user may open.
///
/// Returns a new tree; `routes` is left untouched.
pub fn filter_routes_with(
    routes: &[MergedRoute],
    roles: &[String],
    permissions: &[String],
    wildcard: &str,
    sink: &dyn DiagnosticSink,
) -> Vec<MergedRoute> {
    routes
        .iter()
        .filter_map(|route| {
            let children = filter_routes_with(&route.children, roles, permissions, wildcard, sink);
            if is_route_allowed(&route.meta, roles, permissions, wildcard) {
                Some(MergedRoute {
                    children,
                    ..route.clone_shallow()
                })
            } else {
                sink.emit(DiagnosticEvent::PermissionDenied {
                    path: route.path.clone(),
                    required_roles: route.meta.roles.clone(),
                    required_auths: route.meta.auths.clone(),
                });
                None
            }
        })
        .collect()
}

/// Drop routes hidden from the sidebar (`show_link == false`), recursively.
pub fn visible_menu(routes: &[MergedRoute]) -> Vec<MergedRoute> {
    routes
        .iter()
        .filter(|route| route.meta.is_visible())
        .map(|route| MergedRoute {
            children: visible_menu(&route.children),
            ..route.clone_shallow()
        })
        .collect()
}
