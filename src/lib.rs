//! # admin-navigator
//!
//! Client-side shell logic for role-based admin dashboards: turn the menu a
//! server grants a user into an installed route tree, and decide every page
//! change against the user's session.
//!
//! ## Building blocks
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`catalog`] | Routes the application ships with, addressed by path |
//! | [`merge`] | Reconcile the server menu with the catalog |
//! | [`filter`] | Drop routes the user lacks a role or permission for |
//! | [`rank`] | Stable ordering of sibling routes |
//! | [`session`] | Login, logout, token refresh and single-flight restoration |
//! | [`navigator`] | The navigation guard pipeline |
//! | [`visited`] | Tab strip of visited pages |
//! | [`component`] | Map routes to page components |
//!
//! ## Example
//!
//! ```
//! use admin_navigator::{merge, CatalogRoute, MenuNode, RouteCatalog, RouteMeta};
//!
//! let catalog = RouteCatalog::new(vec![CatalogRoute::new("/system", "System")
//!     .meta(RouteMeta::titled("System").roles(["admin"]))]);
//!
//! let menus: Vec<MenuNode> =
//!     serde_json::from_str(r#"[{"path": "/system", "meta": {"title": "System settings"}}]"#).unwrap();
//!
//! let routes = merge(&catalog, &menus);
//! assert_eq!(routes[0].meta.title.as_deref(), Some("System settings"));
//! assert_eq!(routes[0].meta.roles, vec!["admin"]);
//! ```
//!
//! ## Feature flags
//!
//! - `log` (default): log through the [`log`](https://docs.rs/log) crate
//! - `tracing`: log through [`tracing`](https://docs.rs/tracing) instead
//! - `guard` (default): custom guards on the [`Navigator`]
//! - `middleware` (default): before/after navigation hooks
//! - `cache` (default): LRU cache of route lookups

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod logging;

#[cfg(feature = "cache")]
pub mod cache;
pub mod catalog;
pub mod component;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod filter;
pub mod guards;
pub mod matching;
pub mod menu;
pub mod merge;
#[cfg(feature = "middleware")]
pub mod middleware;
pub mod navigator;
pub mod params;
pub mod persistence;
pub mod rank;
pub mod route;
pub mod session;
pub mod state;
pub mod transport;
pub mod visited;

pub use catalog::RouteCatalog;
pub use component::{ComponentRegistry, ResolvedComponent};
pub use config::{ConfigError, ShellConfig, WILDCARD_PERMISSION};
pub use diagnostics::{CollectingSink, DiagnosticEvent, DiagnosticSink, LogSink, NullSink};
pub use error::{ErrorKind, NavigationResult, Result, ShellError};
pub use filter::{filter_routes, filter_routes_with, is_route_allowed, visible_menu};
pub use guards::{
    guard_fn, AuthGuard, GuardBuilder, Guards, NavigationAction, NotGuard, PermissionGuard,
    RoleGuard, RouteGuard,
};
pub use matching::normalize_path;
pub use menu::{MenuMeta, MenuNode};
pub use merge::{merge, merge_with};
#[cfg(feature = "middleware")]
pub use middleware::{middleware_fn, RouteMiddleware};
pub use navigator::{Breadcrumb, NavigationRequest, Navigator, MAX_REDIRECT_DEPTH};
pub use params::{QueryParams, RouteParams};
pub use persistence::{KeyValueStore, MemoryStore, StorageScope, StoreError};
pub use rank::sort_by_rank;
pub use route::{
    CatalogRoute, ComponentId, ComponentRef, MergedRoute, RouteMeta, RouteSource, TransitionMeta,
};
pub use session::{Session, SessionManager, SessionSnapshot, UserInfo};
pub use state::{NavigationDirection, RouteChangeEvent, RouterState};
pub use transport::{AuthTransport, TokenPair, TransportError};
pub use visited::{VisitedView, VisitedViews};
