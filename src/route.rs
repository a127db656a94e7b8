//! Route model shared by the catalog, the merger and the navigator.
//!
//! - [`RouteMeta`]: display and behaviour metadata of a route.
//! - [`CatalogRoute`]: a page compiled into the client, immutable after the
//!   catalog is built.
//! - [`MergedRoute`]: the reconciliation result installed into the session.
//! - [`ComponentId`] / [`ComponentRef`]: opaque handles the rendering layer
//!   turns into actual pages.
//!
//! Catalog routes use the same fluent builder style as the rest of the crate:
//!
//! ```
//! use admin_navigator::{CatalogRoute, RouteMeta};
//!
//! let system = CatalogRoute::new("/system", "System")
//!     .component("layout")
//!     .redirect("/system/user")
//!     .meta(RouteMeta::titled("System").icon("ri:settings-3-line").rank(2))
//!     .children(vec![
//!         CatalogRoute::new("/system/user", "SystemUser")
//!             .component("system/user")
//!             .meta(RouteMeta::titled("Users").roles(["admin"]).auths(["system:user:list"])),
//!     ]);
//!
//! assert_eq!(system.children[0].meta.roles, vec!["admin".to_string()]);
//! ```

use crate::matching::normalize_path;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Page transition settings. Only the catalog supplies these.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransitionMeta {
    pub name: Option<String>,
    pub enter_transition: Option<String>,
    pub leave_transition: Option<String>,
}

/// Tree a route was looked up in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RouteSource {
    /// The merged tree of the current session.
    #[default]
    Installed,
    /// The route catalog.
    Catalog,
}

/// Route metadata.
///
/// Display fields (`title`, `icon`, `rank`, `show_link`) and access
/// requirements (`roles`, `auths`) can be overridden by the server menu. The
/// remaining fields only ever come from the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouteMeta {
    pub title: Option<String>,
    pub icon: Option<String>,
    pub rank: Option<i32>,
    /// `None` means visible.
    pub show_link: Option<bool>,
    /// Roles of which the user needs at least one. Empty = no requirement.
    pub roles: Vec<String>,
    /// Permissions of which the user needs at least one. Empty = no requirement.
    pub auths: Vec<String>,
    pub keep_alive: Option<bool>,
    pub show_parent: Option<bool>,
    pub hidden_tag: Option<bool>,
    pub fixed_tag: Option<bool>,
    /// Menu entry to highlight when this route is active.
    pub active_path: Option<String>,
    pub frame_src: Option<String>,
    pub dynamic_level: Option<u32>,
    pub transition: Option<TransitionMeta>,
}

impl RouteMeta {
    /// Metadata with just a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn rank(mut self, rank: i32) -> Self {
        self.rank = Some(rank);
        self
    }

    pub fn show_link(mut self, show: bool) -> Self {
        self.show_link = Some(show);
        self
    }

    pub fn roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    pub fn auths<I, S>(mut self, auths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.auths = auths.into_iter().map(Into::into).collect();
        self
    }

    pub fn keep_alive(mut self, keep: bool) -> Self {
        self.keep_alive = Some(keep);
        self
    }

    pub fn hidden_tag(mut self, hidden: bool) -> Self {
        self.hidden_tag = Some(hidden);
        self
    }

    pub fn active_path(mut self, path: impl Into<String>) -> Self {
        self.active_path = Some(path.into());
        self
    }

    pub fn transition(mut self, transition: TransitionMeta) -> Self {
        self.transition = Some(transition);
        self
    }

    /// Return `true` if the route declares any role or permission requirement.
    pub fn has_requirements(&self) -> bool {
        !self.roles.is_empty() || !self.auths.is_empty()
    }

    /// Return `true` unless the route is explicitly hidden from menus.
    pub fn is_visible(&self) -> bool {
        self.show_link.unwrap_or(true)
    }
}

/// Opaque handle of a page component known to the rendering layer.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(Arc<str>);

impl ComponentId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentId({})", self.0)
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ComponentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ComponentId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

/// How a merged route obtains its component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentRef {
    /// Component taken from the matching catalog route.
    Static(ComponentId),
    /// No catalog match; resolved through the
    /// [`ComponentRegistry`](crate::component::ComponentRegistry) by module key.
    Convention { module: String },
    /// Grouping or redirect-only route without a component of its own.
    Empty,
}

impl ComponentRef {
    pub fn is_static(&self) -> bool {
        matches!(self, Self::Static(_))
    }

    pub fn is_convention(&self) -> bool {
        matches!(self, Self::Convention { .. })
    }
}

/// A route compiled into the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRoute {
    pub path: String,
    pub name: String,
    pub component: Option<ComponentId>,
    pub redirect: Option<String>,
    pub meta: RouteMeta,
    pub children: Vec<CatalogRoute>,
}

impl CatalogRoute {
    /// Create a route without a component, metadata or children.
    ///
    /// The path is normalised.
    pub fn new(path: impl AsRef<str>, name: impl Into<String>) -> Self {
        Self {
            path: normalize_path(path.as_ref()).into_owned(),
            name: name.into(),
            component: None,
            redirect: None,
            meta: RouteMeta::default(),
            children: Vec::new(),
        }
    }

    pub fn component(mut self, component: impl Into<ComponentId>) -> Self {
        self.component = Some(component.into());
        self
    }

    pub fn redirect(mut self, to: impl AsRef<str>) -> Self {
        self.redirect = Some(normalize_path(to.as_ref()).into_owned());
        self
    }

    pub fn meta(mut self, meta: RouteMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn children(mut self, children: Vec<CatalogRoute>) -> Self {
        self.children = children;
        self
    }
}

/// A route produced by reconciling the server menu with the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedRoute {
    pub path: String,
    pub name: String,
    pub component: ComponentRef,
    pub redirect: Option<String>,
    pub meta: RouteMeta,
    pub children: Vec<MergedRoute>,
}

impl MergedRoute {
    /// Find a route by exact (normalised) path anywhere in `routes`.
    pub fn find<'a>(routes: &'a [MergedRoute], path: &str) -> Option<&'a MergedRoute> {
        let path = normalize_path(path);
        routes.iter().find_map(|route| {
            if route.path == path {
                Some(route)
            } else {
                Self::find(&route.children, &path)
            }
        })
    }

    /// Depth-first, parent-before-children view of the tree.
    pub fn flatten(routes: &[MergedRoute]) -> Vec<&MergedRoute> {
        let mut out = Vec::new();
        let mut stack: Vec<&MergedRoute> = routes.iter().rev().collect();
        while let Some(route) = stack.pop() {
            out.push(route);
            stack.extend(route.children.iter().rev());
        }
        out
    }

    /// Copy of the route without its children.
    pub fn clone_shallow(&self) -> MergedRoute {
        MergedRoute {
            path: self.path.clone(),
            name: self.name.clone(),
            component: self.component.clone(),
            redirect: self.redirect.clone(),
            meta: self.meta.clone(),
            children: Vec::new(),
        }
    }

    /// Route title, or `fallback` when none is declared.
    pub fn title_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.meta.title.as_deref().unwrap_or(fallback)
    }
}

impl From<&CatalogRoute> for MergedRoute {
    fn from(route: &CatalogRoute) -> Self {
        Self {
            path: route.path.clone(),
            name: route.name.clone(),
            component: route
                .component
                .clone()
                .map_or(ComponentRef::Empty, ComponentRef::Static),
            redirect: route.redirect.clone(),
            meta: route.meta.clone(),
            children: route.children.iter().map(MergedRoute::from).collect(),
        }
    }
}
