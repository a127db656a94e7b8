//! Server-delivered menu tree.
//!
//! The identity service returns one menu tree per user. Each [`MenuNode`]
//! names a navigable path plus the display metadata the server wants to
//! impose (title, icon, rank, visibility, required roles and permissions).
//! The JSON shape follows the server payload:
//!
//! ```
//! use admin_navigator::MenuNode;
//!
//! let menus = MenuNode::list_from_json(r#"[
//!   { "path": "/dashboard", "name": "Dashboard",
//!     "meta": { "title": "Dashboard", "icon": "ri:dashboard-line", "rank": 2, "showLink": true },
//!     "children": [
//!       { "path": "/dashboard/analysis", "name": "DashboardAnalysis",
//!         "meta": { "title": "Analysis", "rank": 1 } }
//!     ] }
//! ]"#).unwrap();
//!
//! assert_eq!(menus[0].children[0].path, "/dashboard/analysis");
//! assert!(menus[0].children[0].meta.show_link);
//! ```

use serde::{Deserialize, Serialize};

/// Display metadata supplied by the server for one menu entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MenuMeta {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Lower sorts first. Only meaningful at the top level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<i32>,
    /// Whether the entry is shown in the sidebar.
    pub show_link: bool,
    /// Roles of which the user needs at least one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
    /// Permissions of which the user needs at least one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auths: Option<Vec<String>>,
}

impl Default for MenuMeta {
    fn default() -> Self {
        Self {
            title: String::new(),
            icon: None,
            rank: None,
            show_link: true,
            roles: None,
            auths: None,
        }
    }
}

/// One node of the server menu tree.
///
/// `path` is the node's identity. A node deserialized without a path keeps an
/// empty string and is reported as malformed by the merger.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuNode {
    pub path: String,
    pub name: String,
    pub meta: MenuMeta,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuNode>,
}

impl MenuNode {
    /// Create a visible node with the given path and route name.
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Parse a menu list from the server's JSON payload.
    pub fn list_from_json(json: &str) -> Result<Vec<Self>, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Set the display title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.meta.title = title.into();
        self
    }

    /// Set the icon.
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.meta.icon = Some(icon.into());
        self
    }

    /// Set the sort rank.
    pub fn rank(mut self, rank: i32) -> Self {
        self.meta.rank = Some(rank);
        self
    }

    /// Hide or show the entry in the sidebar.
    pub fn show_link(mut self, show: bool) -> Self {
        self.meta.show_link = show;
        self
    }

    /// Require one of the given roles.
    pub fn roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.meta.roles = Some(roles.into_iter().map(Into::into).collect());
        self
    }

    /// Require one of the given permissions.
    pub fn auths<I, S>(mut self, auths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.meta.auths = Some(auths.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the children.
    pub fn children(mut self, children: Vec<MenuNode>) -> Self {
        self.children = children;
        self
    }

    /// Return `true` if the node carries the fields a route needs.
    pub fn is_well_formed(&self) -> bool {
        !self.path.trim().is_empty()
    }

    /// Depth-first, parent-before-children view of the tree.
    pub fn flatten(nodes: &[MenuNode]) -> Vec<&MenuNode> {
        fn walk<'a>(nodes: &'a [MenuNode], out: &mut Vec<&'a MenuNode>) {
            for node in nodes {
                out.push(node);
                walk(&node.children, out);
            }
        }

        let mut out = Vec::new();
        walk(nodes, &mut out);
        out
    }
}
