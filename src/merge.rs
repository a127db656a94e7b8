//! Server menu / route catalog reconciliation.
//!
//! The identity service decides *which* pages a user sees and how they are
//! labelled; the client decides *how* each page is rendered. [`merge`] walks
//! the server menu tree in order and, for every node, pairs it with the
//! catalog route of the same path:
//!
//! - **catalog hit**: the catalog component is kept and the server's display
//!   fields and access requirements are laid over the catalog metadata.
//!   Fields the server never supplies (keep-alive, transitions, frame source,
//!   ...) stay as the catalog declares them.
//! - **catalog miss**: the route gets a convention module key derived from its
//!   path, resolved later by the
//!   [`ComponentRegistry`](crate::component::ComponentRegistry).
//!
//! Every path is emitted at most once per call. Duplicates and nodes without a
//! path are skipped and reported to the diagnostics sink; the merge itself
//! never fails.
//!
//! ```
//! use admin_navigator::{merge, CatalogRoute, ComponentRef, MenuNode, RouteCatalog, RouteMeta};
//!
//! let catalog = RouteCatalog::new(vec![
//!     CatalogRoute::new("/welcome", "Welcome")
//!         .component("welcome")
//!         .meta(RouteMeta::titled("Home").keep_alive(true)),
//! ]);
//! let menus = vec![
//!     MenuNode::new("/welcome", "Welcome").title("Start").rank(0),
//!     MenuNode::new("/reports", "Reports").title("Reports"),
//! ];
//!
//! let merged = merge(&catalog, &menus);
//! assert_eq!(merged[0].meta.title.as_deref(), Some("Start"));
//! assert_eq!(merged[0].meta.keep_alive, Some(true));
//! assert!(matches!(&merged[1].component, ComponentRef::Convention { module } if module == "views/reports/index"));
//! ```

use crate::catalog::RouteCatalog;
use crate::config::ShellConfig;
use crate::diagnostics::{DiagnosticEvent, DiagnosticSink, LogSink};
use crate::matching::normalize_path;
use crate::menu::{MenuMeta, MenuNode};
use crate::route::{CatalogRoute, ComponentRef, MergedRoute, RouteMeta};
use crate::{debug_log, trace_log};
use std::collections::{HashMap, HashSet};

/// Merge `menus` with `catalog` using the default configuration.
///
/// Diagnostics go to the log.
pub fn merge(catalog: &RouteCatalog, menus: &[MenuNode]) -> Vec<MergedRoute> {
    merge_with(catalog, menus, &ShellConfig::default(), &LogSink)
}

/// Merge `menus` with `catalog`, reporting anomalies to `sink`.
///
/// `config` supplies the convention module key layout.
pub fn merge_with(
    catalog: &RouteCatalog,
    menus: &[MenuNode],
    config: &ShellConfig,
    sink: &dyn DiagnosticSink,
) -> Vec<MergedRoute> {
    let mut merger = Merger {
        index: catalog.index(),
        config,
        sink,
        visited: HashSet::new(),
    };
    let merged = merger.merge_level(menus, None);
    debug_log!(
        "Merged {} menu nodes into {} routes ({} paths)",
        MenuNode::flatten(menus).len(),
        merged.len(),
        merger.visited.len()
    );
    merged
}

struct Merger<'a> {
    index: HashMap<&'a str, &'a CatalogRoute>,
    config: &'a ShellConfig,
    sink: &'a dyn DiagnosticSink,
    /// Paths emitted so far, shared by every level of the walk.
    visited: HashSet<String>,
}

impl<'a> Merger<'a> {
    fn merge_level(&mut self, nodes: &[MenuNode], parent: Option<&str>) -> Vec<MergedRoute> {
        let mut out = Vec::with_capacity(nodes.len());

        for (index, node) in nodes.iter().enumerate() {
            if !node.is_well_formed() {
                self.sink.emit(DiagnosticEvent::MalformedMenuNode {
                    parent: parent.map(str::to_string),
                    index,
                    reason: format!("node '{}' has no path", node.name),
                });
                continue;
            }

            let path = normalize_path(&node.path).into_owned();
            if !self.visited.insert(path.clone()) {
                self.sink
                    .emit(DiagnosticEvent::DuplicateMenuPath { path: path.clone() });
                continue;
            }

            let catalog = self.index.get(path.as_str()).copied();
            let mut route = match catalog {
                Some(catalog) => {
                    trace_log!("Menu '{}' matched catalog route '{}'", path, catalog.name);
                    MergedRoute {
                        path: path.clone(),
                        name: pick_name(&node.name, &catalog.name),
                        component: catalog
                            .component
                            .clone()
                            .map_or(ComponentRef::Empty, ComponentRef::Static),
                        redirect: catalog.redirect.clone(),
                        meta: overlay(&catalog.meta, &node.meta),
                        children: Vec::new(),
                    }
                }
                None => {
                    let module = self.config.module_key_for(&path);
                    trace_log!("Menu '{}' has no catalog route, module '{}'", path, module);
                    MergedRoute {
                        path: path.clone(),
                        name: node.name.clone(),
                        component: ComponentRef::Convention { module },
                        redirect: None,
                        meta: overlay(&RouteMeta::default(), &node.meta),
                        children: Vec::new(),
                    }
                }
            };

            let children = self.merge_level(&node.children, Some(&path));
            route.children = if !children.is_empty() {
                children
            } else if let Some(catalog) = catalog {
                self.adopt(&catalog.children)
            } else {
                Vec::new()
            };

            out.push(route);
        }

        out
    }

    /// Take catalog children as they are, minus paths already emitted.
    fn adopt(&mut self, children: &[CatalogRoute]) -> Vec<MergedRoute> {
        let mut out = Vec::with_capacity(children.len());
        for child in children {
            if !self.visited.insert(child.path.clone()) {
                trace_log!("Catalog child '{}' already emitted, skipping", child.path);
                continue;
            }
            let mut route = MergedRoute::from(child);
            route.children = self.adopt(&child.children);
            out.push(route);
        }
        out
    }
}

fn pick_name(server: &str, catalog: &str) -> String {
    if server.is_empty() {
        catalog.to_string()
    } else {
        server.to_string()
    }
}

/// Lay the server's display fields and requirements over catalog metadata.
fn overlay(catalog: &RouteMeta, server: &MenuMeta) -> RouteMeta {
    let mut meta = catalog.clone();
    if !server.title.is_empty() {
        meta.title = Some(server.title.clone());
    }
    if server.icon.is_some() {
        meta.icon = server.icon.clone();
    }
    if server.rank.is_some() {
        meta.rank = server.rank;
    }
    meta.show_link = Some(server.show_link);
    if let Some(roles) = &server.roles {
        meta.roles = roles.clone();
    }
    if let Some(auths) = &server.auths {
        meta.auths = auths.clone();
    }
    meta
}
