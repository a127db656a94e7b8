//! The statically known route catalog.
//!
//! [`RouteCatalog`] holds every page compiled into the client. It is built
//! once at startup and only read afterwards; the merger uses it to find
//! local components and metadata for server menu paths.

use crate::matching::normalize_path;
use crate::route::CatalogRoute;
use crate::{debug_log, warn_log};
use std::collections::HashMap;

/// Immutable set of catalog routes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteCatalog {
    routes: Vec<CatalogRoute>,
}

impl RouteCatalog {
    /// Build the catalog from its top-level routes.
    pub fn new(routes: Vec<CatalogRoute>) -> Self {
        let catalog = Self { routes };
        let flat = catalog.flatten();
        let mut seen = std::collections::HashSet::with_capacity(flat.len());
        for route in &flat {
            if !seen.insert(route.path.as_str()) {
                warn_log!(
                    "Catalog path '{}' declared twice; lookups return the first",
                    route.path
                );
            }
        }
        debug_log!(
            "Route catalog built: {} top-level, {} total",
            catalog.routes.len(),
            flat.len()
        );
        catalog
    }

    /// Top-level routes in declaration order.
    pub fn routes(&self) -> &[CatalogRoute] {
        &self.routes
    }

    /// Total number of routes, nested ones included.
    pub fn len(&self) -> usize {
        self.flatten().len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Find a route by path anywhere in the tree.
    ///
    /// The first route in depth-first order wins when a path is declared
    /// more than once.
    pub fn lookup_by_path(&self, path: &str) -> Option<&CatalogRoute> {
        let path = normalize_path(path);
        self.flatten().into_iter().find(|route| route.path == path)
    }

    /// Depth-first, parent-before-children list of every route.
    pub fn flatten(&self) -> Vec<&CatalogRoute> {
        fn walk<'a>(routes: &'a [CatalogRoute], out: &mut Vec<&'a CatalogRoute>) {
            for route in routes {
                out.push(route);
                walk(&route.children, out);
            }
        }

        let mut out = Vec::new();
        walk(&self.routes, &mut out);
        out
    }

    /// Path index over the flattened catalog; first declaration wins.
    pub fn index(&self) -> HashMap<&str, &CatalogRoute> {
        let mut index = HashMap::new();
        for route in self.flatten() {
            index.entry(route.path.as_str()).or_insert(route);
        }
        index
    }
}

impl From<Vec<CatalogRoute>> for RouteCatalog {
    fn from(routes: Vec<CatalogRoute>) -> Self {
        Self::new(routes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::RouteMeta;

    fn catalog() -> RouteCatalog {
        RouteCatalog::new(vec![
            CatalogRoute::new("/", "Home")
                .component("layout")
                .redirect("/welcome")
                .children(vec![CatalogRoute::new("/welcome", "Welcome")
                    .component("welcome")
                    .meta(RouteMeta::titled("Welcome"))]),
            CatalogRoute::new("/login", "Login").component("login"),
        ])
    }

    #[test]
    fn test_lookup_nested() {
        let catalog = catalog();
        let welcome = catalog.lookup_by_path("/welcome").unwrap();
        assert_eq!(welcome.name, "Welcome");
        assert!(catalog.lookup_by_path("welcome/").is_some());
        assert!(catalog.lookup_by_path("/missing").is_none());
    }

    #[test]
    fn test_flatten_parent_before_children() {
        let catalog = catalog();
        let paths: Vec<_> = catalog.flatten().iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["/", "/welcome", "/login"]);
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_index_first_declaration_wins() {
        let catalog = RouteCatalog::new(vec![
            CatalogRoute::new("/a", "First"),
            CatalogRoute::new("/a", "Second"),
        ]);
        assert_eq!(catalog.index()["/a"].name, "First");
        assert_eq!(catalog.lookup_by_path("/a").unwrap().name, "First");
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = RouteCatalog::default();
        assert!(catalog.is_empty());
        assert!(catalog.lookup_by_path("/").is_none());
    }
}
