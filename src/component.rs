//! Convention-based component resolution.
//!
//! Merged routes without a catalog match carry a [`ComponentRef::Convention`]
//! module key such as `views/system/user/index`. The rendering layer fills a
//! [`ComponentRegistry`] with every module it can load, and the registry turns
//! routes into concrete [`ComponentId`]s. Unknown modules resolve to the
//! not-found placeholder instead of failing.

use crate::config::ShellConfig;
use crate::diagnostics::{DiagnosticEvent, DiagnosticSink};
use crate::route::{ComponentId, ComponentRef, MergedRoute};
use crate::trace_log;
use std::collections::HashMap;

/// Result of resolving a route's component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedComponent {
    /// A registered or catalog component.
    Component(ComponentId),
    /// The convention module is unknown; render the placeholder.
    NotFound(ComponentId),
    /// The route has no component of its own.
    None,
}

impl ResolvedComponent {
    /// The component to render, if any.
    pub fn id(&self) -> Option<&ComponentId> {
        match self {
            Self::Component(id) | Self::NotFound(id) => Some(id),
            Self::None => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Map from convention module key to component.
#[derive(Debug, Clone)]
pub struct ComponentRegistry {
    modules: HashMap<String, ComponentId>,
    not_found: ComponentId,
}

impl ComponentRegistry {
    /// Empty registry with the given placeholder component.
    pub fn new(not_found: impl Into<ComponentId>) -> Self {
        Self {
            modules: HashMap::new(),
            not_found: not_found.into(),
        }
    }

    /// Empty registry using the placeholder from `config`.
    pub fn from_config(config: &ShellConfig) -> Self {
        Self::new(config.not_found_component.as_str())
    }

    /// Register a module. A later registration for the same key replaces the earlier one.
    pub fn register(&mut self, module: impl Into<String>, component: impl Into<ComponentId>) {
        self.modules.insert(module.into(), component.into());
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, module: impl Into<String>, component: impl Into<ComponentId>) -> Self {
        self.register(module, component);
        self
    }

    pub fn contains(&self, module: &str) -> bool {
        self.modules.contains_key(module)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn not_found(&self) -> &ComponentId {
        &self.not_found
    }

    /// Resolve the component of a single route.
    ///
    /// A convention miss emits [`DiagnosticEvent::RouteResolutionMissing`].
    pub fn resolve(&self, route: &MergedRoute, sink: &dyn DiagnosticSink) -> ResolvedComponent {
        match &route.component {
            ComponentRef::Static(id) => ResolvedComponent::Component(id.clone()),
            ComponentRef::Empty => ResolvedComponent::None,
            ComponentRef::Convention { module } => match self.modules.get(module) {
                Some(id) => {
                    trace_log!("Resolved '{}' via module '{}'", route.path, module);
                    ResolvedComponent::Component(id.clone())
                }
                None => {
                    sink.emit(DiagnosticEvent::RouteResolutionMissing {
                        path: route.path.clone(),
                        module: module.clone(),
                    });
                    ResolvedComponent::NotFound(self.not_found.clone())
                }
            },
        }
    }

    /// Resolve every route in a tree, parent before children.
    pub fn resolve_all(
        &self,
        routes: &[MergedRoute],
        sink: &dyn DiagnosticSink,
    ) -> Vec<(String, ResolvedComponent)> {
        MergedRoute::flatten(routes)
            .into_iter()
            .map(|route| (route.path.clone(), self.resolve(route, sink)))
            .collect()
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::from_config(&ShellConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingSink;
    use crate::route::RouteMeta;

    fn convention(path: &str, module: &str) -> MergedRoute {
        MergedRoute {
            path: path.to_string(),
            name: String::new(),
            component: ComponentRef::Convention {
                module: module.to_string(),
            },
            redirect: None,
            meta: RouteMeta::default(),
            children: Vec::new(),
        }
    }

    #[test]
    fn test_registered_module() {
        let registry = ComponentRegistry::default().with("views/data/index", "DataPage");
        let sink = CollectingSink::new();
        let resolved = registry.resolve(&convention("/data", "views/data/index"), &sink);
        assert_eq!(resolved, ResolvedComponent::Component("DataPage".into()));
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_missing_module_yields_placeholder() {
        let registry = ComponentRegistry::default();
        let sink = CollectingSink::new();
        let resolved = registry.resolve(&convention("/report", "views/report/index"), &sink);
        assert!(resolved.is_not_found());
        assert_eq!(resolved.id().map(ComponentId::as_str), Some("error/404"));
        assert_eq!(
            sink.events(),
            vec![DiagnosticEvent::RouteResolutionMissing {
                path: "/report".to_string(),
                module: "views/report/index".to_string(),
            }]
        );
    }

    #[test]
    fn test_empty_component() {
        let mut route = convention("/group", "");
        route.component = ComponentRef::Empty;
        let resolved = ComponentRegistry::default().resolve(&route, &CollectingSink::new());
        assert_eq!(resolved, ResolvedComponent::None);
        assert!(resolved.id().is_none());
    }
}
