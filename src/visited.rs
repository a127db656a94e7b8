//! Visited views: the tab strip above the page.
//!
//! Every allowed navigation to a named, titled route records a
//! [`VisitedView`]. Tabs can be closed individually or in bulk, pinned to the
//! front and reordered. The home tab is never closable, so it survives every
//! bulk close. Routes marked `keep_alive` also have their name recorded in
//! the cached-view list, which the rendering layer uses to keep their page
//! state alive while the tab stays open.
//!
//! The registry persists itself to the session scope of the key-value store
//! after each mutation, so tabs survive a page reload but not a new session.

use crate::matching::normalize_path;
use crate::persistence::{load_json, save_json, KeyValueStore, StorageScope};
use crate::route::MergedRoute;
use crate::{debug_log, warn_log};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Storage key of the persisted tab strip.
pub const VIEWS_KEY: &str = "admin-navigator.views";

/// One tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitedView {
    pub path: String,
    pub name: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub closable: bool,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub order: usize,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PersistedViews {
    visited_views: Vec<VisitedView>,
    cached_views: Vec<String>,
}

/// Ordered set of visited views, unique by path.
pub struct VisitedViews {
    views: Vec<VisitedView>,
    cached: Vec<String>,
    home_path: String,
    store: Option<Arc<dyn KeyValueStore>>,
}

impl VisitedViews {
    /// Empty registry; `home_path` is the tab that can never be closed.
    pub fn new(home_path: impl AsRef<str>) -> Self {
        Self {
            views: Vec::new(),
            cached: Vec::new(),
            home_path: normalize_path(home_path.as_ref()).into_owned(),
            store: None,
        }
    }

    /// Persist to `store`, restoring any tabs saved in the current session.
    pub fn with_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        match load_json::<PersistedViews>(store.as_ref(), StorageScope::Session, VIEWS_KEY) {
            Ok(Some(saved)) => {
                debug_log!("Restored {} visited views", saved.visited_views.len());
                self.views = saved.visited_views;
                self.cached = saved.cached_views;
            }
            Ok(None) => {}
            Err(e) => {
                warn_log!("Ignoring persisted visited views: {}", e);
            }
        }
        self.store = Some(store);
        self
    }

    pub fn views(&self) -> &[VisitedView] {
        &self.views
    }

    /// Names of the routes whose page state is kept alive.
    pub fn cached_views(&self) -> &[String] {
        &self.cached
    }

    pub fn get(&self, path: &str) -> Option<&VisitedView> {
        let path = normalize_path(path);
        self.views.iter().find(|v| v.path == path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Record a visit to `route`.
    ///
    /// Routes without a name or title, and routes marked `hidden_tag`, get no
    /// tab. A `fixed_tag` route gets a pinned tab that cannot be closed. When
    /// `dynamic_level` caps the open tabs of one route name, the oldest
    /// closable one makes room for the new tab. Returns `true` if anything
    /// changed.
    pub fn add_view(&mut self, route: &MergedRoute) -> bool {
        let Some(title) = route.meta.title.as_deref().filter(|t| !t.is_empty()) else {
            return false;
        };
        if route.name.is_empty() || route.meta.hidden_tag == Some(true) {
            return false;
        }

        let mut changed = false;
        if !self.contains(&route.path) {
            if let Some(limit) = route.meta.dynamic_level.filter(|&n| n > 0) {
                self.evict_same_name(&route.name, limit as usize);
            }
            let fixed = route.meta.fixed_tag == Some(true);
            let order = self.views.iter().map(|v| v.order + 1).max().unwrap_or(0);
            self.views.push(VisitedView {
                path: route.path.clone(),
                name: route.name.clone(),
                title: title.to_string(),
                icon: route.meta.icon.clone(),
                closable: !fixed && route.path != self.home_path,
                pinned: fixed,
                order,
            });
            if fixed {
                self.sort_views();
            }
            changed = true;
        }
        if route.meta.keep_alive == Some(true) && !self.cached.contains(&route.name) {
            self.cached.push(route.name.clone());
            changed = true;
        }

        if changed {
            self.persist();
        }
        changed
    }

    /// Close one tab. Non-closable tabs stay.
    pub fn remove_view(&mut self, path: &str) -> Option<VisitedView> {
        let path = normalize_path(path);
        let index = self
            .views
            .iter()
            .position(|v| v.path == path && v.closable)?;
        let removed = self.views.remove(index);
        self.sync_cached();
        self.persist();
        Some(removed)
    }

    /// Close every closable tab except `path`.
    pub fn remove_others(&mut self, path: &str) {
        let path = normalize_path(path);
        self.views.retain(|v| v.path == path || !v.closable);
        self.sync_cached();
        self.persist();
    }

    /// Close every closable tab.
    pub fn remove_all(&mut self) {
        self.views.retain(|v| !v.closable);
        self.sync_cached();
        self.persist();
    }

    /// Close the closable tabs left of `path`.
    pub fn remove_left(&mut self, path: &str) {
        if let Some(index) = self.index_of(path) {
            let mut i = 0;
            self.views.retain(|v| {
                let keep = i >= index || !v.closable;
                i += 1;
                keep
            });
            self.sync_cached();
            self.persist();
        }
    }

    /// Close the closable tabs right of `path`.
    pub fn remove_right(&mut self, path: &str) {
        if let Some(index) = self.index_of(path) {
            let mut i = 0;
            self.views.retain(|v| {
                let keep = i <= index || !v.closable;
                i += 1;
                keep
            });
            self.sync_cached();
            self.persist();
        }
    }

    /// Refresh a tab's title and icon from `route`, keeping old values the
    /// route does not supply.
    pub fn update_view(&mut self, route: &MergedRoute) -> bool {
        let Some(view) = self.views.iter_mut().find(|v| v.path == route.path) else {
            return false;
        };
        if let Some(title) = route.meta.title.as_deref().filter(|t| !t.is_empty()) {
            view.title = title.to_string();
        }
        if route.meta.icon.is_some() {
            view.icon = route.meta.icon.clone();
        }
        self.persist();
        true
    }

    /// Pin a tab; pinned tabs sort first.
    pub fn pin(&mut self, path: &str) -> bool {
        self.set_pinned(path, true)
    }

    pub fn unpin(&mut self, path: &str) -> bool {
        self.set_pinned(path, false)
    }

    /// Move the tab at `from` to position `to` and renumber all tabs.
    ///
    /// Out-of-range `from` is ignored; `to` is clamped to the end.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        if from >= self.views.len() {
            return false;
        }
        let view = self.views.remove(from);
        let to = to.min(self.views.len());
        self.views.insert(to, view);
        for (order, view) in self.views.iter_mut().enumerate() {
            view.order = order;
        }
        self.persist();
        true
    }

    /// Forget every tab, including the home tab.
    pub fn clear(&mut self) {
        self.views.clear();
        self.cached.clear();
        if let Some(store) = &self.store {
            if let Err(e) = store.remove(StorageScope::Session, VIEWS_KEY) {
                warn_log!("Failed to remove persisted visited views: {}", e);
            }
        }
    }

    fn set_pinned(&mut self, path: &str, pinned: bool) -> bool {
        let path = normalize_path(path);
        let Some(view) = self.views.iter_mut().find(|v| v.path == path) else {
            return false;
        };
        view.pinned = pinned;
        self.sort_views();
        self.persist();
        true
    }

    /// Close the oldest closable tabs named `name` until fewer than `limit` remain.
    fn evict_same_name(&mut self, name: &str, limit: usize) {
        while self.views.iter().filter(|v| v.name == name).count() >= limit {
            let oldest = self
                .views
                .iter()
                .enumerate()
                .filter(|(_, v)| v.name == name && v.closable)
                .min_by_key(|(_, v)| v.order)
                .map(|(i, _)| i);
            let Some(index) = oldest else {
                break;
            };
            let evicted = self.views.remove(index);
            debug_log!("Closed tab '{}' to stay within {} '{}' tabs", evicted.path, limit, name);
        }
    }

    /// Pinned first, then by order. Stable.
    fn sort_views(&mut self) {
        self.views.sort_by_key(|v| (!v.pinned, v.order));
    }

    fn index_of(&self, path: &str) -> Option<usize> {
        let path = normalize_path(path);
        self.views.iter().position(|v| v.path == path)
    }

    /// Keep only cached names whose tab is still open.
    fn sync_cached(&mut self) {
        let views = &self.views;
        self.cached.retain(|name| views.iter().any(|v| &v.name == name));
    }

    fn persist(&self) {
        let Some(store) = &self.store else {
            return;
        };
        let state = PersistedViews {
            visited_views: self.views.clone(),
            cached_views: self.cached.clone(),
        };
        if let Err(e) = save_json(store.as_ref(), StorageScope::Session, VIEWS_KEY, &state) {
            warn_log!("Failed to persist visited views: {}", e);
        }
    }
}

impl std::fmt::Debug for VisitedViews {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisitedViews")
            .field("views", &self.views)
            .field("cached", &self.cached)
            .field("home_path", &self.home_path)
            .finish_non_exhaustive()
    }
}
