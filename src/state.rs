//! Navigation history and active menu state.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Direction of a history change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDirection {
    Forward,
    Back,
    Replace,
}

/// A committed history change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteChangeEvent {
    pub from: Option<String>,
    pub to: String,
    pub direction: NavigationDirection,
}

/// Router state
#[derive(Debug)]
pub struct RouterState {
    /// Navigation history stack. Empty until the first allowed navigation.
    history: Vec<String>,
    /// Current position in history
    current: usize,
    /// Menu entry highlighted in the sidebar.
    active_menu: Option<String>,
    /// Each navigation increments this, allowing detection of stale navigations
    navigation_id: AtomicUsize,
}

impl RouterState {
    pub fn new() -> Self {
        Self {
            history: Vec::new(),
            current: 0,
            active_menu: None,
            navigation_id: AtomicUsize::new(0),
        }
    }

    /// Get current navigation ID
    pub fn navigation_id(&self) -> usize {
        self.navigation_id.load(Ordering::SeqCst)
    }

    /// Start a new navigation and return the new navigation ID
    ///
    /// This increments the navigation counter, allowing previous navigations
    /// to detect they've been superseded and should be cancelled.
    pub fn start_navigation(&self) -> usize {
        self.navigation_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Check if a navigation is still current (not cancelled by newer navigation)
    pub fn is_navigation_current(&self, nav_id: usize) -> bool {
        self.navigation_id() == nav_id
    }

    /// Get current path, `None` before the first navigation.
    pub fn current_path(&self) -> Option<&str> {
        self.history.get(self.current).map(String::as_str)
    }

    pub fn active_menu(&self) -> Option<&str> {
        self.active_menu.as_deref()
    }

    pub fn set_active_menu(&mut self, path: Option<String>) {
        self.active_menu = path;
    }

    /// Navigate to a new path, dropping any forward history.
    pub fn push(&mut self, path: String) -> RouteChangeEvent {
        let from = self.current_path().map(str::to_string);

        if self.history.is_empty() {
            self.history.push(path.clone());
            self.current = 0;
        } else {
            self.history.truncate(self.current + 1);
            self.history.push(path.clone());
            self.current += 1;
        }

        RouteChangeEvent {
            from,
            to: path,
            direction: NavigationDirection::Forward,
        }
    }

    /// Replace current path
    pub fn replace(&mut self, path: String) -> RouteChangeEvent {
        let from = self.current_path().map(str::to_string);

        match self.history.get_mut(self.current) {
            Some(slot) => *slot = path.clone(),
            None => self.history.push(path.clone()),
        }

        RouteChangeEvent {
            from,
            to: path,
            direction: NavigationDirection::Replace,
        }
    }

    /// Go back in history
    pub fn back(&mut self) -> Option<RouteChangeEvent> {
        if self.can_go_back() {
            let from = self.current_path().map(str::to_string);
            self.current -= 1;
            let to = self.history[self.current].clone();

            Some(RouteChangeEvent {
                from,
                to,
                direction: NavigationDirection::Back,
            })
        } else {
            None
        }
    }

    /// Go forward in history
    pub fn forward(&mut self) -> Option<RouteChangeEvent> {
        if self.can_go_forward() {
            let from = self.current_path().map(str::to_string);
            self.current += 1;
            let to = self.history[self.current].clone();

            Some(RouteChangeEvent {
                from,
                to,
                direction: NavigationDirection::Forward,
            })
        } else {
            None
        }
    }

    pub fn can_go_back(&self) -> bool {
        self.current > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.current + 1 < self.history.len()
    }

    /// Peek at the path we would navigate to on `back()`, without actually navigating.
    pub fn peek_back_path(&self) -> Option<&str> {
        if self.can_go_back() {
            Some(&self.history[self.current - 1])
        } else {
            None
        }
    }

    /// Peek at the path we would navigate to on `forward()`, without actually navigating.
    pub fn peek_forward_path(&self) -> Option<&str> {
        if self.can_go_forward() {
            Some(&self.history[self.current + 1])
        } else {
            None
        }
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Forget history and the active menu.
    pub fn clear(&mut self) {
        self.history.clear();
        self.current = 0;
        self.active_menu = None;
    }
}

impl Default for RouterState {
    fn default() -> Self {
        Self::new()
    }
}
