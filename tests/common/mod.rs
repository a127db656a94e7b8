//! Test utilities for session and navigation tests
//!
//! Provides a mock identity service, a route catalog fixture and helpers to
//! wire them into a [`Navigator`].

#![allow(dead_code)]

use admin_navigator::*;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Initialise test logging once; repeated calls are ignored.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// Identity of one of the mock accounts (`admin`, `user`, `editor`).
pub fn mock_user(username: &str) -> Option<UserInfo> {
    let (id, nickname, roles, permissions): (&str, &str, &[&str], &[&str]) = match username {
        "admin" => ("1", "Administrator", &["admin"], &["*:*:*"]),
        "user" => (
            "2",
            "Regular user",
            &["user"],
            &[
                "system:user:list",
                "system:role:list",
                "dashboard:analysis:view",
                "dashboard:workbench:view",
            ],
        ),
        "editor" => (
            "3",
            "Editor",
            &["editor"],
            &[
                "system:user:list",
                "system:user:add",
                "system:user:edit",
                "system:role:list",
                "data:*:*",
            ],
        ),
        _ => return None,
    };
    Some(UserInfo {
        id: id.to_string(),
        username: username.to_string(),
        nickname: nickname.to_string(),
        email: Some(format!("{username}@example.com")),
        roles: strings(roles),
        permissions: strings(permissions),
        ..UserInfo::default()
    })
}

fn top(path: &str, name: &str, title: &str, rank: i32) -> MenuNode {
    MenuNode::new(path, name).title(title).rank(rank)
}

/// Menu tree the mock server grants for `roles`.
pub fn menus_for(roles: &[String]) -> Vec<MenuNode> {
    if roles.iter().any(|r| r == "admin") {
        vec![
            top("/", "Home", "Home", 1),
            top("/dashboard", "Dashboard", "Dashboard", 2).children(vec![
                MenuNode::new("/dashboard/analysis", "DashboardAnalysis")
                    .title("Analysis")
                    .rank(1),
                MenuNode::new("/dashboard/workbench", "DashboardWorkbench")
                    .title("Workbench")
                    .rank(2),
            ]),
            top("/system", "System", "System", 3).children(vec![
                MenuNode::new("/system/user", "SystemUser").title("Users").rank(1),
                MenuNode::new("/system/role", "SystemRole").title("Roles").rank(2),
                MenuNode::new("/system/menu", "SystemMenu").title("Menus").rank(3),
                MenuNode::new("/system/department", "SystemDept")
                    .title("Departments")
                    .rank(4),
            ]),
            top("/data", "Data", "Data", 4),
            top("/user", "User", "Profile", 7),
        ]
    } else if roles.iter().any(|r| r == "editor") {
        vec![
            top("/", "Home", "Home", 1),
            top("/dashboard", "Dashboard", "Dashboard", 2),
            top("/data", "Data", "Data", 3),
            top("/user", "User", "Profile", 5),
        ]
    } else {
        vec![
            top("/", "Home", "Home", 1),
            top("/dashboard", "Dashboard", "Dashboard", 2),
            top("/user", "User", "Profile", 4),
        ]
    }
}

/// Routes compiled into the test client.
pub fn catalog() -> RouteCatalog {
    RouteCatalog::new(vec![
        CatalogRoute::new("/", "Home")
            .redirect("/welcome")
            .meta(RouteMeta::titled("Home").icon("ri:home-4-line").rank(0))
            .children(vec![CatalogRoute::new("/welcome", "Welcome")
                .component("views/welcome/index")
                .meta(RouteMeta::titled("Home"))]),
        CatalogRoute::new("/dashboard", "Dashboard")
            .redirect("/dashboard/analysis")
            .meta(RouteMeta::titled("Dashboard").roles(["admin"]))
            .children(vec![
                CatalogRoute::new("/dashboard/analysis", "DashboardAnalysis")
                    .component("views/dashboard/analysis/index")
                    .meta(RouteMeta::titled("Analysis").keep_alive(true)),
                CatalogRoute::new("/dashboard/workbench", "DashboardWorkbench")
                    .component("views/dashboard/workbench/index")
                    .meta(RouteMeta::titled("Workbench")),
            ]),
        CatalogRoute::new("/system", "System")
            .redirect("/system/user")
            .meta(RouteMeta::titled("System"))
            .children(vec![
                CatalogRoute::new("/system/user", "SystemUser")
                    .component("views/system/user/index")
                    .meta(
                        RouteMeta::titled("Users")
                            .roles(["admin"])
                            .auths(["system:user:list"]),
                    ),
                CatalogRoute::new("/system/role", "SystemRole")
                    .component("views/system/role/index")
                    .meta(
                        RouteMeta::titled("Roles")
                            .roles(["admin"])
                            .auths(["system:role:list"]),
                    ),
                CatalogRoute::new("/system/menu", "SystemMenu")
                    .component("views/system/menu/index")
                    .meta(
                        RouteMeta::titled("Menus")
                            .roles(["admin"])
                            .auths(["system:menu:list"]),
                    ),
                CatalogRoute::new("/system/department", "SystemDept")
                    .component("views/system/department/index")
                    .meta(
                        RouteMeta::titled("Departments")
                            .roles(["admin"])
                            .auths(["system:dept:list"]),
                    ),
                CatalogRoute::new("/system/user/:id", "SystemUserDetail")
                    .component("views/system/user/detail")
                    .meta(
                        RouteMeta::titled("User detail")
                            .show_link(false)
                            .roles(["admin"])
                            .active_path("/system/user"),
                    ),
            ]),
        CatalogRoute::new("/data", "Data")
            .component("views/data/index")
            .meta(RouteMeta::titled("Data").roles(["admin", "editor"])),
        CatalogRoute::new("/user", "User")
            .component("views/user/index")
            .meta(RouteMeta::titled("Profile")),
        CatalogRoute::new("/login", "Login")
            .component("views/login/index")
            .meta(RouteMeta::titled("Login").show_link(false)),
        CatalogRoute::new("/403", "Forbidden")
            .component("error/403")
            .meta(RouteMeta::titled("Forbidden").show_link(false)),
        CatalogRoute::new("/404", "NotFound")
            .component("error/404")
            .meta(RouteMeta::titled("Not found").show_link(false)),
    ])
}

/// In-process identity service with call counters and failure switches.
#[derive(Default)]
pub struct MockTransport {
    pub login_calls: AtomicUsize,
    pub user_info_calls: AtomicUsize,
    pub menu_calls: AtomicUsize,
    pub logout_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
    fail_user_info: AtomicBool,
    fail_refresh: AtomicBool,
    user_info_delay_ms: AtomicU64,
    login_delay_ms: AtomicU64,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make `get_user_info` fail with a server error.
    pub fn fail_user_info(&self, fail: bool) {
        self.fail_user_info.store(fail, Ordering::SeqCst);
    }

    pub fn fail_refresh(&self, fail: bool) {
        self.fail_refresh.store(fail, Ordering::SeqCst);
    }

    /// Delay every `get_user_info` response.
    pub fn delay_user_info(&self, delay: Duration) {
        self.user_info_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    /// Delay every `login` response.
    pub fn delay_login(&self, delay: Duration) {
        self.login_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn user_info_calls(&self) -> usize {
        self.user_info_calls.load(Ordering::SeqCst)
    }

    fn user_for_token(token: &str) -> Result<UserInfo, TransportError> {
        token
            .strip_prefix("token-")
            .and_then(mock_user)
            .ok_or_else(TransportError::unauthorized)
    }
}

#[async_trait]
impl AuthTransport for MockTransport {
    async fn login(&self, username: &str, password: &str) -> Result<TokenPair, TransportError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.login_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        match mock_user(username) {
            Some(_) if password == username => Ok(TokenPair::new(format!("token-{username}"))
                .with_refresh(format!("refresh-{username}"))),
            _ => Err(TransportError::new(
                Some(400),
                "wrong username or password",
            )),
        }
    }

    async fn get_user_info(&self, token: &str) -> Result<UserInfo, TransportError> {
        self.user_info_calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.user_info_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.fail_user_info.load(Ordering::SeqCst) {
            return Err(TransportError::new(Some(500), "user service unavailable"));
        }
        Self::user_for_token(token)
    }

    async fn get_user_menus(&self, token: &str) -> Result<Vec<MenuNode>, TransportError> {
        self.menu_calls.fetch_add(1, Ordering::SeqCst);
        let user = Self::user_for_token(token)?;
        Ok(menus_for(&user.roles))
    }

    async fn logout(&self, _token: &str) -> Result<(), TransportError> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenPair, TransportError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_refresh.load(Ordering::SeqCst) {
            return Err(TransportError::unauthorized());
        }
        let username = refresh_token
            .strip_prefix("refresh-")
            .ok_or_else(TransportError::unauthorized)?;
        Ok(TokenPair::new(format!("token-{username}")).with_refresh(refresh_token))
    }
}

/// Everything a test needs, sharing one transport, store and sink.
pub struct Shell {
    pub transport: Arc<MockTransport>,
    pub store: Arc<MemoryStore>,
    pub sink: Arc<CollectingSink>,
    pub config: Arc<ShellConfig>,
    pub navigator: Navigator,
}

impl Shell {
    pub fn new() -> Self {
        Self::with_config(ShellConfig::default())
    }

    pub fn with_config(config: ShellConfig) -> Self {
        Self::build(
            MockTransport::new(),
            Arc::new(MemoryStore::new()),
            Arc::new(config),
        )
    }

    /// Simulate a page reload: a fresh navigator over the same store and server.
    pub fn reload(&self) -> Self {
        Self::build(
            self.transport.clone(),
            self.store.clone(),
            self.config.clone(),
        )
    }

    fn build(
        transport: Arc<MockTransport>,
        store: Arc<MemoryStore>,
        config: Arc<ShellConfig>,
    ) -> Self {
        init_logging();
        let sink = Arc::new(CollectingSink::new());
        let sessions = SessionManager::new(transport.clone(), Arc::new(catalog()), config.clone())
            .with_store(store.clone())
            .with_sink(sink.clone());
        let navigator = Navigator::new(Arc::new(sessions)).with_store(store.clone());
        Self {
            transport,
            store,
            sink,
            config,
            navigator,
        }
    }

    pub fn sessions(&self) -> &SessionManager {
        self.navigator.session()
    }

    /// Sign in as one of the mock accounts (password equals username).
    pub async fn login(&self, username: &str) {
        self.sessions()
            .login(username, username)
            .await
            .unwrap_or_else(|e| panic!("login as '{username}' failed: {e}"));
    }
}
