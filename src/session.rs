//! Session state and its lifecycle.
//!
//! [`Session`] is the authorization state of the signed-in user: tokens,
//! identity, roles, permissions and the routes installed for them.
//! [`SessionManager`] owns it and runs every transition:
//!
//! ```text
//!  empty ──login──▶ authenticated ──restore──▶ routes installed
//!    ▲                    │                          │
//!    └──── logout / failed restore / 401 ◀──────────┘
//! ```
//!
//! Restoration (user info + menus → merge → sort → filter) is single-flight:
//! concurrent callers of [`SessionManager::ensure_routes`] queue on one lock
//! and all but the first find the routes already installed. Login and logout
//! advance a session epoch; a login or restoration that finishes after the
//! epoch moved throws its result away instead of resurrecting a dead session.

use crate::catalog::RouteCatalog;
use crate::config::{ShellConfig, WILDCARD_PERMISSION};
use crate::diagnostics::{DiagnosticEvent, DiagnosticSink, LogSink};
use crate::error::{Result, ShellError};
use crate::filter::{filter_routes_with, visible_menu};
use crate::menu::MenuNode;
use crate::merge::merge_with;
use crate::persistence::{load_json, save_json, KeyValueStore, StorageScope};
use crate::rank::sort_by_rank;
use crate::route::MergedRoute;
use crate::transport::{AuthTransport, TokenPair, TransportError};
use crate::{debug_log, error_log, info_log, warn_log};
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock, RwLockReadGuard};

/// Storage key of the durable session snapshot.
pub const SESSION_KEY: &str = "admin-navigator.session";

/// Identity returned by the identity service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserInfo {
    /// Servers send numeric or string ids; both are kept as text.
    #[serde(deserialize_with = "id_from_number_or_string")]
    pub id: String,
    pub username: String,
    pub nickname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
}

fn id_from_number_or_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Signed(i64),
        Unsigned(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Signed(id) => id.to_string(),
        RawId::Unsigned(id) => id.to_string(),
    })
}

/// Authorization state of the current user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub refresh_token: Option<String>,
    pub identity: Option<UserInfo>,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
    pub authenticated: bool,
    /// Set once per session, after the first successful restoration.
    pub routes_installed: bool,
    /// Menu tree as the server sent it.
    pub menus: Vec<MenuNode>,
    /// Merge output before permission filtering, rank-sorted.
    pub merged_routes: Vec<MergedRoute>,
    /// Routes the user may open, rank-sorted.
    pub routes: Vec<MergedRoute>,
}

impl Session {
    /// Holds a token the server has not rejected yet.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated && self.token.is_some()
    }

    /// Identity is known and routes are installed.
    pub fn is_ready(&self) -> bool {
        self.identity.is_some() && self.routes_installed
    }

    /// Holds at least one of `required`. An empty request is never satisfied.
    pub fn has_role<S: AsRef<str>>(&self, required: &[S]) -> bool {
        required
            .iter()
            .any(|r| self.roles.iter().any(|role| role == r.as_ref()))
    }

    /// Holds the wildcard or at least one of `required`. An empty request is
    /// never satisfied.
    pub fn has_permission<S: AsRef<str>>(&self, required: &[S]) -> bool {
        self.has_permission_with(required, WILDCARD_PERMISSION)
    }

    /// [`has_permission`](Self::has_permission) with a custom wildcard.
    pub fn has_permission_with<S: AsRef<str>>(&self, required: &[S], wildcard: &str) -> bool {
        if required.is_empty() {
            return false;
        }
        self.permissions.iter().any(|p| p == wildcard)
            || required
                .iter()
                .any(|r| self.permissions.iter().any(|p| p == r.as_ref()))
    }

    /// Reset to the empty state.
    pub fn clear(&mut self) {
        *self = Session::default();
    }

    /// The part of the session that is persisted.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            token: self.token.clone(),
            refresh_token: self.refresh_token.clone(),
            identity: self.identity.clone(),
            roles: self.roles.clone(),
            permissions: self.permissions.clone(),
            authenticated: self.authenticated,
        }
    }

    /// Rebuild a session from a snapshot. Routes must be restored again.
    pub fn from_snapshot(snapshot: SessionSnapshot) -> Self {
        Session {
            token: snapshot.token,
            refresh_token: snapshot.refresh_token,
            identity: snapshot.identity,
            roles: snapshot.roles,
            permissions: snapshot.permissions,
            authenticated: snapshot.authenticated,
            ..Session::default()
        }
    }
}

/// Persisted subset of a [`Session`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionSnapshot {
    pub token: Option<String>,
    pub refresh_token: Option<String>,
    pub identity: Option<UserInfo>,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
    pub authenticated: bool,
}

/// Owner of the [`Session`].
///
/// Shared by `Arc` between the navigator and whatever issues transport calls.
pub struct SessionManager {
    transport: Arc<dyn AuthTransport>,
    catalog: Arc<RouteCatalog>,
    config: Arc<ShellConfig>,
    session: RwLock<Session>,
    restore_lock: Mutex<()>,
    epoch: AtomicU64,
    store: Option<Arc<dyn KeyValueStore>>,
    sink: Arc<dyn DiagnosticSink>,
}

impl SessionManager {
    /// Create a manager with an empty session.
    pub fn new(
        transport: Arc<dyn AuthTransport>,
        catalog: Arc<RouteCatalog>,
        config: Arc<ShellConfig>,
    ) -> Self {
        Self {
            transport,
            catalog,
            config,
            session: RwLock::new(Session::default()),
            restore_lock: Mutex::new(()),
            epoch: AtomicU64::new(0),
            store: None,
            sink: Arc::new(LogSink),
        }
    }

    /// Persist the session in `store`, loading any snapshot already there.
    ///
    /// A snapshot that cannot be read is ignored and the session starts empty.
    pub fn with_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        match load_json::<SessionSnapshot>(store.as_ref(), StorageScope::Durable, SESSION_KEY) {
            Ok(Some(snapshot)) => {
                info_log!(
                    "Loaded persisted session (authenticated: {})",
                    snapshot.authenticated
                );
                *self.session.get_mut() = Session::from_snapshot(snapshot);
            }
            Ok(None) => {}
            Err(e) => {
                warn_log!("Ignoring persisted session: {}", e);
            }
        }
        self.store = Some(store);
        self
    }

    /// Report diagnostics to `sink` instead of the log.
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn catalog(&self) -> &RouteCatalog {
        &self.catalog
    }

    pub fn sink(&self) -> &dyn DiagnosticSink {
        self.sink.as_ref()
    }

    /// Current session epoch. Advanced by every login and logout.
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// Read access to the session.
    pub async fn session(&self) -> RwLockReadGuard<'_, Session> {
        self.session.read().await
    }

    /// Copy of the current session.
    pub async fn current(&self) -> Session {
        self.session.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.is_authenticated()
    }

    pub async fn has_role<S: AsRef<str> + Sync>(&self, required: &[S]) -> bool {
        self.session.read().await.has_role(required)
    }

    pub async fn has_permission<S: AsRef<str> + Sync>(&self, required: &[S]) -> bool {
        self.session
            .read()
            .await
            .has_permission_with(required, &self.config.wildcard_permission)
    }

    /// Routes the user may open.
    pub async fn routes(&self) -> Vec<MergedRoute> {
        self.session.read().await.routes.clone()
    }

    /// Sidebar entries: installed routes without hidden links.
    pub async fn menu(&self) -> Vec<MergedRoute> {
        visible_menu(&self.session.read().await.routes)
    }

    /// Sign in and install the user's routes.
    ///
    /// Any previous session is discarded first. On failure the session is
    /// left empty. A logout or another login that lands while the credentials
    /// are being checked wins: the tokens are dropped and the call fails with
    /// [`ShellError::AuthenticationRequired`].
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        let epoch = self.advance_epoch();
        self.teardown().await;

        let tokens = match self.transport.login(username, password).await {
            Ok(tokens) => tokens,
            Err(e) => {
                warn_log!("Login for '{}' failed: {}", username, e);
                return Err(ShellError::LoginFailed(e));
            }
        };

        {
            let mut session = self.session.write().await;
            if self.epoch() != epoch {
                drop(session);
                warn_log!("Login for '{}' overtaken by a newer session change", username);
                self.sink.emit(DiagnosticEvent::RestoreDiscarded { epoch });
                return Err(ShellError::AuthenticationRequired);
            }
            session.token = Some(tokens.access_token);
            session.refresh_token = tokens.refresh_token;
            session.authenticated = true;
        }
        info_log!("User '{}' signed in", username);

        self.ensure_routes().await
    }

    /// Clear the session, then tell the server on a best-effort basis.
    pub async fn logout(&self) {
        self.advance_epoch();
        let token = self.session.read().await.token.clone();
        self.teardown().await;
        info_log!("Signed out");

        if let Some(token) = token {
            if let Err(e) = self.transport.logout(&token).await {
                warn_log!("Remote logout failed: {}", e);
            }
        }
    }

    /// Clear the session without contacting the server.
    pub async fn force_logout(&self) {
        self.advance_epoch();
        self.teardown().await;
        warn_log!("Session forcibly cleared");
    }

    /// Make sure identity and routes are loaded, restoring them if needed.
    ///
    /// Concurrent calls share one restoration. Fails with
    /// [`ShellError::AuthenticationRequired`] when there is no session to
    /// restore and [`ShellError::SessionRestoreFailed`] when loading fails or
    /// exceeds the configured timeout; in the latter case the session is torn
    /// down.
    pub async fn ensure_routes(&self) -> Result<()> {
        if self.session.read().await.is_ready() {
            return Ok(());
        }

        let _restoring = self.restore_lock.lock().await;

        let (token, epoch) = {
            let session = self.session.read().await;
            if session.is_ready() {
                return Ok(());
            }
            match (&session.token, session.authenticated) {
                (Some(token), true) => (token.clone(), self.epoch()),
                _ => return Err(ShellError::AuthenticationRequired),
            }
        };

        debug_log!("Restoring session (epoch {})", epoch);
        let fetched = tokio::time::timeout(self.config.restore_timeout(), self.fetch(&token)).await;

        let mut session = self.session.write().await;
        if self.epoch() != epoch {
            self.sink.emit(DiagnosticEvent::RestoreDiscarded { epoch });
            return Err(ShellError::AuthenticationRequired);
        }

        let message = match fetched {
            Ok(Ok((info, menus))) => {
                let (merged, routes) = self.generate_routes(&menus, &info.roles, &info.permissions);
                debug_log!(
                    "Installed {} routes for '{}' ({} before filtering)",
                    routes.len(),
                    info.username,
                    merged.len()
                );
                session.roles = info.roles.clone();
                session.permissions = info.permissions.clone();
                session.identity = Some(info);
                session.menus = menus;
                session.merged_routes = merged;
                session.routes = routes;
                session.routes_installed = true;
                let snapshot = session.snapshot();
                drop(session);
                self.persist(&snapshot);
                return Ok(());
            }
            Ok(Err(e)) => e.to_string(),
            Err(_) => format!(
                "timed out after {}ms",
                self.config.restore_timeout().as_millis()
            ),
        };

        error_log!("Session restore failed: {}", message);
        session.clear();
        drop(session);
        self.forget();
        self.sink.emit(DiagnosticEvent::SessionRestoreFailed {
            message: message.clone(),
        });
        Err(ShellError::SessionRestoreFailed(message))
    }

    /// Rotate the token pair. A failed refresh ends the session.
    pub async fn refresh_token(&self) -> Result<()> {
        let refresh = self.session.read().await.refresh_token.clone();
        let Some(refresh) = refresh else {
            self.force_logout().await;
            return Err(ShellError::AuthenticationRequired);
        };

        match self.transport.refresh_token(&refresh).await {
            Ok(TokenPair {
                access_token,
                refresh_token,
            }) => {
                let snapshot = {
                    let mut session = self.session.write().await;
                    session.token = Some(access_token);
                    if refresh_token.is_some() {
                        session.refresh_token = refresh_token;
                    }
                    session.snapshot()
                };
                self.persist(&snapshot);
                debug_log!("Token refreshed");
                Ok(())
            }
            Err(e) => {
                warn_log!("Token refresh failed: {}", e);
                self.force_logout().await;
                Err(ShellError::Transport(e))
            }
        }
    }

    /// Apply the session consequences of a failed transport call.
    ///
    /// 401 ends the session; 403 means `path` is off limits; anything else is
    /// returned unchanged.
    pub async fn handle_transport_error(&self, err: TransportError, path: &str) -> ShellError {
        if err.is_unauthorized() {
            self.force_logout().await;
            ShellError::AuthenticationRequired
        } else if err.is_forbidden() {
            ShellError::AuthorizationDenied {
                path: path.to_string(),
            }
        } else {
            ShellError::Transport(err)
        }
    }

    /// Merge, sort and filter `menus` for a user with `roles` and `permissions`.
    ///
    /// Returns the unfiltered and the filtered tree.
    pub fn generate_routes(
        &self,
        menus: &[MenuNode],
        roles: &[String],
        permissions: &[String],
    ) -> (Vec<MergedRoute>, Vec<MergedRoute>) {
        let merged = sort_by_rank(merge_with(
            &self.catalog,
            menus,
            &self.config,
            self.sink.as_ref(),
        ));
        let routes = filter_routes_with(
            &merged,
            roles,
            permissions,
            &self.config.wildcard_permission,
            self.sink.as_ref(),
        );
        (merged, routes)
    }

    async fn fetch(&self, token: &str) -> Result<(UserInfo, Vec<MenuNode>), TransportError> {
        let info = self.transport.get_user_info(token).await?;
        let menus = self.transport.get_user_menus(token).await?;
        Ok((info, menus))
    }

    fn advance_epoch(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn teardown(&self) {
        self.session.write().await.clear();
        self.forget();
    }

    fn persist(&self, snapshot: &SessionSnapshot) {
        if let Some(store) = &self.store {
            if let Err(e) = save_json(store.as_ref(), StorageScope::Durable, SESSION_KEY, snapshot) {
                warn_log!("Failed to persist session: {}", e);
            }
        }
    }

    fn forget(&self) {
        if let Some(store) = &self.store {
            if let Err(e) = store.remove(StorageScope::Durable, SESSION_KEY) {
                warn_log!("Failed to remove persisted session: {}", e);
            }
        }
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("epoch", &self.epoch())
            .field("persistent", &self.store.is_some())
            .finish()
    }
}
