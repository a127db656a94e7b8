//! Identity service transport.
//!
//! The core never speaks HTTP itself. The embedding application implements
//! [`AuthTransport`] over whatever client it uses and maps every failure to a
//! [`TransportError`]. Status codes 401 and 403 have fixed meanings for the
//! session manager; everything else is reported as-is.

use crate::menu::MenuNode;
use crate::session::UserInfo;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Access and refresh token issued by the identity service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl TokenPair {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
        }
    }

    pub fn with_refresh(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }
}

/// Uniform transport failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transport error{}: {message}", status_suffix(.status))]
pub struct TransportError {
    /// HTTP-like status code, when the failure came from the server.
    pub status: Option<u16>,
    pub message: String,
}

impl TransportError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Failure without a status code (connection, decoding, ...).
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(None, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(Some(401), "unauthorized")
    }

    pub fn forbidden() -> Self {
        Self::new(Some(403), "forbidden")
    }

    /// The session is no longer valid.
    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(401)
    }

    /// The session is valid but lacks rights.
    pub fn is_forbidden(&self) -> bool {
        self.status == Some(403)
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|code| format!(" {code}")).unwrap_or_default()
}

/// Calls the core makes to the identity service.
#[async_trait]
pub trait AuthTransport: Send + Sync {
    /// Exchange credentials for tokens.
    async fn login(&self, username: &str, password: &str) -> Result<TokenPair, TransportError>;

    /// Identity, roles and permissions of the token's user.
    async fn get_user_info(&self, token: &str) -> Result<UserInfo, TransportError>;

    /// The menu tree the server grants to the token's user.
    async fn get_user_menus(&self, token: &str) -> Result<Vec<MenuNode>, TransportError>;

    /// Invalidate the token on the server.
    async fn logout(&self, token: &str) -> Result<(), TransportError>;

    /// Exchange a refresh token for a new token pair.
    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenPair, TransportError>;
}
