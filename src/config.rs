//! Shell configuration.
//!
//! [`ShellConfig`] collects the fixed paths and policies the navigator needs:
//! where to send unauthenticated or unauthorized users, which paths never
//! require a session, which tab is the permanent home tab, how long session
//! restoration may take, and how convention-based component module keys are
//! built.
//!
//! Every field has a default, so a config file only needs the values it
//! overrides:
//!
//! ```
//! use admin_navigator::ShellConfig;
//!
//! let config = ShellConfig::from_toml_str(r#"
//!     login_path = "/signin"
//!     restore_timeout_ms = 2500
//! "#).unwrap();
//!
//! assert_eq!(config.login_path, "/signin");
//! assert_eq!(config.forbidden_path, "/403");
//! assert!(config.is_allow_listed("/signin"));
//! ```

use crate::matching::normalize_path;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Permission string that grants every permission.
pub const WILDCARD_PERMISSION: &str = "*:*:*";

/// Errors raised while loading a [`ShellConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The TOML document did not match the expected shape.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The values parsed but are inconsistent.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Navigation shell configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Login page. Always reachable without a session.
    pub login_path: String,
    /// Page shown when a route is denied by role or permission.
    pub forbidden_path: String,
    /// Page shown for unknown routes.
    pub not_found_path: String,
    /// Extra paths reachable without a session, in addition to the three above.
    pub allow_list: Vec<String>,
    /// Home tab path; its visited view can never be closed.
    pub home_path: String,
    /// Title used when a route does not declare one.
    pub default_title: String,
    /// Query parameter carrying the return path on login redirects.
    pub redirect_param: String,
    /// Permission string granting every permission.
    pub wildcard_permission: String,
    /// Upper bound for one session restoration (user info + menus).
    pub restore_timeout_ms: u64,
    /// Prefix of convention module keys (`views` → `views/system/user/index`).
    pub view_prefix: String,
    /// Suffix of convention module keys.
    pub view_suffix: String,
    /// Component id rendered when a convention lookup misses.
    pub not_found_component: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            login_path: "/login".to_string(),
            forbidden_path: "/403".to_string(),
            not_found_path: "/404".to_string(),
            allow_list: Vec::new(),
            home_path: "/welcome".to_string(),
            default_title: "Admin".to_string(),
            redirect_param: "redirect".to_string(),
            wildcard_permission: WILDCARD_PERMISSION.to_string(),
            restore_timeout_ms: 10_000,
            view_prefix: "views".to_string(),
            view_suffix: "index".to_string(),
            not_found_component: "error/404".to_string(),
        }
    }
}

impl ShellConfig {
    /// Parse a config from a TOML document and validate it.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Check that the fixed pages are distinct absolute paths.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("login_path", &self.login_path),
            ("forbidden_path", &self.forbidden_path),
            ("not_found_path", &self.not_found_path),
            ("home_path", &self.home_path),
        ] {
            if !value.starts_with('/') {
                return Err(ConfigError::Invalid(format!(
                    "{field} must be an absolute path, got '{value}'"
                )));
            }
        }
        if self.login_path == self.forbidden_path || self.login_path == self.not_found_path {
            return Err(ConfigError::Invalid(
                "login_path must differ from the error pages".to_string(),
            ));
        }
        if self.restore_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "restore_timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Restoration timeout as a [`Duration`].
    pub fn restore_timeout(&self) -> Duration {
        Duration::from_millis(self.restore_timeout_ms)
    }

    /// Return `true` if `path` never requires a session.
    pub fn is_allow_listed(&self, path: &str) -> bool {
        let path = normalize_path(path);
        path == normalize_path(&self.login_path)
            || path == normalize_path(&self.forbidden_path)
            || path == normalize_path(&self.not_found_path)
            || self.allow_list.iter().any(|p| normalize_path(p) == path)
    }

    /// Module key a route path resolves to by convention.
    ///
    /// `/system/user` → `views/system/user/index` with the default prefix and
    /// suffix.
    pub fn module_key_for(&self, path: &str) -> String {
        let trimmed = path.trim_matches('/');
        let prefix = self.view_prefix.trim_matches('/');
        let suffix = self.view_suffix.trim_matches('/');
        if trimmed.is_empty() {
            format!("{prefix}/{suffix}")
        } else {
            format!("{prefix}/{trimmed}/{suffix}")
        }
    }
}
