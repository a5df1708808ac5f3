use crate::auth::{AuthMode, Credential};
use crate::error::Error;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variables that override file values.
pub const ENV_BASE_URL: &str = "TB_BASE_URL";
pub const ENV_API_KEY: &str = "TB_API_KEY";
pub const ENV_USERNAME: &str = "TB_USERNAME";
pub const ENV_PASSWORD: &str = "TB_PASSWORD";

#[derive(Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Server root, e.g. `https://thingsboard.example.com`.
    pub base_url: String,
    pub auth_type: AuthMode,
    pub api_key: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,

    /// Record failing items as `{"error": ..}` and keep going.
    pub continue_on_fail: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".into(),
            auth_type: AuthMode::ApiKey,
            api_key: None,
            username: None,
            password: None,
            continue_on_fail: false,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("auth_type", &self.auth_type)
            .field("api_key", &redact(&self.api_key))
            .field("username", &self.username)
            .field("password", &redact(&self.password))
            .field("continue_on_fail", &self.continue_on_fail)
            .finish()
    }
}

impl Config {
    /// Default config file location.
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("tbflow").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".tbflow/config.toml"))
    }

    /// Load from `path` (or the default location) and apply environment overrides.
    ///
    /// A missing file at the default location yields defaults; a missing file
    /// given explicitly is an error.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = Self::default_path();
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    /// Override fields from `lookup` (normally the process environment).
    ///
    /// Setting `TB_USERNAME` switches to username/password auth; setting
    /// `TB_API_KEY` switches back to API-key auth.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(url) = get(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(user) = get(ENV_USERNAME) {
            self.username = Some(user);
            self.auth_type = AuthMode::UsernamePassword;
        }
        if let Some(password) = get(ENV_PASSWORD) {
            self.password = Some(password);
        }
        if let Some(key) = get(ENV_API_KEY) {
            self.api_key = Some(key);
            self.auth_type = AuthMode::ApiKey;
        }
    }

    /// Build the run credential for the selected auth type.
    pub fn credential(&self) -> crate::error::Result<Credential> {
        let missing = |field: &str| {
            Error::Auth(format!(
                "credential `{field}` is missing for {} auth",
                match self.auth_type {
                    AuthMode::ApiKey => "API key",
                    AuthMode::UsernamePassword => "username/password",
                }
            ))
        };

        match self.auth_type {
            AuthMode::ApiKey => {
                let key = present(self.api_key.as_ref()).ok_or_else(|| missing("apiKey"))?;
                Credential::api_key(&self.base_url, key)
            }
            AuthMode::UsernamePassword => {
                let username =
                    present(self.username.as_ref()).ok_or_else(|| missing("username"))?;
                let password =
                    present(self.password.as_ref()).ok_or_else(|| missing("password"))?;
                Credential::username_password(&self.base_url, username, password)
            }
        }
    }
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.trim().is_empty())
}
