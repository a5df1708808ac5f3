//! Credentials, session caching and edition detection.
//!
//! Two auth modes are supported: an API key sent verbatim as
//! `ApiKey <key>`, or a username/password pair exchanged at
//! `/api/auth/login` for a bearer token that is cached for twenty minutes.
//! The first successful auth of a run also reads the server edition.

mod session;

pub use session::{CachedSession, CachedToken, SessionState, TOKEN_TTL};

use crate::client::{AUTH_HEADER, create_http_client, upstream_message};
use crate::edition::Edition;
use crate::error::{Error, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

const LOGIN_PATH: &str = "/api/auth/login";
const SYSTEM_INFO_PATH: &str = "/api/system/info";
const CURRENT_USER_PATH: &str = "/api/auth/user";

/// How requests are authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuthMode {
    #[default]
    ApiKey,
    UsernamePassword,
}

/// Secret material for one auth mode.
#[derive(Clone)]
pub enum AuthMethod {
    ApiKey(String),
    UsernamePassword { username: String, password: String },
}

impl AuthMethod {
    #[must_use]
    pub fn mode(&self) -> AuthMode {
        match self {
            Self::ApiKey(_) => AuthMode::ApiKey,
            Self::UsernamePassword { .. } => AuthMode::UsernamePassword,
        }
    }
}

impl fmt::Debug for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiKey(_) => f.debug_tuple("ApiKey").field(&"[REDACTED]").finish(),
            Self::UsernamePassword { username, .. } => f
                .debug_struct("UsernamePassword")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .finish(),
        }
    }
}

/// Connection details for one server. Immutable for a run.
#[derive(Debug, Clone)]
pub struct Credential {
    base_url: String,
    method: AuthMethod,
}

impl Credential {
    /// Validate and normalize the base URL (trailing slashes removed).
    pub fn new(base_url: &str, method: AuthMethod) -> Result<Self> {
        let base_url = normalize_base_url(base_url);
        if base_url.is_empty() {
            return Err(Error::Auth(
                "credential `baseUrl` is missing. Set the base URL (e.g. http://localhost:8080)"
                    .into(),
            ));
        }
        url::Url::parse(&base_url)
            .map_err(|e| Error::Auth(format!("credential `baseUrl` is not a valid URL: {e}")))?;

        Ok(Self { base_url, method })
    }

    pub fn api_key(base_url: &str, key: impl Into<String>) -> Result<Self> {
        Self::new(base_url, AuthMethod::ApiKey(key.into()))
    }

    pub fn username_password(
        base_url: &str,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        Self::new(
            base_url,
            AuthMethod::UsernamePassword {
                username: username.into(),
                password: password.into(),
            },
        )
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn method(&self) -> &AuthMethod {
        &self.method
    }

    #[must_use]
    pub fn mode(&self) -> AuthMode {
        self.method.mode()
    }
}

/// Strip trailing slashes and surrounding whitespace.
#[must_use]
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: Option<String>,
}

#[derive(Deserialize)]
struct SystemInfo {
    edition: Option<String>,
}

/// Produces the auth header for a credential, caching what it can in the
/// caller's [`CachedSession`].
#[derive(Debug, Clone)]
pub struct SessionManager {
    client: reqwest::Client,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionManager {
    #[must_use]
    pub fn new() -> Self {
        Self::with_client(create_http_client())
    }

    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Return a header value valid for the next request.
    ///
    /// API keys are returned without a network call. Username/password
    /// credentials reuse the cached bearer header until it expires, then log
    /// in again. Edition detection runs once per session and never fails.
    pub async fn auth_header(
        &self,
        credential: &Credential,
        session: &mut CachedSession,
    ) -> Result<String> {
        let header = match credential.method() {
            AuthMethod::ApiKey(key) => format!("ApiKey {key}"),
            AuthMethod::UsernamePassword { username, password } => {
                self.bearer_header(credential.base_url(), username, password, session)
                    .await?
            }
        };

        if session.edition.is_none() {
            let edition = self.detect_edition(credential.base_url(), &header).await;
            tracing::info!(%edition, "detected server edition");
            session.edition = Some(edition);
        }

        Ok(header)
    }

    async fn bearer_header(
        &self,
        base_url: &str,
        username: &str,
        password: &str,
        session: &mut CachedSession,
    ) -> Result<String> {
        let now = Utc::now();
        match session.state(now) {
            SessionState::Valid => {
                if let Some(token) = session.token() {
                    tracing::debug!(expires_at = %token.expires_at(), "reusing cached token");
                    return Ok(token.header.clone());
                }
            }
            SessionState::Expired => tracing::info!("cached token expired, logging in again"),
            SessionState::NoSession => {}
        }

        let token = self.login(base_url, username, password).await?;
        let header = format!("Bearer {token}");
        session.token = Some(CachedToken::issued_at(header.clone(), now));
        tracing::info!(%username, "logged in");
        Ok(header)
    }

    /// Exchange username/password for a token at the login endpoint.
    pub async fn login(&self, base_url: &str, username: &str, password: &str) -> Result<String> {
        let response = self
            .client
            .post(format!("{base_url}{LOGIN_PATH}"))
            .json(&LoginRequest { username, password })
            .send()
            .await
            .map_err(|e| Error::Auth(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = upstream_message(&text).unwrap_or_else(|| format!("HTTP {status}"));
            return Err(Error::Auth(format!(
                "{message} (Status: {}). Check your username and password",
                status.as_u16()
            )));
        }

        let body: LoginResponse = response
            .json()
            .await
            .map_err(|e| Error::Auth(format!("Failed to parse login response: {e}")))?;

        body.token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Auth("No token received".into()))
    }

    /// Read the server edition. Any failure yields community.
    pub async fn detect_edition(&self, base_url: &str, auth_header: &str) -> Edition {
        match self.fetch_edition(base_url, auth_header).await {
            Ok(edition) => edition,
            Err(e) => {
                tracing::warn!("edition detection failed, assuming CE: {e}");
                Edition::Community
            }
        }
    }

    async fn fetch_edition(
        &self,
        base_url: &str,
        auth_header: &str,
    ) -> std::result::Result<Edition, reqwest::Error> {
        let info: SystemInfo = self
            .client
            .get(format!("{base_url}{SYSTEM_INFO_PATH}"))
            .header(AUTH_HEADER, auth_header)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(info
            .edition
            .as_deref()
            .map_or(Edition::Community, Edition::from_label))
    }

    /// Verify that the credential is accepted by the server.
    ///
    /// API keys are checked against the current-user endpoint, username and
    /// password by logging in. Nothing is cached.
    pub async fn test_connection(&self, credential: &Credential) -> Result<()> {
        match credential.method() {
            AuthMethod::ApiKey(key) => {
                let response = self
                    .client
                    .get(format!("{}{CURRENT_USER_PATH}", credential.base_url()))
                    .header(AUTH_HEADER, format!("ApiKey {key}"))
                    .send()
                    .await
                    .map_err(|e| Error::Auth(format!("Connection failed: {e}")))?;
                let status = response.status();
                if status.is_success() {
                    Ok(())
                } else {
                    let text = response.text().await.unwrap_or_default();
                    let message =
                        upstream_message(&text).unwrap_or_else(|| format!("HTTP {status}"));
                    Err(Error::Auth(format!("Connection failed: {message}")))
                }
            }
            AuthMethod::UsernamePassword { username, password } => self
                .login(credential.base_url(), username, password)
                .await
                .map(|_| ()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use httpmock::prelude::*;
    use serde_json::json;

    fn login_mock<'a>(server: &'a MockServer, token: &str) -> httpmock::Mock<'a> {
        let token = token.to_string();
        server.mock(move |when, then| {
            when.method(POST)
                .path("/api/auth/login")
                .json_body(json!({"username": "tenant@thingsboard.org", "password": "tenant"}));
            then.status(200)
                .json_body(json!({"token": token, "refreshToken": "r"}));
        })
    }

    fn system_info_mock<'a>(server: &'a MockServer, edition: &str) -> httpmock::Mock<'a> {
        let edition = edition.to_string();
        server.mock(move |when, then| {
            when.method(GET).path("/api/system/info");
            then.status(200).json_body(json!({"edition": edition}));
        })
    }

    fn user_pass(server: &MockServer) -> Credential {
        Credential::username_password(&server.base_url(), "tenant@thingsboard.org", "tenant")
            .unwrap()
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url("http://tb:8080/"), "http://tb:8080");
        assert_eq!(normalize_base_url("http://tb:8080///"), "http://tb:8080");
        assert_eq!(normalize_base_url(" http://tb "), "http://tb");
    }

    #[test]
    fn test_credential_requires_base_url() {
        let err = Credential::api_key("", "k").unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
        assert!(err.to_string().contains("baseUrl"));

        let err = Credential::api_key("not a url", "k").unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
    }

    #[test]
    fn test_credential_debug_redacts_secrets() {
        let cred = Credential::username_password("http://tb", "me", "hunter2").unwrap();
        let debug = format!("{cred:?}");
        assert!(debug.contains("me"));
        assert!(!debug.contains("hunter2"));

        let cred = Credential::api_key("http://tb", "tb_secret").unwrap();
        assert!(!format!("{cred:?}").contains("tb_secret"));
        assert_eq!(cred.mode(), AuthMode::ApiKey);
    }

    #[tokio::test]
    async fn test_api_key_header_without_login() {
        let server = MockServer::start();
        let login = login_mock(&server, "unused");
        let info = server.mock(|when, then| {
            when.method(GET)
                .path("/api/system/info")
                .header("x-authorization", "ApiKey tb_key");
            then.status(200).json_body(json!({"edition": "CE"}));
        });

        let cred = Credential::api_key(&server.base_url(), "tb_key").unwrap();
        let mut session = CachedSession::new();
        let manager = SessionManager::new();

        let header = manager.auth_header(&cred, &mut session).await.unwrap();
        assert_eq!(header, "ApiKey tb_key");
        let header = manager.auth_header(&cred, &mut session).await.unwrap();
        assert_eq!(header, "ApiKey tb_key");

        login.assert_calls(0);
        info.assert_calls(1);
        assert_eq!(session.detected_edition(), Some(Edition::Community));
        assert!(session.token().is_none());
    }

    #[tokio::test]
    async fn test_login_cached_within_window() {
        let server = MockServer::start();
        let login = login_mock(&server, "jwt-1");
        let info = system_info_mock(&server, "PE");

        let cred = user_pass(&server);
        let mut session = CachedSession::new();
        let manager = SessionManager::new();

        let first = manager.auth_header(&cred, &mut session).await.unwrap();
        let second = manager.auth_header(&cred, &mut session).await.unwrap();

        assert_eq!(first, "Bearer jwt-1");
        assert_eq!(second, "Bearer jwt-1");
        login.assert_calls(1);
        info.assert_calls(1);
        assert_eq!(session.edition(), Edition::Professional);
        assert_eq!(session.state(Utc::now()), SessionState::Valid);
    }

    #[tokio::test]
    async fn test_login_repeated_after_expiry() {
        let server = MockServer::start();
        let login = login_mock(&server, "jwt-1");
        system_info_mock(&server, "CE");

        let cred = user_pass(&server);
        let mut session = CachedSession::new();
        let manager = SessionManager::new();

        manager.auth_header(&cred, &mut session).await.unwrap();
        if let Some(token) = session.token.as_mut() {
            token.expires_at = Utc::now() - TimeDelta::seconds(1);
        }
        assert_eq!(session.state(Utc::now()), SessionState::Expired);

        manager.auth_header(&cred, &mut session).await.unwrap();
        login.assert_calls(2);
        assert_eq!(session.state(Utc::now()), SessionState::Valid);
    }

    #[tokio::test]
    async fn test_login_without_token_fails() {
        let server = MockServer::start();
        let login = server.mock(|when, then| {
            when.method(POST).path("/api/auth/login");
            then.status(200).json_body(json!({"refreshToken": "r"}));
        });
        let info = system_info_mock(&server, "PE");

        let cred = user_pass(&server);
        let mut session = CachedSession::new();
        let err = SessionManager::new()
            .auth_header(&cred, &mut session)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Auth(_)));
        assert!(err.to_string().contains("No token received"));
        login.assert_calls(1);
        info.assert_calls(0);
        assert_eq!(session.state(Utc::now()), SessionState::NoSession);
        assert_eq!(session.detected_edition(), None);
    }

    #[tokio::test]
    async fn test_login_rejected() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/auth/login");
            then.status(401)
                .json_body(json!({"status": 401, "message": "Invalid username or password"}));
        });

        let cred = user_pass(&server);
        let err = SessionManager::new()
            .auth_header(&cred, &mut CachedSession::new())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Auth(_)));
        assert!(err.to_string().contains("Invalid username or password"));
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn test_edition_failure_defaults_to_community() {
        let server = MockServer::start();
        login_mock(&server, "jwt-1");
        server.mock(|when, then| {
            when.method(GET).path("/api/system/info");
            then.status(500).body("boom");
        });

        let cred = user_pass(&server);
        let mut session = CachedSession::new();
        let header = SessionManager::new()
            .auth_header(&cred, &mut session)
            .await
            .unwrap();

        assert_eq!(header, "Bearer jwt-1");
        assert_eq!(session.detected_edition(), Some(Edition::Community));
    }

    #[tokio::test]
    async fn test_edition_network_error_defaults_to_community() {
        // Nothing listens on port 1; the API key path needs no login.
        let cred = Credential::api_key("http://127.0.0.1:1", "k").unwrap();
        let mut session = CachedSession::new();
        let header = SessionManager::new()
            .auth_header(&cred, &mut session)
            .await
            .unwrap();

        assert_eq!(header, "ApiKey k");
        assert_eq!(session.detected_edition(), Some(Edition::Community));
    }

    #[tokio::test]
    async fn test_edition_paas_and_missing_field() {
        let server = MockServer::start();
        system_info_mock(&server, "PAAS");
        let manager = SessionManager::new();
        assert_eq!(
            manager.detect_edition(&server.base_url(), "ApiKey k").await,
            Edition::Professional
        );

        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/system/info");
            then.status(200).json_body(json!({"version": "4.0"}));
        });
        assert_eq!(
            manager.detect_edition(&server.base_url(), "ApiKey k").await,
            Edition::Community
        );
    }

    #[tokio::test]
    async fn test_connection_api_key() {
        let server = MockServer::start();
        let user = server.mock(|when, then| {
            when.method(GET)
                .path("/api/auth/user")
                .header("x-authorization", "ApiKey good");
            then.status(200).json_body(json!({"email": "tenant@thingsboard.org"}));
        });
        server.mock(|when, then| {
            when.method(GET)
                .path("/api/auth/user")
                .header("x-authorization", "ApiKey bad");
            then.status(401).json_body(json!({"message": "Authentication failed"}));
        });

        let manager = SessionManager::new();
        let good = Credential::api_key(&server.base_url(), "good").unwrap();
        manager.test_connection(&good).await.unwrap();
        user.assert_calls(1);

        let bad = Credential::api_key(&server.base_url(), "bad").unwrap();
        let err = manager.test_connection(&bad).await.unwrap_err();
        assert!(err.to_string().contains("Authentication failed"));
    }

    #[tokio::test]
    async fn test_connection_username_password() {
        let server = MockServer::start();
        let login = login_mock(&server, "jwt-1");
        SessionManager::new()
            .test_connection(&user_pass(&server))
            .await
            .unwrap();
        login.assert_calls(1);
    }
}
