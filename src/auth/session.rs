//! Run-scoped session cache.

use crate::edition::Edition;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifetime of a token obtained from the login endpoint.
pub const TOKEN_TTL: TimeDelta = TimeDelta::minutes(20);

/// Bearer header obtained by login, with its fixed expiry.
#[derive(Clone, Serialize, Deserialize)]
pub struct CachedToken {
    pub(crate) header: String,
    pub(crate) expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// A token issued at `now`, valid for [`TOKEN_TTL`].
    #[must_use]
    pub fn issued_at(header: String, now: DateTime<Utc>) -> Self {
        Self {
            header,
            expires_at: now + TOKEN_TTL,
        }
    }

    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

impl fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedToken")
            .field("header", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Where a username/password session stands.
///
/// Authenticating is not a stored state: it is the login call in flight
/// inside [`super::SessionManager::auth_header`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NoSession,
    Valid,
    Expired,
}

/// Everything cached for the duration of one run.
///
/// Owned by the caller (one per run) and passed by `&mut` into every
/// auth call. Serializable so a host can persist it between calls.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CachedSession {
    pub(crate) token: Option<CachedToken>,
    pub(crate) edition: Option<Edition>,
}

impl CachedSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Detected edition, or community when detection has not run yet.
    #[must_use]
    pub fn edition(&self) -> Edition {
        self.edition.unwrap_or_default()
    }

    #[must_use]
    pub fn detected_edition(&self) -> Option<Edition> {
        self.edition
    }

    #[must_use]
    pub fn token(&self) -> Option<&CachedToken> {
        self.token.as_ref()
    }

    #[must_use]
    pub fn state(&self, now: DateTime<Utc>) -> SessionState {
        match &self.token {
            None => SessionState::NoSession,
            Some(token) if token.is_valid_at(now) => SessionState::Valid,
            Some(_) => SessionState::Expired,
        }
    }

    /// Drop the token and edition, as at the start of a fresh run.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_window() {
        let now = Utc::now();
        let token = CachedToken::issued_at("Bearer t".into(), now);
        assert!(token.is_valid_at(now));
        assert!(token.is_valid_at(now + TimeDelta::minutes(19)));
        assert!(!token.is_valid_at(now + TOKEN_TTL));
        assert!(!token.is_valid_at(now + TimeDelta::minutes(21)));
    }

    #[test]
    fn test_session_states() {
        let now = Utc::now();
        let mut session = CachedSession::new();
        assert_eq!(session.state(now), SessionState::NoSession);

        session.token = Some(CachedToken::issued_at("Bearer t".into(), now));
        assert_eq!(session.state(now), SessionState::Valid);
        assert_eq!(session.state(now + TimeDelta::minutes(25)), SessionState::Expired);

        session.clear();
        assert_eq!(session.state(now), SessionState::NoSession);
    }

    #[test]
    fn test_edition_defaults_to_community() {
        let mut session = CachedSession::new();
        assert_eq!(session.detected_edition(), None);
        assert_eq!(session.edition(), Edition::Community);
        session.edition = Some(Edition::Professional);
        assert_eq!(session.edition(), Edition::Professional);
    }

    #[test]
    fn test_debug_redacts_header() {
        let token = CachedToken::issued_at("Bearer secret-token".into(), Utc::now());
        let debug = format!("{token:?}");
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_session_serialization() {
        let mut session = CachedSession::new();
        session.edition = Some(Edition::Professional);
        let json = serde_json::to_string(&session).unwrap();
        assert!(json.contains("\"edition\":\"PE\""));
        let back: CachedSession = serde_json::from_str(&json).unwrap();
        assert_eq!(back.detected_edition(), Some(Edition::Professional));
    }
}
