use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use crate::core::library::{LibraryError, LibraryResult};

pub const SESSION_LIFETIME_HOURS: i64 = 24;

/// Credential handed out by the session provider at login.
///
/// It is built once per session and passed explicitly to every service call; nothing in the
/// crate reads the credential from ambient state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    token: String,
    user_id: String,
    issued_at: DateTime<Utc>,
}

impl SessionContext {
    pub fn new(token: &str, user_id: &str) -> Self {
        Self::issued_at(token, user_id, Utc::now())
    }

    pub fn issued_at(token: &str, user_id: &str, issued_at: DateTime<Utc>) -> Self {
        Self {
            token: token.to_string(),
            user_id: user_id.to_string(),
            issued_at,
        }
    }

    pub fn token(&self) -> &str {
        self.token.as_str()
    }

    pub fn user_id(&self) -> &str {
        self.user_id.as_str()
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.issued_at + Duration::hours(SESSION_LIFETIME_HOURS)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }

    // Fails before any network call when the credential cannot be used.
    pub fn ensure_active(&self) -> LibraryResult<()> {
        if self.token.trim().is_empty() {
            return Err(LibraryError::auth("missing session token", Some("401".to_string())));
        }
        if self.is_expired_at(Utc::now()) {
            return Err(LibraryError::auth(
                format!("session expired at {}", self.expires_at()).as_str(), Some("401".to_string())));
        }
        Ok(())
    }
}
