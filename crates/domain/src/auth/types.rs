//! Credentials and bearer tokens for the Bytes API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Username/password pair exchanged for a bearer token.
///
/// Held for the lifetime of the client and only sent in the login exchange.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Account name.
    pub username: String,
    /// Account password.
    pub password: String,
}

impl Credentials {
    /// Creates a credential pair.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Short-lived access token obtained from a login exchange.
///
/// The server may invalidate it at any time; the client only finds out
/// through a 401 response.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BearerToken {
    /// The access token string
    pub access_token: String,
    /// When this token was obtained
    pub obtained_at: DateTime<Utc>,
}

impl BearerToken {
    /// Create a new token with current timestamp.
    #[must_use]
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            obtained_at: Utc::now(),
        }
    }

    /// Returns the Authorization header value.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        format!("bearer {}", self.access_token)
    }

    /// Get a preview of the token (first 8 chars + ...).
    #[must_use]
    pub fn preview(&self) -> String {
        match self.access_token.get(..8) {
            Some(head) if self.access_token.len() > 12 => format!("{head}..."),
            _ => "<short>".to_string(),
        }
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerToken")
            .field("access_token", &self.preview())
            .field("obtained_at", &self.obtained_at)
            .finish()
    }
}
