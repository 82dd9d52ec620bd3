//! Application error types

use thiserror::Error;

use crate::ports::EventSinkError;

/// Kind of artifact an operation was addressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// A boefje job meta.
    BoefjeMeta,
    /// A normalizer job meta.
    NormalizerMeta,
    /// A raw payload.
    Raw,
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::BoefjeMeta => "boefje meta",
            Self::NormalizerMeta => "normalizer meta",
            Self::Raw => "raw data",
        };
        write!(f, "{s}")
    }
}

/// Errors surfaced by artifact store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The server rejected the bearer token.
    #[error("unauthorized: {message}")]
    Unauthorized {
        /// Response body or reason.
        message: String,
    },

    /// The requested artifact does not exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// What was requested.
        kind: ArtifactKind,
        /// The id that was looked up.
        id: String,
    },

    /// A raw payload references a boefje meta that was never stored.
    #[error("raw data references unknown boefje meta: {boefje_meta_id}")]
    MissingOwner {
        /// The dangling boefje meta id.
        boefje_meta_id: String,
    },

    /// The request failed in transit or the server answered with an error status.
    #[error("transport error{}: {message}", status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Transport {
        /// HTTP status, if a response was received.
        status: Option<u16>,
        /// Response body or connection error.
        message: String,
    },

    /// Exchanging credentials for a token failed.
    #[error("login failed: {message}")]
    AuthExchange {
        /// Reason reported by the token endpoint.
        message: String,
    },

    /// A request body could not be serialized.
    #[error("failed to encode request: {0}")]
    Encode(String),

    /// A response body could not be parsed.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The notification sink rejected an event.
    #[error("notification failed: {0}")]
    Notification(#[from] EventSinkError),
}

impl StoreError {
    /// Returns true if this is an authorization failure.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Returns the HTTP status carried by a transport error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }

    /// Turns a 404 transport error into [`StoreError::NotFound`] for `kind`/`id`.
    #[must_use]
    pub fn or_not_found(self, kind: ArtifactKind, id: &str) -> Self {
        match self.status() {
            Some(404) => Self::NotFound {
                kind,
                id: id.to_string(),
            },
            _ => self,
        }
    }
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
