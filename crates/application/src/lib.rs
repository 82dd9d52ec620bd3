//! Boefjes Application - Ports and client policies
//!
//! This crate defines the application layer with:
//! - Port traits (artifact store, event sink, token provider, clock)
//! - The single-shot re-authentication policy
//! - Queue notifications shared by every store implementation
//! - Application-level error handling

pub mod auth;
pub mod error;
pub mod notifier;
pub mod ports;

pub use auth::{Reauthenticator, TokenLease, TokenProvider, TokenStore};
pub use error::{ArtifactKind, StoreError, StoreResult};
pub use notifier::Notifier;
pub use ports::{ArtifactStore, Clock, EventSink, EventSinkError};
