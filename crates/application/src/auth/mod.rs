//! Authentication module for the Bytes client.
//!
//! This module provides:
//! - The token provider port (credential exchange)
//! - In-memory token state with single-flight refresh
//! - The retry-once-after-login policy for authenticated calls

mod provider;
mod retry;
mod token_store;

pub use provider::TokenProvider;
pub use retry::Reauthenticator;
pub use token_store::{TokenLease, TokenStore};
