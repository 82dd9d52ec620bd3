//! Token provider trait.
//!
//! A token provider turns the client's stored credentials into a fresh
//! bearer token.

use std::future::Future;
use std::pin::Pin;

use boefjes_domain::BearerToken;

use crate::StoreResult;

/// Trait for login exchanges.
///
/// Implementations perform the actual exchange, typically a form-encoded
/// `POST /token` against the Bytes API.
pub trait TokenProvider: Send + Sync {
    /// Exchange the stored credentials for a new token.
    ///
    /// # Errors
    /// Returns [`crate::StoreError::AuthExchange`] if the exchange is rejected
    /// or the response cannot be read.
    fn fetch_token(&self) -> Pin<Box<dyn Future<Output = StoreResult<BearerToken>> + Send + '_>>;
}
