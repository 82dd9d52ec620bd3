//! Retry-once-after-login policy for authenticated calls.

use std::future::Future;
use std::sync::Arc;

use super::{TokenProvider, TokenStore};
use crate::StoreResult;

/// Runs authenticated operations, logging in again once when the server
/// rejects the token.
///
/// The bound is fixed: an operation is attempted at most twice and the
/// provider is asked for at most one new token per call. A second
/// rejection surfaces as [`crate::StoreError::Unauthorized`].
pub struct Reauthenticator {
    tokens: TokenStore,
    provider: Arc<dyn TokenProvider>,
}

impl Reauthenticator {
    /// Create a policy with an empty token store.
    #[must_use]
    pub fn new(provider: Arc<dyn TokenProvider>) -> Self {
        Self {
            tokens: TokenStore::new(),
            provider,
        }
    }

    /// Log in unconditionally, replacing any held token.
    ///
    /// # Errors
    /// Returns [`crate::StoreError::AuthExchange`] if the exchange fails.
    pub async fn login(&self) -> StoreResult<()> {
        let lease = self.tokens.login(self.provider.as_ref()).await?;
        tracing::info!(
            generation = lease.generation(),
            obtained_at = ?lease.token().map(|token| token.obtained_at),
            "logged in to bytes"
        );
        Ok(())
    }

    /// Run `operation` with the current `Authorization` header value.
    ///
    /// On [`crate::StoreError::Unauthorized`] the token is refreshed once and
    /// `operation` is run one more time with the new header. Every other
    /// outcome is returned unchanged.
    ///
    /// # Errors
    /// Returns the operation's error, or the login error if the refresh fails.
    pub async fn call<T, F, Fut>(&self, mut operation: F) -> StoreResult<T>
    where
        F: FnMut(Option<String>) -> Fut + Send,
        Fut: Future<Output = StoreResult<T>> + Send,
    {
        let lease = self.tokens.lease().await;
        match operation(lease.authorization_header()).await {
            Err(error) if error.is_unauthorized() => {
                tracing::info!(
                    generation = lease.generation(),
                    "bearer token rejected, logging in again"
                );
                let refreshed = self
                    .tokens
                    .refresh(self.provider.as_ref(), &lease)
                    .await?;
                operation(refreshed.authorization_header()).await
            }
            result => result,
        }
    }
}
