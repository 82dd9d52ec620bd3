//! In-memory bearer token state.
//!
//! The store holds at most one token. Every replacement bumps a generation
//! counter so callers can tell whether the token they were rejected with is
//! still the current one.

use tokio::sync::{Mutex, RwLock};

use boefjes_domain::BearerToken;

use super::TokenProvider;
use crate::StoreResult;

/// Snapshot of the token state taken before a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenLease {
    generation: u64,
    token: Option<BearerToken>,
}

impl TokenLease {
    /// Generation of the token state this lease was taken from.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// The leased token, if the client has logged in.
    #[must_use]
    pub const fn token(&self) -> Option<&BearerToken> {
        self.token.as_ref()
    }

    /// The `Authorization` header value to send, if any.
    #[must_use]
    pub fn authorization_header(&self) -> Option<String> {
        self.token.as_ref().map(BearerToken::authorization_header)
    }
}

#[derive(Debug, Default)]
struct TokenState {
    token: Option<BearerToken>,
    generation: u64,
}

impl TokenState {
    fn lease(&self) -> TokenLease {
        TokenLease {
            generation: self.generation,
            token: self.token.clone(),
        }
    }
}

/// Thread-safe token store with single-flight refresh.
#[derive(Debug, Default)]
pub struct TokenStore {
    state: RwLock<TokenState>,
    /// Held for the duration of a login exchange.
    refresh: Mutex<()>,
}

impl TokenStore {
    /// Create an empty token store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the current token.
    pub async fn lease(&self) -> TokenLease {
        self.state.read().await.lease()
    }

    /// Replace the token unconditionally.
    ///
    /// # Errors
    /// Propagates the provider's error; the current token is kept in that case.
    pub async fn login(&self, provider: &dyn TokenProvider) -> StoreResult<TokenLease> {
        let _guard = self.refresh.lock().await;
        self.replace(provider).await
    }

    /// Replace the token if it is still the one `stale` was taken from.
    ///
    /// If another caller refreshed in the meantime the newer token is
    /// returned without a second login exchange.
    ///
    /// # Errors
    /// Propagates the provider's error; the current token is kept in that case.
    pub async fn refresh(
        &self,
        provider: &dyn TokenProvider,
        stale: &TokenLease,
    ) -> StoreResult<TokenLease> {
        let _guard = self.refresh.lock().await;
        {
            let state = self.state.read().await;
            if state.generation != stale.generation {
                return Ok(state.lease());
            }
        }
        self.replace(provider).await
    }

    async fn replace(&self, provider: &dyn TokenProvider) -> StoreResult<TokenLease> {
        let token = provider.fetch_token().await?;
        let mut state = self.state.write().await;
        state.token = Some(token);
        state.generation += 1;
        Ok(state.lease())
    }
}
