//! Login exchange against the Bytes API.
//!
//! Credentials are sent form-encoded to `POST /token`; the JSON response
//! carries the access token.

use std::future::Future;
use std::pin::Pin;

use boefjes_application::{StoreError, StoreResult, TokenProvider};
use boefjes_domain::{BearerToken, Credentials};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::adapters::endpoint_url;

/// Token response from the token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Error response from the token endpoint.
#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    detail: String,
}

/// Exchanges a username/password pair for a bearer token.
pub struct BytesLoginProvider {
    http_client: Client,
    token_url: Url,
    credentials: Credentials,
}

impl BytesLoginProvider {
    /// Create a provider posting to `{base_url}/token`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` cannot carry a path.
    pub fn new(http_client: Client, base_url: &Url, credentials: Credentials) -> StoreResult<Self> {
        Ok(Self {
            http_client,
            token_url: endpoint_url(base_url, &["token"], &[])?,
            credentials,
        })
    }

    async fn exchange(&self) -> StoreResult<BearerToken> {
        let params = [
            ("username", self.credentials.username.as_str()),
            ("password", self.credentials.password.as_str()),
        ];

        let body = serde_urlencoded::to_string(params)
            .map_err(|e| StoreError::Encode(format!("failed to encode login form: {e}")))?;

        let response = self
            .http_client
            .post(self.token_url.clone())
            .header(CONTENT_TYPE, mime::APPLICATION_WWW_FORM_URLENCODED.as_ref())
            .body(body)
            .send()
            .await
            .map_err(|e| StoreError::AuthExchange {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let reason = serde_json::from_str::<TokenErrorResponse>(&error_text)
                .map_or(error_text, |error_response| error_response.detail);
            tracing::error!(status = status.as_u16(), reason = %reason, "bytes login rejected");
            return Err(StoreError::AuthExchange {
                message: format!("HTTP {}: {reason}", status.as_u16()),
            });
        }

        let token_response: TokenResponse =
            response
                .json()
                .await
                .map_err(|e: reqwest::Error| StoreError::AuthExchange {
                    message: format!("Failed to parse token response: {e}"),
                })?;

        Ok(BearerToken::new(token_response.access_token))
    }
}

impl TokenProvider for BytesLoginProvider {
    fn fetch_token(&self) -> Pin<Box<dyn Future<Output = StoreResult<BearerToken>> + Send + '_>> {
        Box::pin(self.exchange())
    }
}

impl std::fmt::Debug for BytesLoginProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BytesLoginProvider")
            .field("token_url", &self.token_url.as_str())
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}
