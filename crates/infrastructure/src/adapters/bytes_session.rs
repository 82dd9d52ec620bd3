//! Authenticated HTTP session against the Bytes API.
//!
//! This adapter wraps a `reqwest::Client` bound to one base URL and runs
//! every request through the application's [`Reauthenticator`], so a
//! rejected token is replaced and the request retried once.

use std::sync::Arc;
use std::time::Duration;

use boefjes_application::{Reauthenticator, StoreError, StoreResult, TokenProvider};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Response, StatusCode, Url};

/// Version reported in the `User-Agent` header.
pub const CLIENT_VERSION: &str = "0.3";

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds `base` + `segments` (percent-encoded) + `query`.
///
/// A path prefix on `base` is kept, so `https://host/api` + `["token"]`
/// yields `https://host/api/token`.
///
/// # Errors
///
/// Returns an error if `base` cannot carry a path (e.g. `mailto:` URLs).
pub fn endpoint_url(base: &Url, segments: &[&str], query: &[(&str, &str)]) -> StoreResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| StoreError::Transport {
            status: None,
            message: format!("cannot use {base} as a base URL"),
        })?
        .pop_if_empty()
        .extend(segments);

    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    Ok(url)
}

/// Authenticated session bound to one Bytes API base URL.
pub struct BytesApiSession {
    client: Client,
    base_url: Url,
    auth: Reauthenticator,
}

impl BytesApiSession {
    /// Creates a session that obtains tokens from `provider`.
    #[must_use]
    pub fn new(client: Client, base_url: Url, provider: Arc<dyn TokenProvider>) -> Self {
        Self {
            client,
            base_url,
            auth: Reauthenticator::new(provider),
        }
    }

    /// Creates the shared reqwest client.
    ///
    /// Configuration:
    /// - User-Agent: `bytes-api-client/0.3`
    /// - Request timeout: `timeout`
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn build_client(timeout: Duration) -> StoreResult<Client> {
        Client::builder()
            .user_agent(format!("bytes-api-client/{CLIENT_VERSION}"))
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Transport {
                status: None,
                message: format!("failed to create HTTP client: {e}"),
            })
    }

    /// Exchanges the credentials for a fresh token.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AuthExchange`] if the exchange fails.
    pub async fn login(&self) -> StoreResult<()> {
        self.auth.login().await
    }

    /// Sends an authenticated `GET`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unauthorized`] if the token is still rejected
    /// after one login, or [`StoreError::Transport`] for other failures.
    pub async fn get(&self, segments: &[&str]) -> StoreResult<Response> {
        let url = endpoint_url(&self.base_url, segments, &[])?;
        self.send(&Method::GET, &url, None).await
    }

    /// Sends an authenticated `POST` with `body` of the given content type.
    ///
    /// # Errors
    ///
    /// Same as [`BytesApiSession::get`].
    pub async fn post(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
        body: Vec<u8>,
        content_type: &str,
    ) -> StoreResult<Response> {
        let url = endpoint_url(&self.base_url, segments, query)?;
        self.send(&Method::POST, &url, Some((body, content_type)))
            .await
    }

    async fn send(
        &self,
        method: &Method,
        url: &Url,
        body: Option<(Vec<u8>, &str)>,
    ) -> StoreResult<Response> {
        self.auth
            .call(|authorization| {
                let mut builder = self.client.request(method.clone(), url.clone());
                if let Some(value) = authorization {
                    builder = builder.header(AUTHORIZATION, value);
                }
                if let Some((bytes, content_type)) = &body {
                    builder = builder.header(CONTENT_TYPE, *content_type).body(bytes.clone());
                }

                async move {
                    let response = builder.send().await.map_err(Self::map_error)?;
                    Self::verify(response).await
                }
            })
            .await
    }

    /// Maps error statuses to [`StoreError`].
    ///
    /// 401 becomes [`StoreError::Unauthorized`] so the caller can log in
    /// again; every other non-2xx status is logged with its body.
    pub(crate) async fn verify(response: Response) -> StoreResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().clone();
        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::UNAUTHORIZED {
            return Err(StoreError::Unauthorized { message: body });
        }

        tracing::error!(status = status.as_u16(), url = %url, body = %body, "bytes request failed");
        Err(StoreError::Transport {
            status: Some(status.as_u16()),
            message: body,
        })
    }

    /// Maps reqwest errors to [`StoreError::Transport`].
    pub(crate) fn map_error(error: reqwest::Error) -> StoreError {
        let message = if error.is_timeout() {
            format!("request timed out: {error}")
        } else if error.is_connect() {
            let host = error
                .url()
                .and_then(Url::host_str)
                .unwrap_or("unknown")
                .to_string();
            format!("could not connect to {host}: {error}")
        } else {
            error.to_string()
        };

        StoreError::Transport {
            status: error.status().map(|s| s.as_u16()),
            message,
        }
    }
}

impl std::fmt::Debug for BytesApiSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BytesApiSession")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}
