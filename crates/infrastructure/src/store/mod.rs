//! Artifact store implementations.
//!
//! - [`BytesApiClient`]: the Bytes API over HTTP
//! - [`InMemoryBytesClient`]: process-local maps, for tests and local runs

mod memory;
mod remote;

pub use memory::InMemoryBytesClient;
pub use remote::BytesApiClient;

use std::sync::Arc;

use boefjes_application::{ArtifactStore, Notifier};

use crate::config::{BytesClientConfig, ConfigError, StoreBackend};

/// Builds the store selected by `config.backend`.
///
/// # Errors
///
/// Returns [`ConfigError::Missing`] if the remote backend is selected
/// without an API URL or credentials, or [`ConfigError::Client`] if the
/// HTTP client cannot be created.
pub fn build_store(
    config: &BytesClientConfig,
    notifier: Notifier,
) -> Result<Arc<dyn ArtifactStore>, ConfigError> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::info!("using in-memory artifact store");
            Ok(Arc::new(InMemoryBytesClient::new(notifier)))
        }
        StoreBackend::Remote => {
            let settings = config.remote_settings()?;
            tracing::info!(api = %settings.base_url, "using bytes api artifact store");
            Ok(Arc::new(BytesApiClient::new(&settings, notifier)?))
        }
    }
}
