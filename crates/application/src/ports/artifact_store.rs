//! Artifact store port
//!
//! The contract shared by the remote Bytes client and the in-memory double.

use async_trait::async_trait;
use boefjes_domain::{BoefjeMeta, MimeTypes, NormalizerMeta};

use crate::StoreResult;

/// Persistence of job metas and raw job output.
///
/// Implementations must emit a queue event after every successful
/// `save_normalizer_meta` and `save_raw_with_mime_types`, and never when the
/// save fails.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Obtains fresh credentials ahead of the first call.
    ///
    /// Implementations without authentication succeed immediately.
    ///
    /// # Errors
    /// Returns [`crate::StoreError::AuthExchange`] if the login exchange fails.
    async fn login(&self) -> StoreResult<()>;

    /// Stores a boefje meta keyed by its id.
    ///
    /// # Errors
    /// Returns an error if the meta cannot be stored.
    async fn save_boefje_meta(&self, boefje_meta: &BoefjeMeta) -> StoreResult<()>;

    /// Fetches a boefje meta.
    ///
    /// # Errors
    /// Returns [`crate::StoreError::NotFound`] if no meta has this id.
    async fn get_boefje_meta(&self, boefje_meta_id: &str) -> StoreResult<BoefjeMeta>;

    /// Stores a normalizer meta, then notifies
    /// `"{organization}__normalizer_meta_received"`.
    ///
    /// # Errors
    /// Returns an error if the meta cannot be stored or the event cannot be appended.
    async fn save_normalizer_meta(&self, normalizer_meta: &NormalizerMeta) -> StoreResult<()>;

    /// Fetches a normalizer meta.
    ///
    /// # Errors
    /// Returns [`crate::StoreError::NotFound`] if no meta has this id.
    async fn get_normalizer_meta(&self, normalizer_meta_id: &str) -> StoreResult<NormalizerMeta>;

    /// Stores raw job output with its labels, then notifies
    /// `"{organization}__raw_file_received"`.
    ///
    /// # Errors
    /// Returns [`crate::StoreError::MissingOwner`] if the boefje meta does not
    /// exist; no event is emitted in that case.
    async fn save_raw_with_mime_types(
        &self,
        boefje_meta_id: &str,
        raw: &[u8],
        mime_types: &MimeTypes,
    ) -> StoreResult<()>;

    /// Stores raw job output without labels.
    ///
    /// # Errors
    /// See [`ArtifactStore::save_raw_with_mime_types`].
    async fn save_raw(&self, boefje_meta_id: &str, raw: &[u8]) -> StoreResult<()> {
        self.save_raw_with_mime_types(boefje_meta_id, raw, &MimeTypes::new())
            .await
    }

    /// Fetches raw job output. Labels are not returned.
    ///
    /// # Errors
    /// Returns [`crate::StoreError::NotFound`] if no payload is stored for this id.
    async fn get_raw(&self, boefje_meta_id: &str) -> StoreResult<Vec<u8>>;
}
