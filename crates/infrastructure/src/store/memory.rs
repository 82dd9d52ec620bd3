//! In-memory artifact store.

use std::collections::HashMap;

use async_trait::async_trait;
use boefjes_application::{ArtifactKind, ArtifactStore, Notifier, StoreError, StoreResult};
use boefjes_domain::{BoefjeMeta, MimeTypes, NormalizerMeta};
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct StoredRaw {
    data: Vec<u8>,
    mime_types: MimeTypes,
}

/// Artifact store keeping everything in process memory.
///
/// Behaves like the remote store minus the network: saves overwrite, reads
/// of unknown ids fail with [`StoreError::NotFound`], and the same queue
/// events are emitted. Raw data is only accepted for a known boefje meta.
#[derive(Debug)]
pub struct InMemoryBytesClient {
    boefje_metas: RwLock<HashMap<String, BoefjeMeta>>,
    normalizer_metas: RwLock<HashMap<String, NormalizerMeta>>,
    raws: RwLock<HashMap<String, StoredRaw>>,
    notifier: Notifier,
}

impl InMemoryBytesClient {
    /// Creates an empty store publishing through `notifier`.
    #[must_use]
    pub fn new(notifier: Notifier) -> Self {
        Self {
            boefje_metas: RwLock::new(HashMap::new()),
            normalizer_metas: RwLock::new(HashMap::new()),
            raws: RwLock::new(HashMap::new()),
            notifier,
        }
    }

    /// Mime types recorded with the raw payload of `boefje_meta_id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no raw payload was saved.
    pub async fn raw_mime_types(&self, boefje_meta_id: &str) -> StoreResult<MimeTypes> {
        self.raws
            .read()
            .await
            .get(boefje_meta_id)
            .map(|raw| raw.mime_types.clone())
            .ok_or_else(|| not_found(ArtifactKind::Raw, boefje_meta_id))
    }
}

fn not_found(kind: ArtifactKind, id: &str) -> StoreError {
    StoreError::NotFound {
        kind,
        id: id.to_string(),
    }
}

#[async_trait]
impl ArtifactStore for InMemoryBytesClient {
    async fn login(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn save_boefje_meta(&self, boefje_meta: &BoefjeMeta) -> StoreResult<()> {
        self.boefje_metas
            .write()
            .await
            .insert(boefje_meta.id.clone(), boefje_meta.clone());
        Ok(())
    }

    async fn get_boefje_meta(&self, boefje_meta_id: &str) -> StoreResult<BoefjeMeta> {
        self.boefje_metas
            .read()
            .await
            .get(boefje_meta_id)
            .cloned()
            .ok_or_else(|| not_found(ArtifactKind::BoefjeMeta, boefje_meta_id))
    }

    async fn save_normalizer_meta(&self, normalizer_meta: &NormalizerMeta) -> StoreResult<()> {
        self.normalizer_metas
            .write()
            .await
            .insert(normalizer_meta.id.clone(), normalizer_meta.clone());
        self.notifier.normalizer_meta_received(normalizer_meta).await
    }

    async fn get_normalizer_meta(&self, normalizer_meta_id: &str) -> StoreResult<NormalizerMeta> {
        self.normalizer_metas
            .read()
            .await
            .get(normalizer_meta_id)
            .cloned()
            .ok_or_else(|| not_found(ArtifactKind::NormalizerMeta, normalizer_meta_id))
    }

    async fn save_raw_with_mime_types(
        &self,
        boefje_meta_id: &str,
        raw: &[u8],
        mime_types: &MimeTypes,
    ) -> StoreResult<()> {
        let owner = self
            .get_boefje_meta(boefje_meta_id)
            .await
            .map_err(|_| StoreError::MissingOwner {
                boefje_meta_id: boefje_meta_id.to_string(),
            })?;

        self.raws.write().await.insert(
            boefje_meta_id.to_string(),
            StoredRaw {
                data: raw.to_vec(),
                mime_types: mime_types.clone(),
            },
        );
        tracing::debug!(boefje_meta_id, size = raw.len(), "stored raw data in memory");

        self.notifier.raw_data_received(owner, mime_types).await
    }

    async fn get_raw(&self, boefje_meta_id: &str) -> StoreResult<Vec<u8>> {
        self.raws
            .read()
            .await
            .get(boefje_meta_id)
            .map(|raw| raw.data.clone())
            .ok_or_else(|| not_found(ArtifactKind::Raw, boefje_meta_id))
    }
}
