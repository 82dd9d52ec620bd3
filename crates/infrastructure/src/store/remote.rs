//! Bytes API client.
//!
//! Implements [`ArtifactStore`] over HTTP. Every call goes through the
//! session's re-authentication policy; queue events are emitted only after
//! the server accepted the write.

use async_trait::async_trait;
use boefjes_application::{
    ArtifactKind, ArtifactStore, Notifier, StoreError, StoreResult, TokenProvider,
};
use boefjes_domain::{BoefjeMeta, MimeTypes, NormalizerMeta};
use reqwest::Response;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::adapters::BytesApiSession;
use crate::auth::BytesLoginProvider;
use crate::config::RemoteSettings;
use crate::serialization::{from_json_bytes, to_json_bytes};

/// Remote artifact store backed by the Bytes API.
#[derive(Debug)]
pub struct BytesApiClient {
    session: BytesApiSession,
    notifier: Notifier,
}

impl BytesApiClient {
    /// Creates a client logging in with the configured credentials.
    ///
    /// No request is sent until the first operation; the first 401 triggers
    /// the login exchange.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(settings: &RemoteSettings, notifier: Notifier) -> StoreResult<Self> {
        let client = BytesApiSession::build_client(settings.timeout)?;
        let provider: Arc<dyn TokenProvider> = Arc::new(BytesLoginProvider::new(
            client.clone(),
            &settings.base_url,
            settings.credentials.clone(),
        )?);
        let session = BytesApiSession::new(client, settings.base_url.clone(), provider);
        Ok(Self { session, notifier })
    }

    async fn read_body(response: Response) -> StoreResult<Vec<u8>> {
        let bytes = response
            .bytes()
            .await
            .map_err(BytesApiSession::map_error)?;
        Ok(bytes.to_vec())
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> StoreResult<T> {
        let body = Self::read_body(response).await?;
        from_json_bytes(&body).map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn post_json<T: serde::Serialize + Sync>(&self, resource: &str, value: &T) -> StoreResult<()> {
        let body = to_json_bytes(value).map_err(|e| StoreError::Encode(e.to_string()))?;
        self.session
            .post(
                &["bytes", resource],
                &[],
                body,
                mime::APPLICATION_JSON.as_ref(),
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ArtifactStore for BytesApiClient {
    #[tracing::instrument(skip(self))]
    async fn login(&self) -> StoreResult<()> {
        self.session.login().await
    }

    #[tracing::instrument(skip_all, fields(boefje_meta_id = %boefje_meta.id))]
    async fn save_boefje_meta(&self, boefje_meta: &BoefjeMeta) -> StoreResult<()> {
        self.post_json("boefje_meta", boefje_meta).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_boefje_meta(&self, boefje_meta_id: &str) -> StoreResult<BoefjeMeta> {
        let response = self
            .session
            .get(&["bytes", "boefje_meta", boefje_meta_id])
            .await
            .map_err(|e| e.or_not_found(ArtifactKind::BoefjeMeta, boefje_meta_id))?;
        Self::read_json(response).await
    }

    #[tracing::instrument(skip_all, fields(normalizer_meta_id = %normalizer_meta.id))]
    async fn save_normalizer_meta(&self, normalizer_meta: &NormalizerMeta) -> StoreResult<()> {
        self.post_json("normalizer_meta", normalizer_meta).await?;
        self.notifier.normalizer_meta_received(normalizer_meta).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_normalizer_meta(&self, normalizer_meta_id: &str) -> StoreResult<NormalizerMeta> {
        let response = self
            .session
            .get(&["bytes", "normalizer_meta", normalizer_meta_id])
            .await
            .map_err(|e| e.or_not_found(ArtifactKind::NormalizerMeta, normalizer_meta_id))?;
        Self::read_json(response).await
    }

    #[tracing::instrument(skip(self, raw), fields(size = raw.len()))]
    async fn save_raw_with_mime_types(
        &self,
        boefje_meta_id: &str,
        raw: &[u8],
        mime_types: &MimeTypes,
    ) -> StoreResult<()> {
        let missing_owner = |error: StoreError| match error {
            StoreError::NotFound { .. } => StoreError::MissingOwner {
                boefje_meta_id: boefje_meta_id.to_string(),
            },
            other => other,
        };

        let query: Vec<(&str, &str)> = mime_types
            .iter()
            .map(|mime_type| ("mime_types", mime_type.as_str()))
            .collect();
        self.session
            .post(
                &["bytes", "raw", boefje_meta_id],
                &query,
                raw.to_vec(),
                mime::APPLICATION_OCTET_STREAM.as_ref(),
            )
            .await
            .map_err(|e| missing_owner(e.or_not_found(ArtifactKind::BoefjeMeta, boefje_meta_id)))?;

        let owner = self
            .get_boefje_meta(boefje_meta_id)
            .await
            .map_err(missing_owner)?;
        self.notifier.raw_data_received(owner, mime_types).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_raw(&self, boefje_meta_id: &str) -> StoreResult<Vec<u8>> {
        let response = self
            .session
            .get(&["bytes", "raw", boefje_meta_id])
            .await
            .map_err(|e| e.or_not_found(ArtifactKind::Raw, boefje_meta_id))?;
        Self::read_body(response).await
    }
}
