//! Queue notifications for stored artifacts.
//!
//! Both store implementations publish through [`Notifier`] so the events
//! they produce have the same shape and land on the same queues.

use std::sync::Arc;

use boefjes_domain::{BoefjeMeta, MimeTypes, NormalizerMeta, QueueEvent};

use crate::StoreResult;
use crate::ports::{Clock, EventSink};

/// Builds queue events and appends them to the injected sink.
#[derive(Clone)]
pub struct Notifier {
    sink: Arc<dyn EventSink>,
    clock: Arc<dyn Clock>,
}

impl Notifier {
    /// Creates a notifier stamping events with `clock`.
    #[must_use]
    pub fn new(sink: Arc<dyn EventSink>, clock: Arc<dyn Clock>) -> Self {
        Self { sink, clock }
    }

    /// Announces a stored normalizer meta on
    /// `"{organization}__normalizer_meta_received"`.
    ///
    /// # Errors
    /// Returns [`crate::StoreError::Notification`] if the sink rejects the event.
    pub async fn normalizer_meta_received(&self, normalizer_meta: &NormalizerMeta) -> StoreResult<()> {
        let event = QueueEvent::normalizer_meta_received(self.clock.now(), normalizer_meta.clone());
        self.publish(event).await
    }

    /// Announces stored raw data owned by `boefje_meta` on
    /// `"{organization}__raw_file_received"`.
    ///
    /// # Errors
    /// Returns [`crate::StoreError::Notification`] if the sink rejects the event.
    pub async fn raw_data_received(
        &self,
        boefje_meta: BoefjeMeta,
        mime_types: &MimeTypes,
    ) -> StoreResult<()> {
        let event = QueueEvent::raw_data_received(self.clock.now(), boefje_meta, mime_types);
        self.publish(event).await
    }

    async fn publish(&self, event: QueueEvent) -> StoreResult<()> {
        let queue = event.queue_name();
        tracing::debug!(queue = %queue, "appending queue event");
        self.sink.append(&queue, event).await?;
        Ok(())
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier").finish_non_exhaustive()
    }
}
