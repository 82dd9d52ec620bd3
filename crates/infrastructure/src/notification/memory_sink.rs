//! In-memory event sink.
//!
//! Queues are plain vectors keyed by queue name, created on first append.
//! Clones share the same queues, so a consumer can hold one handle while
//! the store holds another.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use boefjes_application::{EventSink, EventSinkError};
use boefjes_domain::QueueEvent;
use tokio::sync::RwLock;

/// Thread-safe in-memory queue registry.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventSink {
    queues: Arc<RwLock<HashMap<String, Vec<QueueEvent>>>>,
}

impl InMemoryEventSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events currently on `queue`, oldest first.
    pub async fn events(&self, queue: &str) -> Vec<QueueEvent> {
        let queues = self.queues.read().await;
        queues.get(queue).cloned().unwrap_or_default()
    }

    /// Removes and returns every event on `queue`, oldest first.
    ///
    /// The queue itself stays registered.
    pub async fn drain(&self, queue: &str) -> Vec<QueueEvent> {
        let mut queues = self.queues.write().await;
        queues.get_mut(queue).map(std::mem::take).unwrap_or_default()
    }

    /// Returns true if anything was ever appended to `queue`.
    pub async fn contains_queue(&self, queue: &str) -> bool {
        self.queues.read().await.contains_key(queue)
    }

    /// Names of all queues, sorted.
    pub async fn queue_names(&self) -> Vec<String> {
        let queues = self.queues.read().await;
        let mut names: Vec<String> = queues.keys().cloned().collect();
        names.sort();
        names
    }

    /// Total number of events across all queues.
    pub async fn total_events(&self) -> usize {
        self.queues.read().await.values().map(Vec::len).sum()
    }
}

#[async_trait]
impl EventSink for InMemoryEventSink {
    async fn append(&self, queue: &str, event: QueueEvent) -> Result<(), EventSinkError> {
        let mut queues = self.queues.write().await;
        queues.entry(queue.to_string()).or_default().push(event);
        Ok(())
    }
}
