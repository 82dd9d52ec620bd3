//! Event sink port
//!
//! Defines where queue events go once an artifact has been stored.

use async_trait::async_trait;
use boefjes_domain::QueueEvent;

/// Errors that can occur while appending an event.
#[derive(Debug, thiserror::Error)]
pub enum EventSinkError {
    /// The sink is no longer accepting events.
    #[error("event sink closed")]
    Closed,
}

/// Append-only notification sink keyed by queue name.
///
/// Producers append; consumers drain at their own pace. There is no
/// acknowledgement protocol at this layer.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Appends an event to the named queue, creating the queue if needed.
    ///
    /// # Arguments
    /// * `queue` - Queue name, `"{organization}__{kind}"`
    /// * `event` - The event to append
    ///
    /// # Errors
    /// Returns an error if the sink cannot accept the event.
    async fn append(&self, queue: &str, event: QueueEvent) -> Result<(), EventSinkError>;
}
