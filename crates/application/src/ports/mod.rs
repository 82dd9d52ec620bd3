//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the client policies and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod artifact_store;
mod clock;
mod event_sink;

pub use artifact_store::ArtifactStore;
pub use clock::Clock;
pub use event_sink::{EventSink, EventSinkError};
