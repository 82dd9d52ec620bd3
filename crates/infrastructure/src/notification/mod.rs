//! Notification sinks.

mod memory_sink;

pub use memory_sink::InMemoryEventSink;
