//! Boefjes Domain - Core scan-pipeline types
//!
//! This crate defines the records the Bytes client persists and the events
//! it emits. All types here are pure Rust with no I/O dependencies.

pub mod auth;
pub mod events;
pub mod job;
pub mod raw;

pub use auth::{BearerToken, Credentials};
pub use events::{
    EventKind, NormalizerMetaReceivedEvent, QueueEvent, RawDataReceivedEvent, queue_name,
};
pub use job::{Boefje, BoefjeMeta, Normalizer, NormalizerMeta};
pub use raw::{MimeType, MimeTypes, RawData};
