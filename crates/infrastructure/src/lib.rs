//! Boefjes Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer: the reqwest-backed Bytes API client,
//! the in-memory test double, the in-memory event sink and configuration.

pub mod adapters;
pub mod auth;
pub mod config;
pub mod notification;
pub mod serialization;
pub mod store;

pub use adapters::{BytesApiSession, SystemClock};
pub use auth::BytesLoginProvider;
pub use self::config::{BytesClientConfig, ConfigError, RemoteSettings, StoreBackend};
pub use notification::InMemoryEventSink;
pub use serialization::{SerializationError, from_json_bytes, to_json_bytes, to_json_stable};
pub use store::{BytesApiClient, InMemoryBytesClient, build_store};
