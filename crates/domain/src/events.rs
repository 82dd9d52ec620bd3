//! Queue events emitted after artifacts are stored.
//!
//! Events are appended to organization-scoped queues named
//! `"{organization}__{kind}"` (see [`queue_name`]) and consumed by the
//! scheduler at its own pace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::job::{BoefjeMeta, NormalizerMeta};
use crate::raw::{MimeTypes, RawData};

/// Kind of a queue event. Each kind has its own queue per organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A normalizer meta was stored.
    NormalizerMetaReceived,
    /// A raw payload was stored.
    RawDataReceived,
}

impl EventKind {
    /// Queue name suffix for this kind.
    #[must_use]
    pub const fn queue_suffix(self) -> &'static str {
        match self {
            Self::NormalizerMetaReceived => "normalizer_meta_received",
            Self::RawDataReceived => "raw_file_received",
        }
    }
}

/// Builds the name of the queue for `organization` and `kind`.
#[must_use]
pub fn queue_name(organization: &str, kind: EventKind) -> String {
    format!("{organization}__{}", kind.queue_suffix())
}

/// Payload of [`QueueEvent::NormalizerMetaReceived`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizerMetaReceivedEvent {
    /// When the event was created.
    pub created_at: DateTime<Utc>,
    /// Organization the stored meta belongs to.
    pub organization: String,
    /// The stored meta.
    pub normalizer_meta: NormalizerMeta,
}

/// Payload of [`QueueEvent::RawDataReceived`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDataReceivedEvent {
    /// When the event was created.
    pub created_at: DateTime<Utc>,
    /// Organization of the owning boefje job.
    pub organization: String,
    /// Reference to the stored payload.
    pub raw_data: RawData,
}

/// An event appended to a notification queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum QueueEvent {
    /// A normalizer meta was stored.
    NormalizerMetaReceived(NormalizerMetaReceivedEvent),
    /// A raw payload was stored.
    RawDataReceived(RawDataReceivedEvent),
}

impl QueueEvent {
    /// Creates the event for a stored normalizer meta.
    #[must_use]
    pub fn normalizer_meta_received(created_at: DateTime<Utc>, normalizer_meta: NormalizerMeta) -> Self {
        Self::NormalizerMetaReceived(NormalizerMetaReceivedEvent {
            created_at,
            organization: normalizer_meta.organization().to_string(),
            normalizer_meta,
        })
    }

    /// Creates the event for a stored raw payload owned by `boefje_meta`.
    #[must_use]
    pub fn raw_data_received(
        created_at: DateTime<Utc>,
        boefje_meta: BoefjeMeta,
        mime_types: &MimeTypes,
    ) -> Self {
        Self::RawDataReceived(RawDataReceivedEvent {
            created_at,
            organization: boefje_meta.organization.clone(),
            raw_data: RawData::new(boefje_meta, mime_types),
        })
    }

    /// Kind of this event.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::NormalizerMetaReceived(_) => EventKind::NormalizerMetaReceived,
            Self::RawDataReceived(_) => EventKind::RawDataReceived,
        }
    }

    /// Organization the event is scoped to.
    #[must_use]
    pub fn organization(&self) -> &str {
        match self {
            Self::NormalizerMetaReceived(event) => &event.organization,
            Self::RawDataReceived(event) => &event.organization,
        }
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        match self {
            Self::NormalizerMetaReceived(event) => event.created_at,
            Self::RawDataReceived(event) => event.created_at,
        }
    }

    /// Name of the queue this event belongs on.
    #[must_use]
    pub fn queue_name(&self) -> String {
        queue_name(self.organization(), self.kind())
    }
}
