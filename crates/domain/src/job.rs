//! Job metadata records.
//!
//! A [`BoefjeMeta`] describes one run of a scanner ("boefje") against an
//! input object; a [`NormalizerMeta`] describes the normalizer run that
//! parsed the raw output of such a job. Both are stored in Bytes keyed by
//! their `id` and never updated afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reference to the boefje (scanner plugin) that ran a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boefje {
    /// Plugin identifier.
    pub id: String,
    /// Plugin version, if pinned.
    #[serde(default)]
    pub version: Option<String>,
}

impl Boefje {
    /// Creates an unversioned boefje reference.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: None,
        }
    }
}

/// Reference to the normalizer plugin that processed raw data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Normalizer {
    /// Plugin identifier.
    pub id: String,
    /// Plugin version, if pinned.
    #[serde(default)]
    pub version: Option<String>,
}

impl Normalizer {
    /// Creates an unversioned normalizer reference.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: None,
        }
    }
}

/// Metadata of a single boefje job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoefjeMeta {
    /// Unique job id. Raw output of the job is keyed by this id.
    pub id: String,
    /// The boefje that ran.
    pub boefje: Boefje,
    /// Primary key of the object the boefje was run against.
    #[serde(default)]
    pub input_ooi: Option<String>,
    /// Arguments passed to the boefje.
    #[serde(default)]
    pub arguments: BTreeMap<String, serde_json::Value>,
    /// Organization the job belongs to. Queue names are scoped by it.
    pub organization: String,
    /// Hash of the runnable that executed the job.
    #[serde(default)]
    pub runnable_hash: Option<String>,
    /// Environment settings the job ran with.
    #[serde(default)]
    pub environment: Option<BTreeMap<String, String>>,
    /// Job start time.
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    /// Job end time.
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
}

impl BoefjeMeta {
    /// Creates a meta with only the required fields set.
    #[must_use]
    pub fn new(id: impl Into<String>, boefje: Boefje, organization: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            boefje,
            input_ooi: None,
            arguments: BTreeMap::new(),
            organization: organization.into(),
            runnable_hash: None,
            environment: None,
            started_at: None,
            ended_at: None,
        }
    }

    /// Sets the input object reference.
    #[must_use]
    pub fn with_input_ooi(mut self, input_ooi: impl Into<String>) -> Self {
        self.input_ooi = Some(input_ooi.into());
        self
    }

    /// Adds a boefje argument.
    #[must_use]
    pub fn with_argument(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.arguments.insert(key.into(), value);
        self
    }
}

/// Metadata of a single normalizer job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizerMeta {
    /// Unique job id.
    pub id: String,
    /// The normalizer that ran.
    pub normalizer: Normalizer,
    /// The boefje job whose raw output was normalized.
    pub boefje_meta: BoefjeMeta,
    /// Job start time.
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    /// Job end time.
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
}

impl NormalizerMeta {
    /// Creates a meta for a normalizer run over the given boefje job.
    #[must_use]
    pub fn new(id: impl Into<String>, normalizer: Normalizer, boefje_meta: BoefjeMeta) -> Self {
        Self {
            id: id.into(),
            normalizer,
            boefje_meta,
            started_at: None,
            ended_at: None,
        }
    }

    /// Organization of the underlying boefje job.
    #[must_use]
    pub fn organization(&self) -> &str {
        &self.boefje_meta.organization
    }
}
