//! Raw job output and its labels.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::job::BoefjeMeta;

/// Set of MIME-type labels attached to a raw payload.
///
/// Labels are unique and unordered; a `BTreeSet` keeps iteration stable.
pub type MimeTypes = BTreeSet<String>;

/// A single MIME-type label as it appears in queue events.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MimeType {
    /// The label, e.g. `text/plain` or `boefje/nmap`.
    pub value: String,
}

impl MimeType {
    /// Creates a label.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl From<&str> for MimeType {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Reference to stored raw data: the owning job and the payload labels.
///
/// The payload itself is not carried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawData {
    /// The boefje job that produced the payload.
    pub boefje_meta: BoefjeMeta,
    /// Labels of the payload.
    #[serde(default)]
    pub mime_types: Vec<MimeType>,
}

impl RawData {
    /// Creates a reference, wrapping every label in a [`MimeType`] record.
    #[must_use]
    pub fn new(boefje_meta: BoefjeMeta, mime_types: &MimeTypes) -> Self {
        Self {
            boefje_meta,
            mime_types: mime_types.iter().map(|m| MimeType::new(m.as_str())).collect(),
        }
    }

    /// Returns the labels as a set.
    #[must_use]
    pub fn mime_type_set(&self) -> MimeTypes {
        self.mime_types.iter().map(|m| m.value.clone()).collect()
    }
}
