//! JSON serialization for request bodies and human-readable output.
//!
//! Request bodies are compact; output meant for people is stable:
//! - Sorting object keys alphabetically (via `BTreeMap` in domain types)
//! - Using 2-space indentation
//! - Adding trailing newline

mod json;

pub use json::*;
