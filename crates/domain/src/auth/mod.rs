//! Authentication domain types

mod types;

pub use types::{BearerToken, Credentials};
