//! Authentication infrastructure adapters.
//!
//! This module provides the login exchange against the Bytes `/token` endpoint.

mod login_provider;

pub use login_provider::BytesLoginProvider;
