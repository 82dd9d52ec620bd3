//! Infrastructure adapters

mod bytes_session;
mod system_clock;

pub use bytes_session::{BytesApiSession, CLIENT_VERSION, DEFAULT_TIMEOUT, endpoint_url};
pub use system_clock::SystemClock;
