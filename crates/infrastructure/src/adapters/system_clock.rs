//! System clock adapter

use boefjes_application::Clock;
use chrono::{DateTime, Utc};

/// Wall-clock time source for queue event timestamps.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
