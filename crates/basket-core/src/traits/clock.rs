use chrono::{DateTime, Utc};

/// Wall-clock source. Injected so expiry, backoff, and probe scheduling are
/// testable with a fixed clock.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
