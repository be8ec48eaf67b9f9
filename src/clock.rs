use chrono::{DateTime, Utc};

/// A source of the current time in milliseconds since some epoch.
///
/// The generator reads it once per ID and keeps polling it while waiting out
/// an exhausted millisecond, so implementations must be cheap and must
/// eventually advance. Fake implementations make exhaustion and rewind
/// deterministic in tests.
pub trait TimeSource: Send + Sync {
    /// Returns the current time in milliseconds since the source's epoch.
    fn current_millis(&self) -> i64;
}

/// Wall-clock time source backed by [`chrono::Utc::now`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: DateTime<Utc>,
    epoch_millis: i64,
}

impl SystemClock {
    /// A clock counting milliseconds since `epoch`.
    pub fn with_epoch(epoch: DateTime<Utc>) -> Self {
        Self {
            epoch,
            epoch_millis: epoch.timestamp_millis(),
        }
    }

    pub fn epoch(&self) -> DateTime<Utc> {
        self.epoch
    }
}

impl Default for SystemClock {
    /// Milliseconds since the Unix epoch.
    fn default() -> Self {
        Self::with_epoch(DateTime::UNIX_EPOCH)
    }
}

impl TimeSource for SystemClock {
    fn current_millis(&self) -> i64 {
        Utc::now().timestamp_millis() - self.epoch_millis
    }
}

impl<T: TimeSource + ?Sized> TimeSource for std::sync::Arc<T> {
    fn current_millis(&self) -> i64 {
        (**self).current_millis()
    }
}
