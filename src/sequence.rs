use crate::clock::TimeSource;
use crate::encoding::{MAX_SEQUENCE, MAX_TIMESTAMP};
use crate::error::Error;
use std::sync::Mutex;
use tracing::{debug, warn};

/// The mutable half of a generator: the last timestamp handed out and the
/// sequence number used within it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ClockState {
    pub last_timestamp: i64,
    pub sequence: u16,
}

/// SequenceClock decides the `(timestamp, sequence)` pair of every ID.
///
/// The whole read-decide-write step runs under one lock, so no two callers
/// can ever observe the same pair.
#[derive(Debug, Default)]
pub struct SequenceClock {
    state: Mutex<ClockState>,
}

impl SequenceClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock for a request made now, reading `time` under the lock.
    ///
    /// The time is read after the lock is taken, so a caller never observes a
    /// timestamp another caller has already moved past.
    pub fn next<T>(&self, time: &T) -> Result<(i64, u16), Error>
    where
        T: TimeSource + ?Sized,
    {
        let mut state = self.state.lock().map_err(|_| Error::MutexPoisoned)?;
        let now = time.current_millis();
        step(&mut state, now, time)
    }

    /// Advance the clock for a request made at `now`.
    ///
    /// - `now` behind the last timestamp: [`Error::ClockRewound`], state untouched.
    /// - `now` equal to it: the sequence is incremented; once it wraps, spin on
    ///   `time` until the next millisecond and restart the sequence there.
    /// - `now` ahead of it: move to `now` with sequence 0.
    ///
    /// A timestamp past the 41-bit range fails with [`Error::OverTimeLimit`]
    /// and is not committed. The lock is held through the spin, which lasts at
    /// most one millisecond.
    pub fn advance<T>(&self, now: i64, time: &T) -> Result<(i64, u16), Error>
    where
        T: TimeSource + ?Sized,
    {
        let mut state = self.state.lock().map_err(|_| Error::MutexPoisoned)?;
        step(&mut state, now, time)
    }

    /// A snapshot of the current state.
    pub fn state(&self) -> Result<ClockState, Error> {
        self.state
            .lock()
            .map(|state| *state)
            .map_err(|_| Error::MutexPoisoned)
    }
}

fn step<T>(state: &mut ClockState, now: i64, time: &T) -> Result<(i64, u16), Error>
where
    T: TimeSource + ?Sized,
{
    if now < state.last_timestamp {
        warn!(
            now,
            last_timestamp = state.last_timestamp,
            "clock moved backwards"
        );
        return Err(Error::ClockRewound(state.last_timestamp));
    }

    let (timestamp, sequence) = if now == state.last_timestamp {
        let sequence = (state.sequence + 1) & MAX_SEQUENCE;
        if sequence == 0 {
            debug!(
                last_timestamp = state.last_timestamp,
                "sequence exhausted, waiting for next millisecond"
            );
            (next_millis(state.last_timestamp, time), 0)
        } else {
            (now, sequence)
        }
    } else {
        (now, 0)
    };

    if timestamp > MAX_TIMESTAMP {
        return Err(Error::OverTimeLimit(timestamp));
    }

    state.last_timestamp = timestamp;
    state.sequence = sequence;
    Ok((timestamp, sequence))
}

/// Busy-wait until `time` passes `last_timestamp`, returning the new time.
fn next_millis<T>(last_timestamp: i64, time: &T) -> i64
where
    T: TimeSource + ?Sized,
{
    let mut timestamp = time.current_millis();
    while timestamp <= last_timestamp {
        std::hint::spin_loop();
        timestamp = time.current_millis();
    }
    timestamp
}
