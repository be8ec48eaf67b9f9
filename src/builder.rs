use crate::Snowflake;
use crate::clock::{SystemClock, TimeSource};
use crate::encoding::MAX_MACHINE_ID;
use crate::error::{BoxDynError, Error};
use crate::machine_id::MachineIdSource;
use crate::sequence::SequenceClock;
use crate::snowflake::SharedSnowflake;
use chrono::prelude::*;
use std::sync::Arc;
use tracing::info;

#[cfg(feature = "ip-fallback")]
use crate::machine_id::PrivateIpMachineId;

/// A builder for building the ['Snowflake'] generator.
///
/// [`Snowflake`]: struct.Snowflake.html
pub struct Builder<'a, T = SystemClock> {
    start_time: Option<DateTime<Utc>>,
    machine_id: Option<Box<dyn MachineIdSource + 'a>>,
    check_machine_id: Option<&'a dyn Fn(u16) -> bool>,
    time: T,
}

impl<'a> Default for Builder<'a> {
    fn default() -> Self {
        Builder::new()
    }
}

impl<'a> Builder<'a> {
    /// Construct a new builder for the build of ['Snowflake'].
    ///
    /// [`Snowflake`]: struct.Snowflake.html
    pub fn new() -> Self {
        Self {
            start_time: None,
            machine_id: None,
            check_machine_id: None,
            time: SystemClock::default(),
        }
    }

    /// Set the start time, i.e. the epoch of the timestamp section.
    /// Defaults to the Unix epoch.
    /// If the time is set later than the current time, 'finalize' will fail.
    pub fn start_time(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = Some(start_time);
        self.time = SystemClock::with_epoch(start_time);
        self
    }
}

impl<'a, T: TimeSource> Builder<'a, T> {
    /// Set the machine ID.
    /// If the provided closure returns an error, 'finalize' will fail.
    pub fn machine_id(mut self, machine_id: &'a dyn Fn() -> Result<u16, BoxDynError>) -> Self {
        self.machine_id = Some(Box::new(machine_id));
        self
    }

    /// Derive the machine ID with a custom strategy.
    /// If the source returns an error, 'finalize' will fail.
    pub fn machine_id_source<S>(mut self, source: S) -> Self
    where
        S: MachineIdSource + 'a,
    {
        self.machine_id = Some(Box::new(source));
        self
    }

    /// Set up a function to check the machine ID.
    /// If the function returns 'false', 'finalize' will fail.
    pub fn check_machine_id(mut self, check_machine_id: &'a dyn Fn(u16) -> bool) -> Self {
        self.check_machine_id = Some(check_machine_id);
        self
    }

    /// Replace the wall clock.
    /// `time` must count milliseconds since the configured start time.
    pub fn time_source<U: TimeSource>(self, time: U) -> Builder<'a, U> {
        Builder {
            start_time: self.start_time,
            machine_id: self.machine_id,
            check_machine_id: self.check_machine_id,
            time,
        }
    }

    /// Finish building and create a Snowflake instance.
    /// This method will return an error if the machine ID cannot be derived
    /// or if validation fails.
    pub fn finalize(self) -> Result<Snowflake<T>, Error> {
        let epoch = match self.start_time {
            Some(start_time) if start_time > Utc::now() => {
                return Err(Error::StartTimeAheadOfCurrentTime(start_time));
            }
            Some(start_time) => start_time,
            None => DateTime::UNIX_EPOCH,
        };

        let machine_id = match self.machine_id {
            Some(source) => source.derive()?,
            None => default_machine_id()?,
        };

        if machine_id > MAX_MACHINE_ID {
            return Err(Error::MachineIdOutOfRange(machine_id));
        }

        if let Some(check_machine_id) = self.check_machine_id
            && !check_machine_id(machine_id)
        {
            return Err(Error::CheckMachineIdFailed);
        }

        info!(machine_id, %epoch, "snowflake generator ready");

        let shared = Arc::new(SharedSnowflake {
            epoch,
            machine_id,
            clock: SequenceClock::new(),
            time: self.time,
        });
        Ok(Snowflake::new_inner(shared))
    }
}

#[cfg(feature = "ip-fallback")]
fn default_machine_id() -> Result<u16, Error> {
    PrivateIpMachineId.derive()
}

#[cfg(not(feature = "ip-fallback"))]
fn default_machine_id() -> Result<u16, Error> {
    Err(Error::MachineIdFailed(
        "Machine ID not provided and `ip-fallback` feature is disabled".into(),
    ))
}
