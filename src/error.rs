// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use chrono::{DateTime, Utc};
use std::error::Error as StdError;
use thiserror::Error;

/// Convenience type alias for errors returned by user-supplied machine ID sources.
pub type BoxDynError = Box<dyn StdError + 'static + Send + Sync>;

/// The error type for this crate.
#[derive(Error, Debug)]
pub enum Error {
    /// The clock reported a time behind the last issued timestamp.
    /// Carries the last timestamp; retrying is safe once the clock passes it.
    #[error("clock moved backwards, rejecting requests until {0}")]
    ClockRewound(i64),
    #[error("could not find any private address to derive a machine id from")]
    MachineIdUnavailable,
    #[error("machine_id returned an error: {0}")]
    MachineIdFailed(#[source] BoxDynError),
    #[error("machine id {0} does not fit in 10 bits")]
    MachineIdOutOfRange(u16),
    #[error("check_machine_id returned false")]
    CheckMachineIdFailed,
    #[error("start_time `{0}` is ahead of current time")]
    StartTimeAheadOfCurrentTime(DateTime<Utc>),
    #[error("timestamp {0} does not fit in 41 bits")]
    OverTimeLimit(i64),
    #[error("sequence {0} does not fit in 12 bits")]
    SequenceOutOfRange(u16),
    #[error("mutex is poisoned (i.e. a panic happened while it was locked)")]
    MutexPoisoned,
}
