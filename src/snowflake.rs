use crate::builder::Builder;
use crate::clock::{SystemClock, TimeSource};
use crate::encoding::pack;
use crate::error::Error;
use crate::sequence::SequenceClock;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::trace;

/// A source of unique 64-bit IDs.
///
/// [`Snowflake`] is the implementation this crate ships; counter-backed
/// allocators can stand behind the same contract.
pub trait IdGenerator {
    fn next_id(&self) -> Result<i64, Error>;
}

/// SharedSnowflake is shared between Snowflake instances.
/// This struct is not exposed to the public.
pub(crate) struct SharedSnowflake<T> {
    pub(crate) epoch: DateTime<Utc>,
    pub(crate) machine_id: u16,
    pub(crate) clock: SequenceClock,
    pub(crate) time: T,
}

/// Snowflake is a distributed unique ID generator.
/// It is thread-safe and can be cloned to be used in multiple threads;
/// clones share one sequence clock.
pub struct Snowflake<T = SystemClock>(pub(crate) Arc<SharedSnowflake<T>>);

impl Snowflake {
    /// Create a new Snowflake with the default configuration: Unix epoch,
    /// machine ID hashed from the host's private address.
    /// For custom configuration see [`builder`].
    ///
    /// [`builder`]: struct.Snowflake.html#method.builder
    pub fn new() -> Result<Self, Error> {
        Builder::new().finalize()
    }

    /// Create a new [`Builder`] to construct a Snowflake.
    ///
    /// [`Builder`]: struct.Builder.html
    pub fn builder<'a>() -> Builder<'a> {
        Builder::new()
    }
}

impl<T: TimeSource> Snowflake<T> {
    pub(crate) fn new_inner(shared: Arc<SharedSnowflake<T>>) -> Self {
        Self(shared)
    }

    /// Generate the next unique id.
    ///
    /// Fails with [`Error::ClockRewound`] if the time source went backwards,
    /// and with [`Error::OverTimeLimit`] once the time section overflows.
    pub fn next_id(&self) -> Result<i64, Error> {
        let shared = &*self.0;
        let (timestamp, sequence) = shared.clock.next(&shared.time)?;

        let id = pack(timestamp, shared.machine_id, sequence)?;
        trace!(
            id,
            timestamp,
            machine_id = shared.machine_id,
            sequence,
            "issued id"
        );
        Ok(id)
    }

    pub fn machine_id(&self) -> u16 {
        self.0.machine_id
    }

    /// The moment timestamp zero refers to.
    pub fn epoch(&self) -> DateTime<Utc> {
        self.0.epoch
    }
}

impl<T: TimeSource> IdGenerator for Snowflake<T> {
    fn next_id(&self) -> Result<i64, Error> {
        Snowflake::next_id(self)
    }
}

/// Returns a new `Snowflake` referencing the same state as `self`.
/// This is used for concurrent use.
impl<T> Clone for Snowflake<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}
