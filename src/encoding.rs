use crate::error::Error;
use chrono::{DateTime, Duration, Utc};

/// bit length of time
pub const BIT_LEN_TIME: u32 = 41;
/// bit length of machine id
pub const BIT_LEN_MACHINE_ID: u32 = 10;
/// bit length of sequence number
pub const BIT_LEN_SEQUENCE: u32 = 63 - BIT_LEN_TIME - BIT_LEN_MACHINE_ID;

/// largest timestamp that fits in the time section
pub const MAX_TIMESTAMP: i64 = (1 << BIT_LEN_TIME) - 1;
/// largest machine id
pub const MAX_MACHINE_ID: u16 = (1 << BIT_LEN_MACHINE_ID) - 1;
/// mask for sequence number
pub const MAX_SEQUENCE: u16 = (1 << BIT_LEN_SEQUENCE) - 1;

const TIME_SHIFT: u32 = BIT_LEN_MACHINE_ID + BIT_LEN_SEQUENCE;
const MACHINE_ID_SHIFT: u32 = BIT_LEN_SEQUENCE;

/// Pack the three sections into one ID.
///
/// Layout, most significant bit first:
///
/// ```text
/// [1 bit: 0][41 bits: timestamp ms][10 bits: machine id][12 bits: sequence]
/// ```
///
/// Out-of-range inputs are rejected rather than truncated, so an ID can never
/// silently alias another section's bits.
///
/// ```
/// let id = ipflake::pack(100, 42, 7).unwrap();
/// assert_eq!(id, (100 << 22) | (42 << 12) | 7);
/// ```
pub fn pack(timestamp: i64, machine_id: u16, sequence: u16) -> Result<i64, Error> {
    if !(0..=MAX_TIMESTAMP).contains(&timestamp) {
        return Err(Error::OverTimeLimit(timestamp));
    }
    if machine_id > MAX_MACHINE_ID {
        return Err(Error::MachineIdOutOfRange(machine_id));
    }
    if sequence > MAX_SEQUENCE {
        return Err(Error::SequenceOutOfRange(sequence));
    }

    Ok(timestamp << TIME_SHIFT | i64::from(machine_id) << MACHINE_ID_SHIFT | i64::from(sequence))
}

/// DecomposedId is the parts of an ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecomposedId {
    pub id: i64,
    pub msb: u8,
    pub time: i64,
    pub machine_id: u16,
    pub sequence: u16,
}

impl DecomposedId {
    /// Break an ID up into its parts.
    pub fn decompose(id: i64) -> Self {
        let raw = id as u64;
        Self {
            id,
            msb: (raw >> 63) as u8,
            time: ((raw >> TIME_SHIFT) & MAX_TIMESTAMP as u64) as i64,
            machine_id: ((raw >> MACHINE_ID_SHIFT) & u64::from(MAX_MACHINE_ID)) as u16,
            sequence: (raw & u64::from(MAX_SEQUENCE)) as u16,
        }
    }

    /// Returns the moment the ID was issued, given the epoch its generator used.
    pub fn datetime(&self, epoch: DateTime<Utc>) -> DateTime<Utc> {
        epoch + Duration::milliseconds(self.time)
    }
}

/// Break an ID up into its parts.
pub fn decompose(id: i64) -> DecomposedId {
    DecomposedId::decompose(id)
}
