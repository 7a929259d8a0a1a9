//! Snowflake identifiers.
//!
//! Every identifier in the registry is a 64-bit integer with the creation
//! time embedded in its upper bits, so ids sort by creation time and can be
//! minted without coordination.
//!
//! ## Structure
//!
//! ```text
//! 63                          22           12           0
//! +----------------------------+------------+------------+
//! |         timestamp          |  machine   |  sequence  |
//! |          (41 bits)         |  (10 bits) |  (12 bits) |
//! +----------------------------+------------+------------+
//! ```

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Registry epoch: 2020-01-01T00:00:00Z in milliseconds
pub const REGISTRY_EPOCH: u64 = 1_577_836_800_000;

pub(crate) const TIMESTAMP_SHIFT: u64 = 22;
pub(crate) const MACHINE_SHIFT: u64 = 12;
pub(crate) const MACHINE_MASK: u64 = 0x3FF;
pub(crate) const SEQUENCE_MASK: u64 = 0xFFF;

/// A raw Snowflake value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snowflake(pub i64);

impl Snowflake {
    /// Create a new Snowflake from raw value.
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Create a Snowflake from its components.
    pub fn from_parts(timestamp_ms: u64, machine_id: u16, sequence: u16) -> Self {
        let ts = timestamp_ms.saturating_sub(REGISTRY_EPOCH) << TIMESTAMP_SHIFT;
        let machine = (u64::from(machine_id) & MACHINE_MASK) << MACHINE_SHIFT;
        let seq = u64::from(sequence) & SEQUENCE_MASK;

        Self((ts | machine | seq) as i64)
    }

    /// Unix timestamp (ms) encoded in this Snowflake.
    pub fn timestamp(&self) -> u64 {
        ((self.0 as u64) >> TIMESTAMP_SHIFT) + REGISTRY_EPOCH
    }

    /// Get the timestamp as a DateTime.
    pub fn created_at(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.timestamp() as i64)
            .single()
            .unwrap_or_else(Utc::now)
    }

    pub fn machine_id(&self) -> u16 {
        ((self.0 as u64 >> MACHINE_SHIFT) & MACHINE_MASK) as u16
    }

    pub fn sequence(&self) -> u16 {
        (self.0 as u64 & SEQUENCE_MASK) as u16
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Snowflake {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_snowflake_components() {
        let timestamp = 1_700_000_000_000_u64;
        let sf = Snowflake::from_parts(timestamp, 513, 100);

        assert_eq!(sf.timestamp(), timestamp);
        assert_eq!(sf.machine_id(), 513);
        assert_eq!(sf.sequence(), 100);
        assert_eq!(sf.created_at().year(), 2023);
    }

    #[test]
    fn test_machine_id_is_masked() {
        let sf = Snowflake::from_parts(REGISTRY_EPOCH + 1, 0xFFFF, 0);
        assert_eq!(sf.machine_id(), 0x3FF);
    }
}
