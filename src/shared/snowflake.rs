//! Snowflake ID Generator
//!
//! Coordination-free unique ID generation for faculties and groups.

use chrono::Utc;
use parking_lot::Mutex;

use crate::domain::value_objects::{FacultyId, GroupId, Snowflake};

const SEQUENCE_MASK: u16 = 0xFFF;

#[derive(Debug, Default)]
struct GeneratorState {
    last_timestamp: u64,
    sequence: u16,
}

/// Snowflake ID generator
#[derive(Debug)]
pub struct SnowflakeGenerator {
    machine_id: u16,
    state: Mutex<GeneratorState>,
}

impl SnowflakeGenerator {
    /// Create a new snowflake generator (machine id is masked to 10 bits)
    pub fn new(machine_id: u16) -> Self {
        Self {
            machine_id: machine_id & 0x3FF,
            state: Mutex::new(GeneratorState::default()),
        }
    }

    /// Generate a new snowflake ID
    pub fn generate(&self) -> i64 {
        let mut state = self.state.lock();

        // Never go back in time, even if the wall clock does.
        let mut timestamp = current_timestamp().max(state.last_timestamp);

        if timestamp == state.last_timestamp {
            state.sequence = (state.sequence + 1) & SEQUENCE_MASK;
            if state.sequence == 0 {
                // sequence exhausted for this millisecond
                timestamp += 1;
            }
        } else {
            state.sequence = 0;
        }
        state.last_timestamp = timestamp;

        Snowflake::from_parts(timestamp, self.machine_id, state.sequence).as_i64()
    }

    pub fn next_faculty_id(&self) -> FacultyId {
        FacultyId::new(self.generate())
    }

    pub fn next_group_id(&self) -> GroupId {
        GroupId::new(self.generate())
    }
}

/// Get current timestamp in milliseconds
fn current_timestamp() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}
