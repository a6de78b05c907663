//! Structured result of executing one protocol command.

use serde::{Deserialize, Serialize};

/// Outcome of executing one command line.
///
/// Command failures are represented in-band (`is_successful: false`,
/// `value: 0`); executing a command never aborts the process. A hardware
/// fault is not distinguishable from a bad operand here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutcome {
    /// Command id parsed from the request, correlating request to response.
    pub command_id: i32,
    pub is_successful: bool,
    /// Sensor reading for read commands, 0 for write-only commands.
    pub value: i32,
}

impl CommandOutcome {
    pub fn success(command_id: i32, value: i32) -> Self {
        Self {
            command_id,
            is_successful: true,
            value,
        }
    }

    pub fn failure(command_id: i32) -> Self {
        Self {
            command_id,
            is_successful: false,
            value: 0,
        }
    }
}
