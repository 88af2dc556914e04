//! Frame log entries
//!
//! One entry per frame seen or sent by the monitor. Serializable so the
//! monitor can emit JSON lines.

use super::format_hex;
use crate::codec::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a frame relative to this host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,  // Device -> Host
    Out, // Host -> Device
}

/// Record of one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameEntry {
    pub timestamp: String, // HH:MM:SS.mmm
    pub direction: Direction,
    pub address: Address,
    /// Payload as space-separated hex pairs
    pub payload: String,
    pub size: usize,
}

impl FrameEntry {
    /// Current timestamp as HH:MM:SS.mmm
    #[inline]
    fn now() -> String {
        chrono::Local::now().format("%H:%M:%S%.3f").to_string()
    }

    /// Create an entry stamped with the current local time
    pub fn new(direction: Direction, address: Address, payload: &[u8]) -> Self {
        Self {
            timestamp: Self::now(),
            direction,
            address,
            payload: format_hex(payload, " "),
            size: payload.len(),
        }
    }
}

impl fmt::Display for FrameEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = match self.direction {
            Direction::In => "<-",
            Direction::Out => "->",
        };
        write!(
            f,
            "[{}] {} addr={} len={} {}",
            self.timestamp, arrow, self.address, self.size, self.payload
        )
    }
}
