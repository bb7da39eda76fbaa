//! Debug link frames
//!
//! The firmware reports each measurement over a 9600 baud software UART. Two
//! frame layouts are in use:
//!
//! ```text
//! DebugFrame (3 bytes)            SmoothedFrame (2 bytes)
//! ┌──────────┬──────────┬──────┐  ┌──────────┬──────────┐
//! │ raw >> 8 │ raw & ff │ code │  │ dist >> 8│ dist & ff│
//! └──────────┴──────────┴──────┘  └──────────┴──────────┘
//! ```
//!
//! `code` is the interpreter's return value: the matching rank, or 255
//! ([`NO_CHANNEL`](crate::NO_CHANNEL)) when a new channel was created. The
//! transmitter itself is out of scope; these types only produce and parse the
//! bytes.

use crate::{
    errors::{FrameError, FrameResult},
    interpreter::InputOutcome,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Raw sample plus interpreter code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DebugFrame {
    /// Raw echo ticks (low 16 bits)
    pub raw: u16,
    /// Interpreter return code
    pub code: u8,
}

impl DebugFrame {
    /// Encoded size in bytes
    pub const LEN: usize = 3;

    /// Frame for a raw tick count and the interpreter's verdict
    pub fn new(raw: u32, outcome: InputOutcome) -> Self {
        Self {
            raw: raw as u16,
            code: outcome.code(),
        }
    }

    /// What the interpreter did with this sample
    pub fn outcome(&self) -> InputOutcome {
        InputOutcome::from_code(self.code)
    }

    /// Wire bytes, raw sample big-endian first
    pub fn encode(&self) -> [u8; Self::LEN] {
        let [high, low] = self.raw.to_be_bytes();
        [high, low, self.code]
    }

    /// Parse the first frame in `bytes`
    pub fn decode(bytes: &[u8]) -> FrameResult<Self> {
        match bytes {
            [high, low, code, ..] => Ok(Self {
                raw: u16::from_be_bytes([*high, *low]),
                code: *code,
            }),
            _ => Err(FrameError::Truncated {
                needed: Self::LEN,
                available: bytes.len(),
            }),
        }
    }
}

/// Smoothed distance only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SmoothedFrame {
    /// Smoothed echo ticks (low 16 bits)
    pub distance: u16,
}

impl SmoothedFrame {
    /// Encoded size in bytes
    pub const LEN: usize = 2;

    /// Frame for a smoothed tick count
    pub fn new(distance: u32) -> Self {
        Self {
            distance: distance as u16,
        }
    }

    /// Wire bytes, big-endian
    pub fn encode(&self) -> [u8; Self::LEN] {
        self.distance.to_be_bytes()
    }

    /// Parse the first frame in `bytes`
    pub fn decode(bytes: &[u8]) -> FrameResult<Self> {
        match bytes {
            [high, low, ..] => Ok(Self {
                distance: u16::from_be_bytes([*high, *low]),
            }),
            _ => Err(FrameError::Truncated {
                needed: Self::LEN,
                available: bytes.len(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_frame_layout() {
        let frame = DebugFrame::new(0x0A3C, InputOutcome::Matched(1));
        assert_eq!(frame.encode(), [0x0A, 0x3C, 0x01]);

        let created = DebugFrame::new(0x0012, InputOutcome::Created);
        assert_eq!(created.encode(), [0x00, 0x12, 0xFF]);
    }

    #[test]
    fn debug_frame_decodes_outcome() {
        let frame = DebugFrame::decode(&[0x01, 0x00, 0xFF, 0x99]).unwrap();
        assert_eq!(frame.raw, 0x0100);
        assert_eq!(frame.outcome(), InputOutcome::Created);
    }

    #[test]
    fn truncated_frames() {
        assert_eq!(
            DebugFrame::decode(&[0x01, 0x02]),
            Err(FrameError::Truncated { needed: 3, available: 2 })
        );
        assert_eq!(
            SmoothedFrame::decode(&[]),
            Err(FrameError::Truncated { needed: 2, available: 0 })
        );
    }

    #[test]
    fn smoothed_frame_layout() {
        let frame = SmoothedFrame::new(0x0ABC);
        assert_eq!(frame.encode(), [0x0A, 0xBC]);
        assert_eq!(SmoothedFrame::decode(&frame.encode()), Ok(frame));
    }
}
