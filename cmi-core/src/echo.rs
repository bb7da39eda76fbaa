//! Echo timing boundary
//!
//! ## Overview
//!
//! An HC-SR04 reports distance as the length of its echo pulse. The firmware
//! times that pulse with 8-bit timer 0 plus a software high byte bumped on
//! every overflow, which gives a 16-bit tick count. Once the high byte reaches
//! [`MAX_ECHO_HIGH`] the measurement is abandoned as a timeout.
//!
//! Setting up the timer and the pin-change interrupt is hardware specific and
//! lives outside this crate. What crosses the boundary is an [`EchoTicks`]
//! pair, handed over by an [`EchoSource`].
//!
//! ## Non-blocking sources
//!
//! [`EchoSource::poll_echo`] follows the `nb` convention used across the
//! embedded ecosystem:
//!
//! - `Ok(ticks)`: a measurement finished
//! - `Err(nb::Error::WouldBlock)`: no echo yet, poll again later
//! - `Err(nb::Error::Other(e))`: the source failed
//!
//! ```rust
//! use cmi_core::{EchoSource, EchoTicks, ReplaySource};
//!
//! let recorded = [EchoTicks::new(0x02, 0x40)];
//! let mut source = ReplaySource::new(&recorded);
//!
//! assert_eq!(source.poll_echo(), Ok(EchoTicks::new(0x02, 0x40)));
//! assert_eq!(source.poll_echo(), Err(nb::Error::WouldBlock));
//! ```

use core::convert::Infallible;

use crate::{
    constants::timing::{FIXED_POINT_SHIFT, MAX_ECHO_HIGH},
    errors::{EchoError, EchoResult},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Raw echo timer reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EchoTicks {
    /// Software high byte (timer overflows)
    pub high: u8,
    /// Hardware counter value
    pub low: u8,
}

impl EchoTicks {
    /// Reading from the two timer bytes
    pub const fn new(high: u8, low: u8) -> Self {
        Self { high, low }
    }

    /// Account for an overflow that was flagged but not yet serviced
    ///
    /// When the echo ends right as the counter wraps, the overflow interrupt
    /// has not run yet and the high byte is one short.
    pub fn with_pending_overflow(self) -> Self {
        Self {
            high: self.high.saturating_add(1),
            low: self.low,
        }
    }

    /// Whether the high byte reached the timeout limit
    #[inline]
    pub fn is_timeout(&self) -> bool {
        self.high >= MAX_ECHO_HIGH
    }

    /// Round-trip time in timer ticks
    ///
    /// Fails with [`EchoError::Timeout`] when no echo came back in time.
    pub fn distance(&self) -> EchoResult<u32> {
        if self.is_timeout() {
            cmi_debug!("echo timeout, high byte {}", self.high);
            return Err(EchoError::Timeout { high: self.high });
        }
        Ok((u32::from(self.high) << 8) | u32::from(self.low))
    }
}

/// Convert a tick count into the 24.8 fixed point fed to the interpreter
#[inline]
pub const fn to_fixed(ticks: u32) -> u32 {
    ticks << FIXED_POINT_SHIFT
}

/// Convert a 24.8 fixed point estimate back into whole ticks
#[inline]
pub const fn from_fixed(value: u32) -> u32 {
    value >> FIXED_POINT_SHIFT
}

/// Source of finished echo measurements
pub trait EchoSource {
    /// Error type of the underlying hardware or transport
    type Error;

    /// Take the next finished measurement, if there is one
    fn poll_echo(&mut self) -> nb::Result<EchoTicks, Self::Error>;
}

/// Replays recorded echo readings, then reports `WouldBlock` forever
#[derive(Debug, Clone)]
pub struct ReplaySource<'a> {
    readings: &'a [EchoTicks],
    position: usize,
}

impl<'a> ReplaySource<'a> {
    /// Replay `readings` in order
    pub fn new(readings: &'a [EchoTicks]) -> Self {
        Self { readings, position: 0 }
    }

    /// Readings not yet handed out
    pub fn remaining(&self) -> usize {
        self.readings.len() - self.position
    }
}

impl EchoSource for ReplaySource<'_> {
    type Error = Infallible;

    fn poll_echo(&mut self) -> nb::Result<EchoTicks, Self::Error> {
        match self.readings.get(self.position) {
            Some(&reading) => {
                self.position += 1;
                Ok(reading)
            }
            None => Err(nb::Error::WouldBlock),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_combine_both_bytes() {
        assert_eq!(EchoTicks::new(0x03, 0x21).distance(), Ok(0x0321));
        assert_eq!(EchoTicks::new(0, 0).distance(), Ok(0));
    }

    #[test]
    fn timeout_at_limit() {
        assert_eq!(EchoTicks::new(0x0A, 0xFF).distance(), Ok(0x0AFF));
        assert_eq!(
            EchoTicks::new(0x0B, 0x00).distance(),
            Err(EchoError::Timeout { high: 0x0B })
        );
        assert!(EchoTicks::new(0xFF, 0x00).is_timeout());
    }

    #[test]
    fn pending_overflow_can_cause_timeout() {
        let late = EchoTicks::new(0x0A, 0x02).with_pending_overflow();
        assert_eq!(late, EchoTicks::new(0x0B, 0x02));
        assert!(late.is_timeout());
        assert_eq!(EchoTicks::new(0xFF, 0).with_pending_overflow().high, 0xFF);
    }

    #[test]
    fn fixed_point_round_trip_drops_fraction() {
        assert_eq!(to_fixed(0x0AFF), 0x0AFF00);
        assert_eq!(from_fixed(0x0AFF7F), 0x0AFF);
    }

    #[test]
    fn replay_then_block() {
        let readings = [EchoTicks::new(1, 2), EchoTicks::new(3, 4)];
        let mut source = ReplaySource::new(&readings);
        assert_eq!(source.remaining(), 2);
        assert_eq!(source.poll_echo(), Ok(EchoTicks::new(1, 2)));
        assert_eq!(source.poll_echo(), Ok(EchoTicks::new(3, 4)));
        assert_eq!(source.remaining(), 0);
        assert_eq!(source.poll_echo(), Err(nb::Error::WouldBlock));
        assert_eq!(source.poll_echo(), Err(nb::Error::WouldBlock));
    }
}
