//! Tone derivation from a smoothed distance
//!
//! The theremin maps distance to pitch on a roughly logarithmic scale: every
//! [`DIST_PER_OCTAVE`] echo ticks the timer 1 prescaler doubles (one octave
//! down), and within an octave the timer period sweeps linearly from 128 to
//! 255. Programming the timer is the caller's business; this module only
//! computes the register values.

use crate::constants::timing::{
    BASE_OCTAVE, DIST_PER_OCTAVE, OCTAVE_MASK, TONE_PERIOD_BASE, TONE_PERIOD_SPAN,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Timer 1 settings for one distance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ToneSettings {
    /// Prescaler exponent, 4 bits; the timer clock is `clk / 2^(octave - 1)`
    pub octave: u8,
    /// Timer period (compare match C), 128..=255
    pub period: u8,
    /// Output toggle point (compare match A), half the period
    pub compare: u8,
}

impl ToneSettings {
    /// Register values for a distance in echo ticks
    pub fn from_distance(distance: u32) -> Self {
        let octave = ((distance / DIST_PER_OCTAVE + BASE_OCTAVE) & OCTAVE_MASK) as u8;
        let period = ((distance % DIST_PER_OCTAVE) * TONE_PERIOD_SPAN / DIST_PER_OCTAVE
            + TONE_PERIOD_BASE) as u8;

        Self {
            octave,
            period,
            compare: period / 2,
        }
    }

    /// Tone frequency for a timer clock of `clock_hz`
    ///
    /// `None` when the prescaler bits are 0, which stops the timer, or when
    /// the period is 0 or the octave is out of range.
    pub fn frequency_hz(&self, clock_hz: u32) -> Option<u32> {
        if self.octave == 0 || self.period == 0 {
            return None;
        }
        let timer_hz = clock_hz.checked_shr(u32::from(self.octave - 1))?;
        Some(timer_hz / u32::from(self.period))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::timing::{CPU_CLOCK_HZ, MAX_ECHO_HIGH};

    #[test]
    fn nearest_distance() {
        let tone = ToneSettings::from_distance(0);
        assert_eq!(tone, ToneSettings { octave: 2, period: 128, compare: 64 });
    }

    #[test]
    fn period_sweeps_within_octave() {
        let mid = ToneSettings::from_distance(DIST_PER_OCTAVE / 2);
        assert_eq!(mid.octave, 2);
        assert_eq!(mid.period, 192);

        let end = ToneSettings::from_distance(DIST_PER_OCTAVE - 1);
        assert_eq!(end.period, 255);
        assert_eq!(end.compare, 127);
    }

    #[test]
    fn next_octave_restarts_period() {
        let tone = ToneSettings::from_distance(DIST_PER_OCTAVE);
        assert_eq!(tone.octave, 3);
        assert_eq!(tone.period, 128);
    }

    #[test]
    fn farthest_echo_stays_in_four_bits() {
        let far = ToneSettings::from_distance((u32::from(MAX_ECHO_HIGH) << 8) - 1);
        assert_eq!(far.octave, 4);
        assert!(far.octave <= 0x0F);
    }

    #[test]
    fn frequency_halves_per_octave() {
        let low = ToneSettings { octave: 3, period: 128, compare: 64 };
        let high = ToneSettings { octave: 2, period: 128, compare: 64 };
        assert_eq!(high.frequency_hz(CPU_CLOCK_HZ), Some(3_906));
        assert_eq!(low.frequency_hz(CPU_CLOCK_HZ), Some(1_953));

        let stopped = ToneSettings { octave: 0, period: 128, compare: 64 };
        assert_eq!(stopped.frequency_hz(CPU_CLOCK_HZ), None);
    }

    #[test]
    fn zero_period_has_no_frequency() {
        let zero = ToneSettings { octave: 1, period: 0, compare: 0 };
        assert_eq!(zero.frequency_hz(CPU_CLOCK_HZ), None);

        let too_high = ToneSettings { octave: 40, period: 128, compare: 64 };
        assert_eq!(too_high.frequency_hz(CPU_CLOCK_HZ), None);
    }
}
