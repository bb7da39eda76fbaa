//! A single channel: one hypothesis about the true value
//!
//! A channel is a running average plus a badness score. Badness 0 is the best
//! possible channel, 254 the worst valid one and 255 marks an unused slot:
//!
//! ```text
//! badness   0 ─────────────────────────────── 254 │ 255
//!           best                           worst  │ unused, never matches
//! ```
//!
//! A match blends the value into the average and decays the badness towards 0;
//! a mismatch adds 1, saturating at 254. Because unused slots carry the
//! highest badness, sorting by badness keeps them at the tail for free.

use crate::{
    config::ChannelConfig,
    constants::tuning::{DECAY_BIAS, INVALID_BADNESS, WORST_BADNESS},
    metric::Metric,
};

/// Running average with a badness score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Channel<M> {
    average: M,
    badness: u8,
}

impl<M: Metric> Channel<M> {
    /// An unused channel slot
    pub const fn invalid() -> Self {
        Self {
            average: M::ZERO,
            badness: INVALID_BADNESS,
        }
    }

    /// A fresh channel seeded with `value`
    ///
    /// Starts at the configured initial badness; 255 is stored as 254 so the
    /// new channel is always valid.
    pub fn new<C: ChannelConfig<M> + ?Sized>(value: M, config: &C) -> Self {
        Self {
            average: value,
            badness: config.initial_badness().min(WORST_BADNESS),
        }
    }

    /// Current estimate
    #[inline]
    pub fn average(&self) -> M {
        self.average
    }

    /// Current badness, 255 for an unused slot
    #[inline]
    pub fn badness(&self) -> u8 {
        self.badness
    }

    /// Whether this slot holds a hypothesis
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.badness != INVALID_BADNESS
    }

    /// Whether this channel ranks strictly better than `other`
    #[inline]
    pub fn outranks(&self, other: &Self) -> bool {
        self.badness < other.badness
    }

    /// Whether `value` lies inside the acceptance window of this channel
    ///
    /// `average - d <= value <= average + d`, written without subtraction
    /// from `value` so unsigned metrics do not underflow near zero.
    #[inline]
    pub fn accepts<C: ChannelConfig<M> + ?Sized>(&self, value: M, config: &C) -> bool {
        let delta = config.delta(self.average);
        value + delta >= self.average && value <= self.average + delta
    }

    /// Try to apply `value`
    ///
    /// On a match the value is blended into the average, the channel gets
    /// better and `true` is returned. On a mismatch the channel gets worse and
    /// `false` is returned. An unused slot never matches and is left as is.
    pub fn accumulate<C: ChannelConfig<M> + ?Sized>(&mut self, value: M, config: &C) -> bool {
        if !self.is_valid() {
            return false;
        }

        if !self.accepts(value, config) {
            self.penalize();
            return false;
        }

        debug_assert!(config.weight_sum() != M::ZERO, "weight sum must not be zero");
        self.average = (self.average * config.weight_old() + value * config.weight_new())
            / config.weight_sum();
        self.reward(config.badness_reducer());
        true
    }

    /// Make the channel worse by one, saturating at 254
    ///
    /// Unused slots stay unused.
    #[inline]
    pub fn penalize(&mut self) {
        if self.badness < WORST_BADNESS {
            self.badness += 1;
        }
    }

    /// Decay badness by `reducer / (reducer + 3)`
    #[inline]
    fn reward(&mut self, reducer: u8) {
        let reducer = u16::from(reducer);
        // 254 * 255 fits u16; r / (r + 3) < 1 keeps the result below 255
        self.badness = (u16::from(self.badness) * reducer / (reducer + DECAY_BIAS)) as u8;
    }

    /// Turn this channel into an unused slot
    #[inline]
    pub fn invalidate(&mut self) {
        self.badness = INVALID_BADNESS;
    }
}

impl<M: Metric> Default for Channel<M> {
    fn default() -> Self {
        Self::invalid()
    }
}
