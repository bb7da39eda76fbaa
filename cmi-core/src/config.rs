//! Interpreter Configuration
//!
//! ## Overview
//!
//! Every channel of an interpreter is driven by the same five parameters:
//!
//! | Parameter         | Meaning                                                      |
//! |-------------------|--------------------------------------------------------------|
//! | `weight_old`      | weight of the current average when blending in a new value   |
//! | `weight_new`      | weight of the new value                                      |
//! | `initial_badness` | badness of a freshly created channel (255 is stored as 254)  |
//! | `badness_reducer` | decay speed on a match, larger decays faster                 |
//! | `delta(average)`  | half-width of the acceptance window around a channel average |
//!
//! The interpreter only sees the [`ChannelConfig`] trait, so anything that can
//! answer those five questions can drive it. The usual way is a
//! [`Configuration`] struct holding the four plain fields plus a
//! [`DeltaPolicy`] for the window:
//!
//! - [`ConstDelta`]: the same tolerance everywhere
//! - [`PercentageDelta`]: tolerance proportional to the channel average
//! - [`WidePercentageDelta`]: the same, computed in a wider type
//! - [`FnDelta`]: any closure
//!
//! New policies only need a `DeltaPolicy` impl; the interpreter is untouched.
//!
//! ## Choosing weights
//!
//! The proportion of old average to new value is `weight_old : weight_new`.
//! Lower it for fast changing signals, otherwise the output lags behind and
//! then jumps from one channel to the next; raise it for slowly changing ones.
//!
//! Pick the weights and the metric type so that neither `weight_old * average`
//! nor `weight_new * value` nor their sum overflows. Nothing on the hot path
//! checks this; call [`Configuration::check`] once at integration time if you
//! want to be sure.
//!
//! ## Retuning
//!
//! The configuration may be changed between two samples, e.g. through
//! [`Interpreter::config_mut`](crate::Interpreter::config_mut). A shared
//! configuration can also be lent to several interpreters, since `&C`
//! implements `ChannelConfig` whenever `C` does.

use crate::{
    constants::tuning::{
        DEFAULT_BADNESS_REDUCER, DEFAULT_INITIAL_BADNESS, DEFAULT_WEIGHT_NEW,
        DEFAULT_WEIGHT_OLD, ULTRASONIC_CHANNEL_WIDTH,
    },
    errors::{ConfigError, ConfigResult},
    metric::Metric,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parameters shared by every channel of an interpreter
pub trait ChannelConfig<M: Metric> {
    /// Weight of the existing average
    fn weight_old(&self) -> M;

    /// Weight of the incoming value
    fn weight_new(&self) -> M;

    /// Divisor of the weighted blend
    fn weight_sum(&self) -> M {
        self.weight_old() + self.weight_new()
    }

    /// Badness of a freshly created channel
    fn initial_badness(&self) -> u8;

    /// Decay speed of badness on a match
    fn badness_reducer(&self) -> u8;

    /// Half-width of the acceptance window around `average`
    fn delta(&self, average: M) -> M;
}

impl<M: Metric, C: ChannelConfig<M> + ?Sized> ChannelConfig<M> for &C {
    fn weight_old(&self) -> M {
        (**self).weight_old()
    }

    fn weight_new(&self) -> M {
        (**self).weight_new()
    }

    fn weight_sum(&self) -> M {
        (**self).weight_sum()
    }

    fn initial_badness(&self) -> u8 {
        (**self).initial_badness()
    }

    fn badness_reducer(&self) -> u8 {
        (**self).badness_reducer()
    }

    fn delta(&self, average: M) -> M {
        (**self).delta(average)
    }
}

/// Tolerance policy: how far from a channel average a value may lie
pub trait DeltaPolicy<M> {
    /// Half-width of the acceptance window around `average`
    fn delta(&self, average: M) -> M;

    /// Like [`delta`](Self::delta), but `None` where the computation overflows
    ///
    /// Used by [`Configuration::check`]. Policies whose arithmetic can
    /// overflow should override it.
    fn try_delta(&self, average: M) -> Option<M> {
        Some(self.delta(average))
    }
}

/// Same tolerance for every average
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ConstDelta<M>(pub M);

impl<M: Metric> ConstDelta<M> {
    /// Create a constant tolerance
    pub const fn new(delta: M) -> Self {
        Self(delta)
    }

    /// Current tolerance
    pub fn get(&self) -> M {
        self.0
    }

    /// Replace the tolerance
    pub fn set(&mut self, delta: M) {
        self.0 = delta;
    }
}

impl<M: Metric> DeltaPolicy<M> for ConstDelta<M> {
    #[inline]
    fn delta(&self, _average: M) -> M {
        self.0
    }
}

/// Tolerance proportional to the channel average, given in percent
///
/// `delta = |average| * percent / 100`. The product must fit the metric
/// type; widen the metric if it does not.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PercentageDelta<M> {
    /// Tolerance in percent of the average
    pub percent: M,
}

impl<M: Metric> PercentageDelta<M> {
    /// Create a percentage tolerance
    pub const fn new(percent: M) -> Self {
        Self { percent }
    }
}

impl<M: Metric> DeltaPolicy<M> for PercentageDelta<M> {
    #[inline]
    fn delta(&self, average: M) -> M {
        average.magnitude() * self.percent / M::from_u8(100)
    }

    fn try_delta(&self, average: M) -> Option<M> {
        average
            .magnitude()
            .try_mul(self.percent)
            .map(|scaled| scaled / M::from_u8(100))
    }
}

/// Percentage tolerance computed in a wider type `W`
///
/// `|average|` is widened to `W` before the multiplication, so a `u32`
/// metric with a `u64` intermediate cannot overflow however large the
/// average gets. The percentage is given in `W` as well. A result that does
/// not fit back into the metric saturates at `M::MAX`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WidePercentageDelta<W> {
    /// Tolerance in percent of the average
    pub percent: W,
}

impl<W: Metric> WidePercentageDelta<W> {
    /// Create a widened percentage tolerance
    pub const fn new(percent: W) -> Self {
        Self { percent }
    }
}

impl<M, W> DeltaPolicy<M> for WidePercentageDelta<W>
where
    M: Metric + Into<W>,
    W: Metric + TryInto<M>,
{
    #[inline]
    fn delta(&self, average: M) -> M {
        self.try_delta(average).unwrap_or(M::MAX)
    }

    fn try_delta(&self, average: M) -> Option<M> {
        let wide: W = average.magnitude().into();
        let scaled = wide.try_mul(self.percent)? / W::from_u8(100);
        scaled.try_into().ok()
    }
}

/// Tolerance computed by an arbitrary function
#[derive(Debug, Clone, Copy)]
pub struct FnDelta<F>(pub F);

impl<M, F: Fn(M) -> M> DeltaPolicy<M> for FnDelta<F> {
    #[inline]
    fn delta(&self, average: M) -> M {
        (self.0)(average)
    }
}

/// The four plain channel parameters plus a tolerance policy
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Configuration<M, D> {
    /// Weight of the existing average
    pub weight_old: M,
    /// Weight of the incoming value
    pub weight_new: M,
    /// Badness of a freshly created channel, 255 is treated as 254
    pub initial_badness: u8,
    /// Decay speed of badness on a match
    pub badness_reducer: u8,
    /// Tolerance policy
    pub delta: D,
}

/// Configuration with a constant tolerance
pub type ConstDeltaConfig<M> = Configuration<M, ConstDelta<M>>;

/// Configuration with a tolerance in percent of the average
pub type PercentageDeltaConfig<M> = Configuration<M, PercentageDelta<M>>;

/// Configuration with a percentage tolerance computed in `W`
pub type WidePercentageDeltaConfig<M, W> = Configuration<M, WidePercentageDelta<W>>;

impl<M: Metric, D: DeltaPolicy<M>> Configuration<M, D> {
    /// Create a configuration with the default tuning and the given policy
    ///
    /// Defaults: weights 80/20, initial badness 40, badness reducer 9.
    pub fn new(delta: D) -> Self {
        Self {
            weight_old: M::from_u8(DEFAULT_WEIGHT_OLD),
            weight_new: M::from_u8(DEFAULT_WEIGHT_NEW),
            initial_badness: DEFAULT_INITIAL_BADNESS,
            badness_reducer: DEFAULT_BADNESS_REDUCER,
            delta,
        }
    }

    /// Set the blend weights
    pub fn with_weights(mut self, weight_old: M, weight_new: M) -> Self {
        self.weight_old = weight_old;
        self.weight_new = weight_new;
        self
    }

    /// Set the badness of new channels
    pub fn with_initial_badness(mut self, initial_badness: u8) -> Self {
        self.initial_badness = initial_badness;
        self
    }

    /// Set the decay speed on a match
    pub fn with_badness_reducer(mut self, badness_reducer: u8) -> Self {
        self.badness_reducer = badness_reducer;
        self
    }

    /// Swap the tolerance policy
    pub fn with_delta<P: DeltaPolicy<M>>(self, delta: P) -> Configuration<M, P> {
        Configuration {
            weight_old: self.weight_old,
            weight_new: self.weight_new,
            initial_badness: self.initial_badness,
            badness_reducer: self.badness_reducer,
            delta,
        }
    }

    /// Check the overflow preconditions for values up to `max_value`
    ///
    /// Verifies that the weight sum is non-zero and that
    /// `weight_old * max_value + weight_new * max_value` as well as
    /// `max_value + delta(max_value)` fit the metric type.
    ///
    /// This is meant to be called once when wiring up a device, not per
    /// sample.
    pub fn check(&self, max_value: M) -> ConfigResult<()> {
        let result = self.check_inner(max_value);
        if let Err(_err) = &result {
            cmi_debug!("configuration rejected for max value {:?}: {}", max_value, _err);
        }
        result
    }

    fn check_inner(&self, max_value: M) -> ConfigResult<()> {
        let sum = self
            .weight_old
            .try_add(self.weight_new)
            .ok_or(ConfigError::WeightOverflow { term: "weight_old + weight_new" })?;
        if sum == M::ZERO {
            return Err(ConfigError::ZeroWeightSum);
        }

        let old_term = max_value
            .try_mul(self.weight_old)
            .ok_or(ConfigError::WeightOverflow { term: "weight_old * value" })?;
        let new_term = max_value
            .try_mul(self.weight_new)
            .ok_or(ConfigError::WeightOverflow { term: "weight_new * value" })?;
        old_term
            .try_add(new_term)
            .ok_or(ConfigError::WeightOverflow { term: "weighted sum" })?;

        self.delta
            .try_delta(max_value)
            .and_then(|delta| max_value.try_add(delta))
            .ok_or(ConfigError::DeltaOverflow)?;

        Ok(())
    }
}

impl<M: Metric> ConstDeltaConfig<M> {
    /// Default tuning with a constant tolerance
    pub fn const_delta(delta: M) -> Self {
        Self::new(ConstDelta(delta))
    }
}

impl<M: Metric> PercentageDeltaConfig<M> {
    /// Default tuning with a tolerance in percent of the average
    pub fn percentage_delta(percent: M) -> Self {
        Self::new(PercentageDelta { percent })
    }
}

impl<M, W> WidePercentageDeltaConfig<M, W>
where
    M: Metric + Into<W>,
    W: Metric + TryInto<M>,
{
    /// Default tuning with a percentage tolerance computed in `W`
    pub fn wide_percentage_delta(percent: W) -> Self {
        Self::new(WidePercentageDelta { percent })
    }
}

impl ConstDeltaConfig<u32> {
    /// Tuning used for the HC-SR04 theremin
    ///
    /// Samples are echo timer ticks in 24.8 fixed point; a channel is
    /// `0xC0` ticks wide on either side of its average.
    pub fn ultrasonic() -> Self {
        Self::const_delta(ULTRASONIC_CHANNEL_WIDTH)
    }
}

impl<M: Metric, D: DeltaPolicy<M> + Default> Default for Configuration<M, D> {
    fn default() -> Self {
        Self::new(D::default())
    }
}

impl<M: Metric> Default for ConstDelta<M> {
    fn default() -> Self {
        Self(M::ZERO)
    }
}

impl<M: Metric, D: DeltaPolicy<M>> ChannelConfig<M> for Configuration<M, D> {
    #[inline]
    fn weight_old(&self) -> M {
        self.weight_old
    }

    #[inline]
    fn weight_new(&self) -> M {
        self.weight_new
    }

    #[inline]
    fn initial_badness(&self) -> u8 {
        self.initial_badness
    }

    #[inline]
    fn badness_reducer(&self) -> u8 {
        self.badness_reducer
    }

    #[inline]
    fn delta(&self, average: M) -> M {
        self.delta.delta(average)
    }
}
