//! Smoothing Strategies
//!
//! ## Overview
//!
//! The theremin firmware could be built with one of three smoothers for the
//! echo distance. They all share the [`Smoother`] trait so the measurement
//! loop ([`RangeFinder`](crate::RangeFinder)) does not care which one it runs:
//!
//! | Smoother          | Memory          | Handles echo ambiguity | Lag       |
//! |-------------------|-----------------|------------------------|-----------|
//! | [`Interpreter`]   | N channels      | yes                    | low       |
//! | [`WeightedAverage`] | one accumulator | no, averages both    | low       |
//! | [`MovingAverage`] | W samples       | no, averages both      | W samples |
//!
//! The two plain averages are kept for comparison: fed an alternating
//! near/far echo they settle halfway between the two, a distance nobody is
//! standing at. The interpreter keeps both clusters apart and reports one.
//!
//! ```rust
//! use cmi_core::{MovingAverage, Smoother};
//!
//! let mut window = MovingAverage::<4>::new();
//! for value in [10, 20, 30, 40] {
//!     window.push(value);
//! }
//! assert_eq!(window.output(), 25);
//! ```

use heapless::HistoryBuffer;

use crate::{
    config::ChannelConfig,
    constants::tuning::{MOVING_AVERAGE_WINDOW, WEIGHTED_AVERAGE_OLD_PERCENTAGE},
    interpreter::Interpreter,
    metric::Metric,
};

/// A filter that turns raw samples into a smoothed estimate
pub trait Smoother<M> {
    /// Feed one sample
    ///
    /// Returns a diagnostic code if the smoother has one; the interpreter
    /// reports the matching rank or [`NO_CHANNEL`](crate::NO_CHANNEL).
    fn push(&mut self, value: M) -> Option<u8>;

    /// Current estimate
    fn output(&self) -> M;

    /// Forget every sample seen so far
    fn reset(&mut self);
}

impl<M: Metric, C: ChannelConfig<M>, const N: usize> Smoother<M> for Interpreter<M, C, N> {
    fn push(&mut self, value: M) -> Option<u8> {
        Some(self.input(value).code())
    }

    fn output(&self) -> M {
        Interpreter::output(self)
    }

    fn reset(&mut self) {
        self.invalidate();
    }
}

/// Integer exponential smoothing
///
/// `acc = acc * old% / 100 + value * (100 - old%)`, output `acc / 100`.
/// The accumulator is 64 bits wide, so any `u32` sample is safe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightedAverage {
    accumulator: u64,
    old_percentage: u8,
}

impl WeightedAverage {
    /// Smoother keeping `old_percentage` percent of the previous estimate
    ///
    /// Percentages above 100 are clamped to 100, which freezes the output.
    pub fn new(old_percentage: u8) -> Self {
        Self {
            accumulator: 0,
            old_percentage: old_percentage.min(100),
        }
    }

    /// Share of the previous estimate in percent
    pub fn old_percentage(&self) -> u8 {
        self.old_percentage
    }
}

impl Default for WeightedAverage {
    fn default() -> Self {
        Self::new(WEIGHTED_AVERAGE_OLD_PERCENTAGE)
    }
}

impl Smoother<u32> for WeightedAverage {
    fn push(&mut self, value: u32) -> Option<u8> {
        let old = u64::from(self.old_percentage);
        self.accumulator = self.accumulator * old / 100 + u64::from(value) * (100 - old);
        None
    }

    fn output(&self) -> u32 {
        (self.accumulator / 100) as u32
    }

    fn reset(&mut self) {
        self.accumulator = 0;
    }
}

/// Plain moving average over the last `W` samples
///
/// The window starts out filled with zeros and always divides by `W`, so the
/// output ramps up over the first `W` samples.
#[derive(Clone)]
pub struct MovingAverage<const W: usize> {
    window: HistoryBuffer<u32, W>,
}

impl<const W: usize> MovingAverage<W> {
    const WINDOW_OK: () = assert!(W >= 1, "moving average window must not be empty");

    /// Create a zero-filled window
    pub fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::WINDOW_OK;

        Self {
            window: HistoryBuffer::new_with(0),
        }
    }

    /// Window length
    pub fn capacity(&self) -> usize {
        W
    }
}

impl MovingAverage<MOVING_AVERAGE_WINDOW> {
    /// Window length used by the firmware
    pub fn firmware() -> Self {
        Self::new()
    }
}

impl<const W: usize> Default for MovingAverage<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const W: usize> Smoother<u32> for MovingAverage<W> {
    fn push(&mut self, value: u32) -> Option<u8> {
        self.window.write(value);
        None
    }

    fn output(&self) -> u32 {
        let sum: u64 = self.window.as_slice().iter().map(|&v| u64::from(v)).sum();
        (sum / W as u64) as u32
    }

    fn reset(&mut self) {
        self.window = HistoryBuffer::new_with(0);
    }
}
