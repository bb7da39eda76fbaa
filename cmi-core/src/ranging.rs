//! One measurement cycle, end to end
//!
//! [`RangeFinder`] strings the boundary pieces together the way the echo
//! interrupt of the theremin does:
//!
//! ```text
//! EchoTicks ──► distance() ──► to_fixed ──► Smoother ──► from_fixed ──► ToneSettings
//!     │              │                         │
//!     │          timeout? ─► Err               └─► code (debug link)
//!     └──────────────────────────────────────────► raw (debug link)
//! ```
//!
//! A timed-out echo never reaches the smoother; the previous estimate and tone
//! stay in place.
//!
//! ```rust
//! use cmi_core::{ConstDeltaConfig, EchoTicks, Interpreter, RangeFinder};
//! use cmi_core::constants::ULTRASONIC_CHANNELS;
//!
//! let cmi: Interpreter<u32, _, ULTRASONIC_CHANNELS> =
//!     Interpreter::new(ConstDeltaConfig::ultrasonic());
//! let mut finder = RangeFinder::new(cmi);
//!
//! let cycle = finder.process(EchoTicks::new(0x02, 0x80)).unwrap();
//! assert_eq!(cycle.raw, 0x0280);
//! assert_eq!(cycle.smoothed, 0x0280);
//! assert_eq!(cycle.code, Some(255));
//! ```

use crate::{
    diagnostics::{DebugFrame, SmoothedFrame},
    echo::{from_fixed, to_fixed, EchoSource, EchoTicks},
    errors::{EchoResult, RangeError},
    interpreter::InputOutcome,
    smoothing::Smoother,
    tone::ToneSettings,
};

/// Result of one finished measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cycle {
    /// Raw round trip in echo ticks
    pub raw: u32,
    /// Smoother diagnostic code, if the smoother has one
    pub code: Option<u8>,
    /// Smoothed round trip in echo ticks
    pub smoothed: u32,
    /// Timer settings for the smoothed distance
    pub tone: ToneSettings,
}

impl Cycle {
    /// Raw sample and interpreter code for the debug link
    pub fn frame(&self) -> Option<DebugFrame> {
        self.code
            .map(|code| DebugFrame::new(self.raw, InputOutcome::from_code(code)))
    }

    /// Smoothed distance for the debug link
    pub fn smoothed_frame(&self) -> SmoothedFrame {
        SmoothedFrame::new(self.smoothed)
    }
}

/// Drives a smoother with echo measurements
#[derive(Debug, Clone)]
pub struct RangeFinder<S> {
    smoother: S,
    cycles: u32,
    timeouts: u32,
}

impl<S: Smoother<u32>> RangeFinder<S> {
    /// Wrap a smoother working in 24.8 fixed point ticks
    pub fn new(smoother: S) -> Self {
        Self {
            smoother,
            cycles: 0,
            timeouts: 0,
        }
    }

    /// Run one measurement through the smoother
    pub fn process(&mut self, ticks: EchoTicks) -> EchoResult<Cycle> {
        let raw = match ticks.distance() {
            Ok(raw) => raw,
            Err(err) => {
                self.timeouts = self.timeouts.saturating_add(1);
                return Err(err);
            }
        };

        let code = self.smoother.push(to_fixed(raw));
        let smoothed = from_fixed(self.smoother.output());
        self.cycles = self.cycles.saturating_add(1);
        cmi_trace!("cycle {}: raw {} smoothed {} code {:?}", self.cycles, raw, smoothed, code);

        Ok(Cycle {
            raw,
            code,
            smoothed,
            tone: ToneSettings::from_distance(smoothed),
        })
    }

    /// Take one measurement from `source` if it has finished
    pub fn poll<E: EchoSource>(&mut self, source: &mut E) -> nb::Result<Cycle, RangeError<E::Error>> {
        let ticks = source.poll_echo().map_err(|err| err.map(RangeError::Source))?;
        self.process(ticks)
            .map_err(|err| nb::Error::Other(RangeError::Echo(err)))
    }

    /// Current smoothed distance in echo ticks
    pub fn smoothed(&self) -> u32 {
        from_fixed(self.smoother.output())
    }

    /// Measurements that reached the smoother
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    /// Measurements dropped as timeouts
    pub fn timeouts(&self) -> u32 {
        self.timeouts
    }

    /// The wrapped smoother
    pub fn smoother(&self) -> &S {
        &self.smoother
    }

    /// The wrapped smoother, e.g. to retune it
    pub fn smoother_mut(&mut self) -> &mut S {
        &mut self.smoother
    }

    /// Reset the smoother and the counters
    pub fn reset(&mut self) {
        self.smoother.reset();
        self.cycles = 0;
        self.timeouts = 0;
    }
}
