//! Channelling measurement interpreter
//!
//! Turns a noisy stream of scalar measurements into a stable running estimate,
//! even when the signal keeps jumping between two or more real values (an
//! ultrasonic sensor that alternates between a near and a far echo, say).
//! Designed for small microcontrollers.
//!
//! Key constraints:
//! - Runs on an ATtiny85 (512 bytes of RAM)
//! - No heap allocation, fixed footprint chosen at compile time
//! - O(N) per sample where N is the channel count
//!
//! ```
//! use cmi_core::{ConstDeltaConfig, Interpreter, InputOutcome};
//!
//! let config = ConstDeltaConfig::<u32>::const_delta(5)
//!     .with_weights(4, 1)
//!     .with_initial_badness(40)
//!     .with_badness_reducer(9);
//! let mut cmi: Interpreter<u32, _, 2> = Interpreter::new(config);
//!
//! assert_eq!(cmi.input(100), InputOutcome::Created);
//! assert_eq!(cmi.input(101), InputOutcome::Matched(0));
//! assert_eq!(cmi.output(), 100);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod macros;

pub mod channel;
pub mod config;
pub mod constants;
pub mod diagnostics;
pub mod echo;
pub mod errors;
pub mod interpreter;
pub mod metric;
pub mod ranging;
pub mod smoothing;
pub mod tone;

// Public API
pub use channel::Channel;
pub use config::{
    ChannelConfig, Configuration, ConstDelta, ConstDeltaConfig, DeltaPolicy, FnDelta,
    PercentageDelta, PercentageDeltaConfig, WidePercentageDelta, WidePercentageDeltaConfig,
};
pub use diagnostics::{DebugFrame, SmoothedFrame};
pub use echo::{EchoSource, EchoTicks, ReplaySource};
pub use errors::{
    ConfigError, ConfigResult, EchoError, EchoResult, FrameError, FrameResult, RangeError,
};
pub use interpreter::{InputOutcome, Interpreter, NO_CHANNEL};
pub use metric::Metric;
pub use ranging::{Cycle, RangeFinder};
pub use smoothing::{MovingAverage, Smoother, WeightedAverage};
pub use tone::ToneSettings;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
