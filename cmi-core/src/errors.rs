//! Error Types
//!
//! ## Design Philosophy
//!
//! The interpreter itself never fails: a sample either matches a channel or
//! seeds a new one, and both are normal outcomes (see
//! [`InputOutcome`](crate::InputOutcome)). Arithmetic overflow from badly sized
//! weights is a documented precondition, not a runtime error, so nothing on the
//! per-sample path returns `Result`.
//!
//! Errors only exist at the edges of the crate:
//!
//! - `ConfigError`: returned by [`Configuration::check`](crate::Configuration::check),
//!   an optional integration-time check of the overflow preconditions.
//! - `EchoError`: the echo timer ran past its timeout, there is no distance.
//! - `FrameError`: a diagnostic frame could not be decoded on the host side.
//! - `RangeError`: what [`RangeFinder::poll`](crate::RangeFinder::poll) reports,
//!   either an `EchoError` or the echo source's own error.
//!
//! As everywhere in this crate the errors are small and `Copy`, carry only
//! inline data and `&'static str`, and never allocate.
//!
//! ```rust
//! use cmi_core::{ConfigError, ConstDeltaConfig};
//!
//! let config = ConstDeltaConfig::<u8>::const_delta(3).with_weights(200, 100);
//! assert!(matches!(config.check(10), Err(ConfigError::WeightOverflow { .. })));
//! ```

use thiserror_no_std::Error;

/// Result type for configuration checks
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for echo conversions
pub type EchoResult<T> = Result<T, EchoError>;

/// Result type for frame decoding
pub type FrameResult<T> = Result<T, FrameError>;

/// Configuration precondition violations
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// `weight_old + weight_new` is zero, the blend would divide by zero
    #[error("weight sum is zero")]
    ZeroWeightSum,

    /// A term of the weighted blend overflows the metric type
    #[error("weighted blend overflows: {term}")]
    WeightOverflow {
        /// Which term overflowed
        term: &'static str,
    },

    /// `value + delta(value)` overflows the metric type
    #[error("acceptance window overflows the metric type")]
    DeltaOverflow,
}

/// Echo measurement failures
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EchoError {
    /// The echo timer high byte reached the timeout limit before the echo returned
    #[error("echo timed out (timer high byte {high})")]
    Timeout {
        /// Timer high byte at the time the echo ended
        high: u8,
    },
}

/// Diagnostic frame decoding failures
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// Not enough bytes for a complete frame
    #[error("truncated frame: need {needed} bytes, have {available}")]
    Truncated {
        /// Bytes needed for one frame
        needed: usize,
        /// Bytes available
        available: usize,
    },
}

/// Errors from a polled measurement cycle
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeError<E> {
    /// The echo could not be converted to a distance
    #[error("echo measurement failed: {0}")]
    Echo(EchoError),

    /// The echo source itself failed
    #[error("echo source failed")]
    Source(E),
}

impl<E> From<EchoError> for RangeError<E> {
    fn from(err: EchoError) -> Self {
        Self::Echo(err)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::ZeroWeightSum =>
                defmt::write!(fmt, "Weight sum is zero"),
            Self::WeightOverflow { term } =>
                defmt::write!(fmt, "Weighted blend overflows: {}", term),
            Self::DeltaOverflow =>
                defmt::write!(fmt, "Acceptance window overflows"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for EchoError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Timeout { high } =>
                defmt::write!(fmt, "Echo timeout (high {})", high),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for FrameError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Truncated { needed, available } =>
                defmt::write!(fmt, "Need {} bytes, have {}", needed, available),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for RangeError<E> {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Echo(err) => defmt::write!(fmt, "Echo failed: {}", err),
            Self::Source(err) => defmt::write!(fmt, "Source failed: {}", err),
        }
    }
}
