//! Constants for CMI Core
//!
//! Every tuning value and hardware figure used by the crate lives here, with
//! its unit and where it comes from.
//!
//! ## Organization
//!
//! - **Tuning**: interpreter and smoother parameters
//! - **Timing**: echo timer, fixed-point and tone generator figures
//!
//! ## Usage Guidelines
//!
//! 1. Always use these constants instead of magic numbers
//! 2. Include the unit in the name where there is one
//! 3. Note the source of hardware figures (datasheet, measurement)

/// Interpreter and smoother tuning.
pub mod tuning;

/// Echo timer, fixed-point and tone generator figures.
pub mod timing;

// Re-export commonly used constants for convenience
pub use tuning::{
    DEFAULT_BADNESS_REDUCER, DEFAULT_INITIAL_BADNESS, DEFAULT_WEIGHT_NEW, DEFAULT_WEIGHT_OLD,
    ULTRASONIC_CHANNELS, ULTRASONIC_CHANNEL_WIDTH,
};

pub use timing::{DIST_PER_OCTAVE, FIXED_POINT_SHIFT, MAX_ECHO_HIGH};
