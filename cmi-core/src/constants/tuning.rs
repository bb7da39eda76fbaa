//! Interpreter and Smoother Tuning
//!
//! Values the theremin firmware shipped with. They were tuned by ear on an
//! HC-SR04 sensor pointed at a hand 5 cm to 1 m away, sampled roughly every
//! 7 ms.

// ===== BADNESS SCALE =====

/// Badness of an unused channel slot.
///
/// Never produced by incrementing; only by construction or `invalidate()`.
pub const INVALID_BADNESS: u8 = 255;

/// Worst badness a valid channel can have.
///
/// Mismatches saturate here, and a configured initial badness of 255 is
/// stored as this value.
pub const WORST_BADNESS: u8 = 254;

/// Fixed bias in the badness decay `badness * r / (r + DECAY_BIAS)`.
///
/// With reducer `r = 9` one match keeps 75% of the badness.
pub const DECAY_BIAS: u16 = 3;

// ===== INTERPRETER DEFAULTS =====

/// Default weight of the existing average (percent of the blend).
///
/// Source: `OLD_AVR_PERCENTAGE` of the firmware
pub const DEFAULT_WEIGHT_OLD: u8 = 80;

/// Default weight of the incoming value (percent of the blend).
pub const DEFAULT_WEIGHT_NEW: u8 = 100 - DEFAULT_WEIGHT_OLD;

/// Default badness of a freshly created channel.
///
/// A new channel needs a few matches before it can displace an established
/// one, so single stray echoes never reach the output.
pub const DEFAULT_INITIAL_BADNESS: u8 = 40;

/// Default decay speed on a match.
pub const DEFAULT_BADNESS_REDUCER: u8 = 9;

/// Channel count used on the device.
///
/// Four channels cover the direct echo, one multipath echo and two slots for
/// transient junk.
pub const ULTRASONIC_CHANNELS: usize = 4;

/// Half-width of a channel in echo timer ticks, 24.8 fixed point.
///
/// `0xC0` ticks at 1 MHz is 192 µs of round trip, about 3.3 cm.
pub const ULTRASONIC_CHANNEL_WIDTH: u32 = 0xC0 << crate::constants::timing::FIXED_POINT_SHIFT;

// ===== ALTERNATIVE SMOOTHERS =====

/// Window length of the moving average smoother (samples).
pub const MOVING_AVERAGE_WINDOW: usize = 20;

/// Weight of the old value in the weighted average smoother (percent).
pub const WEIGHTED_AVERAGE_OLD_PERCENTAGE: u8 = DEFAULT_WEIGHT_OLD;
