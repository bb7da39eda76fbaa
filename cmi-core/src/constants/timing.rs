//! Echo Timer, Fixed-Point and Tone Figures
//!
//! The firmware runs an ATtiny85 from its 1 MHz internal clock. Timer 0 counts
//! the echo pulse with a software high byte; timer 1 generates the tone.

// ===== ECHO TIMER =====

/// System clock the timers run from (Hz).
///
/// Source: ATtiny85 default fuse settings (8 MHz RC / 8)
pub const CPU_CLOCK_HZ: u32 = 1_000_000;

/// Echo timer high byte at which a measurement counts as timed out.
///
/// `0x0B00` ticks = 2.8 ms round trip, just under 50 cm.
pub const MAX_ECHO_HIGH: u8 = 0x0B;

/// Fractional bits used when feeding echo ticks into the interpreter.
///
/// Gives the running average 1/256 tick resolution while the largest value
/// times the weight sum still fits into `u32`.
pub const FIXED_POINT_SHIFT: u32 = 8;

// ===== TONE GENERATOR =====

/// Echo ticks per octave of the tone.
///
/// The usable range (up to `MAX_ECHO_HIGH`) is split into two octaves.
pub const DIST_PER_OCTAVE: u32 = ((MAX_ECHO_HIGH / 2) as u32) << 8;

/// Lowest octave (timer 1 prescaler exponent) the tone starts at.
pub const BASE_OCTAVE: u32 = 2;

/// Timer 1 period at the start of an octave; the period runs 128..=255.
pub const TONE_PERIOD_BASE: u32 = 128;

/// Span of the timer 1 period within one octave.
pub const TONE_PERIOD_SPAN: u32 = 128;

/// Only the low four bits of the octave reach the prescaler.
pub const OCTAVE_MASK: u32 = 0x0F;
