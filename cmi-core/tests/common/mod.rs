//! Common test utilities for integration tests
//!
//! This module provides:
//! - A deterministic RNG so failures reproduce
//! - Echo stream generators (near/far ambiguity, hand movements)
//! - Assertion helpers for the interpreter invariants

#![allow(dead_code)]

use cmi_core::{ChannelConfig, EchoTicks, InputOutcome, Interpreter, Metric};

/// Xorshift RNG, good enough for noise and fully reproducible
pub struct TestRng {
    state: u32,
}

impl TestRng {
    pub fn new(seed: u32) -> Self {
        // xorshift never leaves zero
        Self { state: seed.max(1) }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        self.state
    }

    /// Uniform in `-amplitude..=amplitude`
    pub fn jitter(&mut self, amplitude: u32) -> i64 {
        let span = u64::from(amplitude) * 2 + 1;
        (u64::from(self.next_u32()) % span) as i64 - i64::from(amplitude)
    }
}

/// Sample around `center`, never below zero
pub fn noisy(rng: &mut TestRng, center: u32, amplitude: u32) -> u32 {
    (i64::from(center) + rng.jitter(amplitude)).max(0) as u32
}

/// Ultrasonic echo that sees the hand three times out of four and the wall
/// behind it the fourth time
pub fn ambiguous_echo(rng: &mut TestRng, len: usize, near: u32, far: u32, noise: u32) -> Vec<u32> {
    (0..len)
        .map(|i| {
            let center = if i % 4 == 3 { far } else { near };
            noisy(rng, center, noise)
        })
        .collect()
}

/// Split tick counts into the two timer bytes
pub fn ticks(distance: u32) -> EchoTicks {
    EchoTicks::new((distance >> 8) as u8, distance as u8)
}

/// Channels are sorted by badness and unused slots only form the tail
pub fn assert_well_formed<M: Metric, C: ChannelConfig<M>, const N: usize>(
    cmi: &Interpreter<M, C, N>,
) {
    assert!(cmi.is_ordered(), "channels out of order: {:?}", cmi.channels());

    let active = cmi.active_channels();
    assert!(
        cmi.channels()[active..].iter().all(|channel| !channel.is_valid()),
        "unused slot in the middle: {:?}",
        cmi.channels()
    );
    assert_eq!(cmi.output(), cmi.channels()[0].average());
}

/// Feed `values` and collect the outcomes, checking the invariants after each step
pub fn feed<M: Metric, C: ChannelConfig<M>, const N: usize>(
    cmi: &mut Interpreter<M, C, N>,
    values: &[M],
) -> Vec<InputOutcome> {
    values
        .iter()
        .map(|&value| {
            let outcome = cmi.input(value);
            assert_well_formed(cmi);
            outcome
        })
        .collect()
}
