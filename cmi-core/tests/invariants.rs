//! Property tests for the interpreter invariants
//!
//! Every step of an arbitrary sample stream must keep the channel array
//! sorted, keep unused slots at the tail, and report exactly the channel that
//! the matching rule picks.

mod common;

use cmi_core::{Channel, ConstDeltaConfig, InputOutcome, Interpreter};
use proptest::prelude::*;

use common::assert_well_formed;

fn config(delta: u32, initial_badness: u8, reducer: u8) -> ConstDeltaConfig<u32> {
    ConstDeltaConfig::const_delta(delta)
        .with_initial_badness(initial_badness)
        .with_badness_reducer(reducer)
}

proptest! {
    #[test]
    fn channels_stay_ordered(
        samples in prop::collection::vec(0u32..10_000, 1..200),
        delta in 0u32..500,
        initial_badness in any::<u8>(),
        reducer in any::<u8>(),
    ) {
        let mut cmi: Interpreter<u32, _, 4> =
            Interpreter::new(config(delta, initial_badness, reducer));

        let mut active = 0;
        for sample in samples {
            cmi.input(sample);
            assert_well_formed(&cmi);

            // slots are only ever filled, never freed
            prop_assert!(cmi.active_channels() >= active);
            active = cmi.active_channels();
        }
    }

    #[test]
    fn outcome_names_first_accepting_channel(
        samples in prop::collection::vec(0u32..2_000, 1..150),
        delta in 0u32..200,
    ) {
        let config = config(delta, 40, 9);
        let mut cmi: Interpreter<u32, _, 3> = Interpreter::new(config);

        for sample in samples {
            let before = *cmi.channels();
            let first_match = before
                .iter()
                .position(|channel| channel.is_valid() && channel.accepts(sample, &config));

            match cmi.input(sample) {
                InputOutcome::Matched(rank) => {
                    let rank = usize::from(rank);
                    prop_assert_eq!(first_match, Some(rank));

                    // promotion only reorders up to the match; every channel
                    // after it keeps its slot and is one worse, untested
                    for (old, new) in before[rank + 1..].iter().zip(&cmi.channels()[rank + 1..]) {
                        let expected = if old.is_valid() {
                            old.badness().saturating_add(1).min(254)
                        } else {
                            255
                        };
                        prop_assert_eq!(new.badness(), expected);
                        prop_assert_eq!(new.average(), old.average());
                    }
                }
                InputOutcome::Created => {
                    prop_assert_eq!(first_match, None);
                    prop_assert!(cmi
                        .channels()
                        .iter()
                        .any(|c| c.is_valid() && c.average() == sample && c.badness() == 40));
                }
            }
        }
    }

    #[test]
    fn created_channels_are_never_invalid(
        samples in prop::collection::vec(any::<u16>(), 1..100),
        initial_badness in any::<u8>(),
    ) {
        let mut cmi: Interpreter<u32, _, 2> = Interpreter::new(config(0, initial_badness, 9));
        for sample in samples {
            cmi.input(u32::from(sample));
            prop_assert!(cmi.has_estimate());
            prop_assert!(cmi.channels()[0].badness() <= 254);
        }
    }

    #[test]
    fn matches_never_worsen_badness(
        value in 0u32..1_000_000,
        initial_badness in any::<u8>(),
        reducer in any::<u8>(),
        rounds in 1usize..50,
    ) {
        let config = config(0, initial_badness, reducer);
        let mut channel = Channel::new(value, &config);

        for _ in 0..rounds {
            let before = channel.badness();
            prop_assert!(channel.accumulate(value, &config));
            prop_assert!(channel.badness() <= before);
            prop_assert_eq!(channel.average(), value);
        }
    }

    #[test]
    fn misses_saturate_below_invalid(
        initial_badness in any::<u8>(),
        misses in 0usize..300,
    ) {
        let config = config(0, initial_badness, 9);
        let mut channel = Channel::new(0u32, &config);

        for _ in 0..misses {
            prop_assert!(!channel.accumulate(1, &config));
        }
        prop_assert!(channel.is_valid());
        let expected = (usize::from(initial_badness.min(254)) + misses).min(254);
        prop_assert_eq!(usize::from(channel.badness()), expected);
    }

    #[test]
    fn output_reads_best_channel(
        samples in prop::collection::vec(0u32..5_000, 1..100),
    ) {
        let mut cmi: Interpreter<u32, _, 4> = Interpreter::new(config(50, 40, 9));
        for sample in samples {
            cmi.input(sample);
            let best = cmi.best().map(|channel| channel.average());
            prop_assert_eq!(Some(cmi.output()), best);
            prop_assert_eq!(cmi.output(), cmi.output());
        }
    }
}
