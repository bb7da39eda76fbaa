//! Channelling Measurement Interpreter
//!
//! ## Overview
//!
//! The interpreter keeps `N` competing [`Channel`]s, each a running average of
//! the values it has accepted plus a badness score. The channels are kept
//! sorted by badness, so index 0 is always the most trustworthy hypothesis and
//! [`Interpreter::output`] simply reads its average.
//!
//! If you feed it alternating values with a large gap between them, like
//! `20, 4590, 20, 4590, 23, 4580, ...`, each cluster ends up in its own
//! channel. The output follows whichever cluster has earned the lower
//! badness, and may itself switch between the two averages.
//!
//! ## Algorithm
//!
//! For every sample the channels are tried from best to worst:
//!
//! ```text
//! rank:      0        1        2        3
//!          ┌──────┬────────┬────────┬────────┐
//!          │ miss │ MATCH  │ skip   │ skip   │
//!          │ +1   │ decay  │ +1     │ +1     │
//!          └──────┴────────┴────────┴────────┘
//!                     │
//!                     └── bubbles left past worse-ranked predecessors
//! ```
//!
//! 1. Each channel tested before the match got a mismatch and is 1 worse.
//! 2. The matching channel gets better and is swapped towards the front while
//!    it beats its predecessor. Only this one channel improved, so the array
//!    stays sorted after O(distance moved) swaps.
//! 3. Every channel ranked after the match is penalised without being tested:
//!    a better-ranked channel claimed the value, so they are presumed not to
//!    explain it either.
//!
//! If nothing matches, the worst slot (index `N - 1`, possibly unused) is
//! overwritten with a new channel seeded from the sample and bubbled forward
//! the same way; it may outrank channels that have degraded far enough.
//!
//! ## Ranks are not handles
//!
//! [`Interpreter::input`] reports the *rank* the matching channel had when the
//! sample arrived. Channels move around as they are re-sorted, so rank 1 now
//! and rank 1 on the next call can be different channels. Use the value only
//! as "how good was the match compared to the current ranking", e.g. for
//! diagnostics.
//!
//! ## Ownership and retuning
//!
//! The interpreter owns its configuration (or a reference to one, since `&C`
//! is a valid configuration too). `input` takes `&mut self` and `output`
//! takes `&self`, so the borrow checker rules out overlapping calls.
//! Retuning between samples goes through [`Interpreter::config_mut`].

use crate::{
    channel::Channel,
    config::ChannelConfig,
    metric::Metric,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Code returned when no channel matched and a new one was created
pub const NO_CHANNEL: u8 = 255;

/// What `input` did with a sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InputOutcome {
    /// The sample matched the channel at this rank (0 = best)
    ///
    /// The rank is the position at the time of the call, not a stable
    /// channel identity.
    Matched(u8),
    /// No channel matched; the worst slot now holds a new channel
    Created,
}

impl InputOutcome {
    /// Byte code as sent over the debug link: the rank, or [`NO_CHANNEL`]
    #[inline]
    pub fn code(self) -> u8 {
        match self {
            Self::Matched(rank) => rank,
            Self::Created => NO_CHANNEL,
        }
    }

    /// Parse a byte code
    #[inline]
    pub fn from_code(code: u8) -> Self {
        match code {
            NO_CHANNEL => Self::Created,
            rank => Self::Matched(rank),
        }
    }

    /// Rank of the matching channel, if any
    #[inline]
    pub fn rank(self) -> Option<u8> {
        match self {
            Self::Matched(rank) => Some(rank),
            Self::Created => None,
        }
    }

    /// Whether an existing channel accepted the sample
    #[inline]
    pub fn is_match(self) -> bool {
        matches!(self, Self::Matched(_))
    }
}

impl From<InputOutcome> for u8 {
    fn from(outcome: InputOutcome) -> Self {
        outcome.code()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for InputOutcome {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Matched(rank) => defmt::write!(fmt, "Matched({})", rank),
            Self::Created => defmt::write!(fmt, "Created"),
        }
    }
}

/// Outlier-rejecting multi-channel averager
///
/// ## Type Parameters
///
/// - `M`: metric the averages are kept in
/// - `C`: configuration, anything implementing [`ChannelConfig<M>`]
/// - `N`: channel count, 1..=255, fixed at compile time
///
/// ## Internal Invariants
///
/// - `channels` is sorted ascending by badness before and after every call
/// - every slot after an unused one is unused as well
#[derive(Debug, Clone)]
pub struct Interpreter<M, C, const N: usize> {
    channels: [Channel<M>; N],
    config: C,
}

impl<M: Metric, C: ChannelConfig<M>, const N: usize> Interpreter<M, C, N> {
    // Rank N - 1 must stay below NO_CHANNEL
    const CHANNEL_COUNT_OK: () = assert!(
        N >= 1 && N <= NO_CHANNEL as usize,
        "an interpreter needs between 1 and 255 channels"
    );

    /// Create an interpreter with every channel unused
    pub fn new(config: C) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::CHANNEL_COUNT_OK;

        Self {
            channels: [Channel::invalid(); N],
            config,
        }
    }

    /// Feed one sample
    ///
    /// Returns the rank of the channel that accepted the sample, or
    /// [`InputOutcome::Created`] if none did and a new channel was seeded from
    /// it. See the module docs for why the rank is not a stable handle.
    pub fn input(&mut self, value: M) -> InputOutcome {
        for rank in 0..N {
            if self.channels[rank].accumulate(value, &self.config) {
                cmi_trace!(
                    "sample {:?} matched rank {} (average {:?})",
                    value,
                    rank,
                    self.channels[rank].average()
                );
                self.promote(rank);
                for channel in &mut self.channels[rank + 1..] {
                    channel.penalize();
                }
                debug_assert!(self.is_ordered());
                return InputOutcome::Matched(rank as u8);
            }
        }

        let worst = N - 1;
        if self.channels[worst].is_valid() {
            cmi_debug!(
                "sample {:?} matched nothing, replacing channel {:?}",
                value,
                self.channels[worst]
            );
        } else {
            cmi_debug!("sample {:?} matched nothing, filling free slot", value);
        }
        self.channels[worst] = Channel::new(value, &self.config);
        self.promote(worst);
        debug_assert!(self.is_ordered());
        InputOutcome::Created
    }

    /// Current estimate: the average of the best channel
    ///
    /// Stays the same until the next [`input`](Self::input). Before the first
    /// sample (or after [`invalidate`](Self::invalidate)) this is zero.
    #[inline]
    pub fn output(&self) -> M {
        self.channels[0].average()
    }

    /// The best channel, if any slot is in use
    pub fn best(&self) -> Option<&Channel<M>> {
        self.channels.first().filter(|channel| channel.is_valid())
    }

    /// Whether at least one sample has been seen since the last reset
    pub fn has_estimate(&self) -> bool {
        self.best().is_some()
    }

    /// Channels from best to worst
    pub fn channels(&self) -> &[Channel<M>; N] {
        &self.channels
    }

    /// Number of slots holding a hypothesis
    pub fn active_channels(&self) -> usize {
        // unused slots form the tail
        self.channels.iter().take_while(|channel| channel.is_valid()).count()
    }

    /// Mark every channel unused, back to the freshly constructed state
    pub fn invalidate(&mut self) {
        cmi_debug!("interpreter reset, {} channels dropped", self.active_channels());
        self.channels = [Channel::invalid(); N];
    }

    /// Shared access to the configuration
    pub fn config(&self) -> &C {
        &self.config
    }

    /// Mutable access to the configuration, for retuning between samples
    pub fn config_mut(&mut self) -> &mut C {
        &mut self.config
    }

    /// Give the configuration back
    pub fn into_config(self) -> C {
        self.config
    }

    /// Whether the channels are sorted by badness with unused slots last
    pub fn is_ordered(&self) -> bool {
        self.channels
            .windows(2)
            .all(|pair| pair[0].badness() <= pair[1].badness())
    }

    /// Swap the channel at `index` towards the front while it beats its predecessor
    ///
    /// Only valid when the channel at `index` is the only one whose badness
    /// dropped since the array was last sorted.
    fn promote(&mut self, mut index: usize) {
        while index != 0 && self.channels[index].outranks(&self.channels[index - 1]) {
            self.channels.swap(index, index - 1);
            index -= 1;
        }
    }
}
