//! The single seam through which every random decision passes.
//!
//! Any `rand::Rng` is a [`GeneticRng`]; seeded `ChaCha8Rng` gives
//! reproducible runs. [`ScriptedRng`] replays fixed outcomes for tests.

use rand::Rng;
use std::collections::VecDeque;

pub trait GeneticRng {
    /// Bernoulli trial; `chance` is clamped to `[0, 1]`.
    fn roll(&mut self, chance: f64) -> bool;

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn pick(&mut self, len: usize) -> usize;

    /// Uniform count in `min..=max`.
    fn count(&mut self, min: u32, max: u32) -> u32;
}

impl<R: Rng + ?Sized> GeneticRng for R {
    fn roll(&mut self, chance: f64) -> bool {
        let chance = if chance.is_nan() {
            0.0
        } else {
            chance.clamp(0.0, 1.0)
        };
        self.gen_bool(chance)
    }

    fn pick(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "cannot pick from an empty set");
        self.gen_range(0..len.max(1))
    }

    fn count(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        self.gen_range(min..=max)
    }
}

/// Deterministic outcomes for replay and tests.
///
/// Rolls always return `rolls`. Picks are served from the script in order
/// (reduced modulo `len`), then fall back to `0`. Counts always return the
/// upper bound.
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    rolls: bool,
    picks: VecDeque<usize>,
}

impl ScriptedRng {
    /// Every Bernoulli trial succeeds.
    #[must_use]
    pub fn always_succeed() -> Self {
        Self {
            rolls: true,
            picks: VecDeque::new(),
        }
    }

    /// Every Bernoulli trial fails.
    #[must_use]
    pub fn always_fail() -> Self {
        Self {
            rolls: false,
            picks: VecDeque::new(),
        }
    }

    /// Queue index picks to be served before the `0` fallback.
    #[must_use]
    pub fn with_picks(mut self, picks: impl IntoIterator<Item = usize>) -> Self {
        self.picks.extend(picks);
        self
    }
}

impl GeneticRng for ScriptedRng {
    fn roll(&mut self, chance: f64) -> bool {
        // an impossible event stays impossible
        self.rolls && chance > 0.0
    }

    fn pick(&mut self, len: usize) -> usize {
        self.picks.pop_front().map_or(0, |p| p % len.max(1))
    }

    fn count(&mut self, min: u32, max: u32) -> u32 {
        max.max(min)
    }
}
