//! Randomness sources for question generation.
//!
//! Generators never reach for a global RNG; the caller passes a
//! [`RandomSource`]. Production runs use [`RngSource`] (seeded or from
//! entropy), tests pin outputs with [`SequenceSource`].

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Uniform draws needed by the generators.
pub trait RandomSource {
    /// Uniform index in `0..len`. `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize;

    /// Uniform float in `[0, 1)`.
    fn unit(&mut self) -> f64;

    /// Uniform integer in `low..=high`.
    fn int_inclusive(&mut self, low: i64, high: i64) -> i64 {
        if high <= low {
            return low;
        }
        let span = (high - low) as usize + 1;
        low + self.index(span) as i64
    }

    /// Uniform float in `[low, high]`; no draw is made when the range is empty.
    fn float_between(&mut self, low: f64, high: f64) -> f64 {
        if high <= low {
            return low;
        }
        low + self.unit() * (high - low)
    }

    /// Pick one element uniformly.
    fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T>
    where
        Self: Sized,
    {
        if items.is_empty() {
            return None;
        }
        let i = self.index(items.len());
        items.get(i)
    }

    /// Uniform in-place shuffle (Fisher-Yates).
    fn shuffle<T>(&mut self, items: &mut [T])
    where
        Self: Sized,
    {
        for i in (1..items.len()).rev() {
            let j = self.index(i + 1);
            items.swap(i, j);
        }
    }
}

/// [`RandomSource`] backed by a `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R = StdRng> {
    rng: R,
}

impl RngSource<StdRng> {
    /// Reproducible source.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Source seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeded when `seed` is given, entropy otherwise.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    fn unit(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}

/// Deterministic source replaying a fixed sequence of values.
///
/// Each draw takes the next value (cycling) and reduces it into range:
/// `index(len)` yields `value % len`, `unit()` yields `(value % 1000) / 1000`.
/// An empty sequence always yields zero.
#[derive(Debug, Clone, Default)]
pub struct SequenceSource {
    values: Vec<usize>,
    pos: usize,
}

impl SequenceSource {
    pub fn new(values: impl Into<Vec<usize>>) -> Self {
        Self {
            values: values.into(),
            pos: 0,
        }
    }

    /// Source whose every draw is zero: first context, and shuffles move
    /// the head to the back.
    pub fn zeros() -> Self {
        Self::default()
    }

    /// Number of draws made so far.
    pub fn draws(&self) -> usize {
        self.pos
    }

    fn next_value(&mut self) -> usize {
        let value = if self.values.is_empty() {
            0
        } else {
            self.values[self.pos % self.values.len()]
        };
        self.pos += 1;
        value
    }
}

impl RandomSource for SequenceSource {
    fn index(&mut self, len: usize) -> usize {
        self.next_value() % len.max(1)
    }

    fn unit(&mut self) -> f64 {
        (self.next_value() % 1000) as f64 / 1000.0
    }
}
