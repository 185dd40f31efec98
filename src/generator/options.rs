//! Option list assembly with a uniqueness guarantee.
//!
//! K_i: An option list never contains the same string twice, and the
//! correct index is computed after the final shuffle.

use super::RandomSource;
use crate::models::{MathgenError, Result, MIN_OPTIONS};
use tracing::debug;

/// Options under construction for one question.
#[derive(Debug, Clone)]
pub(crate) struct OptionSet {
    correct: String,
    options: Vec<String>,
}

impl OptionSet {
    /// Start with the correct answer as the only option.
    pub(crate) fn new(correct: impl Into<String>) -> Self {
        let correct = correct.into();
        Self {
            options: vec![correct.clone()],
            correct,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.options.len()
    }

    /// Add a distractor unless it collides with an existing option.
    pub(crate) fn offer(&mut self, candidate: impl Into<String>) -> bool {
        let candidate = candidate.into();
        if self.options.contains(&candidate) {
            debug!(candidate = %candidate, "Rejected colliding distractor");
            return false;
        }
        self.options.push(candidate);
        true
    }

    /// Offer candidates in order until `target` options exist.
    pub(crate) fn offer_all<I, S>(&mut self, candidates: I, target: usize)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for candidate in candidates {
            if self.len() >= target {
                break;
            }
            self.offer(candidate);
        }
    }

    /// Resample distractors from `sample` until `target` options exist or
    /// `max_attempts` draws have been made. Returns the draws used.
    pub(crate) fn fill<R, F>(
        &mut self,
        target: usize,
        max_attempts: usize,
        rng: &mut R,
        mut sample: F,
    ) -> usize
    where
        R: RandomSource,
        F: FnMut(&mut R) -> String,
    {
        let mut attempts = 0;
        while self.len() < target && attempts < max_attempts {
            attempts += 1;
            let candidate = sample(rng);
            self.offer(candidate);
        }
        attempts
    }

    /// Shuffle and locate the correct answer.
    ///
    /// Fails when fewer than [`MIN_OPTIONS`] unique options were gathered.
    pub(crate) fn finish<R: RandomSource>(
        mut self,
        kind: &'static str,
        attempts: usize,
        rng: &mut R,
    ) -> Result<(Vec<String>, usize)> {
        if self.options.len() < MIN_OPTIONS {
            return Err(MathgenError::DegenerateOptions {
                kind,
                unique: self.options.len(),
                required: MIN_OPTIONS,
                attempts,
            });
        }

        rng.shuffle(&mut self.options);

        let correct_index = self
            .options
            .iter()
            .position(|o| *o == self.correct)
            .ok_or_else(|| {
                MathgenError::Internal("correct option lost while shuffling".to_string())
            })?;

        Ok((self.options, correct_index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{RngSource, SequenceSource};

    #[test]
    fn test_duplicates_are_rejected() {
        let mut set = OptionSet::new("1");
        assert!(!set.offer("1"));
        assert!(set.offer("2"));
        assert!(set.offer("0"));
        assert!(!set.offer("2"));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_offer_all_stops_at_target() {
        let mut set = OptionSet::new("27");
        set.offer_all(["28", "26", "54", "9"], 3);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_fill_is_bounded() {
        let mut set = OptionSet::new("5");
        let mut rng = SequenceSource::zeros();
        let used = set.fill(5, 10, &mut rng, |_| "5".to_string());
        assert_eq!(used, 10);
        assert_eq!(set.len(), 1);

        let err = set.finish("counting", used, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            MathgenError::DegenerateOptions {
                unique: 1,
                required: 3,
                attempts: 10,
                ..
            }
        ));
    }

    #[test]
    fn test_finish_tracks_correct_after_shuffle() {
        for seed in 0..50 {
            let mut rng = RngSource::seeded(seed);
            let mut set = OptionSet::new("6 × 12");
            set.offer_all(["3 × 6", "12 × 6", "2 × 2", "7 × 9"], 5);
            let (options, idx) = set.finish("geometry", 0, &mut rng).unwrap();
            assert_eq!(options.len(), 5);
            assert_eq!(options[idx], "6 × 12");
        }
    }
}
