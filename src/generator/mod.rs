//! Question generators.
//!
//! Epistemic foundation:
//! - K_i: Each call picks a context uniformly and fills its template
//! - K_i: Options are unique and the correct index is taken after shuffling
//! - B_i: Degenerate contexts may not yield enough unique options → Result
//! - I^R: Context tables and the randomness source are supplied by the caller

pub mod counting;
pub mod geometry;
mod options;
mod random;

pub use random::*;

use crate::models::{
    Config, CountingConfig, GeneratedQuestion, GenerationConfig, GeometryConfig, Result,
};
use std::path::Path;

/// Generates counting and geometry questions from a validated configuration.
pub struct QuestionGenerator<R: RandomSource = RngSource> {
    counting: CountingConfig,
    geometry: GeometryConfig,
    settings: GenerationConfig,
    rng: R,
}

impl QuestionGenerator<RngSource> {
    /// Create a generator seeded from `generation.seed`, or from entropy.
    pub fn new(config: &Config) -> Self {
        Self::with_source(config, RngSource::from_seed_option(config.generation.seed))
    }
}

impl<R: RandomSource> QuestionGenerator<R> {
    /// Create a generator drawing from the given source.
    pub fn with_source(config: &Config, rng: R) -> Self {
        Self {
            counting: config.counting.clone(),
            geometry: config.geometry.clone(),
            settings: config.generation.clone(),
            rng,
        }
    }

    /// Generate one counting question.
    pub fn generate_counting_question(&mut self) -> Result<GeneratedQuestion> {
        counting::generate(&self.counting, &self.settings, &mut self.rng)
    }

    /// Generate one geometry question.
    ///
    /// `image_path` is where the caller will put the illustration; it is
    /// recorded as given.
    pub fn generate_geometry_question(
        &mut self,
        image_path: Option<&Path>,
    ) -> Result<GeneratedQuestion> {
        geometry::generate(&self.geometry, &self.settings, &mut self.rng, image_path)
    }

    pub fn source_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}
