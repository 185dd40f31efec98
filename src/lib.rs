//! mathgen - Multiple-choice math assessment generation.
//!
//! ## Sources
//!
//! - **Counting generator**: fundamental counting principle over a menu table
//! - **Geometry generator**: base dimensions of circles packed in a grid
//! - **Fixed bank**: verbatim question records, audited but never rewritten
//!
//! ## Pipeline
//!
//! Questions → Illustrations (SVG) → Markdown document + `@`-tagged export + JSONL records
//!
//! ## Epistemic Design
//!
//! - K_i (Knowledge): Options are unique and the correct index follows the shuffle
//! - B_i (Beliefs): Config, bank files and output I/O are fallible (Result)
//! - I^R (Resolvable): Contexts, option counts and output paths are configurable
//! - I^B (Bounded): Distractor resampling stops after a fixed attempt budget

pub mod bank;
pub mod generator;
pub mod models;
pub mod pipeline;
pub mod render;

// Re-exports for convenience
pub use bank::{AuditFinding, FixedQuestionBank};
pub use generator::{QuestionGenerator, RandomSource, RngSource};
pub use models::{Config, GeneratedQuestion, MathgenError, Result, RunStats};
pub use pipeline::{AssessmentPipeline, Mode};
