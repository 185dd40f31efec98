//! Error types for mathgen.
//!
//! Epistemic taxonomy:
//! - B_i falsified: Expected failures (bad config, malformed fixed records)
//! - I^B materialized: Infrastructure failures (filesystem)
//! - K_i violated: Internal invariant violations (bugs)

use thiserror::Error;

/// Top-level error type for mathgen.
#[derive(Debug, Error)]
pub enum MathgenError {
    // ═══════════════════════════════════════════════════════════════════
    // B_i FALSIFIED — Belief proven wrong (expected failures)
    // ═══════════════════════════════════════════════════════════════════

    #[error("Configuration error: {0}")]
    Config(#[from] super::ConfigError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid fixed question on line {line}: {reason}")]
    InvalidFixedQuestion { line: usize, reason: String },

    #[error(
        "Could not build {required} unique options for {kind} question (got {unique} after {attempts} attempts)"
    )]
    DegenerateOptions {
        kind: &'static str,
        unique: usize,
        required: usize,
        attempts: usize,
    },

    // ═══════════════════════════════════════════════════════════════════
    // I^B MATERIALIZED — Bounded ignorance became known-bad
    // ═══════════════════════════════════════════════════════════════════

    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // ═══════════════════════════════════════════════════════════════════
    // K_i VIOLATED — Invariant broken (bug, should not happen)
    // ═══════════════════════════════════════════════════════════════════

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MathgenError {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// Result type alias for mathgen.
pub type Result<T> = std::result::Result<T, MathgenError>;
