//! Core data models for mathgen.
//!
//! Epistemic mapping:
//! - K_i (Knowledge): Concrete types with checked invariants
//! - B_i (Beliefs): Wrapped in Result/Option
//! - I^R (Resolvable): Config parameters and context tables

mod config;
mod error;
mod question;

pub use config::*;
pub use error::*;
pub use question::*;
