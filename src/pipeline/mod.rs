//! Pipeline module - assessment assembly and output writing.

mod assessment;
mod output;

pub use assessment::*;
pub use output::write_atomic;
