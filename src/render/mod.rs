//! Output renderers: Markdown document, `@`-tagged export, SVG illustrations,
//! terminal listings.
//!
//! Renderers are pure string builders; the pipeline owns all file I/O.

mod document;
mod formatted;
mod illustration;
mod listing;

pub use document::*;
pub use formatted::*;
pub use illustration::*;
pub use listing::*;
