//! Data model shared by the analysis pipeline.
//!
//! Spans come from the external extractor, lines from the normalizer,
//! candidates and outline entries from heading detection, and sections
//! from the content extractor.

mod line;
mod outline;
mod section;
mod span;

pub use line::Line;
pub(crate) use line::is_spaceless_script_char;
pub use outline::{HeadingCandidate, HeadingLevel, OutlineEntry};
pub use section::{ScoredSection, Section};
pub use span::{BBox, TextSpan};
