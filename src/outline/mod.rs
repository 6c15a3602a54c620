//! Heading detection, hierarchy enforcement and section extraction.

mod classifier;
mod hierarchy;
mod patterns;
mod sections;
mod title;

pub use classifier::HeadingClassifier;
pub use hierarchy::{enforce_hierarchy, normalize_heading, to_outline};
pub use patterns::HeadingPatterns;
pub use sections::SectionExtractor;
pub use title::{detect_title, DetectedTitle};
