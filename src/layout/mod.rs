//! Layout analysis: span grouping, font statistics and paragraph blocks.

mod blocks;
mod font_stats;
mod normalizer;

pub use blocks::{group_lines_into_blocks, TextBlock};
pub use font_stats::{FontProfile, DEFAULT_BODY_SIZE};
pub use normalizer::{NormalizedLines, SpanNormalizer};
