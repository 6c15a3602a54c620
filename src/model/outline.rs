//! Heading levels, candidates and outline entries.

use serde::{Deserialize, Serialize};

/// Heading level in the outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    /// Top-level heading
    H1,
    /// Second-level heading
    H2,
    /// Third-level heading
    H3,
}

impl HeadingLevel {
    /// Nesting depth (H1 = 1).
    pub fn depth(self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }

    /// Level for a nesting depth; depths past 3 clamp to H3.
    pub fn from_depth(depth: u8) -> Option<Self> {
        match depth {
            0 => None,
            1 => Some(HeadingLevel::H1),
            2 => Some(HeadingLevel::H2),
            _ => Some(HeadingLevel::H3),
        }
    }

    /// Label used in JSON output.
    pub fn as_str(self) -> &'static str {
        match self {
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
        }
    }
}

impl std::fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A line provisionally classified as a heading.
///
/// A candidate may cover several consecutive lines when a heading wraps.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingCandidate {
    /// Index of the first line in the document's line sequence
    pub line_index: usize,
    /// Number of lines covered (at least 1)
    pub line_count: usize,
    /// Heading text
    pub text: String,
    /// Page of the first line
    pub page: u32,
    /// Dominant font size
    pub font_size: f32,
    /// Assigned level; `None` until level assignment runs
    pub level: Option<HeadingLevel>,
    /// Raw classifier score normalized to 0..=1
    pub confidence: f32,
    /// Depth implied by an explicit numbering prefix ("1.2" = 2)
    pub numbering_depth: Option<u8>,
}

impl HeadingCandidate {
    /// Index one past the last covered line.
    pub fn end_index(&self) -> usize {
        self.line_index + self.line_count
    }

    /// Whether the candidate covers a line index.
    pub fn covers(&self, index: usize) -> bool {
        index >= self.line_index && index < self.end_index()
    }
}

/// A final outline entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Heading level
    pub level: HeadingLevel,
    /// Heading text
    pub text: String,
    /// Page number
    pub page: u32,
}

impl OutlineEntry {
    /// Create a new outline entry.
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
        }
    }
}

impl From<&HeadingCandidate> for OutlineEntry {
    fn from(candidate: &HeadingCandidate) -> Self {
        Self {
            level: candidate.level.unwrap_or(HeadingLevel::H3),
            text: candidate.text.clone(),
            page: candidate.page,
        }
    }
}
