//! Analysis options and configuration.

use std::ops::RangeInclusive;

use crate::detect::DocumentType;
use crate::error::{Error, Result};

/// Which output the analysis feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisMode {
    /// Single-document outline; headings must be followed by smaller text
    #[default]
    Outline,
    /// Section extraction for persona ranking; looser size requirement
    Sections,
}

/// Vertical orientation of the incoming span coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YAxis {
    /// `y` grows downward from the top of the page
    #[default]
    TopDown,
    /// `y` grows upward from the bottom of the page (PDF user space)
    BottomUp,
}

/// Options for grouping spans into lines.
#[derive(Debug, Clone)]
pub struct NormalizerOptions {
    /// Orientation of span coordinates
    pub y_axis: YAxis,
    /// Vertical tolerance as a fraction of font size
    pub line_tolerance_ratio: f32,
    /// Largest horizontal gap, in average character widths, that still joins spans
    pub max_gap_chars: f32,
}

impl NormalizerOptions {
    /// Create new normalizer options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the coordinate orientation.
    pub fn with_y_axis(mut self, y_axis: YAxis) -> Self {
        self.y_axis = y_axis;
        self
    }
}

impl Default for NormalizerOptions {
    fn default() -> Self {
        Self {
            y_axis: YAxis::TopDown,
            line_tolerance_ratio: 0.3,
            max_gap_chars: 3.0,
        }
    }
}

/// Options for heading classification.
#[derive(Debug, Clone)]
pub struct ClassifierOptions {
    /// Starting score threshold before adaptation
    pub base_threshold: f32,
    /// Largest share of lines allowed to pass before the threshold is raised
    pub max_heading_fraction: f32,
    /// Minimum size ratio in outline mode
    pub outline_min_size_ratio: f32,
    /// Minimum size ratio in section mode
    pub section_min_size_ratio: f32,
    /// Minimum size ratio for bold lines in section mode
    pub section_bold_min_size_ratio: f32,
    /// Next line must be below this fraction of the heading size (outline mode)
    pub context_ratio: f32,
    /// Relative gap between distinct sizes that opens a new level band
    pub band_gap_ratio: f32,
    /// Merge headings that wrap onto consecutive lines
    pub merge_wrapped: bool,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self {
            base_threshold: 4.0,
            max_heading_fraction: 0.3,
            outline_min_size_ratio: 1.2,
            section_min_size_ratio: 1.1,
            section_bold_min_size_ratio: 1.0,
            context_ratio: 0.95,
            band_gap_ratio: 0.08,
            merge_wrapped: true,
        }
    }
}

/// Weight overrides for one document genre.
///
/// The classifier and scorer use a single formula; only these weights vary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightProfile {
    /// Multiplier on the structural-pattern bonus
    pub structural_weight: f32,
    /// Points per distinct keyword in a section title
    pub title_weight: f32,
    /// Multiplier on content keyword density
    pub density_weight: f32,
    /// Points per distinct semantic indicator
    pub semantic_weight: f32,
    /// Multiplier when role and task keywords both match
    pub cross_signal_multiplier: f32,
}

impl WeightProfile {
    /// Weights for a document genre.
    pub fn for_type(doc_type: DocumentType) -> Self {
        let base = Self::default();
        match doc_type {
            DocumentType::Auto | DocumentType::General => base,
            DocumentType::Research => Self {
                structural_weight: 1.2,
                semantic_weight: 1.0,
                ..base
            },
            DocumentType::Business => Self {
                structural_weight: 0.8,
                title_weight: 6.0,
                ..base
            },
            DocumentType::Technical => Self {
                structural_weight: 1.5,
                ..base
            },
        }
    }
}

impl Default for WeightProfile {
    fn default() -> Self {
        Self {
            structural_weight: 1.0,
            title_weight: 5.0,
            density_weight: 25.0,
            semantic_weight: 0.8,
            cross_signal_multiplier: 1.3,
        }
    }
}

/// Options for analyzing one document.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Outline or section mode
    pub mode: AnalysisMode,
    /// Span grouping
    pub normalizer: NormalizerOptions,
    /// Heading classification
    pub classifier: ClassifierOptions,
    /// Document genre; `Auto` detects it per document
    pub document_type: DocumentType,
    /// Pages to analyze
    pub pages: PageSelection,
    /// Histogram bucket width in points
    pub size_bucket: f32,
    /// Below this many sized lines the body size falls back to the smallest size
    pub sparse_line_threshold: usize,
    /// Detect a document title on the first page
    pub detect_title: bool,
}

impl AnalysisOptions {
    /// Create new analysis options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for section extraction in persona mode.
    pub fn sections() -> Self {
        Self {
            mode: AnalysisMode::Sections,
            ..Self::default()
        }
    }

    /// Set the analysis mode.
    pub fn with_mode(mut self, mode: AnalysisMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the document genre.
    pub fn with_document_type(mut self, doc_type: DocumentType) -> Self {
        self.document_type = doc_type;
        self
    }

    /// Set the coordinate orientation.
    pub fn with_y_axis(mut self, y_axis: YAxis) -> Self {
        self.normalizer.y_axis = y_axis;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Set the histogram bucket width.
    pub fn with_size_bucket(mut self, bucket: f32) -> Self {
        if bucket.is_finite() && bucket > 0.0 {
            self.size_bucket = bucket;
        }
        self
    }

    /// Set classifier options.
    pub fn with_classifier(mut self, classifier: ClassifierOptions) -> Self {
        self.classifier = classifier;
        self
    }

    /// Enable or disable title detection.
    pub fn with_title_detection(mut self, detect: bool) -> Self {
        self.detect_title = detect;
        self
    }
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            mode: AnalysisMode::Outline,
            normalizer: NormalizerOptions::default(),
            classifier: ClassifierOptions::default(),
            document_type: DocumentType::Auto,
            pages: PageSelection::All,
            size_bucket: 0.5,
            sparse_line_threshold: 5,
            detect_title: true,
        }
    }
}

/// Options for persona ranking and selection.
#[derive(Debug, Clone)]
pub struct SelectionOptions {
    /// Number of sections to emit
    pub desired_count: usize,
    /// Jaccard similarity at or above which two sections are duplicates
    pub similarity_threshold: f32,
    /// Extra sections allowed per document above the even share
    pub extra_per_document: usize,
    /// Snippets emitted per selected section
    pub snippets_per_section: usize,
    /// Maximum snippet length in characters
    pub max_snippet_chars: usize,
}

impl SelectionOptions {
    /// Create new selection options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of sections to emit.
    pub fn with_desired_count(mut self, count: usize) -> Self {
        self.desired_count = count.max(1);
        self
    }

    /// Set the number of snippets per section.
    pub fn with_snippets_per_section(mut self, count: usize) -> Self {
        self.snippets_per_section = count;
        self
    }

    /// Set the maximum snippet length.
    pub fn with_max_snippet_chars(mut self, chars: usize) -> Self {
        self.max_snippet_chars = chars.max(40);
        self
    }

    /// Per-document cap: even share rounded up, plus the allowance.
    pub fn per_document_cap(&self, document_count: usize) -> usize {
        self.desired_count.div_ceil(document_count.max(1)) + self.extra_per_document
    }
}

impl Default for SelectionOptions {
    fn default() -> Self {
        Self {
            desired_count: 5,
            similarity_threshold: 0.8,
            extra_per_document: 1,
            snippets_per_section: 1,
            max_snippet_chars: 500,
        }
    }
}

/// Page selection for analysis.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PageSelection {
    /// Analyze all pages
    #[default]
    All,
    /// Analyze a range of pages (inclusive)
    Range(RangeInclusive<u32>),
    /// Analyze specific pages
    Pages(Vec<u32>),
    /// Analyze several ranges, sorted and non-overlapping
    Ranges(Vec<RangeInclusive<u32>>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
            PageSelection::Ranges(ranges) => ranges.iter().any(|r| r.contains(&page)),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        let invalid = || Error::InvalidPageRange(s.to_string());

        if let Some((start, end)) = s.split_once('-') {
            if !start.contains(',') && !end.contains(',') {
                let start: u32 = start.trim().parse().map_err(|_| invalid())?;
                let end: u32 = end.trim().parse().map_err(|_| invalid())?;
                if start > end {
                    return Err(invalid());
                }
                return Ok(PageSelection::Range(start..=end));
            }
        }

        let mut ranges: Vec<RangeInclusive<u32>> = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            let (start, end) = match part.split_once('-') {
                Some((start, end)) => (
                    start.trim().parse::<u32>().map_err(|_| invalid())?,
                    end.trim().parse::<u32>().map_err(|_| invalid())?,
                ),
                None => {
                    let p: u32 = part.parse().map_err(|_| invalid())?;
                    (p, p)
                }
            };
            if start > end {
                return Err(invalid());
            }
            ranges.push(start..=end);
        }

        // Merge overlapping and adjacent ranges; never expands to single pages
        ranges.sort_unstable_by_key(|r| *r.start());
        let mut merged: Vec<RangeInclusive<u32>> = Vec::with_capacity(ranges.len());
        for range in ranges {
            match merged.last_mut() {
                Some(last) if *range.start() <= last.end().saturating_add(1) => {
                    if range.end() > last.end() {
                        *last = *last.start()..=*range.end();
                    }
                }
                _ => merged.push(range),
            }
        }
        Ok(PageSelection::Ranges(merged))
    }
}
