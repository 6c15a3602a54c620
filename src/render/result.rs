//! Output records for outline and persona results, plus diagnostics.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{OutlineEntry, ScoredSection};
use crate::relevance::Snippet;

/// Single-document outline output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutlineResult {
    /// Document title; empty when none was detected
    pub title: String,
    /// Leveled headings in reading order
    pub outline: Vec<OutlineEntry>,
}

impl OutlineResult {
    /// Create a new outline result.
    pub fn new(title: impl Into<String>, outline: Vec<OutlineEntry>) -> Self {
        Self {
            title: title.into(),
            outline,
        }
    }

    /// An empty but valid outline.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Persona run metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Document identifiers in configuration order
    pub input_documents: Vec<String>,
    /// Persona role
    pub persona: String,
    /// Task description
    pub job_to_be_done: String,
    /// RFC 3339 timestamp of the run
    pub processing_timestamp: String,
    /// Failure message when the run produced no sections because of an error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Metadata {
    /// Metadata stamped with the current time.
    pub fn new(input_documents: Vec<String>, persona: &str, job_to_be_done: &str) -> Self {
        Self {
            input_documents,
            persona: persona.to_string(),
            job_to_be_done: job_to_be_done.to_string(),
            processing_timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            error: None,
        }
    }
}

/// One ranked section in persona output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedSection {
    /// Source document
    pub document: String,
    /// Heading text
    pub section_title: String,
    /// 1-based rank
    pub importance_rank: usize,
    /// Page of the heading
    pub page_number: u32,
}

impl From<&ScoredSection> for ExtractedSection {
    fn from(scored: &ScoredSection) -> Self {
        Self {
            document: scored.section.document.clone(),
            section_title: scored.section.title.text.clone(),
            importance_rank: scored.rank_position.unwrap_or(0),
            page_number: scored.section.page,
        }
    }
}

/// One refined snippet in persona output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsectionAnalysis {
    /// Source document
    pub document: String,
    /// Cleaned paragraph text
    pub refined_text: String,
    /// Page of the paragraph
    pub page_number: u32,
}

impl From<&Snippet> for SubsectionAnalysis {
    fn from(snippet: &Snippet) -> Self {
        Self {
            document: snippet.document.clone(),
            refined_text: snippet.text.clone(),
            page_number: snippet.page,
        }
    }
}

/// Multi-document persona output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaResult {
    /// Run metadata
    pub metadata: Metadata,
    /// Ranked sections
    pub extracted_sections: Vec<ExtractedSection>,
    /// Snippets for the ranked sections
    pub subsection_analysis: Vec<SubsectionAnalysis>,
}

impl PersonaResult {
    /// Result carrying only metadata and an error message.
    pub fn failed(mut metadata: Metadata, error: impl Into<String>) -> Self {
        metadata.error = Some(error.into());
        Self {
            metadata,
            extracted_sections: vec![],
            subsection_analysis: vec![],
        }
    }
}

/// Counters describing how input was handled.
///
/// Returned alongside every analysis result in place of errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Documents analyzed
    pub document_count: u32,
    /// Distinct pages with content
    pub page_count: u32,
    /// Spans received
    pub span_count: u32,
    /// Lines built
    pub line_count: u32,
    /// Span records skipped because they could not be parsed
    pub malformed_records: u32,
    /// Spans dropped for non-finite coordinates
    pub dropped_spans: u32,
    /// Spans without usable font metadata, kept as content only
    pub degraded_spans: u32,
    /// Outline headings emitted
    pub heading_count: u32,
    /// Sections extracted
    pub section_count: u32,
    /// Persona or task missing; ranking fell back to structure only
    pub config_invalid: bool,
}

impl Diagnostics {
    /// Create new empty diagnostics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any input had to be skipped or degraded.
    pub fn has_warnings(&self) -> bool {
        self.malformed_records > 0
            || self.dropped_spans > 0
            || self.degraded_spans > 0
            || self.config_invalid
    }

    /// Merge another diagnostics instance into this one.
    pub fn merge(&mut self, other: &Diagnostics) {
        self.document_count += other.document_count;
        self.page_count += other.page_count;
        self.span_count += other.span_count;
        self.line_count += other.line_count;
        self.malformed_records += other.malformed_records;
        self.dropped_spans += other.dropped_spans;
        self.degraded_spans += other.degraded_spans;
        self.heading_count += other.heading_count;
        self.section_count += other.section_count;
        self.config_invalid |= other.config_invalid;
    }
}
