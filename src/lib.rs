//! # docoutline
//!
//! Document outline extraction and persona-driven section ranking from
//! layout-annotated text spans.
//!
//! An external extractor supplies text spans with position, font size,
//! boldness and page number. This library turns them into a leveled outline
//! (title plus H1 to H3 headings) and, for document collections, ranks the
//! sections most relevant to a persona and task.
//!
//! ## Quick Start
//!
//! ```
//! use docoutline::{extract_outline, HeadingLevel, TextSpan};
//!
//! let mut spans = vec![TextSpan::new("1. Introduction", 1, 72.0, 60.0, 18.0).bold()];
//! for i in 0..10 {
//!     let y = 100.0 + i as f32 * 12.0;
//!     spans.push(TextSpan::new("Body text of the introduction.", 1, 72.0, y, 10.0));
//! }
//!
//! let outline = extract_outline(&spans);
//! assert_eq!(outline.outline[0].level, HeadingLevel::H1);
//! assert_eq!(outline.outline[0].text, "1. Introduction");
//! ```
//!
//! ## Features
//!
//! - **Font statistics**: body size from the size histogram, no fixed thresholds
//! - **Heading classification**: size, weight, numbering and lexical signals
//! - **Hierarchy repair**: no level jumps, no duplicate running headers
//! - **Section extraction**: content boundaries across pages
//! - **Persona ranking**: keyword expansion, relevance scoring, diversity-aware selection
//! - **CJK support**: Japanese, Chinese and Korean chapter markers and character counting

pub mod cleanup;
pub mod detect;
pub mod error;
pub mod input;
pub mod layout;
pub mod model;
pub mod options;
pub mod outline;
pub mod pipeline;
pub mod relevance;
pub mod render;

// Re-export commonly used types
pub use cleanup::{CleanupOptions, CleanupPipeline, CleanupPreset};
pub use detect::{detect_document_type, detect_language, DocumentType, Language};
pub use error::{Error, Result};
pub use input::{
    load_collection, load_persona_config, load_spans, parse_persona_config, parse_spans,
    DocumentRef, PersonaConfig, SpanDocument,
};
pub use model::{
    BBox, HeadingCandidate, HeadingLevel, Line, OutlineEntry, ScoredSection, Section, TextSpan,
};
pub use options::{
    AnalysisMode, AnalysisOptions, ClassifierOptions, NormalizerOptions, PageSelection,
    SelectionOptions, WeightProfile, YAxis,
};
pub use pipeline::{analyze_collection, analyze_document, CollectionAnalysis, DocumentAnalysis};
pub use relevance::{DomainTable, KeywordExpander, PersonaProfile};
pub use render::{Diagnostics, JsonFormat, OutlineResult, PersonaResult};

use std::path::Path;

/// Extract the outline from one document's spans with default options.
///
/// # Example
///
/// ```
/// use docoutline::extract_outline;
///
/// let outline = extract_outline(&[]);
/// assert!(outline.title.is_empty());
/// assert!(outline.outline.is_empty());
/// ```
pub fn extract_outline(spans: &[TextSpan]) -> OutlineResult {
    extract_outline_with_options(spans, &AnalysisOptions::default())
}

/// Extract the outline with custom options.
///
/// # Example
///
/// ```
/// use docoutline::{extract_outline_with_options, AnalysisOptions, YAxis};
///
/// let options = AnalysisOptions::new().with_y_axis(YAxis::BottomUp);
/// let outline = extract_outline_with_options(&[], &options);
/// assert!(outline.outline.is_empty());
/// ```
pub fn extract_outline_with_options(spans: &[TextSpan], options: &AnalysisOptions) -> OutlineResult {
    let document = SpanDocument::new("document", spans.to_vec());
    analyze_document(&document, options).to_outline_result()
}

/// Load a span file and extract its outline.
///
/// # Example
///
/// ```no_run
/// use docoutline::outline_file;
///
/// let outline = outline_file("report.json").unwrap();
/// println!("{}", outline.title);
/// ```
pub fn outline_file<P: AsRef<Path>>(path: P) -> Result<OutlineResult> {
    let document = load_spans(path)?;
    Ok(analyze_document(&document, &AnalysisOptions::default()).to_outline_result())
}

/// Rank sections of a document collection for a persona.
///
/// # Example
///
/// ```
/// use docoutline::{rank_sections, PersonaConfig, SpanDocument};
///
/// let config = PersonaConfig::new("Travel Planner", "Plan a four-day trip");
/// let result = rank_sections(&[SpanDocument::new("guide.pdf", vec![])], &config);
/// assert!(result.extracted_sections.is_empty());
/// ```
pub fn rank_sections(documents: &[SpanDocument], config: &PersonaConfig) -> PersonaResult {
    Outliner::new().rank(documents, config)
}

/// Builder for outline extraction and persona ranking.
///
/// # Example
///
/// ```
/// use docoutline::{DocumentType, Outliner, PageSelection};
///
/// let outline = Outliner::new()
///     .with_document_type(DocumentType::Research)
///     .with_pages(PageSelection::Range(1..=10))
///     .outline(&[]);
/// assert!(outline.outline.is_empty());
/// ```
pub struct Outliner {
    analysis_options: AnalysisOptions,
    selection_options: SelectionOptions,
}

impl Outliner {
    /// Create a new Outliner builder.
    pub fn new() -> Self {
        Self {
            analysis_options: AnalysisOptions::default(),
            selection_options: SelectionOptions::default(),
        }
    }

    /// Set the document genre.
    pub fn with_document_type(mut self, doc_type: DocumentType) -> Self {
        self.analysis_options = self.analysis_options.with_document_type(doc_type);
        self
    }

    /// Set the coordinate orientation of incoming spans.
    pub fn with_y_axis(mut self, y_axis: YAxis) -> Self {
        self.analysis_options = self.analysis_options.with_y_axis(y_axis);
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.analysis_options = self.analysis_options.with_pages(pages);
        self
    }

    /// Set classifier options.
    pub fn with_classifier(mut self, classifier: ClassifierOptions) -> Self {
        self.analysis_options = self.analysis_options.with_classifier(classifier);
        self
    }

    /// Disable title detection.
    pub fn without_title(mut self) -> Self {
        self.analysis_options = self.analysis_options.with_title_detection(false);
        self
    }

    /// Set the number of ranked sections.
    pub fn with_top(mut self, count: usize) -> Self {
        self.selection_options = self.selection_options.with_desired_count(count);
        self
    }

    /// Set the number of snippets per ranked section.
    pub fn with_snippets(mut self, count: usize) -> Self {
        self.selection_options = self.selection_options.with_snippets_per_section(count);
        self
    }

    /// Analyze one document in outline mode.
    pub fn analyze(&self, document: &SpanDocument) -> DocumentAnalysis {
        let options = self.analysis_options.clone().with_mode(AnalysisMode::Outline);
        analyze_document(document, &options)
    }

    /// Extract the outline from spans.
    pub fn outline(&self, spans: &[TextSpan]) -> OutlineResult {
        self.analyze(&SpanDocument::new("document", spans.to_vec()))
            .to_outline_result()
    }

    /// Analyze a collection in section mode and keep the full analysis.
    pub fn analyze_collection(
        &self,
        documents: &[SpanDocument],
        config: &PersonaConfig,
    ) -> CollectionAnalysis {
        let options = self.analysis_options.clone().with_mode(AnalysisMode::Sections);
        analyze_collection(documents, config, &options, &self.selection_options)
    }

    /// Rank sections of a collection for a persona.
    pub fn rank(&self, documents: &[SpanDocument], config: &PersonaConfig) -> PersonaResult {
        self.analyze_collection(documents, config)
            .to_persona_result(config)
    }
}

impl Default for Outliner {
    fn default() -> Self {
        Self::new()
    }
}
