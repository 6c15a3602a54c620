//! End-to-end analysis: spans to outline, sections to ranked persona output.

use std::collections::BTreeSet;

use crate::detect::{detect_document_type, detect_language, DocumentType, Language};
use crate::input::{PersonaConfig, SpanDocument};
use crate::layout::{FontProfile, SpanNormalizer};
use crate::model::{HeadingCandidate, Line, OutlineEntry, ScoredSection, Section};
use crate::options::{AnalysisOptions, SelectionOptions, WeightProfile};
use crate::outline::{
    detect_title, enforce_hierarchy, normalize_heading, to_outline, HeadingClassifier,
    HeadingPatterns, SectionExtractor,
};
use crate::relevance::{
    select_sections, BoilerplateIndex, PersonaProfile, RelevanceScorer, Snippet, SnippetExtractor,
};
use crate::render::{
    Diagnostics, ExtractedSection, Metadata, OutlineResult, PersonaResult, SubsectionAnalysis,
};

/// Characters sampled for language and document-type detection.
const DETECTION_SAMPLE_CHARS: usize = 20_000;

/// Everything derived from one document.
#[derive(Debug, Clone)]
pub struct DocumentAnalysis {
    /// Document identifier
    pub document: String,
    /// Detected or supplied title; empty when neither exists
    pub title: String,
    /// Final outline entries
    pub outline: Vec<OutlineEntry>,
    /// Enforced heading candidates backing the outline
    pub headings: Vec<HeadingCandidate>,
    /// Sections, including a preamble when content precedes the first heading
    pub sections: Vec<Section>,
    /// Normalized lines in reading order
    pub lines: Vec<Line>,
    /// Font statistics
    pub font_profile: FontProfile,
    /// Detected script
    pub language: Language,
    /// Configured or detected genre
    pub document_type: DocumentType,
    /// Input handling counters
    pub diagnostics: Diagnostics,
}

impl DocumentAnalysis {
    /// Weight profile for this document's genre.
    pub fn weights(&self) -> WeightProfile {
        WeightProfile::for_type(self.document_type)
    }

    /// Outline output record.
    pub fn to_outline_result(&self) -> OutlineResult {
        OutlineResult::new(self.title.clone(), self.outline.clone())
    }
}

/// Analyze one document.
///
/// Never fails: unusable spans are dropped and counted, and an input with
/// no usable text yields an empty outline.
pub fn analyze_document(document: &SpanDocument, options: &AnalysisOptions) -> DocumentAnalysis {
    let mut diagnostics = Diagnostics {
        document_count: 1,
        span_count: document.spans.len() as u32,
        malformed_records: document.malformed_records as u32,
        ..Diagnostics::default()
    };

    let normalizer = SpanNormalizer::new(&options.normalizer, &options.pages);
    let normalized = normalizer.normalize(&document.spans);
    diagnostics.dropped_spans = normalized.dropped_spans as u32;
    diagnostics.degraded_spans = normalized.degraded_spans as u32;
    if normalized.degraded_spans > 0 {
        log::warn!(
            "{}: {} spans lack font metadata and are treated as body text",
            document.name,
            normalized.degraded_spans
        );
    }

    let lines = normalized.lines;
    diagnostics.line_count = lines.len() as u32;
    diagnostics.page_count = lines.iter().map(|l| l.page).collect::<BTreeSet<_>>().len() as u32;

    let font_profile = FontProfile::from_lines(&lines, options.size_bucket, options.sparse_line_threshold);
    let sample = detection_sample(&lines);
    let language = detect_language(&sample);
    let document_type = match options.document_type {
        DocumentType::Auto => detect_document_type(&sample),
        configured => configured,
    };
    log::debug!(
        "{}: {} lines, language {:?}, type {:?}",
        document.name,
        lines.len(),
        language,
        document_type
    );

    let patterns = HeadingPatterns::new();
    let detected = if options.detect_title {
        detect_title(&lines, &font_profile, &patterns, language)
    } else {
        None
    };

    let classifier = HeadingClassifier::new(
        &font_profile,
        &options.classifier,
        &patterns,
        WeightProfile::for_type(document_type),
        options.mode,
        language,
    );
    let mut candidates = classifier.classify(&lines);
    if let Some(title) = &detected {
        let title_text = normalize_heading(&title.text);
        candidates.retain(|c| {
            !(c.line_index..c.end_index()).any(|i| title.covers(i))
                && normalize_heading(&c.text) != title_text
        });
    }

    let headings = enforce_hierarchy(candidates);
    let outline = to_outline(&headings);

    let title = detected
        .as_ref()
        .map(|t| t.text.clone())
        .or_else(|| document.title.clone())
        .unwrap_or_default();
    let preamble_title = if title.is_empty() {
        document.name.as_str()
    } else {
        title.as_str()
    };

    let title_lines = detected
        .as_ref()
        .map_or(0..0, |t| t.line_index..t.line_index + t.line_count);
    let sections = SectionExtractor::new(&document.name, &lines)
        .with_title_lines(title_lines)
        .extract(&headings, preamble_title);

    diagnostics.heading_count = outline.len() as u32;
    diagnostics.section_count = sections.len() as u32;

    DocumentAnalysis {
        document: document.name.clone(),
        title,
        outline,
        headings,
        sections,
        lines,
        font_profile,
        language,
        document_type,
        diagnostics,
    }
}

fn detection_sample(lines: &[Line]) -> String {
    let mut sample = String::new();
    for line in lines {
        if sample.len() >= DETECTION_SAMPLE_CHARS {
            break;
        }
        sample.push_str(&line.text);
        sample.push('\n');
    }
    sample
}

/// Ranked sections and snippets for a document collection.
#[derive(Debug, Clone)]
pub struct CollectionAnalysis {
    /// Per-document analyses in input order
    pub documents: Vec<DocumentAnalysis>,
    /// Keyword profile used for scoring
    pub profile: PersonaProfile,
    /// Selected sections in rank order
    pub selected: Vec<ScoredSection>,
    /// Snippets for the selected sections, in rank order
    pub snippets: Vec<Snippet>,
    /// Aggregated counters
    pub diagnostics: Diagnostics,
}

impl CollectionAnalysis {
    /// Persona output record for a configuration.
    pub fn to_persona_result(&self, config: &PersonaConfig) -> PersonaResult {
        let input_documents = if config.documents.is_empty() {
            self.documents.iter().map(|d| d.document.clone()).collect()
        } else {
            config.document_names()
        };

        PersonaResult {
            metadata: Metadata::new(input_documents, &config.persona, &config.job_to_be_done),
            extracted_sections: self.selected.iter().map(ExtractedSection::from).collect(),
            subsection_analysis: self.snippets.iter().map(SubsectionAnalysis::from).collect(),
        }
    }
}

/// Analyze every document, then score and select sections for the persona.
///
/// A missing persona or task is not an error: the keyword set is empty,
/// ranking falls back to structural quality and a warning is logged.
pub fn analyze_collection(
    documents: &[SpanDocument],
    config: &PersonaConfig,
    analysis: &AnalysisOptions,
    selection: &SelectionOptions,
) -> CollectionAnalysis {
    let mut diagnostics = Diagnostics::new();
    let profile = if config.is_complete() {
        PersonaProfile::new(&config.persona, &config.job_to_be_done)
    } else {
        log::warn!("Persona or job_to_be_done missing; ranking by structure only");
        diagnostics.config_invalid = true;
        PersonaProfile::default()
    };

    let analyses: Vec<DocumentAnalysis> = documents
        .iter()
        .map(|doc| analyze_document(doc, analysis))
        .collect();
    for doc in &analyses {
        diagnostics.merge(&doc.diagnostics);
    }

    let all_sections: Vec<Section> = analyses
        .iter()
        .flat_map(|a| a.sections.iter().cloned())
        .collect();
    let boilerplate = BoilerplateIndex::from_sections(&all_sections);
    let scorer = RelevanceScorer::new(&profile, &boilerplate);

    let scored: Vec<ScoredSection> = analyses
        .iter()
        .flat_map(|a| {
            let weights = a.weights();
            let scorer = &scorer;
            a.sections
                .iter()
                .map(move |s| ScoredSection::new(s.clone(), scorer.score(s, &weights)))
        })
        .collect();

    let selected = select_sections(scored, analyses.len(), selection);

    let extractor = SnippetExtractor::new(&profile, selection);
    let snippets: Vec<Snippet> = selected
        .iter()
        .flat_map(|s| extractor.extract(&s.section))
        .collect();

    log::info!(
        "Ranked {} sections from {} documents",
        selected.len(),
        analyses.len()
    );

    CollectionAnalysis {
        documents: analyses,
        profile,
        selected,
        snippets,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HeadingLevel, TextSpan};

    fn body(spans: &mut Vec<TextSpan>, page: u32, y: &mut f32, count: usize) {
        for i in 0..count {
            spans.push(TextSpan::new(
                format!("regular paragraph text line {} with several words", i),
                page,
                72.0,
                *y,
                10.0,
            ));
            *y += 12.0;
        }
    }

    #[test]
    fn test_title_excluded_from_outline() {
        let mut spans = vec![TextSpan::new("Quarterly Market Review", 1, 72.0, 40.0, 24.0)];
        let mut y = 90.0;
        body(&mut spans, 1, &mut y, 3);
        spans.push(TextSpan::new("Market Conditions", 1, 72.0, y + 10.0, 16.0).bold());
        y += 40.0;
        body(&mut spans, 1, &mut y, 10);

        let analysis = analyze_document(&SpanDocument::new("q.pdf", spans), &AnalysisOptions::default());
        assert_eq!(analysis.title, "Quarterly Market Review");
        assert_eq!(
            analysis.outline,
            vec![OutlineEntry::new(HeadingLevel::H1, "Market Conditions", 1)]
        );
        // Preamble plus one heading section
        assert_eq!(analysis.sections.len(), 2);
        assert_eq!(analysis.sections[0].title.text, "Quarterly Market Review");
        assert_eq!(analysis.sections[0].content.len(), 3);
    }

    #[test]
    fn test_empty_input_gives_empty_outline() {
        let analysis = analyze_document(&SpanDocument::new("empty.pdf", vec![]), &AnalysisOptions::default());
        assert!(analysis.outline.is_empty());
        assert!(analysis.title.is_empty());
        assert!(analysis.sections.is_empty());
        assert_eq!(analysis.to_outline_result(), OutlineResult::empty());
    }

    #[test]
    fn test_supplied_title_used_when_none_detected() {
        let mut spans = Vec::new();
        let mut y = 50.0;
        body(&mut spans, 1, &mut y, 6);
        let doc = SpanDocument::new("plain.pdf", spans).with_title("Plain Notes");
        let analysis = analyze_document(&doc, &AnalysisOptions::default());
        assert_eq!(analysis.title, "Plain Notes");
        assert_eq!(analysis.sections[0].title.text, "Plain Notes");
    }

    #[test]
    fn test_incomplete_config_is_flagged() {
        let mut spans = Vec::new();
        let mut y = 50.0;
        body(&mut spans, 1, &mut y, 6);
        let docs = vec![SpanDocument::new("a.pdf", spans)];
        let config = PersonaConfig::new("", "").with_document("a.pdf");

        let result = analyze_collection(&docs, &config, &AnalysisOptions::sections(), &SelectionOptions::default());
        assert!(result.diagnostics.config_invalid);
        assert!(result.profile.is_empty());
        assert_eq!(result.selected.len(), 1);
        assert_eq!(result.to_persona_result(&config).metadata.input_documents, vec!["a.pdf"]);
    }

    #[test]
    fn test_missing_persona_ignores_task_keywords() {
        let mut spans = Vec::new();
        let mut y = 50.0;
        body(&mut spans, 1, &mut y, 6);
        let docs = vec![SpanDocument::new("a.pdf", spans)];
        let config = PersonaConfig::new("", "Analyze revenue trends").with_document("a.pdf");

        let result = analyze_collection(&docs, &config, &AnalysisOptions::sections(), &SelectionOptions::default());
        assert!(result.diagnostics.config_invalid);
        assert!(result.profile.is_empty());
    }
}
