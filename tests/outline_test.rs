//! Integration tests for outline extraction.

use docoutline::{
    analyze_document, extract_outline, extract_outline_with_options, AnalysisOptions,
    HeadingLevel, OutlineEntry, Outliner, PageSelection, SpanDocument, TextSpan, YAxis,
};

const PAGE_HEIGHT: f32 = 792.0;

/// Builds spans top to bottom, one line per call.
struct SpanBuilder {
    spans: Vec<TextSpan>,
    page: u32,
    y: f32,
}

impl SpanBuilder {
    fn new() -> Self {
        Self {
            spans: Vec::new(),
            page: 1,
            y: 60.0,
        }
    }

    fn page(&mut self, page: u32) -> &mut Self {
        self.page = page;
        self.y = 60.0;
        self
    }

    fn line(&mut self, text: &str, size: f32, bold: bool) -> &mut Self {
        let mut span = TextSpan::new(text, self.page, 72.0, self.y, size).with_extent(300.0, size);
        if bold {
            span = span.bold();
        }
        self.spans.push(span);
        self.y += size * 1.4;
        self
    }

    fn body(&mut self, count: usize) -> &mut Self {
        for i in 0..count {
            self.line(
                &format!("paragraph text on page {} line {} keeps going", self.page, i),
                10.0,
                false,
            );
        }
        self
    }

    fn build(&self) -> Vec<TextSpan> {
        self.spans.clone()
    }
}

fn numbered_document() -> Vec<TextSpan> {
    SpanBuilder::new()
        .line("1. Introduction", 18.0, true)
        .body(8)
        .page(2)
        .line("1.1 Background", 14.0, true)
        .body(8)
        .build()
}

#[test]
fn test_numbered_headings_outline() {
    let outline = extract_outline(&numbered_document());

    assert_eq!(outline.title, "");
    assert_eq!(
        outline.outline,
        vec![
            OutlineEntry::new(HeadingLevel::H1, "1. Introduction", 1),
            OutlineEntry::new(HeadingLevel::H2, "1.1 Background", 2),
        ]
    );
}

#[test]
fn test_heading_on_last_line() {
    let spans = SpanBuilder::new()
        .line("1. Introduction", 18.0, true)
        .body(1)
        .page(2)
        .line("1.1 Background", 14.0, true)
        .build();

    let outline = extract_outline(&spans);
    assert_eq!(
        outline.outline,
        vec![
            OutlineEntry::new(HeadingLevel::H1, "1. Introduction", 1),
            OutlineEntry::new(HeadingLevel::H2, "1.1 Background", 2),
        ]
    );
}

#[test]
fn test_span_order_does_not_matter() {
    let mut spans = numbered_document();
    spans.reverse();

    let outline = extract_outline(&spans);
    assert_eq!(outline.outline.len(), 2);
    assert_eq!(outline.outline[0].text, "1. Introduction");
}

#[test]
fn test_bottom_up_coordinates() {
    let flipped: Vec<TextSpan> = numbered_document()
        .into_iter()
        .map(|mut span| {
            span.y = PAGE_HEIGHT - span.y - span.height;
            span
        })
        .collect();

    let options = AnalysisOptions::new().with_y_axis(YAxis::BottomUp);
    let outline = extract_outline_with_options(&flipped, &options);
    assert_eq!(outline, extract_outline(&numbered_document()));
}

#[test]
fn test_levels_never_jump() {
    let spans = SpanBuilder::new()
        .body(3)
        .line("Regional Detail", 16.0, true)
        .body(6)
        .line("Market Summary", 20.0, true)
        .body(6)
        .line("Local Notes", 12.5, true)
        .body(6)
        .line("Pricing Outlook", 16.0, true)
        .body(6)
        .build();

    let outline = extract_outline(&spans);
    assert!(!outline.outline.is_empty());
    assert_eq!(outline.outline[0].level, HeadingLevel::H1);

    let mut depth = 0;
    for entry in &outline.outline {
        let level = entry.level.depth();
        assert!(level <= depth + 1, "{:?} jumps from depth {}", entry, depth);
        depth = level;
    }
}

#[test]
fn test_body_size_is_most_common_size() {
    let mut builder = SpanBuilder::new();
    builder.line("Findings", 16.0, true);
    for i in 0..30 {
        builder.line(&format!("main text line {} of the findings", i), 11.0, false);
    }
    for i in 0..5 {
        builder.line(&format!("footnote {}", i), 9.0, false);
    }

    let analysis = analyze_document(
        &SpanDocument::new("sizes.pdf", builder.build()),
        &AnalysisOptions::default(),
    );
    assert_eq!(analysis.font_profile.body_size, 11.0);
}

#[test]
fn test_sections_cover_every_line_once() {
    let spans = SpanBuilder::new()
        .body(2)
        .line("Scope", 15.0, true)
        .body(5)
        .page(2)
        .body(3)
        .line("Method Details", 15.0, true)
        .body(4)
        .page(3)
        .line("Results", 15.0, true)
        .body(5)
        .build();

    let options = AnalysisOptions::sections().with_title_detection(false);
    let analysis = analyze_document(&SpanDocument::new("cover.pdf", spans), &options);

    let content_lines: usize = analysis.sections.iter().map(|s| s.content.len()).sum();
    let heading_lines: usize = analysis.headings.iter().map(|h| h.line_count).sum();
    assert_eq!(content_lines + heading_lines, analysis.lines.len());

    // "Scope" runs across the page break into page 2
    let scope = analysis
        .sections
        .iter()
        .find(|s| s.title.text == "Scope")
        .unwrap();
    assert_eq!(scope.page, 1);
    assert_eq!(scope.bounds_end_page, 2);
    assert_eq!(scope.content.len(), 8);

    for section in &analysis.sections {
        for line in &section.content {
            assert!(line.page >= section.page && line.page <= section.bounds_end_page);
        }
    }
}

#[test]
fn test_spans_without_font_size_are_never_headings() {
    let mut spans = numbered_document();
    spans.push(TextSpan::new("Sizeless Closing Words", 2, 72.0, 400.0, 0.0).bold());
    spans.push(TextSpan::new("Another Sizeless Line", 2, 72.0, 420.0, 10.0).without_font_size());

    let analysis = analyze_document(&SpanDocument::new("degraded.pdf", spans), &AnalysisOptions::default());
    assert_eq!(analysis.diagnostics.degraded_spans, 2);
    assert_eq!(analysis.outline.len(), 2);
    assert!(analysis
        .outline
        .iter()
        .all(|e| !e.text.contains("Sizeless")));
}

#[test]
fn test_non_finite_spans_are_dropped() {
    let mut spans = numbered_document();
    spans.push(TextSpan::new("Broken Position", 1, f32::NAN, 10.0, 30.0));

    let analysis = analyze_document(&SpanDocument::new("nan.pdf", spans), &AnalysisOptions::default());
    assert_eq!(analysis.diagnostics.dropped_spans, 1);
    assert_eq!(analysis.outline.len(), 2);
}

#[test]
fn test_page_selection() {
    let outline = Outliner::new()
        .with_pages(PageSelection::Range(2..=2))
        .outline(&numbered_document());

    assert_eq!(outline.outline.len(), 1);
    assert_eq!(outline.outline[0].text, "1.1 Background");
    assert_eq!(outline.outline[0].page, 2);
    // A lone deeper heading is promoted to the top level
    assert_eq!(outline.outline[0].level, HeadingLevel::H1);
}

#[test]
fn test_title_detection_and_opt_out() {
    let spans = SpanBuilder::new()
        .line("Annual Strategy Report", 26.0, true)
        .body(3)
        .line("Key Priorities", 16.0, true)
        .body(10)
        .build();

    let with_title = extract_outline(&spans);
    assert_eq!(with_title.title, "Annual Strategy Report");
    assert!(with_title
        .outline
        .iter()
        .all(|e| e.text != "Annual Strategy Report"));

    let without = Outliner::new().without_title().outline(&spans);
    assert_eq!(without.title, "");
}
