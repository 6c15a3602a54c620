//! Section content extraction between heading boundaries.

use std::ops::Range;

use crate::model::{HeadingCandidate, HeadingLevel, Line, OutlineEntry, Section};

/// Slices a document's lines into sections, one per heading.
pub struct SectionExtractor<'a> {
    document: &'a str,
    lines: &'a [Line],
    title_lines: Range<usize>,
}

impl<'a> SectionExtractor<'a> {
    /// Create an extractor over one document's lines.
    pub fn new(document: &'a str, lines: &'a [Line]) -> Self {
        Self {
            document,
            lines,
            title_lines: 0..0,
        }
    }

    /// Lines holding the document title; they belong to no section's content.
    pub fn with_title_lines(mut self, range: Range<usize>) -> Self {
        self.title_lines = range;
        self
    }

    /// Extract sections for enforced headings, sorted by line index.
    ///
    /// Content runs from the line after a heading up to the next heading,
    /// crossing pages. Lines before the first heading become a preamble
    /// section titled `preamble_title`, so every non-heading line lands in
    /// exactly one section.
    pub fn extract(&self, headings: &[HeadingCandidate], preamble_title: &str) -> Vec<Section> {
        let mut sections = Vec::with_capacity(headings.len() + 1);

        let first_heading = headings.first().map_or(self.lines.len(), |h| h.line_index);
        let preamble = self.content(0..first_heading);
        if !preamble.is_empty() {
            let page = self
                .lines
                .get(self.title_lines.start)
                .filter(|_| !self.title_lines.is_empty())
                .map_or(preamble[0].page, |l| l.page);
            sections.push(self.section(
                OutlineEntry::new(HeadingLevel::H1, preamble_title, page),
                preamble,
                0,
            ));
        }

        for (i, heading) in headings.iter().enumerate() {
            let end = headings
                .get(i + 1)
                .map_or(self.lines.len(), |next| next.line_index);
            let content = self.content(heading.end_index().min(end)..end);
            let ordinal = sections.len();
            sections.push(self.section(OutlineEntry::from(heading), content, ordinal));
        }

        log::debug!("{}: {} sections", self.document, sections.len());
        sections
    }

    fn content(&self, range: Range<usize>) -> Vec<Line> {
        range
            .filter(|i| !self.title_lines.contains(i))
            .filter_map(|i| self.lines.get(i))
            .cloned()
            .collect()
    }

    fn section(&self, title: OutlineEntry, content: Vec<Line>, ordinal: usize) -> Section {
        let page = title.page;
        let bounds_end_page = content.last().map_or(page, |l| l.page);
        Section {
            document: self.document.to_string(),
            title,
            page,
            content,
            bounds_end_page,
            ordinal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TextSpan;

    fn lines(pages: &[u32]) -> Vec<Line> {
        pages
            .iter()
            .enumerate()
            .map(|(i, p)| {
                Line::from_spans(vec![TextSpan::new(format!("line {}", i), *p, 72.0, i as f32 * 14.0, 10.0)])
            })
            .collect()
    }

    fn heading(index: usize, page: u32) -> HeadingCandidate {
        HeadingCandidate {
            line_index: index,
            line_count: 1,
            text: format!("line {}", index),
            page,
            font_size: 16.0,
            level: Some(HeadingLevel::H1),
            confidence: 1.0,
            numbering_depth: None,
        }
    }

    #[test]
    fn test_content_spans_pages() {
        let lines = lines(&[1, 1, 1, 2, 2, 3]);
        let headings = vec![heading(0, 1), heading(4, 2)];
        let sections = SectionExtractor::new("doc.pdf", &lines).extract(&headings, "Doc");

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].content.len(), 3);
        assert_eq!(sections[0].bounds_end_page, 2);
        assert_eq!(sections[1].content_text(), "line 5");
        assert_eq!(sections[1].content[0].page, 3);
    }

    #[test]
    fn test_adjacent_headings_yield_empty_section() {
        let lines = lines(&[1, 1, 1]);
        let headings = vec![heading(0, 1), heading(1, 1)];
        let sections = SectionExtractor::new("doc.pdf", &lines).extract(&headings, "Doc");
        assert!(sections[0].is_empty());
        assert_eq!(sections[0].bounds_end_page, 1);
        assert_eq!(sections[1].content.len(), 1);
    }

    #[test]
    fn test_preamble_and_title_lines() {
        let lines = lines(&[1, 1, 1, 1, 2]);
        let headings = vec![heading(3, 1)];
        let sections = SectionExtractor::new("doc.pdf", &lines)
            .with_title_lines(0..1)
            .extract(&headings, "Report Title");

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title.text, "Report Title");
        assert_eq!(sections[0].content_text(), "line 1\nline 2");
        assert_eq!(sections[1].ordinal, 1);
    }

    #[test]
    fn test_no_headings_single_preamble() {
        let lines = lines(&[1, 2]);
        let sections = SectionExtractor::new("notes.pdf", &lines).extract(&[], "notes.pdf");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title.text, "notes.pdf");
        assert_eq!(sections[0].bounds_end_page, 2);
    }

    #[test]
    fn test_coverage_is_exact() {
        let lines = lines(&[1, 1, 1, 1, 2, 2, 2, 3, 3, 3]);
        let mut wrapped = heading(4, 2);
        wrapped.line_count = 2;
        let headings = vec![heading(2, 1), wrapped, heading(8, 3)];
        let sections = SectionExtractor::new("d", &lines).extract(&headings, "d");

        let mut covered: Vec<&str> = sections
            .iter()
            .flat_map(|s| s.content.iter().map(|l| l.text.as_str()))
            .collect();
        covered.sort_unstable();
        let mut expected: Vec<String> = (0..10)
            .filter(|i| !headings.iter().any(|h| h.covers(*i)))
            .map(|i| format!("line {}", i))
            .collect();
        expected.sort_unstable();
        assert_eq!(covered, expected);
    }
}
