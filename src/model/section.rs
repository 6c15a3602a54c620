//! Sections: a heading plus the content lines it governs.

use super::{Line, OutlineEntry};

/// A heading and its associated content span.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    /// Source document identifier
    pub document: String,
    /// Governing heading
    pub title: OutlineEntry,
    /// Page of the heading
    pub page: u32,
    /// Content lines in reading order; each keeps its originating page
    pub content: Vec<Line>,
    /// Page of the last content line (or of the heading when empty)
    pub bounds_end_page: u32,
    /// Position of the section within its document
    pub ordinal: usize,
}

impl Section {
    /// Content as newline-separated text.
    pub fn content_text(&self) -> String {
        self.content
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Whitespace-separated word count of the content.
    pub fn word_count(&self) -> usize {
        self.content.iter().map(|l| l.word_count()).sum()
    }

    /// Check if the section has no content lines.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// First sentence of the content, used for near-duplicate detection.
    ///
    /// `.`, `!` and `?` end a sentence only before whitespace or the end of
    /// the text, so decimals like "91.5" stay intact.
    pub fn first_sentence(&self) -> String {
        let text = self
            .content
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let mut chars = text.char_indices().peekable();
        while let Some((pos, c)) = chars.next() {
            let ends = match c {
                '。' => true,
                '.' | '!' | '?' => chars.peek().map_or(true, |(_, next)| next.is_whitespace()),
                _ => false,
            };
            if ends {
                return text[..pos].to_string();
            }
        }
        text
    }
}

/// A section with its relevance score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSection {
    /// The scored section
    pub section: Section,
    /// Relevance score
    pub score: f32,
    /// 1-based rank, assigned by the selector
    pub rank_position: Option<usize>,
}

impl ScoredSection {
    /// Wrap a section with a score and no rank yet.
    pub fn new(section: Section, score: f32) -> Self {
        Self {
            section,
            score,
            rank_position: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HeadingLevel, TextSpan};

    fn section_with(lines: &[&str]) -> Section {
        Section {
            document: "a.pdf".to_string(),
            title: OutlineEntry::new(HeadingLevel::H1, "Results", 3),
            page: 3,
            content: lines
                .iter()
                .enumerate()
                .map(|(i, t)| Line::from_spans(vec![TextSpan::new(*t, 3, 0.0, i as f32 * 12.0, 10.0)]))
                .collect(),
            bounds_end_page: 3,
            ordinal: 0,
        }
    }

    #[test]
    fn test_first_sentence() {
        let section = section_with(&["Accuracy rose to 91 percent", "on the test set. Later runs"]);
        assert_eq!(section.first_sentence(), "Accuracy rose to 91 percent on the test set");
    }

    #[test]
    fn test_first_sentence_keeps_decimals() {
        let section = section_with(&["Revenue rose 91.5 percent. Costs fell"]);
        assert_eq!(section.first_sentence(), "Revenue rose 91.5 percent");

        let section = section_with(&["See v2.1 notes", "for details"]);
        assert_eq!(section.first_sentence(), "See v2.1 notes for details");
    }

    #[test]
    fn test_word_count_and_text() {
        let section = section_with(&["one two", "three"]);
        assert_eq!(section.word_count(), 3);
        assert_eq!(section.content_text(), "one two\nthree");
        assert!(!section.is_empty());
    }
}
