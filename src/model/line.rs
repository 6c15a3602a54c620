//! Logical text lines built from spans sharing a baseline.

use std::collections::HashMap;

use super::{BBox, TextSpan};

/// A text line composed of spans on the same baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// The spans in this line, sorted by X position
    pub spans: Vec<TextSpan>,
    /// Combined text with inferred word spacing
    pub text: String,
    /// Dominant font size; `None` when no span carries font metadata
    pub font_size: Option<f32>,
    /// Whether the line is predominantly bold
    pub is_bold: bool,
    /// Page number
    pub page: u32,
    /// Bounding box of all spans
    pub bbox: BBox,
}

impl Line {
    /// Create a new line from spans. Spans are reordered left to right.
    pub fn from_spans(mut spans: Vec<TextSpan>) -> Self {
        if spans.is_empty() {
            return Self {
                spans: vec![],
                text: String::new(),
                font_size: None,
                is_bold: false,
                page: 0,
                bbox: BBox::default(),
            };
        }

        spans.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));

        let bbox = spans
            .iter()
            .skip(1)
            .fold(spans[0].bbox(), |acc, s| acc.union(&s.bbox()));
        let page = spans[0].page;
        let font_size = dominant_size(&spans);
        let is_bold = majority_bold(&spans);
        let text = join_spans(&spans);

        Self {
            spans,
            text,
            font_size,
            is_bold,
            page,
            bbox,
        }
    }

    /// Check if the line appears to be uppercase.
    pub fn is_uppercase(&self) -> bool {
        let letters: Vec<char> = self.text.chars().filter(|c| c.is_alphabetic()).collect();
        !letters.is_empty() && letters.iter().all(|c| c.is_uppercase())
    }

    /// Whitespace-separated word count.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Whether the line carries usable font metadata.
    pub fn has_font_metadata(&self) -> bool {
        self.font_size.is_some()
    }
}

/// Size covering the most characters; ties go to the larger size.
fn dominant_size(spans: &[TextSpan]) -> Option<f32> {
    let mut weights: HashMap<i32, (f32, usize)> = HashMap::new();
    for span in spans {
        if let Some(size) = span.usable_font_size() {
            let key = (size * 10.0).round() as i32;
            let entry = weights.entry(key).or_insert((size, 0));
            entry.1 += span.text.chars().count().max(1);
        }
    }

    weights
        .into_values()
        .max_by(|a, b| {
            a.1.cmp(&b.1)
                .then(a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
        })
        .map(|(size, _)| size)
}

fn majority_bold(spans: &[TextSpan]) -> bool {
    let bold_chars: usize = spans
        .iter()
        .filter(|s| s.is_bold_face())
        .map(|s| s.text.chars().count())
        .sum();
    let total_chars: usize = spans.iter().map(|s| s.text.chars().count()).sum();
    total_chars > 0 && bold_chars as f32 / total_chars as f32 > 0.5
}

/// Join span texts, inserting spaces where the X gap suggests a word break.
///
/// No space is inserted between adjacent CJK characters.
fn join_spans(spans: &[TextSpan]) -> String {
    let mut result = String::new();

    for (i, span) in spans.iter().enumerate() {
        if i == 0 {
            result.push_str(&span.text);
            continue;
        }

        let prev_span = &spans[i - 1];
        let gap = span.x - prev_span.bbox().right();

        let char_count = span.text.chars().count();
        let avg_char_width = if char_count > 0 && span.width > 0.0 {
            span.width / char_count as f32
        } else {
            span.nominal_size() * 0.5
        };
        let space_threshold = avg_char_width * 0.2;

        let should_insert_space = if gap > space_threshold {
            let prev_is_cjk = prev_span
                .text
                .chars()
                .last()
                .map(is_spaceless_script_char)
                .unwrap_or(false);
            let curr_is_cjk = span
                .text
                .chars()
                .next()
                .map(is_spaceless_script_char)
                .unwrap_or(false);
            !(prev_is_cjk && curr_is_cjk)
        } else {
            false
        };

        let prev_ends_with_space = result.ends_with(' ') || result.ends_with('\u{00A0}');
        let curr_starts_with_space = span.text.starts_with(' ') || span.text.starts_with('\u{00A0}');

        if should_insert_space && !prev_ends_with_space && !curr_starts_with_space {
            result.push(' ');
        }

        result.push_str(&span.text);
    }

    result.trim().to_string()
}

/// Check if character is from a script that doesn't use word spaces.
///
/// Chinese and Japanese don't use spaces between words, but Korean does.
pub(crate) fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and Extension A
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    // CJK Unified Ideographs Extension B-F
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana, Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_spans_orders_and_joins() {
        let spans = vec![
            TextSpan::new("World", 1, 60.0, 100.0, 10.0).with_extent(25.0, 10.0),
            TextSpan::new("Hello", 1, 10.0, 100.0, 10.0).with_extent(25.0, 10.0),
        ];
        let line = Line::from_spans(spans);
        assert_eq!(line.text, "Hello World");
        assert_eq!(line.bbox.x, 10.0);
        assert_eq!(line.bbox.right(), 85.0);
    }

    #[test]
    fn test_no_space_between_touching_fragments() {
        let spans = vec![
            TextSpan::new("Intro", 1, 10.0, 100.0, 10.0).with_extent(25.0, 10.0),
            TextSpan::new("duction", 1, 35.0, 100.0, 10.0).with_extent(35.0, 10.0),
        ];
        assert_eq!(Line::from_spans(spans).text, "Introduction");
    }

    #[test]
    fn test_no_space_between_cjk() {
        let spans = vec![
            TextSpan::new("第一", 1, 10.0, 100.0, 10.0).with_extent(20.0, 10.0),
            TextSpan::new("章", 1, 40.0, 100.0, 10.0).with_extent(10.0, 10.0),
        ];
        assert_eq!(Line::from_spans(spans).text, "第一章");
    }

    #[test]
    fn test_dominant_size_and_bold() {
        let spans = vec![
            TextSpan::new("A", 1, 0.0, 0.0, 18.0).bold().with_extent(9.0, 18.0),
            TextSpan::new("longer body text", 1, 20.0, 0.0, 10.0).with_extent(80.0, 10.0),
        ];
        let line = Line::from_spans(spans);
        assert_eq!(line.font_size, Some(10.0));
        assert!(!line.is_bold);
    }

    #[test]
    fn test_degraded_line_has_no_size() {
        let spans = vec![TextSpan::new("lost", 2, 0.0, 0.0, 10.0).without_font_size()];
        let line = Line::from_spans(spans);
        assert!(!line.has_font_metadata());
        assert_eq!(line.page, 2);
    }

    #[test]
    fn test_is_uppercase() {
        let line = Line::from_spans(vec![TextSpan::new("TABLE OF CONTENTS", 1, 0.0, 0.0, 12.0)]);
        assert!(line.is_uppercase());
    }
}
