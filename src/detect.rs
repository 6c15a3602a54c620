//! Script and document-type detection.
//!
//! Both detections are cheap character/keyword heuristics run once per
//! document before heading classification.

use serde::{Deserialize, Serialize};

/// Dominant script of a document, which drives structural patterns and
/// word counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Latin script (default)
    #[default]
    En,
    /// Japanese (kana present)
    Ja,
    /// Chinese (ideographs without kana)
    Zh,
    /// Korean (Hangul)
    Ko,
    /// Arabic
    Ar,
}

impl Language {
    /// Whether words are not separated by spaces, so length is counted in characters.
    pub fn counts_characters(self) -> bool {
        matches!(self, Language::Ja | Language::Zh | Language::Ko)
    }

    /// Minimum heading length in characters.
    pub fn min_heading_chars(self) -> usize {
        if self.counts_characters() {
            2
        } else {
            3
        }
    }

    /// Heading length past which a line is penalized.
    pub fn long_heading_chars(self) -> usize {
        if self.counts_characters() {
            200
        } else {
            120
        }
    }

    /// Word count under this language's convention.
    pub fn word_count(self, text: &str) -> usize {
        if self.counts_characters() {
            text.chars().filter(|c| !c.is_whitespace()).count()
        } else {
            text.split_whitespace().count()
        }
    }
}

/// Detect the dominant script from character distribution.
pub fn detect_language(text: &str) -> Language {
    let mut japanese = 0usize;
    let mut cjk = 0usize;
    let mut korean = 0usize;
    let mut arabic = 0usize;
    let mut total = 0usize;

    for c in text.chars().filter(|c| c.is_alphabetic()) {
        total += 1;
        match c {
            '\u{3040}'..='\u{309F}' | '\u{30A0}'..='\u{30FF}' => {
                japanese += 1;
                cjk += 1;
            }
            '\u{4E00}'..='\u{9FAF}' => cjk += 1,
            '\u{AC00}'..='\u{D7AF}' => korean += 1,
            '\u{0600}'..='\u{06FF}' => arabic += 1,
            _ => {}
        }
    }

    if total == 0 {
        return Language::En;
    }

    let total = total as f32;
    if japanese as f32 > total * 0.1 {
        Language::Ja
    } else if korean as f32 > total * 0.2 {
        Language::Ko
    } else if cjk as f32 > total * 0.3 {
        Language::Zh
    } else if arabic as f32 > total * 0.2 {
        Language::Ar
    } else {
        Language::En
    }
}

/// Document genre used to select a weight profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    /// Detect from content cues
    #[default]
    Auto,
    /// No genre-specific weighting
    General,
    /// Papers, theses, studies
    Research,
    /// Reports, filings, proposals
    Business,
    /// Manuals, specifications, guides
    Technical,
}

const RESEARCH_CUES: &[&str] = &[
    "abstract",
    "methodology",
    "references",
    "related work",
    "literature review",
    "experiments",
    "hypothesis",
];
const BUSINESS_CUES: &[&str] = &[
    "revenue",
    "quarterly",
    "executive summary",
    "fiscal",
    "shareholders",
    "market share",
    "profit",
];
const TECHNICAL_CUES: &[&str] = &[
    "installation",
    "configuration",
    "api",
    "specification",
    "troubleshooting",
    "requirements",
    "version",
];

/// Detect the document genre from keyword cues; returns `General` when no
/// genre has at least two distinct cues.
pub fn detect_document_type(text: &str) -> DocumentType {
    let lower = text.to_lowercase();
    let hits = |cues: &[&str]| cues.iter().filter(|c| contains_word(&lower, c)).count();

    let scores = [
        (DocumentType::Research, hits(RESEARCH_CUES)),
        (DocumentType::Business, hits(BUSINESS_CUES)),
        (DocumentType::Technical, hits(TECHNICAL_CUES)),
    ];

    scores
        .iter()
        .filter(|(_, count)| *count >= 2)
        .max_by_key(|(_, count)| *count)
        .map(|(doc_type, _)| *doc_type)
        .unwrap_or(DocumentType::General)
}

/// Whole-word containment on lowercase text.
fn contains_word(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(pos, _)| {
        let before = haystack[..pos].chars().next_back();
        let after = haystack[pos + needle.len()..].chars().next();
        !before.is_some_and(|c| c.is_alphanumeric()) && !after.is_some_and(|c| c.is_alphanumeric())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_english() {
        assert_eq!(detect_language("The quick brown fox"), Language::En);
        assert_eq!(detect_language(""), Language::En);
        assert_eq!(detect_language("12345"), Language::En);
    }

    #[test]
    fn test_detect_japanese() {
        assert_eq!(detect_language("第一章 はじめに"), Language::Ja);
    }

    #[test]
    fn test_detect_chinese() {
        assert_eq!(detect_language("第一章 概述 系统设计"), Language::Zh);
    }

    #[test]
    fn test_detect_korean() {
        assert_eq!(detect_language("제1장 서론 개요"), Language::Ko);
    }

    #[test]
    fn test_word_count_cjk_counts_chars() {
        assert_eq!(Language::Zh.word_count("系统 设计"), 4);
        assert_eq!(Language::En.word_count("system design"), 2);
    }

    #[test]
    fn test_detect_document_type() {
        let research = "Abstract. We describe our methodology and list references.";
        assert_eq!(detect_document_type(research), DocumentType::Research);

        let business = "Executive summary: quarterly revenue grew.";
        assert_eq!(detect_document_type(business), DocumentType::Business);

        assert_eq!(detect_document_type("A short note."), DocumentType::General);
    }

    #[test]
    fn test_contains_word_boundaries() {
        assert!(contains_word("see the api docs", "api"));
        assert!(!contains_word("rapid growth", "api"));
    }
}
