//! Text cleanup for span and snippet text.
//!
//! Spans get the light [`CleanupPreset::Minimal`] pass while they are grouped
//! into lines. Snippets, which join several lines, additionally get broken
//! words rejoined and running page numbers removed.

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Cleanup preset levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CleanupPreset {
    /// Per-span cleanup: compatibility folding, invisible characters, whitespace
    #[default]
    Minimal,
    /// Snippet cleanup: minimal plus hyphenation repair and page-number removal
    Standard,
}

/// Options for text cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupOptions {
    /// NFKC folding: ligatures, full-width digits and other compatibility forms
    pub fold_compatibility: bool,
    /// Drop private-use glyphs, replacement characters, soft hyphens and zero-width marks
    pub strip_invisible: bool,
    /// Rejoin words hyphenated across a line break
    pub join_hyphenated: bool,
    /// Drop lines that only carry a page number ("12", "- 12 -", "Page 3 of 10")
    pub drop_page_numbers: bool,
    /// Collapse runs of whitespace within a line
    pub collapse_whitespace: bool,
}

impl CleanupOptions {
    /// Create options from a preset.
    pub fn from_preset(preset: CleanupPreset) -> Self {
        let minimal = Self {
            fold_compatibility: true,
            strip_invisible: true,
            join_hyphenated: false,
            drop_page_numbers: false,
            collapse_whitespace: true,
        };
        match preset {
            CleanupPreset::Minimal => minimal,
            CleanupPreset::Standard => Self {
                join_hyphenated: true,
                drop_page_numbers: true,
                ..minimal
            },
        }
    }
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self::from_preset(CleanupPreset::Minimal)
    }
}

/// Text cleanup pipeline.
pub struct CleanupPipeline {
    options: CleanupOptions,
    page_number: Regex,
    broken_word: Regex,
}

impl CleanupPipeline {
    /// Create a new cleanup pipeline with the given options.
    pub fn new(options: CleanupOptions) -> Self {
        Self {
            options,
            page_number: Regex::new(r"(?i)^(?:[-–—]\s*)?(?:page\s+)?\d{1,4}(?:\s*(?:of|/)\s*\d{1,4})?(?:\s*[-–—])?$")
                .expect("static page number pattern"),
            broken_word: Regex::new(r"(\p{Ll})-\n(\p{Ll})").expect("static hyphenation pattern"),
        }
    }

    /// Create a pipeline from a preset.
    pub fn from_preset(preset: CleanupPreset) -> Self {
        Self::new(CleanupOptions::from_preset(preset))
    }

    /// Clean text, keeping its line structure.
    pub fn process(&self, text: &str) -> String {
        let folded: String = if self.options.fold_compatibility {
            text.nfkc().collect()
        } else {
            text.to_string()
        };

        let mut lines: Vec<String> = folded
            .lines()
            .map(|line| {
                let kept = line
                    .chars()
                    .filter(|c| !(self.options.strip_invisible && is_invisible(*c)));
                if self.options.collapse_whitespace {
                    kept.collect::<String>()
                        .split_whitespace()
                        .collect::<Vec<_>>()
                        .join(" ")
                } else {
                    kept.collect::<String>().trim().to_string()
                }
            })
            .filter(|line| !line.is_empty())
            .collect();

        if self.options.drop_page_numbers {
            lines.retain(|line| !self.page_number.is_match(line));
        }

        let mut result = lines.join("\n");
        if self.options.join_hyphenated {
            result = self.broken_word.replace_all(&result, "$1$2").into_owned();
        }
        result
    }

    /// Clean text and fold it onto a single line.
    pub fn process_inline(&self, text: &str) -> String {
        self.process(text)
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for CleanupPipeline {
    fn default() -> Self {
        Self::new(CleanupOptions::default())
    }
}

/// Characters with no visible rendering that extractors leave behind.
fn is_invisible(c: char) -> bool {
    matches!(c,
        '\u{FFFD}' | '\u{00AD}' | '\u{200B}'..='\u{200D}' | '\u{FEFF}'
        | '\u{E000}'..='\u{F8FF}' | '\u{F0000}'..='\u{FFFFD}' | '\u{100000}'..='\u{10FFFD}')
        || (c.is_control() && c != '\n' && c != '\t')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compatibility_folding() {
        let pipeline = CleanupPipeline::default();
        assert_eq!(pipeline.process("\u{FB01}nancial"), "financial");
        // Full-width digits fold to ASCII
        assert_eq!(pipeline.process("１．概要"), "1.概要");
    }

    #[test]
    fn test_collapse_whitespace() {
        let pipeline = CleanupPipeline::default();
        assert_eq!(pipeline.process("  a \t  b  \n\n c "), "a b\nc");
    }

    #[test]
    fn test_strip_invisible() {
        let pipeline = CleanupPipeline::default();
        assert_eq!(pipeline.process("ab\u{FFFD}c\u{E000}\u{200B}"), "abc");
    }

    #[test]
    fn test_standard_repairs_snippets() {
        let pipeline = CleanupPipeline::from_preset(CleanupPreset::Standard);
        assert_eq!(
            pipeline.process_inline("infor-\nmation retrieval\n12\nPage 3 of 10\nworks"),
            "information retrieval works"
        );
    }

    #[test]
    fn test_standard_keeps_numbers_inside_text() {
        let pipeline = CleanupPipeline::from_preset(CleanupPreset::Standard);
        assert_eq!(pipeline.process("Revenue rose 12 percent"), "Revenue rose 12 percent");
        assert_eq!(pipeline.process("Well-known"), "Well-known");
    }

    #[test]
    fn test_minimal_keeps_page_numbers() {
        let pipeline = CleanupPipeline::from_preset(CleanupPreset::Minimal);
        assert_eq!(pipeline.process("12"), "12");
    }
}
