//! Refined text snippets for selected sections.

use super::keywords::{keyword_tokens, tokenize, PersonaProfile};
use crate::cleanup::{CleanupPipeline, CleanupPreset};
use crate::layout::{group_lines_into_blocks, TextBlock};
use crate::model::Section;
use crate::options::SelectionOptions;

/// A paragraph extracted from a selected section.
#[derive(Debug, Clone, PartialEq)]
pub struct Snippet {
    /// Source document identifier
    pub document: String,
    /// Cleaned, length-limited paragraph text
    pub text: String,
    /// Page of the paragraph
    pub page: u32,
}

/// Picks the most keyword-dense paragraphs of a section.
pub struct SnippetExtractor<'a> {
    profile: &'a PersonaProfile,
    options: &'a SelectionOptions,
    cleanup: CleanupPipeline,
}

impl<'a> SnippetExtractor<'a> {
    /// Create an extractor.
    pub fn new(profile: &'a PersonaProfile, options: &'a SelectionOptions) -> Self {
        Self {
            profile,
            options,
            cleanup: CleanupPipeline::from_preset(CleanupPreset::Standard),
        }
    }

    /// Top paragraphs of a section, best first.
    pub fn extract(&self, section: &Section) -> Vec<Snippet> {
        let mut blocks: Vec<(f32, TextBlock<'_>)> = group_lines_into_blocks(&section.content)
            .into_iter()
            .filter(|b| !b.is_empty())
            .map(|b| (self.density(&b.text()), b))
            .collect();
        blocks.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        blocks
            .into_iter()
            .filter_map(|(_, block)| {
                let cleaned = self.cleanup.process_inline(&block.text());
                if cleaned.is_empty() {
                    return None;
                }
                Some(Snippet {
                    document: section.document.clone(),
                    text: truncate_at_word(&cleaned, self.options.max_snippet_chars),
                    page: block.page(),
                })
            })
            .take(self.options.snippets_per_section)
            .collect()
    }

    fn density(&self, text: &str) -> f32 {
        let total = tokenize(text).len();
        if total == 0 {
            return 0.0;
        }
        let hits: f32 = keyword_tokens(text)
            .iter()
            .filter_map(|t| self.profile.weight(t))
            .sum();
        hits / total as f32
    }
}

/// Cut text to at most `max_chars` characters, backing up to a word boundary.
pub fn truncate_at_word(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    match cut.rfind(char::is_whitespace) {
        Some(pos) if pos > 0 => cut[..pos].trim_end().to_string(),
        _ => cut,
    }
}
