//! Persona relevance scoring of sections.

use std::collections::{BTreeSet, HashMap, HashSet};

use super::keywords::{keyword_tokens, tokenize, PersonaProfile};
use crate::model::Section;
use crate::options::WeightProfile;

/// Pages a line must repeat on to count as boilerplate.
const BOILERPLATE_MIN_PAGES: usize = 3;

/// Lines repeated across pages within a document (running headers, footers).
#[derive(Debug, Clone, Default)]
pub struct BoilerplateIndex {
    lines: HashSet<(String, String)>,
}

impl BoilerplateIndex {
    /// Build the index from every section of a collection.
    pub fn from_sections(sections: &[Section]) -> Self {
        let mut pages: HashMap<(String, String), BTreeSet<u32>> = HashMap::new();
        for section in sections {
            for line in &section.content {
                let key = (section.document.clone(), normalize_line(&line.text));
                pages.entry(key).or_default().insert(line.page);
            }
        }

        let lines: HashSet<(String, String)> = pages
            .into_iter()
            .filter(|(key, pages)| !key.1.is_empty() && pages.len() >= BOILERPLATE_MIN_PAGES)
            .map(|(key, _)| key)
            .collect();
        if !lines.is_empty() {
            log::debug!("{} boilerplate lines detected", lines.len());
        }
        Self { lines }
    }

    /// Share of a section's content lines that are boilerplate.
    pub fn ratio(&self, section: &Section) -> f32 {
        if section.content.is_empty() || self.lines.is_empty() {
            return 0.0;
        }
        let repeated = section
            .content
            .iter()
            .filter(|l| {
                self.lines
                    .contains(&(section.document.clone(), normalize_line(&l.text)))
            })
            .count();
        repeated as f32 / section.content.len() as f32
    }
}

fn normalize_line(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Breakdown of one section's score.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreBreakdown {
    /// Distinct keywords in the title
    pub title_matches: usize,
    /// Weighted keyword occurrences per content token
    pub density: f32,
    /// Distinct expansion terms present
    pub semantic_indicators: usize,
    /// Length band bonus minus the boilerplate penalty
    pub quality_bonus: f32,
    /// Whether both role and task keywords matched
    pub cross_signal: bool,
    /// Final score
    pub total: f32,
}

/// Scores sections against a persona profile.
pub struct RelevanceScorer<'a> {
    profile: &'a PersonaProfile,
    boilerplate: &'a BoilerplateIndex,
}

impl<'a> RelevanceScorer<'a> {
    /// Create a scorer.
    pub fn new(profile: &'a PersonaProfile, boilerplate: &'a BoilerplateIndex) -> Self {
        Self {
            profile,
            boilerplate,
        }
    }

    /// Score a section under a document's weight profile.
    pub fn score(&self, section: &Section, weights: &WeightProfile) -> f32 {
        self.breakdown(section, weights).total
    }

    /// Score a section and report each component.
    pub fn breakdown(&self, section: &Section, weights: &WeightProfile) -> ScoreBreakdown {
        let title_tokens: BTreeSet<String> = keyword_tokens(&section.title.text).into_iter().collect();
        let content = section.content_text();
        let content_keywords = keyword_tokens(&content);
        let content_token_count = tokenize(&content).len();

        let title_matches = title_tokens
            .iter()
            .filter(|t| self.profile.weight(t).is_some())
            .count();

        let weighted_hits: f32 = content_keywords
            .iter()
            .filter_map(|t| self.profile.weight(t))
            .sum();
        let density = if content_token_count > 0 {
            weighted_hits / content_token_count as f32
        } else {
            0.0
        };

        let present: BTreeSet<&str> = title_tokens
            .iter()
            .chain(content_keywords.iter())
            .map(String::as_str)
            .collect();
        let semantic_indicators = present
            .iter()
            .filter(|t| self.profile.is_expansion(t))
            .count();
        let cross_signal = present.iter().any(|t| self.profile.role_keywords.contains(*t))
            && present.iter().any(|t| self.profile.task_keywords.contains(*t));

        let quality_bonus =
            length_bonus(section.word_count()) - 3.0 * self.boilerplate.ratio(section);

        let mut total = weights.title_weight * title_matches as f32
            + weights.density_weight * density
            + weights.semantic_weight * semantic_indicators as f32
            + quality_bonus;
        if cross_signal && total > 0.0 {
            total *= weights.cross_signal_multiplier;
        }

        ScoreBreakdown {
            title_matches,
            density,
            semantic_indicators,
            quality_bonus,
            cross_signal,
            total,
        }
    }
}

fn length_bonus(words: usize) -> f32 {
    match words {
        50..=400 => 2.0,
        20..=49 | 401..=1000 => 1.0,
        _ => -1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HeadingLevel, Line, OutlineEntry, TextSpan};

    fn section(document: &str, title: &str, body: &[(&str, u32)]) -> Section {
        let content: Vec<Line> = body
            .iter()
            .enumerate()
            .map(|(i, (text, page))| {
                Line::from_spans(vec![TextSpan::new(*text, *page, 72.0, i as f32 * 12.0, 10.0)])
            })
            .collect();
        let page = body.first().map_or(1, |(_, p)| *p);
        Section {
            document: document.to_string(),
            title: OutlineEntry::new(HeadingLevel::H1, title, page),
            page,
            bounds_end_page: content.last().map_or(page, |l| l.page),
            content,
            ordinal: 0,
        }
    }

    #[test]
    fn test_title_match_outweighs_unrelated_title() {
        let profile = PersonaProfile::new("Investment Analyst", "Analyze revenue trends");
        let index = BoilerplateIndex::default();
        let scorer = RelevanceScorer::new(&profile, &index);
        let weights = WeightProfile::default();

        let relevant = section("a.pdf", "Revenue Growth Analysis", &[("Analyst estimates show revenue rose in every region", 2)]);
        let glossary = section("a.pdf", "Appendix: Glossary", &[("Terms used in this report", 9)]);

        let a = scorer.breakdown(&relevant, &weights);
        let b = scorer.breakdown(&glossary, &weights);
        assert_eq!(a.title_matches, 3);
        assert!(a.cross_signal);
        assert_eq!(b.title_matches, 0);
        assert!(a.total > b.total);
    }

    #[test]
    fn test_length_bonus_bands() {
        assert_eq!(length_bonus(100), 2.0);
        assert_eq!(length_bonus(30), 1.0);
        assert_eq!(length_bonus(600), 1.0);
        assert_eq!(length_bonus(5), -1.0);
        assert_eq!(length_bonus(2000), -1.0);
    }

    #[test]
    fn test_boilerplate_penalty() {
        let sections = vec![
            section("a.pdf", "One", &[("Company Confidential", 1), ("real text", 1)]),
            section("a.pdf", "Two", &[("Company Confidential", 2)]),
            section("a.pdf", "Three", &[("Company  confidential", 3)]),
            section("b.pdf", "Other", &[("Company Confidential", 1)]),
        ];
        let index = BoilerplateIndex::from_sections(&sections);
        assert_eq!(index.ratio(&sections[0]), 0.5);
        assert_eq!(index.ratio(&sections[1]), 1.0);
        assert_eq!(index.ratio(&sections[3]), 0.0);
    }

    #[test]
    fn test_empty_profile_is_structural_only() {
        let profile = PersonaProfile::new("", "");
        let index = BoilerplateIndex::default();
        let scorer = RelevanceScorer::new(&profile, &index);
        let s = section("a.pdf", "Revenue", &[("short", 1)]);
        let breakdown = scorer.breakdown(&s, &WeightProfile::default());
        assert_eq!(breakdown.title_matches, 0);
        assert_eq!(breakdown.total, -1.0);
    }
}
