//! Heading classification against the document's font profile.

use std::collections::BTreeMap;

use super::patterns::HeadingPatterns;
use crate::detect::Language;
use crate::layout::FontProfile;
use crate::model::{is_spaceless_script_char, HeadingCandidate, HeadingLevel, Line};
use crate::options::{AnalysisMode, ClassifierOptions, WeightProfile};

/// Below this many sized lines the threshold is not adapted.
const MIN_LINES_FOR_ADAPTATION: usize = 10;

/// Words ignored when judging title case.
const MINOR_WORDS: &[&str] = &[
    "a", "an", "and", "as", "at", "by", "for", "from", "in", "into", "of", "on", "or", "the",
    "to", "vs", "via", "with",
];

/// Scores lines and turns the accepted ones into leveled heading candidates.
pub struct HeadingClassifier<'a> {
    profile: &'a FontProfile,
    options: &'a ClassifierOptions,
    patterns: &'a HeadingPatterns,
    weights: WeightProfile,
    mode: AnalysisMode,
    language: Language,
}

impl<'a> HeadingClassifier<'a> {
    /// Create a classifier for one document.
    pub fn new(
        profile: &'a FontProfile,
        options: &'a ClassifierOptions,
        patterns: &'a HeadingPatterns,
        weights: WeightProfile,
        mode: AnalysisMode,
        language: Language,
    ) -> Self {
        Self {
            profile,
            options,
            patterns,
            weights,
            mode,
            language,
        }
    }

    /// Highest score a line can reach under the current weights.
    pub fn max_score(&self) -> f32 {
        4.0 + 2.0 + 3.0 * self.weights.structural_weight + 2.0 + 1.0
    }

    /// Classify all lines, returning leveled candidates in reading order.
    pub fn classify(&self, lines: &[Line]) -> Vec<HeadingCandidate> {
        if !self.profile.has_statistics() {
            log::debug!("No font metadata; heading detection skipped");
            return vec![];
        }

        let scores: Vec<Option<f32>> = lines.iter().map(|l| self.score_line(l)).collect();
        let threshold = self.adaptive_threshold(&scores);

        let accepted: Vec<usize> = scores
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_some_and(|s| s >= threshold))
            .map(|(i, _)| i)
            .collect();

        let mut candidates = self.build_candidates(lines, &accepted, &scores);

        if self.mode == AnalysisMode::Outline {
            candidates.retain(|c| self.passes_context_check(c, lines));
        }

        self.assign_levels(&mut candidates);

        log::debug!(
            "Classified {} headings from {} lines (threshold {:.1})",
            candidates.len(),
            lines.len(),
            threshold
        );
        candidates
    }

    /// Score one line, or `None` when it is not heading-eligible.
    pub fn score_line(&self, line: &Line) -> Option<f32> {
        let text = line.text.trim();
        let char_count = text.chars().count();
        if char_count < self.language.min_heading_chars() {
            return None;
        }
        if self.patterns.is_skippable(text) || self.ends_like_sentence(text) {
            return None;
        }

        let ratio = self.profile.size_ratio(line)?;
        let min_ratio = match self.mode {
            AnalysisMode::Outline => self.options.outline_min_size_ratio,
            AnalysisMode::Sections if line.is_bold => self.options.section_bold_min_size_ratio,
            AnalysisMode::Sections => self.options.section_min_size_ratio,
        };
        // Small tolerance keeps bucket rounding from rejecting exact ratios
        if ratio + 1e-3 < min_ratio {
            return None;
        }

        let mut score = if ratio >= 1.5 {
            4.0
        } else if ratio >= 1.3 {
            3.0
        } else if ratio >= 1.2 {
            2.0
        } else if ratio >= 1.1 {
            1.0
        } else {
            0.0
        };

        if line.is_bold {
            score += 2.0;
        }

        if self.patterns.is_structural(text, self.language) {
            score += 3.0 * self.weights.structural_weight;
        }

        let words = self.language.word_count(text);
        if line.is_uppercase() && words >= 2 {
            score += 2.0;
        } else if words >= 2 && is_title_case(text) {
            score += 1.0;
        } else if text.ends_with(':') && char_count > 5 {
            score += 1.0;
        }

        let preferred_words = if self.language.counts_characters() {
            3..=30
        } else {
            2..=15
        };
        if preferred_words.contains(&words) {
            score += 1.0;
        }
        if char_count > self.language.long_heading_chars() {
            score -= 2.0;
        }

        Some(score)
    }

    /// Raise the threshold while too large a share of lines passes.
    fn adaptive_threshold(&self, scores: &[Option<f32>]) -> f32 {
        let mut threshold = self.options.base_threshold;
        if self.profile.sized_lines < MIN_LINES_FOR_ADAPTATION {
            return threshold;
        }

        let limit = self.profile.sized_lines as f32 * self.options.max_heading_fraction;
        let max_score = self.max_score();
        loop {
            let passing = scores
                .iter()
                .filter(|s| s.is_some_and(|s| s >= threshold))
                .count();
            if passing as f32 <= limit || threshold >= max_score {
                break;
            }
            threshold += 1.0;
            log::debug!("{} lines pass; raising threshold to {:.1}", passing, threshold);
        }
        threshold
    }

    /// Trailing punctuation that marks body text rather than a heading.
    fn ends_like_sentence(&self, text: &str) -> bool {
        if text.ends_with(',') || text.ends_with(';') {
            return true;
        }
        let sentence_end = (text.ends_with('.') && !text.ends_with("..")) || text.ends_with('。');
        sentence_end
            && self.language.word_count(text) >= 4
            && self.patterns.numbering_depth(text).is_none()
    }

    /// Turn accepted line indices into candidates, merging wrapped headings.
    fn build_candidates(
        &self,
        lines: &[Line],
        accepted: &[usize],
        scores: &[Option<f32>],
    ) -> Vec<HeadingCandidate> {
        let max_score = self.max_score();
        let mut candidates: Vec<HeadingCandidate> = Vec::new();

        for &index in accepted {
            let line = &lines[index];
            let score = scores[index].unwrap_or(0.0);

            if self.options.merge_wrapped {
                if let Some(prev) = candidates.last_mut() {
                    if prev.end_index() == index
                        && self.continues_heading(&lines[prev.end_index() - 1], line)
                    {
                        prev.text = join_wrapped(&prev.text, line.text.trim());
                        prev.line_count += 1;
                        prev.confidence = prev.confidence.max(normalize(score, max_score));
                        continue;
                    }
                }
            }

            let text = line.text.trim().to_string();
            candidates.push(HeadingCandidate {
                line_index: index,
                line_count: 1,
                numbering_depth: self.patterns.numbering_depth(&text),
                text,
                page: line.page,
                font_size: line.font_size.unwrap_or(self.profile.body_size),
                level: None,
                confidence: normalize(score, max_score),
            });
        }

        candidates
    }

    /// Whether `next` continues a heading that wrapped from `prev`.
    fn continues_heading(&self, prev: &Line, next: &Line) -> bool {
        let (Some(prev_size), Some(next_size)) = (prev.font_size, next.font_size) else {
            return false;
        };
        if prev.page != next.page
            || prev.is_bold != next.is_bold
            || self.profile.bucket_size(prev_size) != self.profile.bucket_size(next_size)
        {
            return false;
        }

        let gap = next.bbox.y - prev.bbox.bottom();
        if gap >= prev_size * 1.5 {
            return false;
        }

        let prev_text = prev.text.trim_end();
        let ends_sentence = prev_text.ends_with(['.', '!', '?', ':', '。']);
        !ends_sentence && self.patterns.numbering_depth(&next.text).is_none()
    }

    /// Outline mode: the following line must be measurably smaller. A
    /// candidate on the last line has no follower and passes.
    fn passes_context_check(&self, candidate: &HeadingCandidate, lines: &[Line]) -> bool {
        match lines.get(candidate.end_index()) {
            None => true,
            Some(next) => match next.font_size {
                Some(size) => size < candidate.font_size * self.options.context_ratio,
                None => true,
            },
        }
    }

    /// Assign levels from font-size bands, with numbering depth taking precedence.
    fn assign_levels(&self, candidates: &mut [HeadingCandidate]) {
        let mut sizes: Vec<f32> = candidates
            .iter()
            .map(|c| self.profile.bucket_size(c.font_size))
            .collect();
        sizes.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
        sizes.dedup();

        // Bucketed size (in bucket units) to band index
        let mut bands: BTreeMap<i64, usize> = BTreeMap::new();
        let mut band = 0usize;
        let mut previous: Option<f32> = None;
        for size in &sizes {
            if let Some(prev) = previous {
                if prev > 0.0 && (prev - size) / prev >= self.options.band_gap_ratio {
                    band += 1;
                }
            }
            bands.insert(size_key(*size, self.profile.bucket), band);
            previous = Some(*size);
        }
        log::debug!("Heading sizes {:?} span {} bands", sizes, band + 1);

        for candidate in candidates.iter_mut() {
            let key = size_key(self.profile.bucket_size(candidate.font_size), self.profile.bucket);
            let band_depth = bands.get(&key).map_or(3, |b| (*b + 1).min(3) as u8);
            let depth = candidate.numbering_depth.unwrap_or(band_depth);
            candidate.level = HeadingLevel::from_depth(depth).or(Some(HeadingLevel::H3));
        }
    }
}

fn size_key(size: f32, bucket: f32) -> i64 {
    (size / bucket).round() as i64
}

fn normalize(score: f32, max_score: f32) -> f32 {
    if max_score > 0.0 {
        (score / max_score).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn join_wrapped(first: &str, second: &str) -> String {
    let spaceless = first.chars().last().is_some_and(is_spaceless_script_char)
        && second.chars().next().is_some_and(is_spaceless_script_char);
    if spaceless {
        format!("{}{}", first, second)
    } else {
        format!("{} {}", first, second)
    }
}

/// Most significant words start with an uppercase letter.
fn is_title_case(text: &str) -> bool {
    let words: Vec<&str> = text
        .split_whitespace()
        .filter(|w| w.chars().next().is_some_and(|c| c.is_alphabetic()))
        .collect();
    let Some(first) = words.first() else {
        return false;
    };
    if !first.chars().next().is_some_and(|c| c.is_uppercase()) {
        return false;
    }

    let significant: Vec<&&str> = words
        .iter()
        .filter(|w| !MINOR_WORDS.contains(&w.to_lowercase().as_str()))
        .collect();
    if significant.is_empty() {
        return false;
    }
    let capitalized = significant
        .iter()
        .filter(|w| w.chars().next().is_some_and(|c| c.is_uppercase()))
        .count();
    capitalized as f32 / significant.len() as f32 >= 0.6
}
