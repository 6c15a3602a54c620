//! Document title detection on the first page.

use super::patterns::HeadingPatterns;
use crate::detect::Language;
use crate::layout::FontProfile;
use crate::model::Line;

const TITLE_THRESHOLD: f32 = 6.0;
const MIN_TITLE_SIZE_RATIO: f32 = 1.2;
const MAX_TITLE_LINES: usize = 3;

const DESCRIPTIVE_WORDS: &[&str] = &[
    "analysis",
    "framework",
    "guide",
    "handbook",
    "introduction",
    "manual",
    "overview",
    "plan",
    "policy",
    "proposal",
    "report",
    "review",
    "strategy",
    "study",
    "summary",
];

/// A title found on the first page.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedTitle {
    /// Title text, joined across wrapped lines
    pub text: String,
    /// Index of the first title line
    pub line_index: usize,
    /// Number of lines the title spans
    pub line_count: usize,
}

impl DetectedTitle {
    /// Whether the title covers a line index.
    pub fn covers(&self, index: usize) -> bool {
        index >= self.line_index && index < self.line_index + self.line_count
    }
}

/// Find the title among the lines of the lowest-numbered page.
pub fn detect_title(
    lines: &[Line],
    profile: &FontProfile,
    patterns: &HeadingPatterns,
    language: Language,
) -> Option<DetectedTitle> {
    let first_page = lines.iter().map(|l| l.page).min()?;
    let page_lines: Vec<usize> = (0..lines.len())
        .filter(|&i| lines[i].page == first_page && lines[i].font_size.is_some())
        .collect();

    let max_size = page_lines
        .iter()
        .filter_map(|&i| lines[i].font_size)
        .fold(0.0f32, f32::max);
    let top = page_lines
        .iter()
        .map(|&i| lines[i].bbox.y)
        .fold(f32::INFINITY, f32::min);
    let bottom = page_lines
        .iter()
        .map(|&i| lines[i].bbox.bottom())
        .fold(f32::NEG_INFINITY, f32::max);
    let extent = (bottom - top).max(1.0);

    let mut best: Option<(usize, f32)> = None;
    for &index in &page_lines {
        let line = &lines[index];
        let Some(score) = score_title_line(line, profile, patterns, language, max_size, top, extent)
        else {
            continue;
        };
        if score >= TITLE_THRESHOLD && best.map_or(true, |(_, s)| score > s) {
            best = Some((index, score));
        }
    }

    let (index, score) = best?;
    let (start, end) = expand_title(lines, index, patterns);
    let text = lines[start..end]
        .iter()
        .map(|l| l.text.trim())
        .collect::<Vec<_>>()
        .join(" ");

    log::debug!("Title {:?} (score {:.1}, {} lines)", text, score, end - start);
    Some(DetectedTitle {
        text,
        line_index: start,
        line_count: end - start,
    })
}

fn score_title_line(
    line: &Line,
    profile: &FontProfile,
    patterns: &HeadingPatterns,
    language: Language,
    max_size: f32,
    top: f32,
    extent: f32,
) -> Option<f32> {
    let text = line.text.trim();
    let size = line.font_size?;
    if text.chars().count() < language.min_heading_chars()
        || patterns.is_skippable(text)
        || patterns.numbering_depth(text).is_some()
        || profile.ratio_of(size) < MIN_TITLE_SIZE_RATIO
    {
        return None;
    }

    let mut score = 0.0;

    let position = (line.bbox.y - top) / extent;
    if position < 0.2 {
        score += 3.0;
    } else if position < 0.4 {
        score += 2.0;
    }

    let relative = if max_size > 0.0 { size / max_size } else { 0.0 };
    if relative >= 0.95 {
        score += 3.0;
    } else if relative >= 0.85 {
        score += 2.0;
    }

    let words = language.word_count(text);
    if (3..=20).contains(&words) {
        score += 2.0;
    } else if (21..=30).contains(&words) {
        score += 1.0;
    }

    if !text.ends_with(':') {
        score += 2.0;
    }

    let capitalized = text.chars().next().is_some_and(|c| c.is_uppercase());
    if capitalized && !line.is_uppercase() {
        score += 1.0;
    }

    let lower = text.to_lowercase();
    if DESCRIPTIVE_WORDS.iter().any(|w| lower.contains(w)) {
        score += 1.0;
    }

    Some(score)
}

/// Extend the title over adjacent lines set in the same size.
fn expand_title(lines: &[Line], index: usize, patterns: &HeadingPatterns) -> (usize, usize) {
    let mut start = index;
    let mut end = index + 1;

    while end - start < MAX_TITLE_LINES && end < lines.len() && joins(&lines[end - 1], &lines[end], patterns) {
        end += 1;
    }
    while end - start < MAX_TITLE_LINES && start > 0 && joins(&lines[start - 1], &lines[start], patterns) {
        start -= 1;
    }

    (start, end)
}

fn joins(upper: &Line, lower: &Line, patterns: &HeadingPatterns) -> bool {
    let (Some(a), Some(b)) = (upper.font_size, lower.font_size) else {
        return false;
    };
    upper.page == lower.page
        && (a - b).abs() < 0.5
        && lower.bbox.y - upper.bbox.bottom() < a * 1.5
        && !patterns.is_skippable(&lower.text)
        && !patterns.is_skippable(&upper.text)
        && patterns.numbering_depth(&lower.text).is_none()
        && patterns.numbering_depth(&upper.text).is_none()
}
