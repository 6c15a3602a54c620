//! Hierarchy enforcement over classified headings.

use std::collections::HashSet;

use crate::model::{HeadingCandidate, HeadingLevel, OutlineEntry};

/// Repair level jumps and drop duplicate headings.
///
/// Walks the candidates in reading order with the current depth as state
/// (0 before the first heading). A candidate may go at most one level
/// deeper than the state and is demoted otherwise; shallower levels always
/// reset the state. A heading repeating the previous kept heading's level
/// and normalized text on the same or an adjacent page is dropped, as is
/// any exact `(level, text, page)` repeat.
pub fn enforce_hierarchy(candidates: Vec<HeadingCandidate>) -> Vec<HeadingCandidate> {
    let mut depth = 0u8;
    let mut seen: HashSet<(HeadingLevel, String, u32)> = HashSet::new();
    let mut previous: Option<(HeadingLevel, String, u32)> = None;
    let mut kept = Vec::with_capacity(candidates.len());

    for mut candidate in candidates {
        let wanted = candidate.level.map_or(3, HeadingLevel::depth);
        let allowed = wanted.min(depth + 1);
        let level = HeadingLevel::from_depth(allowed).unwrap_or(HeadingLevel::H1);
        if allowed != wanted {
            log::debug!(
                "Demoted {:?} from H{} to {}",
                candidate.text,
                wanted,
                level
            );
        }

        let normalized = normalize_heading(&candidate.text);
        if let Some((prev_level, prev_text, prev_page)) = &previous {
            if *prev_level == level
                && *prev_text == normalized
                && candidate.page.abs_diff(*prev_page) <= 1
            {
                log::debug!("Dropped repeated heading {:?}", candidate.text);
                continue;
            }
        }
        if !seen.insert((level, candidate.text.clone(), candidate.page)) {
            continue;
        }

        candidate.level = Some(level);
        depth = level.depth();
        previous = Some((level, normalized, candidate.page));
        kept.push(candidate);
    }

    kept
}

/// Final outline entries for enforced candidates.
pub fn to_outline(candidates: &[HeadingCandidate]) -> Vec<OutlineEntry> {
    candidates.iter().map(OutlineEntry::from).collect()
}

/// Lowercase, collapse whitespace and strip trailing punctuation.
pub fn normalize_heading(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches(|c: char| c.is_ascii_punctuation())
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(text: &str, level: HeadingLevel, page: u32, index: usize) -> HeadingCandidate {
        HeadingCandidate {
            line_index: index,
            line_count: 1,
            text: text.to_string(),
            page,
            font_size: 14.0,
            level: Some(level),
            confidence: 0.8,
            numbering_depth: None,
        }
    }

    fn levels(candidates: &[HeadingCandidate]) -> Vec<HeadingLevel> {
        candidates.iter().filter_map(|c| c.level).collect()
    }

    #[test]
    fn test_first_heading_starts_at_h1() {
        let result = enforce_hierarchy(vec![
            candidate("Deep start", HeadingLevel::H3, 1, 0),
            candidate("Next", HeadingLevel::H3, 1, 5),
        ]);
        assert_eq!(levels(&result), vec![HeadingLevel::H1, HeadingLevel::H2]);
    }

    #[test]
    fn test_h1_to_h3_is_demoted() {
        let result = enforce_hierarchy(vec![
            candidate("Part", HeadingLevel::H1, 1, 0),
            candidate("Detail", HeadingLevel::H3, 1, 4),
            candidate("Another part", HeadingLevel::H1, 2, 9),
            candidate("Sub", HeadingLevel::H2, 2, 12),
            candidate("Subsub", HeadingLevel::H3, 2, 15),
        ]);
        assert_eq!(
            levels(&result),
            vec![
                HeadingLevel::H1,
                HeadingLevel::H2,
                HeadingLevel::H1,
                HeadingLevel::H2,
                HeadingLevel::H3
            ]
        );
    }

    #[test]
    fn test_depth_never_jumps() {
        let input = [
            HeadingLevel::H2,
            HeadingLevel::H3,
            HeadingLevel::H1,
            HeadingLevel::H3,
            HeadingLevel::H3,
            HeadingLevel::H2,
            HeadingLevel::H1,
            HeadingLevel::H3,
        ];
        let candidates = input
            .iter()
            .enumerate()
            .map(|(i, l)| candidate(&format!("Heading {}", i), *l, 1, i * 3))
            .collect();
        let result = enforce_hierarchy(candidates);
        let mut depth = 0;
        for level in levels(&result) {
            assert!(level.depth() <= depth + 1);
            depth = level.depth();
        }
    }

    #[test]
    fn test_running_header_duplicates_dropped() {
        let result = enforce_hierarchy(vec![
            candidate("Results", HeadingLevel::H1, 3, 0),
            candidate("Results ", HeadingLevel::H1, 3, 6),
            candidate("RESULTS", HeadingLevel::H1, 4, 20),
            candidate("Results", HeadingLevel::H1, 9, 40),
        ]);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].page, 3);
        assert_eq!(result[1].page, 9);
    }

    #[test]
    fn test_outline_entries_unique() {
        let result = enforce_hierarchy(vec![
            candidate("Scope", HeadingLevel::H1, 1, 0),
            candidate("Other", HeadingLevel::H1, 1, 3),
            candidate("Scope", HeadingLevel::H1, 1, 7),
        ]);
        let outline = to_outline(&result);
        assert_eq!(outline.len(), 2);
        assert_eq!(outline[1].text, "Other");
    }

    #[test]
    fn test_normalize_heading() {
        assert_eq!(normalize_heading("  Results:  "), "results");
        assert_eq!(normalize_heading("Data   Sources."), "data sources");
    }
}
