//! Ranking, near-duplicate suppression and per-document quotas.

use std::collections::{BTreeSet, HashMap};

use super::keywords::tokenize;
use crate::model::ScoredSection;
use crate::options::SelectionOptions;
use crate::outline::normalize_heading;

/// Jaccard similarity of two token sets; two empty sets are identical.
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f32 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    intersection as f32 / union as f32
}

/// Tokens compared for near-duplicate detection: title plus first sentence.
pub fn fingerprint(section: &ScoredSection) -> BTreeSet<String> {
    let title = normalize_heading(&section.section.title.text);
    let sentence = section.section.first_sentence();
    tokenize(&title)
        .into_iter()
        .chain(tokenize(&sentence))
        .collect()
}

/// Sort by score, highest first; ties keep input order.
pub fn sort_by_score(sections: &mut [ScoredSection]) {
    sections.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Drop sections whose fingerprint is too similar to a higher-ranked one.
///
/// Expects score order; the first of each similar group survives.
pub fn suppress_near_duplicates(sections: Vec<ScoredSection>, threshold: f32) -> Vec<ScoredSection> {
    let mut kept: Vec<(ScoredSection, BTreeSet<String>)> = Vec::with_capacity(sections.len());
    for section in sections {
        let tokens = fingerprint(&section);
        if let Some((original, _)) = kept.iter().find(|(_, t)| jaccard(t, &tokens) >= threshold) {
            log::debug!(
                "Suppressed {:?} ({}) as near-duplicate of {:?} ({})",
                section.section.title.text,
                section.section.document,
                original.section.title.text,
                original.section.document
            );
            continue;
        }
        kept.push((section, tokens));
    }
    kept.into_iter().map(|(s, _)| s).collect()
}

/// Select the final ranked sections.
///
/// Sorts by score, removes near-duplicates, then fills `desired_count`
/// slots honoring the per-document cap; slots the cap leaves empty are
/// filled in pure score order. Ranks are 1-based.
pub fn select_sections(
    sections: Vec<ScoredSection>,
    document_count: usize,
    options: &SelectionOptions,
) -> Vec<ScoredSection> {
    let mut sorted = sections;
    sort_by_score(&mut sorted);
    let unique = suppress_near_duplicates(sorted, options.similarity_threshold);

    let cap = options.per_document_cap(document_count);
    let mut per_document: HashMap<String, usize> = HashMap::new();
    let mut chosen = vec![false; unique.len()];
    let mut taken = 0;

    for (i, section) in unique.iter().enumerate() {
        if taken >= options.desired_count {
            break;
        }
        let count = per_document
            .entry(section.section.document.clone())
            .or_insert(0);
        if *count < cap {
            *count += 1;
            chosen[i] = true;
            taken += 1;
        }
    }

    if taken < options.desired_count {
        for flag in chosen.iter_mut().filter(|c| !**c) {
            if taken >= options.desired_count {
                break;
            }
            *flag = true;
            taken += 1;
        }
    }

    let mut selected: Vec<ScoredSection> = unique
        .into_iter()
        .zip(chosen)
        .filter(|(_, c)| *c)
        .map(|(s, _)| s)
        .collect();
    for (i, section) in selected.iter_mut().enumerate() {
        section.rank_position = Some(i + 1);
    }

    log::debug!("Selected {} sections (cap {} per document)", selected.len(), cap);
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HeadingLevel, Line, OutlineEntry, Section, TextSpan};

    fn scored(document: &str, title: &str, body: &str, page: u32, score: f32) -> ScoredSection {
        ScoredSection::new(
            Section {
                document: document.to_string(),
                title: OutlineEntry::new(HeadingLevel::H1, title, page),
                page,
                content: vec![Line::from_spans(vec![TextSpan::new(body, page, 72.0, 100.0, 10.0)])],
                bounds_end_page: page,
                ordinal: 0,
            },
            score,
        )
    }

    fn titles(sections: &[ScoredSection]) -> Vec<&str> {
        sections.iter().map(|s| s.section.title.text.as_str()).collect()
    }

    #[test]
    fn test_near_duplicates_collapse() {
        let sections = vec![
            scored("A.pdf", "Results", "Accuracy improved to 91 percent.", 3, 4.0),
            scored("A.pdf", "Results ", "Accuracy improved to 91 percent.", 3, 5.0),
            scored("B.pdf", "Methods", "We sampled 40 sites.", 2, 3.0),
        ];
        let selected = select_sections(sections, 2, &SelectionOptions::default());
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].section.title.text, "Results ");
        assert_eq!(selected[0].score, 5.0);
        assert_eq!(selected[1].rank_position, Some(2));
    }

    #[test]
    fn test_suppression_is_idempotent() {
        let sections = vec![
            scored("A.pdf", "Overview", "The plan covers three regions.", 1, 6.0),
            scored("B.pdf", "Overview", "The plan covers three regions.", 1, 5.0),
            scored("A.pdf", "Budget", "Costs are listed below.", 2, 4.0),
            scored("B.pdf", "Budget Summary", "Costs are listed in the annex.", 4, 3.0),
        ];
        let once = suppress_near_duplicates(sections, 0.8);
        let twice = suppress_near_duplicates(once.clone(), 0.8);
        assert_eq!(once, twice);
        assert_eq!(titles(&once), vec!["Overview", "Budget", "Budget Summary"]);
    }

    #[test]
    fn test_per_document_cap_with_fallback() {
        let mut sections: Vec<ScoredSection> = (0..6)
            .map(|i| scored("A.pdf", &format!("Topic {}", i), &format!("alpha {} text", i), 1, 10.0 - i as f32))
            .collect();
        sections.push(scored("B.pdf", "Lone", "beta text", 1, 1.0));

        // cap = ceil(5 / 2) + 1 = 4
        let selected = select_sections(sections, 2, &SelectionOptions::default());
        assert_eq!(titles(&selected), vec!["Topic 0", "Topic 1", "Topic 2", "Topic 3", "Lone"]);

        let options = SelectionOptions::default().with_desired_count(3);
        let mut sections: Vec<ScoredSection> = (0..4)
            .map(|i| scored("A.pdf", &format!("Topic {}", i), &format!("alpha {} text", i), 1, 10.0 - i as f32))
            .collect();
        sections.push(scored("B.pdf", "Lone", "beta text", 1, 1.0));
        sections.push(scored("C.pdf", "Other", "gamma text", 1, 0.5));
        // cap = ceil(3 / 3) + 1 = 2
        let selected = select_sections(sections, 3, &options);
        assert_eq!(titles(&selected), vec!["Topic 0", "Topic 1", "Lone"]);

        // Only one document has sections: cap = 3, remaining slots fall back to score order
        let sections: Vec<ScoredSection> = (0..6)
            .map(|i| scored("A.pdf", &format!("Topic {}", i), &format!("alpha {} text", i), 1, 10.0 - i as f32))
            .collect();
        let selected = select_sections(sections, 3, &SelectionOptions::default());
        assert_eq!(titles(&selected), vec!["Topic 0", "Topic 1", "Topic 2", "Topic 3", "Topic 4"]);
        assert_eq!(selected[4].rank_position, Some(5));
    }

    #[test]
    fn test_ties_keep_input_order() {
        let sections = vec![
            scored("A.pdf", "First", "one", 1, 2.0),
            scored("A.pdf", "Second", "two", 2, 2.0),
        ];
        let selected = select_sections(sections, 1, &SelectionOptions::default());
        assert_eq!(titles(&selected), vec!["First", "Second"]);
        assert_eq!(selected[0].rank_position, Some(1));
    }

    #[test]
    fn test_jaccard() {
        let a: BTreeSet<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let b: BTreeSet<String> = ["a", "b", "d"].iter().map(|s| s.to_string()).collect();
        assert!((jaccard(&a, &b) - 0.5).abs() < 1e-6);
        assert_eq!(jaccard(&BTreeSet::new(), &BTreeSet::new()), 1.0);
    }
}
