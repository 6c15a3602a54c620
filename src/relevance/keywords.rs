//! Keyword derivation and expansion for persona profiles.

use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Weight of keywords taken from the task description.
pub const TASK_WEIGHT: f32 = 1.5;
/// Weight of keywords taken from the role.
pub const ROLE_WEIGHT: f32 = 1.0;
/// Weight of keywords added by expansion.
pub const EXPANSION_WEIGHT: f32 = 0.5;

const STOPWORDS: &[&str] = &[
    "about", "above", "after", "again", "against", "all", "also", "among", "and", "any", "are",
    "because", "been", "before", "being", "below", "between", "both", "but", "can", "could",
    "did", "does", "doing", "down", "during", "each", "few", "for", "from", "further", "had",
    "has", "have", "having", "her", "here", "hers", "him", "his", "how", "into", "its", "itself",
    "just", "may", "more", "most", "must", "need", "not", "now", "off", "once", "only", "other",
    "our", "ours", "out", "over", "own", "same", "shall", "she", "should", "some", "such",
    "than", "that", "the", "their", "them", "then", "there", "these", "they", "this", "those",
    "through", "too", "under", "until", "upon", "very", "was", "way", "were", "what", "when",
    "where", "which", "while", "who", "whom", "why", "will", "with", "within", "would", "you",
    "your", "yours",
];

/// Words ending in `-ly` that are not adverbs.
const LY_NOUNS: &[&str] = &[
    "anomaly", "assembly", "butterfly", "daily", "family", "italy", "jelly", "monopoly",
    "monthly", "quarterly", "rally", "reply", "supply", "weekly", "yearly",
];

/// Words whose trailing `s` is not a plural marker.
const INVARIANT_PLURALS: &[&str] = &["lens", "means", "news", "series", "species"];

/// Split text into lowercase alphanumeric tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

/// Tokens that can act as keywords: stopwords, short tokens, `-ly`
/// adverbs and pure numbers removed, plurals stemmed.
pub fn keyword_tokens(text: &str) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .filter(|t| is_keyword_candidate(t))
        .map(|t| stem(&t))
        .collect()
}

fn is_keyword_candidate(token: &str) -> bool {
    token.chars().count() >= 3
        && !STOPWORDS.contains(&token)
        && !is_adverb(token)
        && !token.chars().all(|c| c.is_ascii_digit())
}

/// `-ly` words with a stem of at least three characters, minus known nouns.
fn is_adverb(token: &str) -> bool {
    match token.strip_suffix("ly") {
        Some(base) => base.chars().count() >= 3 && !LY_NOUNS.contains(&token),
        None => false,
    }
}

/// Light plural stemming.
pub fn stem(word: &str) -> String {
    if INVARIANT_PLURALS.contains(&word) {
        return word.to_string();
    }
    let len = word.chars().count();
    if len > 4 && word.ends_with("ies") {
        return format!("{}y", &word[..word.len() - 3]);
    }
    if word.ends_with("sses") {
        return word[..word.len() - 2].to_string();
    }
    if len > 4
        && ["ches", "shes", "xes", "zes"]
            .iter()
            .any(|suffix| word.ends_with(suffix))
    {
        return word[..word.len() - 2].to_string();
    }
    if len > 3
        && word.ends_with('s')
        && !["ss", "us", "is"].iter().any(|suffix| word.ends_with(suffix))
    {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}

/// Source of related terms for a keyword.
pub trait KeywordExpander {
    /// Related terms for a stemmed keyword; empty when none are known.
    fn expand(&self, keyword: &str) -> Vec<String>;
}

/// Static domain table mapping keywords to related vocabulary.
#[derive(Debug, Clone)]
pub struct DomainTable {
    entries: HashMap<String, Vec<String>>,
}

impl DomainTable {
    /// Table with the built-in domain vocabulary.
    pub fn new() -> Self {
        let builtin: &[(&str, &[&str])] = &[
            ("research", &["methodology", "dataset", "benchmark", "experiment", "literature", "evaluation"]),
            ("researcher", &["methodology", "dataset", "benchmark", "experiment", "literature", "evaluation"]),
            ("student", &["concept", "exam", "practice", "fundamental", "definition", "example"]),
            ("study", &["concept", "review", "practice", "summary"]),
            ("analyst", &["trend", "metric", "performance", "comparison", "growth", "forecast"]),
            ("analyze", &["analysis", "evaluation", "assessment", "comparison"]),
            ("analysis", &["evaluation", "assessment", "comparison", "metric"]),
            ("investment", &["portfolio", "return", "capital", "risk", "valuation", "market"]),
            ("investor", &["portfolio", "return", "capital", "risk", "valuation", "market"]),
            ("revenue", &["sales", "income", "earning", "growth", "profit"]),
            ("financial", &["revenue", "profit", "cost", "budget", "cash", "earning"]),
            ("finance", &["revenue", "profit", "cost", "budget", "cash", "earning"]),
            ("travel", &["itinerary", "destination", "hotel", "restaurant", "activity", "attraction"]),
            ("trip", &["itinerary", "destination", "hotel", "restaurant", "activity", "attraction"]),
            ("planner", &["schedule", "itinerary", "budget", "option"]),
            ("plan", &["schedule", "itinerary", "budget", "option"]),
            ("chef", &["recipe", "ingredient", "dish", "meal", "preparation"]),
            ("menu", &["recipe", "ingredient", "dish", "meal", "vegetarian"]),
            ("food", &["recipe", "ingredient", "dish", "meal", "nutrition"]),
            ("professional", &["workflow", "process", "compliance", "policy"]),
            ("form", &["field", "signature", "fillable", "onboarding", "compliance"]),
            ("developer", &["api", "configuration", "installation", "implementation", "architecture"]),
            ("engineer", &["architecture", "implementation", "specification", "design", "testing"]),
            ("review", &["summary", "evaluation", "finding", "comparison"]),
            ("literature", &["methodology", "finding", "survey", "citation"]),
            ("teacher", &["curriculum", "lesson", "assessment", "learning"]),
        ];

        let entries = builtin
            .iter()
            .map(|(key, terms)| {
                (
                    key.to_string(),
                    terms.iter().map(|t| stem(t)).collect::<Vec<_>>(),
                )
            })
            .collect();
        Self { entries }
    }

    /// Table with no entries.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Add or replace an entry.
    pub fn with_entry(mut self, keyword: &str, terms: &[&str]) -> Self {
        self.entries.insert(
            stem(&keyword.to_lowercase()),
            terms.iter().map(|t| stem(&t.to_lowercase())).collect(),
        );
        self
    }
}

impl Default for DomainTable {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordExpander for DomainTable {
    fn expand(&self, keyword: &str) -> Vec<String> {
        self.entries.get(keyword).cloned().unwrap_or_default()
    }
}

/// Weighted keyword set derived from a persona role and task.
///
/// Built once per collection and shared read-only by scoring and snippet
/// ranking.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonaProfile {
    /// Role description as given
    pub role: String,
    /// Task description as given
    pub task: String,
    /// Keywords from the role
    pub role_keywords: BTreeSet<String>,
    /// Keywords from the task
    pub task_keywords: BTreeSet<String>,
    /// Every keyword with its weight; the highest source weight wins
    pub expanded_keywords: BTreeMap<String, f32>,
}

impl PersonaProfile {
    /// Build a profile using the built-in domain table.
    pub fn new(role: &str, task: &str) -> Self {
        Self::with_expander(role, task, &DomainTable::new())
    }

    /// Build a profile with a custom expander.
    pub fn with_expander(role: &str, task: &str, expander: &dyn KeywordExpander) -> Self {
        let role_keywords: BTreeSet<String> = keyword_tokens(role).into_iter().collect();
        let task_keywords: BTreeSet<String> = keyword_tokens(task).into_iter().collect();

        let mut expanded_keywords: BTreeMap<String, f32> = BTreeMap::new();
        let mut insert = |keyword: &str, weight: f32| {
            let entry = expanded_keywords.entry(keyword.to_string()).or_insert(weight);
            if *entry < weight {
                *entry = weight;
            }
        };

        for keyword in &task_keywords {
            insert(keyword, TASK_WEIGHT);
        }
        for keyword in &role_keywords {
            insert(keyword, ROLE_WEIGHT);
        }
        for keyword in role_keywords.iter().chain(task_keywords.iter()) {
            for term in expander.expand(keyword) {
                insert(&term, EXPANSION_WEIGHT);
            }
        }

        log::debug!(
            "Persona keywords: {} role, {} task, {} total",
            role_keywords.len(),
            task_keywords.len(),
            expanded_keywords.len()
        );

        Self {
            role: role.to_string(),
            task: task.to_string(),
            role_keywords,
            task_keywords,
            expanded_keywords,
        }
    }

    /// Whether no keywords were derived.
    pub fn is_empty(&self) -> bool {
        self.expanded_keywords.is_empty()
    }

    /// Weight of a stemmed token, if it is a keyword.
    pub fn weight(&self, token: &str) -> Option<f32> {
        self.expanded_keywords.get(token).copied()
    }

    /// Whether a token entered the profile only through expansion.
    pub fn is_expansion(&self, token: &str) -> bool {
        self.expanded_keywords.contains_key(token)
            && !self.role_keywords.contains(token)
            && !self.task_keywords.contains(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_tokens_filter() {
        let tokens = keyword_tokens("The 2024 results were quickly analyzed by our teams");
        assert_eq!(tokens, vec!["result", "analyzed", "team"]);
    }

    #[test]
    fn test_ly_nouns_are_kept() {
        let tokens = keyword_tokens("Plan a family trip and quarterly supply budget for Italy");
        assert_eq!(
            tokens,
            vec!["plan", "family", "trip", "quarterly", "supply", "budget", "italy"]
        );
        assert_eq!(keyword_tokens("July assembly ran smoothly"), vec!["july", "assembly", "ran"]);
    }

    #[test]
    fn test_stem() {
        assert_eq!(stem("trends"), "trend");
        assert_eq!(stem("strategies"), "strategy");
        assert_eq!(stem("processes"), "process");
        assert_eq!(stem("approaches"), "approach");
        assert_eq!(stem("analysis"), "analysis");
        assert_eq!(stem("status"), "status");
        assert_eq!(stem("gas"), "gas");
        assert_eq!(stem("series"), "series");
        assert_eq!(stem("news"), "news");
        assert_eq!(stem("species"), "species");
    }

    #[test]
    fn test_profile_weights() {
        let profile = PersonaProfile::new("Investment Analyst", "Analyze revenue trends");
        assert_eq!(profile.weight("revenue"), Some(TASK_WEIGHT));
        assert_eq!(profile.weight("trend"), Some(TASK_WEIGHT));
        assert_eq!(profile.weight("analyst"), Some(ROLE_WEIGHT));
        assert_eq!(profile.weight("growth"), Some(EXPANSION_WEIGHT));
        assert!(profile.is_expansion("portfolio"));
        assert!(!profile.is_expansion("revenue"));
        assert_eq!(profile.weight("glossary"), None);
    }

    #[test]
    fn test_custom_expander() {
        let table = DomainTable::empty().with_entry("Hiking", &["trails", "summit"]);
        let profile = PersonaProfile::with_expander("Guide", "Plan hiking routes", &table);
        assert_eq!(profile.weight("trail"), Some(EXPANSION_WEIGHT));
        assert_eq!(profile.weight("summit"), Some(EXPANSION_WEIGHT));
        assert_eq!(profile.weight("itinerary"), None);
    }

    #[test]
    fn test_empty_profile() {
        let profile = PersonaProfile::new("", "");
        assert!(profile.is_empty());
    }
}
