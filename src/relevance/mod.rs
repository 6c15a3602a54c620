//! Persona-driven relevance: keywords, scoring, selection and snippets.

mod keywords;
mod scorer;
mod selector;
mod snippets;

pub use keywords::{
    keyword_tokens, stem, tokenize, DomainTable, KeywordExpander, PersonaProfile,
    EXPANSION_WEIGHT, ROLE_WEIGHT, TASK_WEIGHT,
};
pub use scorer::{BoilerplateIndex, RelevanceScorer, ScoreBreakdown};
pub use selector::{fingerprint, jaccard, select_sections, sort_by_score, suppress_near_duplicates};
pub use snippets::{truncate_at_word, Snippet, SnippetExtractor};
