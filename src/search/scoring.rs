//! Relevance scoring shared by ranking and highlighting.
//!
//! Tantivy only selects candidates. Each candidate is then scored here with
//! the same token/term rule the highlighter uses, so whatever ranks a
//! document is also what gets marked up in it.

use super::query::{MAX_EDIT_DISTANCE, QueryPlan};
use super::tantivy::{AnalyzedToken, PageField};

/// Similarity of a query term and an indexed token, or `None` when they are
/// further apart than [`MAX_EDIT_DISTANCE`] or when the edits are not fewer
/// than the letters of the shorter word (`"ox"` does not match `"oak"`).
///
/// `1 - d / (longest + 1)`: exact matches score 1, every edit costs a share
/// of the longer word.
pub fn similarity(term: &str, token: &str) -> Option<f32> {
    if term.is_empty() {
        return None;
    }
    let distance = strsim::osa_distance(term, token);
    if distance > usize::from(MAX_EDIT_DISTANCE) {
        return None;
    }
    let term_len = term.chars().count();
    let token_len = token.chars().count();
    if distance > 0 && distance >= term_len.min(token_len) {
        return None;
    }
    let longest = term_len.max(token_len);
    Some(1.0 - distance as f32 / (longest as f32 + 1.0))
}

pub fn term_matches(term: &str, token: &str) -> bool {
    similarity(term, token).is_some()
}

/// Sum over clauses of `weight × best similarity` within the clause's field.
///
/// `tokens` supplies the analyzed tokens of each field of one document.
pub fn score_document<'a, F>(plan: &QueryPlan, tokens: F) -> f32
where
    F: Fn(PageField) -> &'a [AnalyzedToken],
{
    plan.clauses()
        .iter()
        .filter_map(|clause| {
            tokens(clause.field)
                .iter()
                .filter_map(|token| similarity(&clause.term, &token.text))
                .reduce(f32::max)
                .map(|best| clause.weight() * best)
        })
        .sum()
}
