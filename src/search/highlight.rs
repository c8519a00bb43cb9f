//! Match highlighting.
//!
//! The whole field is one fragment: nothing is truncated, every token that
//! satisfies a query term is wrapped in the configured markers, and the
//! original casing and punctuation are left untouched.

use super::query::QueryPlan;
use super::scoring::term_matches;
use super::tantivy::{AnalyzedToken, analyze};

pub struct Highlighter<'a> {
    terms: Vec<&'a str>,
    pre: &'a str,
    post: &'a str,
}

impl<'a> Highlighter<'a> {
    pub fn new(plan: &'a QueryPlan, pre: &'a str, post: &'a str) -> Self {
        let mut terms: Vec<&str> = plan
            .terms()
            .iter()
            .map(String::as_str)
            .filter(|t| !t.is_empty())
            .collect();
        terms.dedup();
        Self { terms, pre, post }
    }

    fn is_match(&self, token: &AnalyzedToken) -> bool {
        self.terms.iter().any(|term| term_matches(term, &token.text))
    }

    /// Mark up `text`. A field without matches comes back unchanged.
    pub fn highlight(&self, text: &str) -> String {
        self.highlight_tokens(text, &analyze(text))
    }

    /// Same as [`Highlighter::highlight`] for tokens already produced by
    /// [`analyze`] on `text`.
    pub fn highlight_tokens(&self, text: &str, tokens: &[AnalyzedToken]) -> String {
        let mut out = String::with_capacity(text.len() + 16);
        let mut cursor = 0;
        for token in tokens.iter().filter(|t| self.is_match(t)) {
            out.push_str(&text[cursor..token.offset_from]);
            out.push_str(self.pre);
            out.push_str(&text[token.offset_from..token.offset_to]);
            out.push_str(self.post);
            cursor = token.offset_to;
        }
        out.push_str(&text[cursor..]);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn highlight(phrase: &str, text: &str) -> String {
        let plan = QueryPlan::new(phrase, None);
        Highlighter::new(&plan, "<b>", "</b>").highlight(text)
    }

    #[test]
    fn fuzzy_match_keeps_original_casing() {
        assert_eq!(highlight("aple", "Apple Tree"), "<b>Apple</b> Tree");
    }

    #[test]
    fn whole_field_is_returned() {
        assert_eq!(
            highlight("aple", "A tree that bears apples, every autumn."),
            "A tree that bears <b>apples</b>, every autumn."
        );
    }

    #[test]
    fn every_term_and_occurrence_is_marked() {
        assert_eq!(
            highlight("apple tree", "Apple Tree and apple-tree"),
            "<b>Apple</b> <b>Tree</b> and <b>apple</b>-<b>tree</b>"
        );
    }

    #[test]
    fn no_match_returns_text_verbatim() {
        assert_eq!(highlight("birch", "Apple Tree"), "Apple Tree");
        assert_eq!(highlight("", "Apple Tree"), "Apple Tree");
        assert_eq!(highlight("apple", ""), "");
    }

    #[test]
    fn stop_words_are_not_marked() {
        assert_eq!(highlight("the", "The tree"), "The <b>tree</b>");
    }

    #[test]
    fn custom_markers_and_multibyte_text() {
        let plan = QueryPlan::new("петров", None);
        let highlighter = Highlighter::new(&plan, "[", "]");
        assert_eq!(
            highlighter.highlight("Иван Петрович Петров"),
            "Иван [Петрович] [Петров]"
        );
    }
}
