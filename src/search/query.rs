//! Query construction: phrase → per-term, per-field fuzzy clauses.

use tantivy::Term;
use tantivy::query::{BooleanQuery, FuzzyTermQuery, Occur, Query, TermQuery};
use tantivy::schema::IndexRecordOption;

use super::tantivy::{Fields, PageField};
use crate::model::PageType;

/// Fields every term is matched against, in clause order.
pub const FUZZY_FIELDS: [PageField; 3] = [
    PageField::Title,
    PageField::Description,
    PageField::Aliases,
];

/// Maximum edits (insert, delete, substitute, transpose) between a term and
/// an indexed token. No prefix of the term is required to match exactly.
pub const MAX_EDIT_DISTANCE: u8 = 2;

/// Split a phrase into lowercase terms.
///
/// Every non-letter is a separator and empty segments are dropped, except
/// the segment after the last separator, which is always kept. `"apple "`
/// therefore yields `["apple", ""]`, and `""` yields `[""]`.
pub fn split_terms(phrase: &str) -> Vec<String> {
    let lower = phrase.to_lowercase();
    let mut terms = Vec::new();
    let mut start = 0;
    for (i, c) in lower.char_indices() {
        if !c.is_alphabetic() {
            let segment = &lower[start..i];
            if !segment.trim().is_empty() {
                terms.push(segment.to_string());
            }
            start = i + c.len_utf8();
        }
    }
    terms.push(lower[start..].to_string());
    terms
}

/// One fuzzy clause of the disjunction.
#[derive(Debug, Clone, PartialEq)]
pub struct TermClause {
    pub term: String,
    pub field: PageField,
    /// Positional weight `n - i + 1`; the field boost is applied on top when scoring.
    pub boost: f32,
}

impl TermClause {
    /// Clause weight including the field multiplier.
    pub fn weight(&self) -> f32 {
        self.boost * self.field.descriptor().boost
    }
}

/// Structured form of a phrase plus optional category filters.
///
/// Matching documents satisfy at least one term clause and equal *every*
/// requested page type. More than one distinct type therefore matches
/// nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    terms: Vec<String>,
    clauses: Vec<TermClause>,
    page_types: Vec<PageType>,
}

impl QueryPlan {
    pub fn new(phrase: &str, page_types: Option<&[PageType]>) -> Self {
        let terms = split_terms(phrase);
        let n = terms.len();
        let clauses = terms
            .iter()
            .enumerate()
            .flat_map(|(i, term)| {
                let boost = (n - i + 1) as f32;
                FUZZY_FIELDS.into_iter().map(move |field| TermClause {
                    term: term.clone(),
                    field,
                    boost,
                })
            })
            .collect();

        Self {
            terms,
            clauses,
            page_types: page_types.map(<[PageType]>::to_vec).unwrap_or_default(),
        }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn clauses(&self) -> &[TermClause] {
        &self.clauses
    }

    pub fn page_types(&self) -> &[PageType] {
        &self.page_types
    }

    /// Lower the plan to a tantivy query.
    ///
    /// The empty trailing term becomes an exact clause on the empty string,
    /// which no analyzed token can equal.
    pub fn to_query(&self, fields: &Fields) -> Box<dyn Query> {
        let disjunction: Vec<(Occur, Box<dyn Query>)> = self
            .clauses
            .iter()
            .map(|clause| {
                let term = Term::from_field_text(fields.get(clause.field), &clause.term);
                let query: Box<dyn Query> = if clause.term.is_empty() {
                    Box::new(TermQuery::new(term, IndexRecordOption::Basic))
                } else {
                    Box::new(FuzzyTermQuery::new(term, MAX_EDIT_DISTANCE, true))
                };
                (Occur::Should, query)
            })
            .collect();
        let disjunction = BooleanQuery::new(disjunction);

        if self.page_types.is_empty() {
            return Box::new(disjunction);
        }

        let mut clauses: Vec<(Occur, Box<dyn Query>)> =
            vec![(Occur::Must, Box::new(disjunction) as Box<dyn Query>)];
        for page_type in &self.page_types {
            clauses.push((
                Occur::Must,
                Box::new(TermQuery::new(
                    Term::from_field_u64(fields.page_type, page_type.code()),
                    IndexRecordOption::Basic,
                )) as Box<dyn Query>,
            ));
        }
        Box::new(BooleanQuery::new(clauses))
    }
}
