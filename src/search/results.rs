//! Query execution and result shaping for full search and suggestions.

use tantivy::collector::DocSetCollector;
use tantivy::schema::Value;
use tantivy::{DocAddress, Searcher, TantivyDocument};
use uuid::Uuid;

use super::SearchError;
use super::highlight::Highlighter;
use super::query::QueryPlan;
use super::scoring::score_document;
use super::tantivy::{AnalyzedToken, Fields, PageField, PageIndex, analyze};
use crate::model::{PageType, SearchResult};

/// Results per page of a full search.
pub const PAGE_SIZE: usize = 24;

/// A matching document with its stored text already analyzed.
struct Candidate {
    score: f32,
    stored: StoredPage,
    title_tokens: Vec<AnalyzedToken>,
    description_tokens: Vec<AnalyzedToken>,
}

struct StoredPage {
    id: Uuid,
    seq: u64,
    key: String,
    page_type: PageType,
    title: String,
    aliases: String,
    description: String,
}

impl PageIndex {
    /// Full search: ranked, paginated by [`PAGE_SIZE`], with highlighted
    /// title and description. Pages past the end are empty.
    pub fn search(&self, phrase: &str, page: usize) -> Result<Vec<SearchResult>, SearchError> {
        let offset = page.checked_mul(PAGE_SIZE).ok_or_else(|| {
            SearchError::InvalidInput(format!("page {page} is out of range"))
        })?;

        tracing::info!(query = phrase, page = page, "search_start");
        let plan = QueryPlan::new(phrase, None);
        let candidates = self.ranked_candidates(&plan)?;

        let config = self.config();
        let highlighter = Highlighter::new(&plan, &config.highlight_pre, &config.highlight_post);
        let results: Vec<SearchResult> = candidates
            .into_iter()
            .skip(offset)
            .take(PAGE_SIZE)
            .map(|candidate| {
                let highlighted_title = highlighter
                    .highlight_tokens(&candidate.stored.title, &candidate.title_tokens);
                let highlighted_description = highlighter.highlight_tokens(
                    &candidate.stored.description,
                    &candidate.description_tokens,
                );
                SearchResult {
                    id: candidate.stored.id,
                    key: candidate.stored.key,
                    page_type: candidate.stored.page_type,
                    highlighted_title,
                    highlighted_description: Some(highlighted_description),
                }
            })
            .collect();

        tracing::debug!(query = phrase, page = page, hits = results.len(), "search_done");
        Ok(results)
    }

    /// Typeahead: ranked, optionally filtered by page type and capped at
    /// `max_count`. Titles are returned as stored.
    pub fn suggest(
        &self,
        phrase: &str,
        page_types: Option<&[PageType]>,
        max_count: Option<usize>,
    ) -> Result<Vec<SearchResult>, SearchError> {
        if max_count == Some(0) {
            return Err(SearchError::InvalidInput(
                "max_count must be positive".to_string(),
            ));
        }

        tracing::info!(
            query = phrase,
            page_types = ?page_types,
            max_count = ?max_count,
            "suggest_start"
        );
        let plan = QueryPlan::new(phrase, page_types);
        let results: Vec<SearchResult> = self
            .ranked_candidates(&plan)?
            .into_iter()
            .take(max_count.unwrap_or(usize::MAX))
            .map(|candidate| SearchResult {
                id: candidate.stored.id,
                key: candidate.stored.key,
                page_type: candidate.stored.page_type,
                highlighted_title: candidate.stored.title,
                highlighted_description: None,
            })
            .collect();

        tracing::debug!(query = phrase, hits = results.len(), "suggest_done");
        Ok(results)
    }

    /// Every match in the current snapshot, best first. Equal scores keep
    /// insertion order, then id order, so identical index states rank
    /// identically whatever the segment layout.
    fn ranked_candidates(&self, plan: &QueryPlan) -> Result<Vec<Candidate>, SearchError> {
        let Some((searcher, fields)) = self.snapshot() else {
            tracing::debug!("query against uninitialized index");
            return Ok(Vec::new());
        };

        let query = plan.to_query(&fields);
        let addresses = searcher.search(&*query, &DocSetCollector)?;

        let mut candidates = Vec::with_capacity(addresses.len());
        for address in addresses {
            let candidate = load_candidate(&searcher, &fields, plan, address)?;
            // The automaton has no length guard; a zero score means no token
            // passed the scoring rule.
            if candidate.score > 0.0 {
                candidates.push(candidate);
            }
        }
        candidates.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.stored.seq.cmp(&b.stored.seq))
                .then_with(|| a.stored.id.cmp(&b.stored.id))
        });
        Ok(candidates)
    }
}

fn load_candidate(
    searcher: &Searcher,
    fields: &Fields,
    plan: &QueryPlan,
    address: DocAddress,
) -> Result<Candidate, SearchError> {
    let doc: TantivyDocument = searcher.doc(address)?;
    let stored = read_stored(&doc, fields)?;

    let title_tokens = analyze(&stored.title);
    let description_tokens = analyze(&stored.description);
    let alias_tokens = analyze(&stored.aliases);
    let score = score_document(plan, |field| match field {
        PageField::Title => title_tokens.as_slice(),
        PageField::Description => description_tokens.as_slice(),
        PageField::Aliases => alias_tokens.as_slice(),
        _ => &[],
    });

    Ok(Candidate {
        score,
        stored,
        title_tokens,
        description_tokens,
    })
}

fn read_stored(doc: &TantivyDocument, fields: &Fields) -> Result<StoredPage, SearchError> {
    let text = |field| {
        doc.get_first(field)
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string()
    };

    let raw_id = text(fields.id);
    let id = Uuid::parse_str(&raw_id)
        .map_err(|e| SearchError::CorruptDocument(format!("bad id {raw_id:?}: {e}")))?;
    let code = doc
        .get_first(fields.page_type)
        .and_then(|v| v.as_u64())
        .ok_or_else(|| SearchError::CorruptDocument(format!("page {id} has no page type")))?;
    let page_type = PageType::from_code(code).ok_or_else(|| {
        SearchError::CorruptDocument(format!("page {id} has unknown page type {code}"))
    })?;
    let seq = doc
        .get_first(fields.seq)
        .and_then(|v| v.as_u64())
        .ok_or_else(|| SearchError::CorruptDocument(format!("page {id} has no sequence")))?;

    Ok(StoredPage {
        id,
        seq,
        key: text(fields.key),
        page_type,
        title: text(fields.title),
        aliases: text(fields.aliases),
        description: text(fields.description),
    })
}
