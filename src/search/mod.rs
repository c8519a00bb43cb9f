//! Search layer facade.
//!
//! - **[`tantivy`]**: schema, field descriptors, analyzer and the [`PageIndex`] writer/snapshot pair.
//! - **[`query`]**: phrase splitting and the fuzzy boolean [`QueryPlan`].
//! - **[`scoring`]**: deterministic relevance scoring of candidates.
//! - **[`highlight`]**: whole-field match highlighting.
//! - **[`results`]**: full search and suggestion result assembly.
//! - **[`engine`]**: the [`SearchEngine`] trait callers program against.
//! - **[`markup`]**: markdown/HTML stripping for descriptions.

pub mod engine;
pub mod highlight;
pub mod markup;
pub mod query;
pub mod results;
pub mod scoring;
pub mod tantivy;

use thiserror::Error;

pub use engine::SearchEngine;
pub use query::QueryPlan;
pub use results::PAGE_SIZE;
pub use self::tantivy::PageIndex;

/// Failures surfaced by the index.
///
/// `Index`, `Schema` and `CorruptDocument` are internal faults and are not
/// worth retrying; `InvalidInput` is a caller error.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("index error: {0}")]
    Index(#[from] ::tantivy::TantivyError),

    #[error("schema error: {0}")]
    Schema(String),

    #[error("corrupt document in index: {0}")]
    CorruptDocument(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}
