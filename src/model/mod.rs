//! Page data model: source records, indexable documents, results.

pub mod aliases;
pub mod types;

pub use aliases::{FactsError, parse_person_names, synthesize_aliases};
pub use types::{Document, PageAlias, PageRecord, PageType, SearchResult};
