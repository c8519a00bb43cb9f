//! The search engine seam used by the rest of the application.

use uuid::Uuid;

use super::SearchError;
use super::tantivy::PageIndex;
use crate::model::{Document, PageRecord, PageType, SearchResult};

/// Page search operations.
///
/// Mutations are visible to queries started after they return. Queries run
/// against a snapshot and may run concurrently with each other and with a
/// mutation.
pub trait SearchEngine: Send + Sync {
    /// Prepare an empty index; repeated calls are no-ops.
    fn initialize(&self) -> Result<(), SearchError>;

    /// Append a document. An id that is already indexed gets a second entry.
    fn add_document(&self, document: &Document) -> Result<(), SearchError>;

    fn add_documents(&self, documents: &[Document]) -> Result<(), SearchError> {
        documents.iter().try_for_each(|d| self.add_document(d))
    }

    /// Index a page record (markup stripped, aliases synthesized).
    fn add_page(&self, page: &PageRecord) -> Result<(), SearchError> {
        self.add_document(&Document::from_page(page))
    }

    /// Remove every entry with `id`; unknown ids are ignored.
    fn remove_document(&self, id: Uuid) -> Result<(), SearchError>;

    fn clear_all(&self) -> Result<(), SearchError>;

    /// Ranked, highlighted results for a 0-based page.
    fn search(&self, phrase: &str, page: usize) -> Result<Vec<SearchResult>, SearchError>;

    /// Ranked typeahead results without highlighting.
    fn suggest(
        &self,
        phrase: &str,
        page_types: Option<&[PageType]>,
        max_count: Option<usize>,
    ) -> Result<Vec<SearchResult>, SearchError>;
}

impl SearchEngine for PageIndex {
    fn initialize(&self) -> Result<(), SearchError> {
        PageIndex::initialize(self)
    }

    fn add_document(&self, document: &Document) -> Result<(), SearchError> {
        PageIndex::add_document(self, document)
    }

    fn add_documents(&self, documents: &[Document]) -> Result<(), SearchError> {
        PageIndex::add_documents(self, documents)
    }

    fn remove_document(&self, id: Uuid) -> Result<(), SearchError> {
        PageIndex::remove_document(self, id)
    }

    fn clear_all(&self) -> Result<(), SearchError> {
        PageIndex::clear_all(self)
    }

    fn search(&self, phrase: &str, page: usize) -> Result<Vec<SearchResult>, SearchError> {
        PageIndex::search(self, phrase, page)
    }

    fn suggest(
        &self,
        phrase: &str,
        page_types: Option<&[PageType]>,
        max_count: Option<usize>,
    ) -> Result<Vec<SearchResult>, SearchError> {
        PageIndex::suggest(self, phrase, page_types, max_count)
    }
}
