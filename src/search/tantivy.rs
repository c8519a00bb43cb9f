use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use tantivy::schema::*;
use tantivy::tokenizer::{
    LowerCaser, RemoveLongFilter, SimpleTokenizer, StopWordFilter, TextAnalyzer, TokenStream,
};
use tantivy::{Index, IndexReader, IndexWriter, ReloadPolicy, Searcher, TantivyDocument, doc};
use uuid::Uuid;

use super::SearchError;
use crate::config::SearchConfig;
use crate::model::Document;

/// Name under which the page text analyzer is registered.
pub const PAGE_TOKENIZER: &str = "page_text";

/// Longest word, in characters, the analyzer keeps.
pub const MAX_TOKEN_CHARS: usize = 255;

/// `RemoveLongFilter` counts UTF-8 bytes and keeps tokens strictly shorter
/// than its limit.
const MAX_TOKEN_BYTES: usize = MAX_TOKEN_CHARS * 4 + 1;

/// Stored insertion stamp used to order equally scored documents.
const SEQ_FIELD: &str = "seq";

/// Classic English stop-word set.
const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
    "they", "this", "to", "was", "will", "with",
];

/// Fields of an indexed page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageField {
    Id,
    Key,
    Title,
    Aliases,
    PageType,
    Description,
}

/// How a field is laid out in the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Analyzed with [`PAGE_TOKENIZER`].
    Text,
    /// Indexed as one raw token.
    Keyword,
    /// Numeric category code.
    Category,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    pub field: PageField,
    pub name: &'static str,
    pub kind: FieldKind,
    pub stored: bool,
    /// Relevance multiplier applied to every clause on this field.
    pub boost: f32,
}

impl FieldDescriptor {
    pub fn tokenized(&self) -> bool {
        self.kind == FieldKind::Text
    }
}

pub const FIELD_DESCRIPTORS: [FieldDescriptor; 6] = [
    FieldDescriptor {
        field: PageField::Id,
        name: "id",
        kind: FieldKind::Keyword,
        stored: true,
        boost: 1.0,
    },
    FieldDescriptor {
        field: PageField::Key,
        name: "key",
        kind: FieldKind::Text,
        stored: true,
        boost: 1.0,
    },
    FieldDescriptor {
        field: PageField::Title,
        name: "title",
        kind: FieldKind::Text,
        stored: true,
        boost: 2.0,
    },
    FieldDescriptor {
        field: PageField::Aliases,
        name: "aliases",
        kind: FieldKind::Text,
        stored: true,
        boost: 1.0,
    },
    FieldDescriptor {
        field: PageField::PageType,
        name: "page_type",
        kind: FieldKind::Category,
        stored: true,
        boost: 1.0,
    },
    FieldDescriptor {
        field: PageField::Description,
        name: "description",
        kind: FieldKind::Text,
        stored: true,
        boost: 1.0,
    },
];

impl PageField {
    /// `FIELD_DESCRIPTORS` is laid out in declaration order.
    pub fn descriptor(self) -> &'static FieldDescriptor {
        &FIELD_DESCRIPTORS[self as usize]
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Fields {
    pub id: Field,
    pub key: Field,
    pub title: Field,
    pub aliases: Field,
    pub page_type: Field,
    pub description: Field,
    pub seq: Field,
}

impl Fields {
    pub fn get(&self, field: PageField) -> Field {
        match field {
            PageField::Id => self.id,
            PageField::Key => self.key,
            PageField::Title => self.title,
            PageField::Aliases => self.aliases,
            PageField::PageType => self.page_type,
            PageField::Description => self.description,
        }
    }
}

pub fn build_schema() -> Schema {
    let mut schema_builder = Schema::builder();
    for descriptor in &FIELD_DESCRIPTORS {
        match descriptor.kind {
            FieldKind::Text => {
                let indexing = TextFieldIndexing::default()
                    .set_tokenizer(PAGE_TOKENIZER)
                    .set_index_option(IndexRecordOption::WithFreqsAndPositions);
                let mut options = TextOptions::default().set_indexing_options(indexing);
                if descriptor.stored {
                    options = options.set_stored();
                }
                schema_builder.add_text_field(descriptor.name, options);
            }
            FieldKind::Keyword => {
                let indexing = TextFieldIndexing::default()
                    .set_tokenizer("raw")
                    .set_index_option(IndexRecordOption::Basic);
                let mut options = TextOptions::default().set_indexing_options(indexing);
                if descriptor.stored {
                    options = options.set_stored();
                }
                schema_builder.add_text_field(descriptor.name, options);
            }
            FieldKind::Category => {
                let mut options = NumericOptions::default().set_indexed();
                if descriptor.stored {
                    options = options.set_stored();
                }
                schema_builder.add_u64_field(descriptor.name, options);
            }
        }
    }
    schema_builder.add_u64_field(
        SEQ_FIELD,
        NumericOptions::default().set_stored().set_fast(),
    );
    schema_builder.build()
}

pub fn fields_from_schema(schema: &Schema) -> Result<Fields, SearchError> {
    let lookup = |name: &str| {
        schema
            .get_field(name)
            .map_err(|_| SearchError::Schema(format!("schema missing {name}")))
    };
    let field = |field: PageField| lookup(field.descriptor().name);
    Ok(Fields {
        id: field(PageField::Id)?,
        key: field(PageField::Key)?,
        title: field(PageField::Title)?,
        aliases: field(PageField::Aliases)?,
        page_type: field(PageField::PageType)?,
        description: field(PageField::Description)?,
        seq: lookup(SEQ_FIELD)?,
    })
}

/// Analyzer shared by indexing, scoring and highlighting.
pub fn page_analyzer() -> TextAnalyzer {
    TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(RemoveLongFilter::limit(MAX_TOKEN_BYTES))
        .filter(LowerCaser)
        .filter(StopWordFilter::remove(
            STOP_WORDS.iter().map(|w| (*w).to_string()),
        ))
        .build()
}

/// Lowercased tokens of `text` with their byte offsets into `text`.
pub fn analyze(text: &str) -> Vec<AnalyzedToken> {
    let mut analyzer = page_analyzer();
    let mut stream = analyzer.token_stream(text);
    let mut tokens = Vec::new();
    while stream.advance() {
        let token = stream.token();
        tokens.push(AnalyzedToken {
            text: token.text.clone(),
            offset_from: token.offset_from,
            offset_to: token.offset_to,
        });
    }
    tokens
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzedToken {
    pub text: String,
    pub offset_from: usize,
    pub offset_to: usize,
}

/// The single writer and the next insertion stamp it hands out.
struct WriterState {
    writer: IndexWriter,
    next_seq: u64,
}

/// Live tantivy state, created on first initialization.
struct IndexState {
    index: Index,
    writer: Mutex<WriterState>,
    reader: IndexReader,
    fields: Fields,
}

/// In-memory page index.
///
/// Mutations go through the writer mutex owned by this instance and are
/// committed and made visible before they return. Readers take a
/// [`Searcher`] snapshot and never block on the writer.
pub struct PageIndex {
    config: SearchConfig,
    state: OnceCell<IndexState>,
}

impl PageIndex {
    /// Cheap constructor; nothing is allocated until [`PageIndex::initialize`].
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            state: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.state.get().is_some()
    }

    /// Prepare an empty index. Calling it again is a no-op.
    pub fn initialize(&self) -> Result<(), SearchError> {
        self.state()?;
        Ok(())
    }

    fn state(&self) -> Result<&IndexState, SearchError> {
        self.state.get_or_try_init(|| {
            let schema = build_schema();
            let index = Index::create_in_ram(schema.clone());
            index.tokenizers().register(PAGE_TOKENIZER, page_analyzer());

            let writer = index.writer_with_num_threads(1, self.config.writer_heap_bytes)?;
            let reader = index
                .reader_builder()
                .reload_policy(ReloadPolicy::Manual)
                .try_into()?;
            let fields = fields_from_schema(&schema)?;

            tracing::info!(
                writer_heap_bytes = self.config.writer_heap_bytes,
                "index_initialized"
            );
            Ok(IndexState {
                index,
                writer: Mutex::new(WriterState {
                    writer,
                    next_seq: 0,
                }),
                reader,
                fields,
            })
        })
    }

    /// Snapshot of the last committed state, or `None` before initialization.
    pub(crate) fn snapshot(&self) -> Option<(Searcher, Fields)> {
        self.state
            .get()
            .map(|state| (state.reader.searcher(), state.fields))
    }

    /// Append one document. A document whose id is already present is added
    /// again, not merged.
    pub fn add_document(&self, document: &Document) -> Result<(), SearchError> {
        self.add_documents(std::slice::from_ref(document))
    }

    /// Append several documents under a single commit.
    ///
    /// Each document is stamped with the next insertion sequence number. If
    /// any document fails to stage, the whole batch is rolled back.
    pub fn add_documents(&self, documents: &[Document]) -> Result<(), SearchError> {
        let state = self.state()?;
        let mut guard = state.writer.lock();

        let first_seq = guard.next_seq;
        stage_or_rollback(
            &mut *guard,
            documents,
            |staging, document| {
                let seq = staging.next_seq;
                staging.next_seq += 1;
                staging
                    .writer
                    .add_document(to_tantivy_doc(&state.fields, document, seq))?;
                Ok(())
            },
            |staging| {
                tracing::warn!(count = documents.len(), "index_add_rolled_back");
                staging.writer.rollback()?;
                Ok(())
            },
        )?;
        commit(state, &mut guard.writer)?;
        tracing::info!(count = documents.len(), first_seq, "index_add");
        Ok(())
    }

    /// Delete every entry with this id. Unknown ids are ignored.
    pub fn remove_document(&self, id: Uuid) -> Result<(), SearchError> {
        let state = self.state()?;
        let mut guard = state.writer.lock();
        guard
            .writer
            .delete_term(Term::from_field_text(state.fields.id, &id.to_string()));
        commit(state, &mut guard.writer)?;
        tracing::info!(id = %id, "index_remove");
        Ok(())
    }

    pub fn clear_all(&self) -> Result<(), SearchError> {
        let state = self.state()?;
        let mut guard = state.writer.lock();
        guard.writer.delete_all_documents()?;
        commit(state, &mut guard.writer)?;
        tracing::info!("index_clear");
        Ok(())
    }

    /// Number of live entries in the current snapshot.
    pub fn num_docs(&self) -> u64 {
        self.snapshot()
            .map(|(searcher, _)| searcher.num_docs())
            .unwrap_or(0)
    }

    pub fn schema(&self) -> Option<Schema> {
        self.state.get().map(|state| state.index.schema())
    }
}

/// Commit and reload while the writer lock is still held, so the next
/// snapshot always includes this mutation.
fn commit(state: &IndexState, writer: &mut IndexWriter) -> Result<(), SearchError> {
    writer.commit()?;
    state.reader.reload()?;
    Ok(())
}

/// Stage every item, rolling the writer back to its last commit on the
/// first failure. The staging error is returned either way.
fn stage_or_rollback<C, T, S, R>(
    ctx: &mut C,
    items: &[T],
    mut stage: S,
    rollback: R,
) -> Result<(), SearchError>
where
    S: FnMut(&mut C, &T) -> Result<(), SearchError>,
    R: FnOnce(&mut C) -> Result<(), SearchError>,
{
    for item in items {
        if let Err(e) = stage(ctx, item) {
            if let Err(rollback_err) = rollback(ctx) {
                tracing::error!(error = %rollback_err, "index_rollback_failed");
            }
            return Err(e);
        }
    }
    Ok(())
}

fn to_tantivy_doc(fields: &Fields, document: &Document, seq: u64) -> TantivyDocument {
    doc!(
        fields.id => document.id.to_string(),
        fields.key => document.key.clone(),
        fields.title => document.title.clone(),
        fields.aliases => document.aliases.clone(),
        fields.page_type => document.page_type.code(),
        fields.description => document.description.clone(),
        fields.seq => seq,
    )
}
