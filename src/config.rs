//! Runtime configuration, read from the environment (and `.env`).

/// Smallest writer heap tantivy accepts for a single indexing thread.
const MIN_WRITER_HEAP_BYTES: usize = 15_000_000;

/// Index and highlighting settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Memory budget of the single index writer.
    pub writer_heap_bytes: usize,
    /// Marker inserted before each highlighted span.
    pub highlight_pre: String,
    /// Marker inserted after each highlighted span.
    pub highlight_post: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            writer_heap_bytes: 50_000_000,
            highlight_pre: "<b>".to_string(),
            highlight_post: "</b>".to_string(),
        }
    }
}

impl SearchConfig {
    /// Load config from environment variables.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(val) = dotenvy::var("WIKI_SEARCH_WRITER_HEAP_BYTES")
            && let Ok(bytes) = val.parse::<usize>()
        {
            cfg.writer_heap_bytes = bytes.max(MIN_WRITER_HEAP_BYTES);
        }

        if let Ok(pre) = dotenvy::var("WIKI_SEARCH_HIGHLIGHT_PRE") {
            cfg.highlight_pre = pre;
        }

        if let Ok(post) = dotenvy::var("WIKI_SEARCH_HIGHLIGHT_POST") {
            cfg.highlight_post = post;
        }

        cfg
    }

    /// Defaults with the minimal writer heap; suits small wikis and tests.
    pub fn lightweight() -> Self {
        Self {
            writer_heap_bytes: MIN_WRITER_HEAP_BYTES,
            ..Self::default()
        }
    }
}

/// Search-related startup switches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapOptions {
    /// Clear the index before seeding it.
    pub reset_index: bool,
}

impl BootstrapOptions {
    pub fn from_env() -> Self {
        let reset_index = dotenvy::var("WIKI_SEARCH_RESET_INDEX")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        Self { reset_index }
    }
}
