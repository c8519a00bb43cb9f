pub mod bootstrap;
pub mod config;
pub mod model;
pub mod search;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use config::{BootstrapOptions, SearchConfig};
use model::{PageRecord, PageType, SearchResult};
use search::PageIndex;

/// Command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "wiki-search",
    version,
    about = "Fuzzy full-text search over a JSON dump of wiki pages"
)]
pub struct Cli {
    /// JSON file holding an array of page records
    #[arg(long, env = "WIKI_SEARCH_PAGES")]
    pub pages: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Full search with highlighted title and description
    Search {
        phrase: String,

        /// 0-based result page (24 results per page)
        #[arg(long, default_value_t = 0)]
        page: usize,
    },
    /// Typeahead suggestions
    Suggest {
        phrase: String,

        /// Only return pages of this type (repeatable; every type must match)
        #[arg(long = "type", value_enum)]
        page_types: Vec<PageType>,

        /// Maximum number of suggestions
        #[arg(long)]
        limit: Option<usize>,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let pages = load_pages(&cli.pages)?;
    let index = PageIndex::new(SearchConfig::from_env());
    bootstrap::prepare_index(&index, &pages, &BootstrapOptions::from_env())
        .context("prepare search index")?;

    let results = match cli.command {
        Commands::Search { phrase, page } => index.search(&phrase, page)?,
        Commands::Suggest {
            phrase,
            page_types,
            limit,
        } => {
            let filter = (!page_types.is_empty()).then_some(page_types.as_slice());
            index.suggest(&phrase, filter, limit)?
        }
    };

    print_results(&results)
}

pub fn load_pages(path: &Path) -> Result<Vec<PageRecord>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read pages from {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parse pages in {}", path.display()))
}

fn print_results(results: &[SearchResult]) -> Result<()> {
    let json = serde_json::to_string_pretty(results)?;
    println!("{json}");
    Ok(())
}
