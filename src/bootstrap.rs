//! Search-related startup steps: optional reset, initialization, seeding.

use std::time::{Duration, Instant};

use crate::config::BootstrapOptions;
use crate::model::{Document, PageRecord};
use crate::search::{SearchEngine, SearchError};

/// What a bootstrap run did.
#[derive(Debug, Clone, Default)]
pub struct BootstrapReport {
    pub cleared: bool,
    pub pages_indexed: usize,
    pub elapsed: Duration,
}

/// Bring an engine into a searchable state.
///
/// Steps run in order and stop at the first failure: clear (only when
/// `options.reset_index`), initialize, index `pages`.
pub fn prepare_index(
    engine: &dyn SearchEngine,
    pages: &[PageRecord],
    options: &BootstrapOptions,
) -> Result<BootstrapReport, SearchError> {
    let started = Instant::now();
    let mut report = BootstrapReport::default();

    if options.reset_index {
        run_step("index_clear", || engine.clear_all())?;
        report.cleared = true;
    }

    run_step("index_init", || engine.initialize())?;

    run_step("index_seed", || {
        let documents: Vec<Document> = pages.iter().map(Document::from_page).collect();
        engine.add_documents(&documents)
    })?;
    report.pages_indexed = pages.len();

    report.elapsed = started.elapsed();
    tracing::info!(
        pages = report.pages_indexed,
        cleared = report.cleared,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "bootstrap_complete"
    );
    Ok(report)
}

fn run_step<F>(name: &'static str, step: F) -> Result<(), SearchError>
where
    F: FnOnce() -> Result<(), SearchError>,
{
    let started = Instant::now();
    match step() {
        Ok(()) => {
            tracing::info!(
                step = name,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "startup_step"
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!(step = name, error = %e, "startup_step_failed");
            Err(e)
        }
    }
}
