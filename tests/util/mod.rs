use uuid::Uuid;
use wiki_search::config::SearchConfig;
use wiki_search::model::{Document, PageType};
use wiki_search::search::PageIndex;

/// Fresh index with the minimal writer heap.
#[allow(dead_code)]
pub fn new_index() -> PageIndex {
    let index = PageIndex::new(SearchConfig::lightweight());
    index.initialize().expect("initialize index");
    index
}

#[allow(dead_code)]
pub fn document(title: &str, description: &str, page_type: PageType) -> Document {
    Document {
        id: Uuid::new_v4(),
        key: title.to_lowercase().replace(' ', "-"),
        title: title.to_string(),
        aliases: String::new(),
        page_type,
        description: description.to_string(),
    }
}

/// Captures tracing output for tests.
#[allow(dead_code)]
pub struct TestTracing {
    buffer: std::sync::Arc<std::sync::Mutex<Vec<u8>>>,
}

#[allow(dead_code)]
impl TestTracing {
    pub fn new() -> Self {
        Self {
            buffer: std::sync::Arc::new(std::sync::Mutex::new(Vec::new())),
        }
    }

    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.buffer.clone();
        let make_writer = move || TestWriter(writer.clone());
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .without_time()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(make_writer)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn output(&self) -> String {
        let buf = self.buffer.lock().unwrap();
        String::from_utf8_lossy(&buf).to_string()
    }

    /// Assert that the captured log output contains the provided substring.
    pub fn assert_contains(&self, needle: &str) {
        let out = self.output();
        assert!(
            out.contains(needle),
            "expected logs to contain `{needle}`, got:\n{out}"
        );
    }
}

struct TestWriter(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

impl std::io::Write for TestWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
