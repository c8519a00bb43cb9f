//! Markup stripping for indexed descriptions.
//!
//! Page descriptions are stored as markdown with occasional inline HTML and
//! wiki links. The index only ever sees the plain text produced here, so the
//! stored description and the highlighted description agree on offsets.
//!
//! # Processing Pipeline
//!
//! 1. **Unicode NFC normalization** - "café" (decomposed) → "café" (composed)
//! 2. **Code fences** - fence lines dropped, code kept as text
//! 3. **Inline markup** - HTML tags, wiki links, images, links, emphasis
//! 4. **Block markers** - headers, blockquotes, list markers
//! 5. **Whitespace normalization** - collapse runs (including newlines), trim

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use unicode_normalization::UnicodeNormalization;

static HTML_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</?[A-Za-z][^>]*>").expect("html tag regex"));
static WIKI_LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[\[([^\]|]+)(?:\|([^\]]*))?\]\]").expect("wiki link regex")
});
static IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[([^\]]*)\]\([^)]*\)").expect("image regex"));
// One level of nested parentheses in the url.
static LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[([^\]]*)\]\((?:[^()]|\([^()]*\))*\)").expect("link regex")
});
// "- ", "+ " and "1. "; "3.14 meters" is not a list item.
static LIST_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:[-+]|\d+\.)\s").expect("list marker regex"));

/// Convert a marked-up description into plain text.
pub fn strip_markup(text: &str) -> String {
    let normalized: String = text.nfc().collect();

    let mut result = String::with_capacity(normalized.len());
    let mut in_code_block = false;
    for line in normalized.lines() {
        if line.trim_start().starts_with("```") {
            in_code_block = !in_code_block;
            continue;
        }
        let stripped = if in_code_block {
            line.to_string()
        } else {
            strip_markup_line(line)
        };
        if !stripped.is_empty() {
            result.push_str(&stripped);
            result.push('\n');
        }
    }

    result.split_whitespace().join(" ")
}

/// Strip markup from a single line.
fn strip_markup_line(line: &str) -> String {
    let mut result = HTML_TAG_RE.replace_all(line, "").into_owned();

    // [[key|label]] → label, [[key]] → key
    result = WIKI_LINK_RE
        .replace_all(&result, |caps: &Captures| {
            caps.get(2)
                .filter(|label| !label.as_str().trim().is_empty())
                .or_else(|| caps.get(1))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default()
        })
        .into_owned();

    result = IMAGE_RE.replace_all(&result, "$1").into_owned();

    result = result.replace("**", "");
    result = result.replace("__", "");
    result = result.replace("~~", "");
    result = result.replace('*', "");
    result = result.replace('`', "");

    result = LINK_RE.replace_all(&result, "$1").into_owned();

    let result = result.trim_start_matches('#').trim_start();
    let result = result.trim_start_matches('>').trim_start();
    LIST_MARKER_RE.replace(result, "").into_owned()
}
