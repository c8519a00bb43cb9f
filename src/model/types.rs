//! Page records, indexable documents and search results.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::aliases::synthesize_aliases;
use crate::search::markup::strip_markup;

/// Category tag of a page.
///
/// The numeric code is what the index stores and filters on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    Person,
    Pet,
    Event,
    Location,
    Plant,
    Other,
}

impl PageType {
    pub const ALL: [PageType; 6] = [
        PageType::Person,
        PageType::Pet,
        PageType::Event,
        PageType::Location,
        PageType::Plant,
        PageType::Other,
    ];

    pub fn code(self) -> u64 {
        match self {
            PageType::Person => 0,
            PageType::Pet => 1,
            PageType::Event => 2,
            PageType::Location => 3,
            PageType::Plant => 4,
            PageType::Other => 5,
        }
    }

    pub fn from_code(code: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }
}

/// An alternate name a page is known by (previous titles, nicknames).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageAlias {
    pub title: String,
}

/// Source-of-truth page as handed over by the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRecord {
    pub id: Uuid,
    pub key: String,
    pub title: String,
    #[serde(rename = "type")]
    pub page_type: PageType,
    /// Markdown body.
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub aliases: Vec<PageAlias>,
    /// Raw JSON facts payload, if any.
    #[serde(default)]
    pub facts: Option<String>,
}

/// Indexable projection of a [`PageRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: Uuid,
    pub key: String,
    pub title: String,
    /// Comma-joined alias blob.
    pub aliases: String,
    pub page_type: PageType,
    /// Plain text, markup already stripped.
    pub description: String,
}

impl Document {
    /// Build the document for a page: strips the description markup and
    /// synthesizes the alias blob.
    pub fn from_page(page: &PageRecord) -> Self {
        Self {
            id: page.id,
            key: page.key.clone(),
            title: page.title.clone(),
            aliases: synthesize_aliases(page).join(", "),
            page_type: page.page_type,
            description: strip_markup(&page.description),
        }
    }
}

/// One ranked hit.
///
/// Suggestions carry the raw title in `highlighted_title` and no description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub id: Uuid,
    pub key: String,
    pub page_type: PageType,
    pub highlighted_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlighted_description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_type_codes_roundtrip() {
        for t in PageType::ALL {
            assert_eq!(PageType::from_code(t.code()), Some(t));
        }
        assert_eq!(PageType::from_code(99), None);
    }

    #[test]
    fn page_record_deserializes_with_defaults() {
        let raw = r#"{
            "id": "6f1c1f0e-6a43-4d52-9a7c-2f1c2c1e8e01",
            "key": "apple-tree",
            "title": "Apple Tree",
            "type": "plant"
        }"#;
        let page: PageRecord = serde_json::from_str(raw).expect("parse page");
        assert_eq!(page.page_type, PageType::Plant);
        assert!(page.aliases.is_empty());
        assert!(page.facts.is_none());
        assert_eq!(page.description, "");
    }

    #[test]
    fn document_from_page_strips_markup_and_joins_aliases() {
        let page = PageRecord {
            id: Uuid::new_v4(),
            key: "old-oak".into(),
            title: "Old Oak".into(),
            page_type: PageType::Plant,
            description: "The **oldest** tree in [the park](http://example.com).".into(),
            aliases: vec![
                PageAlias {
                    title: "Great Oak".into(),
                },
                PageAlias {
                    title: "The Oak".into(),
                },
            ],
            facts: None,
        };
        let doc = Document::from_page(&page);
        assert_eq!(doc.description, "The oldest tree in the park.");
        assert_eq!(doc.aliases, "Great Oak, The Oak");
        assert_eq!(doc.title, "Old Oak");
    }

    #[test]
    fn suggestion_result_omits_description_when_serialized() {
        let result = SearchResult {
            id: Uuid::nil(),
            key: "k".into(),
            page_type: PageType::Other,
            highlighted_title: "K".into(),
            highlighted_description: None,
        };
        let json = serde_json::to_value(&result).expect("serialize");
        assert!(json.get("highlighted_description").is_none());
        assert_eq!(json["page_type"], "other");
    }
}
