//! Alias synthesis for indexed pages.
//!
//! A page is findable under its explicit alternate names and, for people,
//! under every name recorded in the `Main.Name` fact.

use itertools::Itertools;
use serde_json::Value;
use thiserror::Error;

use super::types::{PageRecord, PageType};

const NAME_FACT_KEY: &str = "Main.Name";
const NAME_VALUES_KEY: &str = "Values";

/// Why a facts payload could not be read.
#[derive(Debug, Error)]
pub enum FactsError {
    #[error("facts payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unexpected facts shape: {0}")]
    Shape(&'static str),
}

/// Extract `LastName FirstName MiddleName` strings from a person's facts.
///
/// Missing parts become empty, so a record with only a last name yields
/// `"Ivanov"` and one with no parts at all yields nothing.
pub fn parse_person_names(facts: &str) -> Result<Vec<String>, FactsError> {
    let root: Value = serde_json::from_str(facts)?;
    let root = root
        .as_object()
        .ok_or(FactsError::Shape("root is not an object"))?;

    let Some(name_fact) = root.get(NAME_FACT_KEY) else {
        return Ok(Vec::new());
    };
    let name_fact = name_fact
        .as_object()
        .ok_or(FactsError::Shape("name fact is not an object"))?;

    let values = match name_fact.get(NAME_VALUES_KEY) {
        None => return Ok(Vec::new()),
        Some(Value::Array(values)) => values,
        Some(_) => return Err(FactsError::Shape("name values are not a list")),
    };

    let mut names = Vec::with_capacity(values.len());
    for value in values {
        let entry = value
            .as_object()
            .ok_or(FactsError::Shape("name entry is not an object"))?;
        let full = format!(
            "{} {} {}",
            name_part(entry.get("LastName"))?,
            name_part(entry.get("FirstName"))?,
            name_part(entry.get("MiddleName"))?
        );
        let trimmed = full.trim();
        if !trimmed.is_empty() {
            names.push(trimmed.to_string());
        }
    }
    Ok(names)
}

fn name_part(value: Option<&Value>) -> Result<String, FactsError> {
    match value {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(_) => Err(FactsError::Shape("name part is not a scalar")),
    }
}

/// Distinct aliases for a page, explicit names first.
///
/// A malformed facts payload only drops the fact-derived names.
pub fn synthesize_aliases(page: &PageRecord) -> Vec<String> {
    let mut aliases: Vec<String> = page.aliases.iter().map(|a| a.title.clone()).collect();

    if page.page_type == PageType::Person
        && let Some(facts) = page.facts.as_deref()
        && !facts.is_empty()
    {
        match parse_person_names(facts) {
            Ok(names) => aliases.extend(names),
            Err(e) => {
                tracing::debug!(page = %page.id, error = %e, "facts_parse_failed");
            }
        }
    }

    aliases.into_iter().unique().collect()
}
