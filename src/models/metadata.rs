// src/models/metadata.rs

//! Metadata entries and the one-or-many normalization boundary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::utils::xml;

/// Composite key of author contribution entries.
pub const AUTHOR_KEY: &str = "dc.contributor.author";

/// Resolve a repeating element into an ordered sequence.
///
/// The transport yields a bare value when an element occurs once and an
/// array when it repeats. Absent or null input yields an empty sequence.
pub fn as_sequence(value: Option<&Value>) -> Vec<&Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().collect(),
        Some(other) => vec![other],
    }
}

/// A `schema.element[.qualifier]` metadata key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetadataKey {
    pub schema: String,
    pub element: String,
    pub qualifier: Option<String>,
}

impl MetadataKey {
    pub fn new(schema: &str, element: &str, qualifier: Option<&str>) -> Self {
        Self {
            schema: schema.to_string(),
            element: element.to_string(),
            qualifier: qualifier.map(str::to_string),
        }
    }

    /// Whether `entry` falls under this key.
    ///
    /// An unqualified key matches every qualifier of its element.
    pub fn matches(&self, entry: &MetadataEntry) -> bool {
        entry.schema == self.schema
            && entry.element == self.element
            && match &self.qualifier {
                Some(q) => entry.qualifier.as_deref() == Some(q.as_str()),
                None => true,
            }
    }
}

impl FromStr for MetadataKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.trim().splitn(3, '.');
        let schema = parts.next().filter(|p| !p.is_empty());
        let element = parts.next().filter(|p| !p.is_empty());

        match (schema, element) {
            (Some(schema), Some(element)) => Ok(Self::new(
                schema,
                element,
                parts.next().filter(|p| !p.is_empty()),
            )),
            _ => Err(AppError::parse(format!("invalid metadata key '{s}'"))),
        }
    }
}

impl fmt::Display for MetadataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.element)?;
        if let Some(q) = &self.qualifier {
            write!(f, ".{q}")?;
        }
        Ok(())
    }
}

/// One schema-qualified key/value pair describing an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataEntry {
    pub schema: String,
    pub element: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifier: Option<String>,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl MetadataEntry {
    pub fn new(key: &str, value: impl Into<String>) -> Result<Self> {
        let key: MetadataKey = key.parse()?;
        Ok(Self {
            schema: key.schema,
            element: key.element,
            qualifier: key.qualifier,
            value: value.into(),
            language: None,
        })
    }

    /// Composite key, `schema.element[.qualifier]`.
    pub fn key(&self) -> String {
        match &self.qualifier {
            Some(q) => format!("{}.{}.{}", self.schema, self.element, q),
            None => format!("{}.{}", self.schema, self.element),
        }
    }

    /// Build an entry from a converted XML element.
    ///
    /// Accepts either a composite `key` child or explicit `schema`/`element`
    /// (and optional `qualifier`) children. A missing `value` is empty.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }

        let key = match xml::child_text(value, "key") {
            Some(key) => key.parse::<MetadataKey>().ok()?,
            None => MetadataKey {
                schema: xml::child_text(value, "schema")?,
                element: xml::child_text(value, "element")?,
                qualifier: xml::child_text(value, "qualifier"),
            },
        };

        Some(Self {
            schema: key.schema,
            element: key.element,
            qualifier: key.qualifier,
            value: value
                .get("value")
                .and_then(xml::text)
                .map(|v| v.trim().to_string())
                .unwrap_or_default(),
            language: xml::child_text(value, "language"),
        })
    }

    /// Normalize a one-or-many metadata element into ordered entries.
    pub fn normalize(value: Option<&Value>) -> Vec<Self> {
        as_sequence(value)
            .into_iter()
            .filter_map(|raw| {
                let entry = Self::from_value(raw);
                if entry.is_none() {
                    log::debug!("Skipping malformed metadata entry: {raw}");
                }
                entry
            })
            .collect()
    }
}

/// First value under `key`, or `None` when absent.
pub fn lookup<'a>(entries: &'a [MetadataEntry], key: &MetadataKey) -> Option<&'a str> {
    entries
        .iter()
        .find(|entry| key.matches(entry))
        .map(|entry| entry.value.as_str())
}

/// All values whose composite key is exactly `key`, in order.
pub fn values_for<'a>(entries: &'a [MetadataEntry], key: &'a str) -> impl Iterator<Item = &'a str> {
    entries
        .iter()
        .filter(move |entry| entry.key() == key)
        .map(|entry| entry.value.as_str())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn entry(key: &str, value: &str) -> MetadataEntry {
        MetadataEntry::new(key, value).unwrap()
    }

    #[test]
    fn test_as_sequence_shapes() {
        assert!(as_sequence(None).is_empty());
        assert!(as_sequence(Some(&Value::Null)).is_empty());

        let single = json!({"key": "dc.title"});
        assert_eq!(as_sequence(Some(&single)), vec![&single]);

        let many = json!([{"key": "a.b"}, {"key": "c.d"}]);
        let seq = as_sequence(Some(&many));
        assert_eq!(seq.len(), 2);
        assert_eq!(seq[0]["key"], "a.b");
        assert_eq!(seq[1]["key"], "c.d");
    }

    #[test]
    fn test_normalize_single_object() {
        let raw = json!({"key": "dc.contributor.author", "value": "Smith, J.", "language": "en"});
        let entries = MetadataEntry::normalize(Some(&raw));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].key(), AUTHOR_KEY);
        assert_eq!(entries[0].value, "Smith, J.");
        assert_eq!(entries[0].language.as_deref(), Some("en"));
    }

    #[test]
    fn test_normalize_preserves_order() {
        let raw = json!([
            {"key": "dc.contributor.author", "value": "First"},
            {"key": "dc.title", "value": "A Title"},
            {"key": "dc.contributor.author", "value": "Second"},
        ]);
        let entries = MetadataEntry::normalize(Some(&raw));
        let authors: Vec<_> = values_for(&entries, AUTHOR_KEY).collect();
        assert_eq!(authors, vec!["First", "Second"]);
    }

    #[test]
    fn test_normalize_absent_and_malformed() {
        assert!(MetadataEntry::normalize(None).is_empty());

        let raw = json!(["", {"value": "no key"}, {"key": "dc.title", "value": "Kept"}]);
        let entries = MetadataEntry::normalize(Some(&raw));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].value, "Kept");
    }

    #[test]
    fn test_explicit_schema_fields() {
        let raw = json!({"schema": "dc", "element": "date", "qualifier": "issued", "value": "2021"});
        let parsed = MetadataEntry::from_value(&raw).unwrap();
        assert_eq!(parsed.key(), "dc.date.issued");
    }

    #[test]
    fn test_missing_value_is_empty() {
        let raw = json!({"key": "dc.subject"});
        assert_eq!(MetadataEntry::from_value(&raw).unwrap().value, "");
    }

    #[test]
    fn test_key_parse_and_display() {
        let key: MetadataKey = "dc.description.abstract".parse().unwrap();
        assert_eq!(key.qualifier.as_deref(), Some("abstract"));
        assert_eq!(key.to_string(), "dc.description.abstract");
        assert!("dc".parse::<MetadataKey>().is_err());
        assert!(".title".parse::<MetadataKey>().is_err());
    }

    #[test]
    fn test_lookup_rules() {
        let entries = vec![
            entry("dc.description.abstract", "An abstract"),
            entry("dc.title", "Title"),
            entry("dc.date.issued", "2020"),
        ];

        let title: MetadataKey = "dc.title".parse().unwrap();
        assert_eq!(lookup(&entries, &title), Some("Title"));

        let description: MetadataKey = "dc.description".parse().unwrap();
        assert_eq!(lookup(&entries, &description), Some("An abstract"));

        let accessioned: MetadataKey = "dc.date.accessioned".parse().unwrap();
        assert_eq!(lookup(&entries, &accessioned), None);
        assert_eq!(lookup(&[], &title), None);
    }
}
