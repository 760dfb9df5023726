// src/models/article.rs

//! Article records and the detail view built from item metadata.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{
    AUTHOR_KEY, Department, MetadataEntry, MetadataKey, lookup, values_for,
};
use crate::utils::xml;

/// A publication joined with its owning department.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// Item identifier
    pub id: String,

    /// Item title as listed by the repository
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Item type label
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,

    /// Last modification time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<NaiveDateTime>,

    /// Metadata entries in repository order
    #[serde(default)]
    pub metadata: Vec<MetadataEntry>,

    /// Owning department id
    pub department_id: String,

    /// Owning department display name
    pub department_name: String,
}

impl ArticleRecord {
    /// Build a record from a converted `<item>` element, tagged with `department`.
    pub fn from_value(value: &Value, department: &Department, prefix: &str) -> Option<Self> {
        let id = xml::child_text(value, "id")?;

        Some(Self {
            id,
            name: xml::child_text(value, "name"),
            item_type: xml::child_text(value, "type"),
            last_modified: xml::child_text(value, "lastModified")
                .as_deref()
                .and_then(parse_timestamp),
            metadata: MetadataEntry::normalize(value.get("metadata")),
            department_id: department.id.clone(),
            department_name: department.display_name(prefix).to_string(),
        })
    }

    /// Author values in contribution order.
    pub fn authors(&self) -> impl Iterator<Item = &str> {
        values_for(&self.metadata, AUTHOR_KEY)
    }

    pub fn first_author(&self) -> Option<&str> {
        self.authors().next()
    }

    pub fn year(&self) -> Option<i32> {
        self.last_modified.map(|t| t.year())
    }
}

/// Parse the timestamp formats the repository emits.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(t.naive_utc());
    }
    if let Ok(t) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(t);
    }
    if let Ok(t) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(t);
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(d) => d.and_hms_opt(0, 0, 0),
        Err(_) => {
            log::debug!("Unrecognized timestamp '{raw}'");
            None
        }
    }
}

/// Keys accepted as an abstract; other `dc.description.*` qualifiers
/// (provenance, sponsorship) are not abstracts.
const ABSTRACT_KEYS: [&str; 2] = ["dc.description.abstract", "dc.description"];

/// Detail view of one article, built from its metadata entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArticleDetails {
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub date_issued: Option<String>,
    pub keywords: Vec<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
}

impl ArticleDetails {
    pub const UNTITLED: &'static str = "Research Publication";
    pub const UNKNOWN_AUTHOR: &'static str = "Unknown author";
    pub const NO_DATE: &'static str = "N/A";
    pub const NO_ABSTRACT: &'static str = "No abstract available for this publication.";

    pub fn from_metadata(entries: &[MetadataEntry]) -> Self {
        let key = |k: &str| MetadataKey::new("dc", k, None);
        let issued = MetadataKey::new("dc", "date", Some("issued"));

        Self {
            title: lookup(entries, &key("title")).map(str::to_string),
            authors: values_for(entries, AUTHOR_KEY).map(str::to_string).collect(),
            date_issued: lookup(entries, &issued).map(str::to_string),
            keywords: values_for(entries, "dc.subject").map(str::to_string).collect(),
            abstract_text: entries
                .iter()
                .find(|entry| ABSTRACT_KEYS.contains(&entry.key().as_str()))
                .map(|entry| entry.value.clone()),
        }
    }

    pub fn title_or_default(&self) -> &str {
        self.title.as_deref().unwrap_or(Self::UNTITLED)
    }

    pub fn authors_line(&self) -> String {
        if self.authors.is_empty() {
            Self::UNKNOWN_AUTHOR.to_string()
        } else {
            self.authors.join(", ")
        }
    }

    pub fn date_or_default(&self) -> &str {
        self.date_issued.as_deref().unwrap_or(Self::NO_DATE)
    }

    pub fn abstract_or_default(&self) -> &str {
        self.abstract_text.as_deref().unwrap_or(Self::NO_ABSTRACT)
    }
}
