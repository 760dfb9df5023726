// src/models/department.rs

//! Department (collection) data structure.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::as_sequence;
use crate::utils::xml;

/// An organizational grouping of publications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Collection identifier
    pub id: String,

    /// Full collection name (e.g., "Department of Civil Engineering")
    pub name: String,

    /// Item count declared by the repository
    pub item_count: usize,
}

impl Department {
    /// Build a department from a converted `<collection>` element.
    pub fn from_value(value: &Value) -> Option<Self> {
        let id = xml::child_text(value, "id")?;
        let name = xml::child_text(value, "name").unwrap_or_else(|| id.clone());
        let item_count = xml::child_text(value, "numberItems")
            .and_then(|n| n.parse().ok())
            .unwrap_or(0);

        Some(Self {
            id,
            name,
            item_count,
        })
    }

    /// Parse every collection in a one-or-many element, skipping those without an id.
    pub fn parse_all(value: Option<&Value>) -> Vec<Self> {
        as_sequence(value)
            .into_iter()
            .filter_map(|raw| {
                let dept = Self::from_value(raw);
                if dept.is_none() {
                    log::warn!("Skipping collection without an id: {raw}");
                }
                dept
            })
            .collect()
    }

    /// Name with the literal `prefix` stripped.
    pub fn display_name<'a>(&'a self, prefix: &str) -> &'a str {
        self.name.strip_prefix(prefix).unwrap_or(&self.name)
    }

    /// Initials of the display name ("Civil Engineering" → "CE").
    pub fn abbreviation(&self, prefix: &str) -> String {
        self.display_name(prefix)
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const PREFIX: &str = "Department of ";

    fn civil() -> Department {
        Department {
            id: "12".to_string(),
            name: "Department of Civil Engineering".to_string(),
            item_count: 40,
        }
    }

    #[test]
    fn test_display_name_strips_prefix() {
        assert_eq!(civil().display_name(PREFIX), "Civil Engineering");

        let other = Department {
            name: "Research Centre".to_string(),
            ..civil()
        };
        assert_eq!(other.display_name(PREFIX), "Research Centre");
    }

    #[test]
    fn test_abbreviation() {
        assert_eq!(civil().abbreviation(PREFIX), "CE");
    }

    #[test]
    fn test_from_value() {
        let raw = json!({"id": "3", "name": "Department of Physics", "numberItems": "17"});
        let dept = Department::from_value(&raw).unwrap();
        assert_eq!(dept.id, "3");
        assert_eq!(dept.item_count, 17);

        let no_count = json!({"id": "4", "name": "X", "numberItems": "many"});
        assert_eq!(Department::from_value(&no_count).unwrap().item_count, 0);
    }

    #[test]
    fn test_parse_all_single_and_missing_id() {
        let single = json!({"id": "1", "name": "A"});
        assert_eq!(Department::parse_all(Some(&single)).len(), 1);

        let mixed = json!([{"name": "No id"}, {"id": "2", "name": "B"}]);
        let depts = Department::parse_all(Some(&mixed));
        assert_eq!(depts.len(), 1);
        assert_eq!(depts[0].id, "2");

        assert!(Department::parse_all(None).is_empty());
    }
}
