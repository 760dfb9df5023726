// src/query/search.rs

//! Record filtering and free-text search.

use serde::{Deserialize, Serialize};

use crate::models::ArticleRecord;

/// Department scope applied when no search term is active.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DepartmentFilter {
    /// Faculty-wide
    #[default]
    All,
    Department(String),
}

impl DepartmentFilter {
    pub fn from_option(id: Option<String>) -> Self {
        id.map_or(Self::All, Self::Department)
    }

    fn admits(&self, record: &ArticleRecord) -> bool {
        match self {
            Self::All => true,
            Self::Department(id) => record.department_id == *id,
        }
    }
}

/// Select the records matching a search term and department filter.
///
/// An empty (or blank) term applies the department filter. Any other term
/// searches every record regardless of the filter and matches, untrimmed, on
/// case-insensitive substring containment in the title, the id, or any
/// author value. Input order is kept.
pub fn evaluate<'a>(
    records: &'a [ArticleRecord],
    search_term: &str,
    filter: &DepartmentFilter,
) -> Vec<&'a ArticleRecord> {
    if search_term.trim().is_empty() {
        return records.iter().filter(|r| filter.admits(r)).collect();
    }

    let term = search_term.to_lowercase();
    records.iter().filter(|r| matches_term(r, &term)).collect()
}

/// `term` must already be lowercased.
fn matches_term(record: &ArticleRecord, term: &str) -> bool {
    let name_match = record
        .name
        .as_deref()
        .is_some_and(|name| name.to_lowercase().contains(term));
    let id_match = record.id.to_lowercase().contains(term);

    name_match
        || id_match
        || record
            .authors()
            .any(|author| author.to_lowercase().contains(term))
}
