// src/services/api.rs

//! Repository API wrapper.
//!
//! Maps the three REST endpoints onto typed results. Envelope unwrapping and
//! one-or-many normalization happen here so callers never see raw arity.

use serde_json::Value;

use crate::error::Result;
use crate::models::{Department, MetadataEntry, RepositoryConfig, as_sequence};
use crate::utils::XmlSource;

/// Typed access to the repository's collections, items and item metadata.
pub struct RepositoryApi<S> {
    source: S,
    config: RepositoryConfig,
}

impl<S: XmlSource> RepositoryApi<S> {
    pub fn new(source: S, config: RepositoryConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// List the departments under the configured community.
    pub async fn departments(&self) -> Result<Vec<Department>> {
        let path = format!("/communities/{}/collections", self.config.community_id);
        let doc = self.source.fetch(&path).await?;
        Ok(Department::parse_all(
            doc.get("collections").and_then(|c| c.get("collection")),
        ))
    }

    /// List raw items of one department with their metadata expanded.
    pub async fn items(&self, department_id: &str) -> Result<Vec<Value>> {
        let path = format!(
            "/collections/{}/items?expand=metadata&limit={}",
            department_id, self.config.item_limit
        );
        let doc = self.source.fetch(&path).await?;
        let items = doc.get("items").and_then(|i| i.get("item"));
        Ok(as_sequence(items).into_iter().cloned().collect())
    }

    /// Fetch the metadata entries of a single item.
    pub async fn item_metadata(&self, item_id: &str) -> Result<Vec<MetadataEntry>> {
        let path = format!("/items/{item_id}/metadata");
        let doc = self.source.fetch(&path).await?;
        Ok(MetadataEntry::normalize(
            doc.get("metadataEntries")
                .and_then(|m| m.get("metadataentry")),
        ))
    }
}
