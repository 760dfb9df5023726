// src/models/mod.rs

//! Domain models for the dashboard.
//!
//! This module contains the data structures shared by the fetch, query and
//! presentation layers, organized by their primary purpose.

mod article;
mod config;
mod department;
mod metadata;

// Re-export all public types
pub use article::{ArticleDetails, ArticleRecord, parse_timestamp};
pub use config::{ClientConfig, Config, RepositoryConfig, ViewConfig};
pub use department::Department;
pub use metadata::{AUTHOR_KEY, MetadataEntry, MetadataKey, as_sequence, lookup, values_for};
