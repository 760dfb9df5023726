//! Service layer for the dashboard.
//!
//! This module contains the fetch-side logic for:
//! - Typed repository endpoints (`RepositoryApi`)
//! - Department/article record join (`fetch_catalog`, `join_records`)

mod api;
mod catalog;

pub use api::RepositoryApi;
pub use catalog::{DepartmentFailure, JoinOutcome, fetch_catalog, join_records};
