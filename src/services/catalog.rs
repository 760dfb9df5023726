// src/services/catalog.rs

//! Department-to-article record join.
//!
//! Fetches the item list of every department concurrently and flattens the
//! results into one record set tagged with the owning department. A failed
//! department contributes no records; the others are unaffected.

use futures::stream::{self, StreamExt};
use serde_json::Value;

use crate::error::Result;
use crate::models::{ArticleRecord, Department};
use crate::services::RepositoryApi;
use crate::utils::XmlSource;

/// A department whose item fetch failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentFailure {
    pub department_id: String,
    pub message: String,
}

/// Flat record set produced by a join.
#[derive(Debug, Default)]
pub struct JoinOutcome {
    pub records: Vec<ArticleRecord>,
    pub failures: Vec<DepartmentFailure>,
}

/// Join each department with its fetched items.
///
/// Department order and item order within a department are preserved.
pub fn join_records<'a, I>(fetched: I, prefix: &str) -> JoinOutcome
where
    I: IntoIterator<Item = (&'a Department, Result<Vec<Value>>)>,
{
    let mut outcome = JoinOutcome::default();

    for (department, result) in fetched {
        match result {
            Ok(items) => {
                let before = outcome.records.len();
                outcome.records.extend(
                    items
                        .iter()
                        .filter_map(|raw| ArticleRecord::from_value(raw, department, prefix)),
                );
                let joined = outcome.records.len() - before;
                if joined < items.len() {
                    log::warn!(
                        "Dropped {} items without an id in department {}",
                        items.len() - joined,
                        department.id
                    );
                }
            }
            Err(error) => {
                log::warn!(
                    "Failed to fetch items for department {} ({}): {}",
                    department.name,
                    department.id,
                    error
                );
                outcome.failures.push(DepartmentFailure {
                    department_id: department.id.clone(),
                    message: error.to_string(),
                });
            }
        }
    }

    outcome
}

/// Fetch items for every department with bounded concurrency and join them.
pub async fn fetch_catalog<S: XmlSource>(
    api: &RepositoryApi<S>,
    departments: &[Department],
    concurrency: usize,
) -> JoinOutcome {
    let fetched: Vec<(&Department, Result<Vec<Value>>)> = stream::iter(departments)
        .map(|department| async move { (department, api.items(&department.id).await) })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    join_records(fetched, &api.config().department_prefix)
}
