// src/pipeline/refresh.rs

//! Full catalog refresh.

use std::time::Instant;

use crate::models::{ArticleRecord, Department};
use crate::services::{DepartmentFailure, RepositoryApi, fetch_catalog};
use crate::session::Session;
use crate::utils::XmlSource;

/// Result of a full refresh.
#[derive(Debug, Default)]
pub struct RefreshOutcome {
    pub departments: Vec<Department>,
    pub records: Vec<ArticleRecord>,
    pub failed_departments: Vec<DepartmentFailure>,
}

impl RefreshOutcome {
    /// Swap the refreshed catalog into `session` as one unit.
    pub fn apply(self, session: &mut Session) {
        session.replace_catalog(self.departments, self.records);
    }
}

/// Fetch the department list, then every department's items.
///
/// Never fails: a department listing failure yields an empty catalog, and a
/// failed department contributes no records.
pub async fn run_refresh<S: XmlSource>(api: &RepositoryApi<S>, concurrency: usize) -> RefreshOutcome {
    let started = Instant::now();

    let departments = match api.departments().await {
        Ok(departments) => departments,
        Err(e) => {
            log::error!("Failed to load departments: {e}");
            return RefreshOutcome::default();
        }
    };
    log::info!("Loaded {} departments", departments.len());

    let joined = fetch_catalog(api, &departments, concurrency).await;

    log::info!(
        "Loaded {} records from {}/{} departments in {:.1}s",
        joined.records.len(),
        departments.len() - joined.failures.len(),
        departments.len(),
        started.elapsed().as_secs_f64()
    );

    RefreshOutcome {
        departments,
        records: joined.records,
        failed_departments: joined.failures,
    }
}
