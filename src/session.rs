// src/session.rs

//! Owned application state for one dashboard session.
//!
//! Departments and records are replaced wholesale on refresh and shared
//! behind `Arc`, so a reader holding the previous set keeps a consistent view
//! until it asks again. Any change to the matching set (catalog, search term,
//! department filter, page size) puts the listing back on page 1.

use std::sync::Arc;

use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::{ArticleRecord, Config, Department};
use crate::query::{DepartmentFilter, PageSize, Paginator, Stats, evaluate};

/// One rendered page of the article listing.
#[derive(Debug, Clone, Serialize)]
pub struct ListingView<'a> {
    pub records: Vec<&'a ArticleRecord>,
    pub current_page: usize,
    pub total_pages: usize,
    pub first_index: usize,
    pub last_index: usize,
    pub total_matches: usize,
    /// True when a search term is active and results span every department
    pub faculty_wide: bool,
    /// Placeholder text when nothing matches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Session {
    departments: Arc<[Department]>,
    records: Arc<[ArticleRecord]>,
    search_term: String,
    filter: DepartmentFilter,
    paginator: Paginator,
    department_prefix: String,
}

impl Session {
    pub fn new(page_size: PageSize, department_prefix: impl Into<String>) -> Self {
        Self {
            departments: Arc::from(Vec::new()),
            records: Arc::from(Vec::new()),
            search_term: String::new(),
            filter: DepartmentFilter::All,
            paginator: Paginator::new(page_size),
            department_prefix: department_prefix.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            PageSize::try_from(config.view.page_size)?,
            config.repository.department_prefix.clone(),
        ))
    }

    /// Swap in a freshly fetched catalog.
    ///
    /// Records whose department is not in `departments` are dropped. A
    /// department filter that no longer resolves falls back to all departments.
    pub fn replace_catalog(&mut self, departments: Vec<Department>, records: Vec<ArticleRecord>) {
        let before = records.len();
        let records: Vec<ArticleRecord> = records
            .into_iter()
            .filter(|r| departments.iter().any(|d| d.id == r.department_id))
            .collect();
        if records.len() < before {
            log::warn!(
                "Dropped {} records referencing unknown departments",
                before - records.len()
            );
        }

        if let DepartmentFilter::Department(id) = &self.filter {
            if !departments.iter().any(|d| d.id == *id) {
                log::warn!("Selected department {id} is gone after refresh");
                self.filter = DepartmentFilter::All;
            }
        }

        self.departments = Arc::from(departments);
        self.records = Arc::from(records);
        self.paginator.reset();
    }

    pub fn departments(&self) -> &[Department] {
        &self.departments
    }

    pub fn records(&self) -> &[ArticleRecord] {
        &self.records
    }

    /// Shared handle to the current record set.
    pub fn records_handle(&self) -> Arc<[ArticleRecord]> {
        Arc::clone(&self.records)
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn filter(&self) -> &DepartmentFilter {
        &self.filter
    }

    pub fn current_page(&self) -> usize {
        self.paginator.current_page()
    }

    pub fn page_size(&self) -> PageSize {
        self.paginator.page_size()
    }

    pub fn department(&self, id: &str) -> Option<&Department> {
        self.departments.iter().find(|d| d.id == id)
    }

    pub fn selected_department(&self) -> Option<&Department> {
        match &self.filter {
            DepartmentFilter::All => None,
            DepartmentFilter::Department(id) => self.department(id),
        }
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        let term = term.into();
        if term != self.search_term {
            self.search_term = term;
            self.paginator.reset();
        }
    }

    /// Scope the listing to one department, or to all with `DepartmentFilter::All`.
    ///
    /// Unknown department ids are rejected and leave the state unchanged.
    pub fn select_department(&mut self, filter: DepartmentFilter) -> Result<()> {
        if let DepartmentFilter::Department(id) = &filter {
            if self.department(id).is_none() {
                return Err(AppError::validation(format!("unknown department '{id}'")));
            }
        }
        if filter != self.filter {
            self.filter = filter;
            self.paginator.reset();
        }
        Ok(())
    }

    /// Like `select_department`, but stays faculty-wide when no departments
    /// were loaded, so a failed listing still renders its empty state.
    pub fn select_department_or_all(&mut self, filter: DepartmentFilter) -> Result<()> {
        if self.departments.is_empty() {
            if let DepartmentFilter::Department(id) = &filter {
                log::warn!("No departments loaded; ignoring department filter {id}");
            }
            return self.select_department(DepartmentFilter::All);
        }
        self.select_department(filter)
    }

    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.paginator.set_page_size(page_size);
    }

    pub fn matching(&self) -> Vec<&ArticleRecord> {
        evaluate(&self.records, &self.search_term, &self.filter)
    }

    pub fn go_to_page(&mut self, page: usize) -> Result<()> {
        let count = self.matching().len();
        self.paginator.go_to(page, count)
    }

    pub fn next_page(&mut self) -> Result<()> {
        let count = self.matching().len();
        self.paginator.next(count)
    }

    pub fn previous_page(&mut self) -> Result<()> {
        let count = self.matching().len();
        self.paginator.previous(count)
    }

    pub fn view(&self) -> ListingView<'_> {
        let matching = self.matching();
        let page = self.paginator.page(&matching);
        let searching = !self.search_term.trim().is_empty();

        let empty_message = matching.is_empty().then(|| {
            if searching {
                format!("No publications match \"{}\"", self.search_term.trim())
            } else if self.filter == DepartmentFilter::All {
                "No articles found.".to_string()
            } else {
                "No articles found in this department.".to_string()
            }
        });

        ListingView {
            records: page.items.to_vec(),
            current_page: page.current_page,
            total_pages: page.total_pages,
            first_index: page.first_index,
            last_index: page.last_index,
            total_matches: page.total,
            faculty_wide: searching,
            empty_message,
        }
    }

    /// Statistics for the selected department, or the whole faculty.
    pub fn stats(&self, current_year: i32) -> Stats {
        let scoped = evaluate(&self.records, "", &self.filter);
        Stats::compute(
            scoped,
            &self.departments,
            self.selected_department(),
            &self.department_prefix,
            current_year,
        )
    }
}
