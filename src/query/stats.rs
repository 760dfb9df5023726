// src/query/stats.rs

//! Summary statistics over a record set.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::models::{ArticleRecord, Department};

/// Authors-per-paper bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum AuthorBucket {
    One,
    Two,
    Three,
    Four,
    Five,
    MoreThanFive,
}

impl AuthorBucket {
    pub const ALL: [AuthorBucket; 6] = [
        Self::One,
        Self::Two,
        Self::Three,
        Self::Four,
        Self::Five,
        Self::MoreThanFive,
    ];

    /// Bucket for a paper with `authors` author entries; zero counts as one.
    pub fn for_count(authors: usize) -> Self {
        match authors {
            0 | 1 => Self::One,
            2 => Self::Two,
            3 => Self::Three,
            4 => Self::Four,
            5 => Self::Five,
            _ => Self::MoreThanFive,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::One => "1",
            Self::Two => "2",
            Self::Three => "3",
            Self::Four => "4",
            Self::Five => "5",
            Self::MoreThanFive => "5+",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for AuthorBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One => write!(f, "1 Author"),
            other => write!(f, "{} Authors", other.key()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketCount {
    pub bucket: &'static str,
    pub label: String,
    pub count: usize,
}

/// A department's share of the declared publication total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentShare {
    pub id: String,
    pub name: String,
    pub abbreviation: String,
    pub item_count: usize,
}

/// Dashboard statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stats {
    /// Records in the set
    pub total: usize,
    /// Publications declared by the repository for the scope
    pub declared_total: usize,
    pub department_count: usize,
    pub unique_authors: usize,
    pub authors_per_paper: Vec<BucketCount>,
    /// Years from the earliest record to `current_year`, inclusive
    pub research_span_years: Option<i32>,
    pub departments: Vec<DepartmentShare>,
}

impl Stats {
    /// Compute statistics for `records`.
    ///
    /// `selected` narrows the declared total and the department breakdown to
    /// a single department.
    pub fn compute<'a>(
        records: impl IntoIterator<Item = &'a ArticleRecord>,
        departments: &[Department],
        selected: Option<&Department>,
        prefix: &str,
        current_year: i32,
    ) -> Self {
        let mut total = 0;
        let mut buckets = [0usize; 6];
        let mut authors: HashSet<&str> = HashSet::new();
        let mut earliest: Option<i32> = None;

        for record in records {
            total += 1;

            let mut count = 0;
            for author in record.authors() {
                count += 1;
                authors.insert(author);
            }
            buckets[AuthorBucket::for_count(count).index()] += 1;

            if let Some(year) = record.year() {
                earliest = Some(earliest.map_or(year, |e| e.min(year)));
            }
        }

        let scope: Vec<&Department> = match selected {
            Some(dept) => vec![dept],
            None => departments.iter().collect(),
        };

        Self {
            total,
            declared_total: scope.iter().map(|d| d.item_count).sum(),
            department_count: departments.len(),
            unique_authors: authors.len(),
            authors_per_paper: AuthorBucket::ALL
                .into_iter()
                .map(|bucket| BucketCount {
                    bucket: bucket.key(),
                    label: bucket.to_string(),
                    count: buckets[bucket.index()],
                })
                .collect(),
            research_span_years: earliest.map(|year| current_year - year + 1),
            departments: department_breakdown(scope, prefix),
        }
    }

    pub fn bucket(&self, bucket: AuthorBucket) -> usize {
        self.authors_per_paper[bucket.index()].count
    }
}

/// Departments with a non-zero declared count, largest first.
pub fn department_breakdown<'a>(
    departments: impl IntoIterator<Item = &'a Department>,
    prefix: &str,
) -> Vec<DepartmentShare> {
    let mut shares: Vec<DepartmentShare> = departments
        .into_iter()
        .filter(|d| d.item_count > 0)
        .map(|d| DepartmentShare {
            id: d.id.clone(),
            name: d.display_name(prefix).to_string(),
            abbreviation: d.abbreviation(prefix),
            item_count: d.item_count,
        })
        .collect();
    shares.sort_by(|a, b| b.item_count.cmp(&a.item_count));
    shares
}
