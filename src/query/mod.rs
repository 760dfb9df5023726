//! Client-side query layer over the flat record set.
//!
//! - `evaluate`: department filter and faculty-wide search
//! - `Paginator`: page slicing and navigation
//! - `Stats`: dashboard statistics

mod paginate;
mod search;
mod stats;

pub use paginate::{Page, PageSize, Paginator, paginate, total_pages};
pub use search::{DepartmentFilter, evaluate};
pub use stats::{AuthorBucket, BucketCount, DepartmentShare, Stats, department_breakdown};
