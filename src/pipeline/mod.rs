//! Pipeline entry points.
//!
//! - `run_refresh`: Fetch departments and their articles into one catalog

pub mod refresh;

pub use refresh::{RefreshOutcome, run_refresh};
