// src/lib.rs

//! pubdash: research publication dashboard library

pub mod error;
pub mod models;
pub mod pipeline;
pub mod query;
pub mod services;
pub mod session;
pub mod utils;
