//! Shared library for `gradeplan`
//! Contains the course-selection model, the GPA aggregation engine and the
//! credit-progress rollups used by the CLI.

pub mod config;
pub mod core;
pub mod logger;

pub use crate::core::get_version;
