//! Core module: course models, the aggregation engine and its collaborators

pub mod document;
pub mod error;
pub mod matcher;
pub mod metrics;
pub mod models;
pub mod progress;
pub mod report;
pub mod session;
pub mod sorting;
pub mod summary;

pub use document::{DocumentError, PlanDocument};
pub use error::PlanError;
pub use session::{PlanSession, ValidationIssue};

/// Returns the current version of the `gradeplan` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
