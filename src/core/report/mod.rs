//! Report generation for a plan session
//!
//! Reports are rendered in Markdown (human-readable, from an embedded
//! template) or JSON (a snapshot with chronologically ordered GPA series for
//! chart consumers).

pub mod formats;

use crate::core::progress::CreditProgress;
use crate::core::session::{PlanSession, ValidationIssue};
use crate::core::summary::Summary;
use std::error::Error;
use std::path::Path;

pub use formats::{JsonReporter, MarkdownReporter, ReportFormat};

/// Data context for report generation
///
/// Everything a report shows is computed once and shared by every format.
#[derive(Debug, Clone)]
pub struct ReportContext<'a> {
    /// Session being reported
    pub session: &'a PlanSession,
    /// Summary values
    pub summary: &'a Summary,
    /// Credit progress table
    pub progress: &'a CreditProgress,
    /// Plan rule violations
    pub issues: &'a [ValidationIssue],
}

impl<'a> ReportContext<'a> {
    /// Create a new report context
    #[must_use]
    pub const fn new(
        session: &'a PlanSession,
        summary: &'a Summary,
        progress: &'a CreditProgress,
        issues: &'a [ValidationIssue],
    ) -> Self {
        Self {
            session,
            summary,
            progress,
            issues,
        }
    }

    /// Name of the plan file, or a placeholder for an unsaved session
    #[must_use]
    pub fn source_name(&self) -> String {
        self.session
            .path()
            .map_or_else(|| "(unsaved plan)".to_string(), |p| p.display().to_string())
    }

    /// Number of catalog courses
    #[must_use]
    pub fn course_count(&self) -> usize {
        self.session.catalog().len()
    }

    /// Number of selected courses
    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.session.selection().len()
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Generate a report to a file
    ///
    /// # Errors
    /// Returns an error if report generation or file writing fails
    fn generate(&self, ctx: &ReportContext, output_path: &Path) -> Result<(), Box<dyn Error>>;

    /// Generate report content as a string
    ///
    /// # Errors
    /// Returns an error if report generation fails
    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>>;
}
