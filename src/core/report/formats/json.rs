//! JSON report generator
//!
//! Emits one snapshot object. The GPA series are ordered chronologically so
//! chart tools can plot them as-is.

use crate::core::metrics::{GpaAggregate, GpaState};
use crate::core::progress::ProgressRow;
use crate::core::report::{ReportContext, ReportGenerator};
use serde::Serialize;
use std::error::Error;
use std::fs;
use std::path::Path;

/// One point of a GPA series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    /// Semester ("1秋") or year ("Year 1") label
    pub label: String,
    /// Credit-weighted mean over graded courses; partial when `missing_count > 0`
    pub value: Option<f64>,
    /// Courses without a grade
    pub missing_count: usize,
    /// Display state of the aggregate
    pub state: GpaState,
}

impl SeriesPoint {
    fn new(label: String, gpa: &GpaAggregate) -> Self {
        Self {
            label,
            value: gpa.value(),
            missing_count: gpa.missing_count(),
            state: gpa.state(),
        }
    }
}

#[derive(Serialize)]
struct Totals {
    selected_credits: f64,
    elective_credits: f64,
    elective_requirement: f64,
    missing_required: usize,
    term_credit_limit: f64,
}

#[derive(Serialize)]
struct Snapshot<'a> {
    source: String,
    totals: Totals,
    overall: SeriesPoint,
    major: SeriesPoint,
    semesters: Vec<SeriesPoint>,
    years: Vec<SeriesPoint>,
    progress: &'a [ProgressRow],
    orphans: &'a [String],
    issues: Vec<String>,
}

/// JSON report generator
pub struct JsonReporter;

impl JsonReporter {
    /// Create a new JSON reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn snapshot<'a>(ctx: &'a ReportContext) -> Snapshot<'a> {
        let summary = ctx.summary;
        Snapshot {
            source: ctx.source_name(),
            totals: Totals {
                selected_credits: summary.total_credits,
                elective_credits: summary.elective_credits,
                elective_requirement: summary.elective_requirement,
                missing_required: summary.missing_required,
                term_credit_limit: summary.term_credit_limit,
            },
            overall: SeriesPoint::new("overall".to_string(), &summary.cumulative),
            major: SeriesPoint::new("major".to_string(), &summary.major),
            semesters: summary
                .semesters
                .iter()
                .map(|s| SeriesPoint::new(s.label(), &s.gpa))
                .collect(),
            years: summary
                .years
                .iter()
                .map(|y| SeriesPoint::new(y.label(), &y.gpa))
                .collect(),
            progress: &ctx.progress.rows,
            orphans: &summary.orphans,
            issues: ctx.issues.iter().map(ToString::to_string).collect(),
        }
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for JsonReporter {
    fn generate(&self, ctx: &ReportContext, output_path: &Path) -> Result<(), Box<dyn Error>> {
        let report_content = self.render(ctx)?;
        fs::write(output_path, report_content)?;
        Ok(())
    }

    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>> {
        Ok(serde_json::to_string_pretty(&Self::snapshot(ctx))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{Catalog, CourseDef, CourseKind, Plan, SelectionRecord};
    use crate::core::session::PlanSession;
    use crate::core::summary::Summary;

    #[test]
    fn test_series_are_chronological() {
        let catalog = Catalog::new(vec![
            CourseDef::new("A", "A", CourseKind::Required, 2.0, "春"),
            CourseDef::new("B", "B", CourseKind::Required, 2.0, "秋"),
            CourseDef::new("C", "C", CourseKind::Required, 2.0, "夏"),
        ])
        .unwrap();
        let mut session = PlanSession::new(catalog, Plan::default(), SelectionRecord::new());
        session.add_course("A", "2春".parse().unwrap()).unwrap();
        session.add_course("B", "2秋".parse().unwrap()).unwrap();
        session.add_course("C", "1夏".parse().unwrap()).unwrap();
        session.set_gpa("B", Some(3.0)).unwrap();

        let summary = Summary::from_session(&session);
        let progress = session.progress();
        let issues = session.validate();
        let ctx = ReportContext::new(&session, &summary, &progress, &issues);
        let json: serde_json::Value =
            serde_json::from_str(&JsonReporter::new().render(&ctx).unwrap()).unwrap();

        let labels: Vec<&str> = json["semesters"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["label"].as_str().unwrap())
            .collect();
        assert_eq!(labels, vec!["1夏", "2秋", "2春"]);
        assert_eq!(json["semesters"][1]["state"]["kind"], "final");
        assert_eq!(json["semesters"][1]["state"]["value"], 3.0);
        assert_eq!(json["semesters"][2]["state"]["kind"], "incomplete");
        assert_eq!(json["semesters"][2]["state"]["missing"], 1);
        assert!(json["semesters"][2]["state"].get("state").is_none());
        assert_eq!(json["overall"]["missing_count"], 2);
        assert_eq!(json["years"][0]["label"], "Year 1");
    }
}
