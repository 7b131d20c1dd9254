//! Summary formatter: the scalar values and lines shown under the tables

use crate::core::metrics::{GpaAggregate, GpaState, SemesterGpa, YearGpa};
use crate::core::models::ActualSemester;
use crate::core::session::PlanSession;
use serde::Serialize;
use std::fmt;

/// Format credits compactly: `3`, `0.5`, `18.5`
#[must_use]
pub fn format_credits(value: f64) -> String {
    // +0.0 turns -0.0 into 0.0
    let rounded = (value * 100.0).round() / 100.0 + 0.0;
    format!("{rounded}")
}

/// Format an aggregate: `3.700`, `incomplete (2 pending)` or `n/a`
#[must_use]
pub fn format_gpa(gpa: &GpaAggregate) -> String {
    match gpa.state() {
        GpaState::Final { value } => format!("{value:.3}"),
        GpaState::Incomplete { missing, .. } => format!("incomplete ({missing} pending)"),
        GpaState::Empty | GpaState::Undefined => "n/a".to_string(),
    }
}

/// Like [`format_gpa`], with the partial value of an incomplete aggregate
#[must_use]
pub fn format_gpa_detailed(gpa: &GpaAggregate) -> String {
    match gpa.state() {
        GpaState::Incomplete {
            partial: Some(partial),
            missing,
        } => format!("incomplete ({missing} pending, {partial:.3} so far)"),
        _ => format_gpa(gpa),
    }
}

/// Everything the summary panel shows for one session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Credits of every resolved selection
    pub total_credits: f64,
    /// Credits of selected electives
    pub elective_credits: f64,
    /// Elective credits required
    pub elective_requirement: f64,
    /// Number of unselected required courses
    pub missing_required: usize,
    /// Advisory credit cap per semester
    pub term_credit_limit: f64,
    /// Cumulative GPA
    pub cumulative: GpaAggregate,
    /// Major GPA
    pub major: GpaAggregate,
    /// Per-year GPA, ascending
    pub years: Vec<YearGpa>,
    /// Per-semester GPA, chronological
    pub semesters: Vec<SemesterGpa>,
    /// Selected course ids missing from the catalog
    pub orphans: Vec<String>,
}

impl Summary {
    /// Collect the summary of a session
    #[must_use]
    pub fn from_session(session: &PlanSession) -> Self {
        let metrics = session.metrics();
        Self {
            total_credits: session.total_credits(),
            elective_credits: session.elective_credits(),
            elective_requirement: session.plan().elective_credit_requirement,
            missing_required: session.required_missing().len(),
            term_credit_limit: session.plan().term_credit_limit,
            cumulative: metrics.cumulative,
            major: metrics.major,
            years: metrics.years,
            semesters: metrics.semesters,
            orphans: metrics.orphans,
        }
    }

    /// `Year 1: 3.500  Year 2: incomplete (1 pending)`, or `n/a`
    #[must_use]
    pub fn yearly_overview(&self) -> String {
        if self.years.is_empty() {
            return "n/a".to_string();
        }
        self.years
            .iter()
            .map(|y| format!("{}: {}", y.label(), format_gpa(&y.gpa)))
            .collect::<Vec<_>>()
            .join("  ")
    }

    /// `1秋: 3.700  1春: 2 pending`, or `n/a`
    #[must_use]
    pub fn semester_overview(&self) -> String {
        if self.semesters.is_empty() {
            return "n/a".to_string();
        }
        self.semesters
            .iter()
            .map(|s| {
                let value = match s.gpa.state() {
                    GpaState::Incomplete { missing, .. } => format!("{missing} pending"),
                    _ => format_gpa(&s.gpa),
                };
                format!("{}: {value}", s.label())
            })
            .collect::<Vec<_>>()
            .join("  ")
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Selected credits: {}    Elective credits: {} / {}    Missing required: {}",
            format_credits(self.total_credits),
            format_credits(self.elective_credits),
            format_credits(self.elective_requirement),
            self.missing_required
        )?;
        writeln!(
            f,
            "Overall GPA: {}    Major GPA: {}",
            format_gpa(&self.cumulative),
            format_gpa(&self.major)
        )?;
        writeln!(f, "Yearly GPA: {}", self.yearly_overview())?;
        writeln!(f, "Semester GPA: {}", self.semester_overview())?;
        write!(
            f,
            "Term credit limit: {}",
            format_credits(self.term_credit_limit)
        )?;
        if !self.orphans.is_empty() {
            write!(f, "\nNot in catalog: {}", self.orphans.join(", "))?;
        }
        Ok(())
    }
}

/// Two-line summary of one semester slot
#[must_use]
pub fn semester_summary(session: &PlanSession, slot: ActualSemester) -> String {
    let gpa = crate::core::metrics::semester_gpa(session.catalog(), session.selection(), slot);
    let gpa_line = match gpa.state() {
        GpaState::Final { value } => format!("{slot} GPA (credit-weighted): {value:.3}"),
        GpaState::Incomplete { missing, .. } => {
            format!("{slot} GPA: incomplete ({missing} courses without a grade)")
        }
        GpaState::Empty => format!("{slot} GPA: n/a (no courses selected)"),
        GpaState::Undefined => format!("{slot} GPA: n/a (no credit-bearing courses)"),
    };
    format!(
        "{slot} credits: {} / limit {}\n{gpa_line}",
        format_credits(session.semester_credits(slot)),
        format_credits(session.plan().term_credit_limit)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{Catalog, CourseDef, CourseKind, Plan, SelectionRecord};

    fn slot(s: &str) -> ActualSemester {
        s.parse().unwrap()
    }

    fn session() -> PlanSession {
        let catalog = Catalog::new(vec![
            CourseDef::new("A", "A", CourseKind::Required, 3.0, "3秋").with_category("学院平台"),
            CourseDef::new("B", "B", CourseKind::Elective, 1.0, "秋").with_category("体育"),
        ])
        .unwrap();
        PlanSession::new(catalog, Plan::default(), SelectionRecord::new())
    }

    #[test]
    fn test_format_credits() {
        assert_eq!(format_credits(3.0), "3");
        assert_eq!(format_credits(0.5), "0.5");
        assert_eq!(format_credits(18.5), "18.5");
        assert_eq!(format_credits(0.1 + 0.2), "0.3");
        assert_eq!(format_credits(-0.0), "0");
    }

    #[test]
    fn test_summary_states() {
        let mut s = session();
        let empty = Summary::from_session(&s);
        assert_eq!(format_gpa(&empty.cumulative), "n/a");
        assert_eq!(empty.semester_overview(), "n/a");
        assert_eq!(empty.missing_required, 1);

        s.add_course("A", slot("1秋")).unwrap();
        s.set_gpa("A", Some(3.7)).unwrap();
        s.add_course("B", slot("2秋")).unwrap();
        let summary = Summary::from_session(&s);
        assert_eq!(format_gpa(&summary.cumulative), "incomplete (1 pending)");
        assert_eq!(
            format_gpa_detailed(&summary.cumulative),
            "incomplete (1 pending, 3.700 so far)"
        );
        assert_eq!(summary.semester_overview(), "1秋: 3.700  2秋: 1 pending");
        assert_eq!(
            summary.yearly_overview(),
            "Year 1: 3.700  Year 2: incomplete (1 pending)"
        );
        assert!(summary.to_string().contains("Elective credits: 1 / 15"));
    }

    #[test]
    fn test_semester_summary_lines() {
        let mut s = session();
        assert!(semester_summary(&s, slot("1秋")).contains("no courses selected"));
        s.add_course("A", slot("1秋")).unwrap();
        let text = semester_summary(&s, slot("1秋"));
        assert!(text.starts_with("1秋 credits: 3 / limit 30"));
        assert!(text.contains("incomplete (1 courses without a grade)"));
    }
}
