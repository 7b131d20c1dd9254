//! Markdown report generator
//!
//! Fills an embedded template with summary values and tables. The output
//! renders in GitHub, GitLab and most Markdown viewers.

use crate::core::metrics::GpaAggregate;
use crate::core::report::{ReportContext, ReportGenerator};
use crate::core::summary::{format_credits, format_gpa, format_gpa_detailed};
use std::error::Error;
use std::fmt::Write;
use std::fs;
use std::path::Path;

/// Embedded Markdown report template
const MARKDOWN_TEMPLATE: &str = include_str!("../templates/report.md");

/// Markdown report generator
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Create a new Markdown reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Render the report using template substitution
    #[allow(clippy::unused_self)]
    fn render_template(&self, ctx: &ReportContext) -> String {
        let summary = ctx.summary;
        let mut output = MARKDOWN_TEMPLATE.to_string();

        output = output.replace("{{source}}", &ctx.source_name());
        output = output.replace("{{course_count}}", &ctx.course_count().to_string());
        output = output.replace("{{selected_count}}", &ctx.selected_count().to_string());

        output = output.replace("{{total_credits}}", &format_credits(summary.total_credits));
        output = output.replace(
            "{{elective_credits}}",
            &format_credits(summary.elective_credits),
        );
        output = output.replace(
            "{{elective_requirement}}",
            &format_credits(summary.elective_requirement),
        );
        output = output.replace(
            "{{missing_required}}",
            &summary.missing_required.to_string(),
        );
        output = output.replace("{{overall_gpa}}", &format_gpa_detailed(&summary.cumulative));
        output = output.replace("{{major_gpa}}", &format_gpa_detailed(&summary.major));
        output = output.replace(
            "{{term_credit_limit}}",
            &format_credits(summary.term_credit_limit),
        );

        let semester_rows = summary
            .semesters
            .iter()
            .map(|s| (s.label(), &s.gpa));
        output = output.replace(
            "{{semester_table}}",
            &Self::generate_gpa_table("Semester", semester_rows),
        );
        let year_rows = summary.years.iter().map(|y| (y.label(), &y.gpa));
        output = output.replace("{{year_table}}", &Self::generate_gpa_table("Year", year_rows));

        output = output.replace("{{progress_table}}", &Self::generate_progress_table(ctx));
        output = output.replace("{{selection_table}}", &Self::generate_selection_table(ctx));
        output = output.replace("{{issues}}", &Self::generate_issue_list(ctx));

        output
    }

    /// Generate a GPA series table
    fn generate_gpa_table<'a>(
        label: &str,
        rows: impl Iterator<Item = (String, &'a GpaAggregate)>,
    ) -> String {
        let mut table = String::new();
        let _ = writeln!(table, "| {label} | GPA | Courses | Pending |");
        table.push_str("|---|---|---|---|\n");

        let mut empty = true;
        for (name, gpa) in rows {
            empty = false;
            let _ = writeln!(
                table,
                "| {name} | {} | {} | {} |",
                format_gpa(gpa),
                gpa.course_count(),
                gpa.missing_count()
            );
        }
        if empty {
            return "_No courses selected._\n".to_string();
        }
        table
    }

    /// Generate the credit progress table
    fn generate_progress_table(ctx: &ReportContext) -> String {
        let mut table = String::new();
        table.push_str("| Category | Required | Selected | Completed | Remaining |\n");
        table.push_str("|---|---|---|---|---|\n");

        for row in &ctx.progress.rows {
            let mark = if row.is_satisfied() { " ✓" } else { "" };
            let _ = writeln!(
                table,
                "| {}{mark} | {} | {} | {} | {} |",
                row.category,
                format_credits(row.required),
                format_credits(row.selected),
                format_credits(row.completed),
                format_credits(row.remaining)
            );
        }

        table
    }

    /// Generate the selected-course table, chronological then by course id
    fn generate_selection_table(ctx: &ReportContext) -> String {
        let mut rows = ctx.session.selection_rows();
        if rows.is_empty() {
            return "_No courses selected._\n".to_string();
        }
        rows.sort_by(|a, b| {
            a.entry
                .actual_semester
                .cmp(&b.entry.actual_semester)
                .then_with(|| a.entry.course_id.cmp(&b.entry.course_id))
        });

        let mut table = String::new();
        table.push_str("| Semester | Course | Name | Type | Credits | Category | GPA |\n");
        table.push_str("|---|---|---|---|---|---|---|\n");
        for row in rows {
            let gpa = row
                .entry
                .gpa
                .map_or_else(|| "-".to_string(), |g| format!("{g:.2}"));
            match row.course {
                Some(course) => {
                    let _ = writeln!(
                        table,
                        "| {} | {} | {} | {} | {} | {} | {gpa} |",
                        row.entry.actual_semester,
                        course.course_id,
                        course.name,
                        course.kind.label(),
                        format_credits(course.credits),
                        course.category_label()
                    );
                }
                None => {
                    let _ = writeln!(
                        table,
                        "| {} | {} | ⚠️ not in catalog | - | - | - | {gpa} |",
                        row.entry.actual_semester, row.entry.course_id
                    );
                }
            }
        }
        table
    }

    /// Generate the plan check list
    fn generate_issue_list(ctx: &ReportContext) -> String {
        if ctx.issues.is_empty() {
            return "✓ All plan rules are satisfied.\n".to_string();
        }
        let mut list = String::new();
        for issue in ctx.issues {
            let _ = writeln!(list, "- {issue}");
        }
        list
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for MarkdownReporter {
    fn generate(&self, ctx: &ReportContext, output_path: &Path) -> Result<(), Box<dyn Error>> {
        let report_content = self.render(ctx)?;
        fs::write(output_path, report_content)?;
        Ok(())
    }

    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>> {
        Ok(self.render_template(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{Catalog, CourseDef, CourseKind, Plan, SelectionRecord};
    use crate::core::session::PlanSession;
    use crate::core::summary::Summary;

    #[test]
    fn test_render_fills_every_placeholder() {
        let catalog = Catalog::new(vec![
            CourseDef::new("A", "Compilers", CourseKind::Required, 3.0, "3春")
                .with_category("专业必修"),
        ])
        .unwrap();
        let mut session = PlanSession::new(catalog, Plan::default(), SelectionRecord::new());
        session.add_course("A", "2春".parse().unwrap()).unwrap();
        session.set_gpa("A", Some(3.5)).unwrap();

        let summary = Summary::from_session(&session);
        let progress = session.progress();
        let issues = session.validate();
        let ctx = ReportContext::new(&session, &summary, &progress, &issues);
        let report = MarkdownReporter::new().render(&ctx).unwrap();

        assert!(!report.contains("{{"));
        assert!(report.contains("(unsaved plan)"));
        assert!(report.contains("| 2春 | 3.500 | 1 | 0 |"));
        assert!(report.contains("| Year 2 | 3.500 | 1 | 0 |"));
        assert!(report.contains("| 2春 | A | Compilers | 必修 | 3 | 专业必修 | 3.50 |"));
        assert!(report.contains("elective credits short"));
    }
}
