//! Credit progress by category
//!
//! One row per plan target (in plan order), followed by one row per other
//! category that appears in the selection or is the elective bucket (sorted
//! by name). A course counts as *selected* once it is in the selection and
//! as *completed* once it has a grade.

use crate::core::metrics::resolve;
use crate::core::models::{Catalog, Plan, SelectionRecord};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Progress of one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressRow {
    /// Category label
    pub category: String,
    /// Credits required
    pub required: f64,
    /// Credits of selected courses
    pub selected: f64,
    /// Credits of graded courses
    pub completed: f64,
    /// `max(0, required - completed)`
    pub remaining: f64,
}

impl ProgressRow {
    fn new(category: String, required: f64) -> Self {
        Self {
            category,
            required,
            selected: 0.0,
            completed: 0.0,
            remaining: required.max(0.0),
        }
    }

    /// Whether the requirement is met by completed credits
    #[must_use]
    pub fn is_satisfied(&self) -> bool {
        self.remaining <= 0.0
    }
}

/// The full progress table
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreditProgress {
    /// Rows in display order
    pub rows: Vec<ProgressRow>,
}

impl CreditProgress {
    /// Row for `category`
    #[must_use]
    pub fn row(&self, category: &str) -> Option<&ProgressRow> {
        self.rows.iter().find(|r| r.category == category)
    }

    /// Sum of selected credits over every row
    #[must_use]
    pub fn total_selected(&self) -> f64 {
        self.rows.iter().map(|r| r.selected).sum()
    }

    /// Sum of completed credits over every row
    #[must_use]
    pub fn total_completed(&self) -> f64 {
        self.rows.iter().map(|r| r.completed).sum()
    }

    /// Sum of remaining credits over every row
    #[must_use]
    pub fn total_remaining(&self) -> f64 {
        self.rows.iter().map(|r| r.remaining).sum()
    }
}

/// Compute credit progress for a snapshot
#[must_use]
pub fn credit_progress(
    catalog: &Catalog,
    plan: &Plan,
    selection: &SelectionRecord,
) -> CreditProgress {
    let mut rows: Vec<ProgressRow> = Vec::with_capacity(plan.items.len());
    let mut position: HashMap<String, usize> = HashMap::new();
    for target in &plan.items {
        let category = target.category.trim().to_string();
        if position.contains_key(&category) {
            continue;
        }
        position.insert(category.clone(), rows.len());
        rows.push(ProgressRow::new(category.clone(), plan.required_for(&category)));
    }

    let mut extra: BTreeMap<String, ProgressRow> = BTreeMap::new();
    let elective = plan.categories.elective_category.trim();
    if !elective.is_empty()
        && !position.contains_key(elective)
        && plan.elective_credit_requirement > 0.0
    {
        extra.insert(
            elective.to_string(),
            ProgressRow::new(elective.to_string(), plan.required_for(elective)),
        );
    }

    for r in resolve(catalog, selection) {
        let category = r.course.category_label();
        let row = match position.get(category) {
            Some(&pos) => &mut rows[pos],
            None => extra
                .entry(category.to_string())
                .or_insert_with(|| {
                    ProgressRow::new(category.to_string(), plan.required_for(category))
                }),
        };
        row.selected += r.course.credits;
        if r.entry.is_graded() {
            row.completed += r.course.credits;
        }
    }

    rows.extend(extra.into_values());
    for row in &mut rows {
        row.remaining = (row.required - row.completed).max(0.0);
    }
    CreditProgress { rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{
        ActualSemester, CategoryTarget, CourseDef, CourseKind, SelectionEntry, UNCATEGORIZED,
    };

    fn slot(s: &str) -> ActualSemester {
        s.parse().unwrap()
    }

    fn pe_catalog() -> Catalog {
        Catalog::new(vec![
            CourseDef::new("PE1", "PE", CourseKind::Elective, 1.0, "秋").with_category("体育"),
            CourseDef::new("PE2", "PE", CourseKind::Elective, 1.0, "春").with_category("体育"),
            CourseDef::new("PE3", "PE", CourseKind::Elective, 1.0, "秋").with_category("体育"),
            CourseDef::new("M", "Misc", CourseKind::Elective, 2.5, "春"),
            CourseDef::new("S", "Seminar", CourseKind::Elective, 1.5, "秋").with_category("研讨"),
        ])
        .unwrap()
    }

    fn plan() -> Plan {
        let mut plan = Plan::new(30.0, 0.0);
        plan.set_target(CategoryTarget::new("体育", 2.0));
        plan
    }

    fn graded(id: &str, sem: &str, gpa: Option<f64>) -> SelectionEntry {
        let mut entry = SelectionEntry::new(id, slot(sem));
        entry.gpa = gpa;
        entry
    }

    #[test]
    fn test_completion_requires_grade() {
        let catalog = pe_catalog();
        let selection = SelectionRecord::from_entries(vec![
            graded("PE1", "1秋", Some(3.0)),
            graded("PE2", "1春", None),
        ])
        .unwrap();

        let progress = credit_progress(&catalog, &plan(), &selection);
        let pe = progress.row("体育").unwrap();
        assert!((pe.required - 2.0).abs() < f64::EPSILON);
        assert!((pe.selected - 2.0).abs() < f64::EPSILON);
        assert!((pe.completed - 1.0).abs() < f64::EPSILON);
        assert!((pe.remaining - 1.0).abs() < f64::EPSILON);
        assert!(!pe.is_satisfied());
    }

    #[test]
    fn test_remaining_never_negative() {
        let catalog = pe_catalog();
        let selection = SelectionRecord::from_entries(vec![
            graded("PE1", "1秋", Some(3.0)),
            graded("PE2", "1春", Some(3.0)),
            graded("PE3", "2秋", Some(3.0)),
        ])
        .unwrap();

        let progress = credit_progress(&catalog, &plan(), &selection);
        let pe = progress.row("体育").unwrap();
        assert!((pe.completed - 3.0).abs() < f64::EPSILON);
        assert!(pe.remaining.abs() < f64::EPSILON);
        assert!(pe.is_satisfied());
    }

    #[test]
    fn test_uncategorized_and_extra_rows() {
        let catalog = pe_catalog();
        let selection = SelectionRecord::from_entries(vec![
            graded("S", "1秋", None),
            graded("M", "1春", Some(2.0)),
        ])
        .unwrap();

        let progress = credit_progress(&catalog, &plan(), &selection);
        let names: Vec<&str> = progress.rows.iter().map(|r| r.category.as_str()).collect();
        // targets first, then extras sorted by name
        let mut extras = vec![UNCATEGORIZED, "研讨"];
        extras.sort_unstable();
        assert_eq!(names[0], "体育");
        assert_eq!(&names[1..], extras.as_slice());

        let misc = progress.row(UNCATEGORIZED).unwrap();
        assert!((misc.selected - 2.5).abs() < f64::EPSILON);
        assert!(misc.required.abs() < f64::EPSILON);
    }

    #[test]
    fn test_selected_credits_are_conserved() {
        let catalog = pe_catalog();
        let selection = SelectionRecord::from_entries(vec![
            graded("PE1", "1秋", Some(3.0)),
            graded("M", "1春", None),
            graded("S", "2秋", Some(1.0)),
            graded("UNKNOWN", "2秋", Some(1.0)),
        ])
        .unwrap();

        let progress = credit_progress(&catalog, &plan(), &selection);
        let expected: f64 = resolve(&catalog, &selection).map(|r| r.course.credits).sum();
        assert!((progress.total_selected() - expected).abs() < 1e-9);
        assert!((expected - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_elective_bucket_row_uses_plan_requirement() {
        let catalog = pe_catalog();
        let plan = Plan::new(30.0, 15.0);
        let progress = credit_progress(&catalog, &plan, &SelectionRecord::new());
        let bucket = progress.row("专业选修").unwrap();
        assert!((bucket.required - 15.0).abs() < f64::EPSILON);
        assert!((bucket.remaining - 15.0).abs() < f64::EPSILON);
        assert!((progress.total_remaining() - 15.0).abs() < f64::EPSILON);
    }
}
