//! GPA metrics
//!
//! Every aggregate is a credit-weighted mean over the graded entries in
//! scope. Ungraded entries stay out of both sums and are reported through
//! `missing_count`, so an aggregate with pending grades is never mistaken for
//! a final GPA. Selections whose course id is not in the catalog are orphans:
//! they are left out of every aggregate and listed separately.

use crate::core::models::{
    ActualSemester, Catalog, CategoryPolicy, CourseDef, SelectionEntry, SelectionRecord,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// A selection entry joined with its catalog definition
#[derive(Debug, Clone, Copy)]
pub struct Resolved<'a> {
    /// The selection entry
    pub entry: &'a SelectionEntry,
    /// Its catalog course
    pub course: &'a CourseDef,
}

/// Join every entry with its course; entries with unknown ids are skipped
pub fn resolve<'a>(
    catalog: &'a Catalog,
    selection: &'a SelectionRecord,
) -> impl Iterator<Item = Resolved<'a>> {
    selection.iter().filter_map(|entry| {
        catalog
            .get(&entry.course_id)
            .map(|course| Resolved { entry, course })
    })
}

/// Entries whose course id is not in the catalog
#[must_use]
pub fn orphaned<'a>(catalog: &Catalog, selection: &'a SelectionRecord) -> Vec<&'a SelectionEntry> {
    selection
        .iter()
        .filter(|entry| !catalog.contains(&entry.course_id))
        .collect()
}

/// What an aggregate means for display
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GpaState {
    /// No courses in scope
    Empty,
    /// Some grades are pending; `partial` covers only the graded courses
    Incomplete {
        /// Weighted mean of the graded courses, if any carry credits
        partial: Option<f64>,
        /// Number of courses without a grade
        missing: usize,
    },
    /// Every course is graded but none carries credits
    Undefined,
    /// Every course is graded
    Final {
        /// The weighted mean
        value: f64,
    },
}

/// Credit-weighted GPA over one scope
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct GpaAggregate {
    value: Option<f64>,
    missing_count: usize,
    course_count: usize,
    graded_credits: f64,
}

impl GpaAggregate {
    /// Weighted mean over graded entries; may be partial (see [`Self::state`])
    #[must_use]
    pub const fn value(&self) -> Option<f64> {
        self.value
    }

    /// Number of entries in scope without a grade
    #[must_use]
    pub const fn missing_count(&self) -> usize {
        self.missing_count
    }

    /// Number of entries in scope
    #[must_use]
    pub const fn course_count(&self) -> usize {
        self.course_count
    }

    /// Credits of the graded entries (the mean's denominator)
    #[must_use]
    pub const fn graded_credits(&self) -> f64 {
        self.graded_credits
    }

    /// Whether every entry in scope is graded
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.missing_count == 0
    }

    /// The value only when it is final
    #[must_use]
    pub const fn final_value(&self) -> Option<f64> {
        if self.is_complete() {
            self.value
        } else {
            None
        }
    }

    /// Classify the aggregate
    #[must_use]
    pub const fn state(&self) -> GpaState {
        if self.course_count == 0 {
            GpaState::Empty
        } else if self.missing_count > 0 {
            GpaState::Incomplete {
                partial: self.value,
                missing: self.missing_count,
            }
        } else {
            match self.value {
                Some(value) => GpaState::Final { value },
                None => GpaState::Undefined,
            }
        }
    }
}

/// Running sums behind a [`GpaAggregate`]
#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    weighted: f64,
    credits: f64,
    missing: usize,
    count: usize,
}

impl Accumulator {
    fn add(&mut self, credits: f64, gpa: Option<f64>) {
        self.count += 1;
        match gpa {
            Some(gpa) => {
                self.weighted += gpa * credits;
                self.credits += credits;
            }
            None => self.missing += 1,
        }
    }

    fn finish(self) -> GpaAggregate {
        let value = (self.credits > 0.0).then(|| self.weighted / self.credits);
        GpaAggregate {
            value,
            missing_count: self.missing,
            course_count: self.count,
            graded_credits: self.credits,
        }
    }
}

/// Aggregate the resolved entries accepted by `filter`
pub fn aggregate<F>(catalog: &Catalog, selection: &SelectionRecord, filter: F) -> GpaAggregate
where
    F: Fn(&Resolved) -> bool,
{
    let mut acc = Accumulator::default();
    for resolved in resolve(catalog, selection).filter(|r| filter(r)) {
        acc.add(resolved.course.credits, resolved.entry.gpa);
    }
    acc.finish()
}

/// GPA of one exact slot
#[must_use]
pub fn semester_gpa(
    catalog: &Catalog,
    selection: &SelectionRecord,
    slot: ActualSemester,
) -> GpaAggregate {
    aggregate(catalog, selection, |r| r.entry.actual_semester == slot)
}

/// GPA of one grade, across its three seasons
#[must_use]
pub fn year_gpa(catalog: &Catalog, selection: &SelectionRecord, grade: u8) -> GpaAggregate {
    aggregate(catalog, selection, |r| r.entry.actual_semester.grade == grade)
}

/// GPA over the whole selection
#[must_use]
pub fn cumulative_gpa(catalog: &Catalog, selection: &SelectionRecord) -> GpaAggregate {
    aggregate(catalog, selection, |_| true)
}

/// GPA over courses whose category is a major category
#[must_use]
pub fn major_gpa(
    catalog: &Catalog,
    selection: &SelectionRecord,
    policy: &CategoryPolicy,
) -> GpaAggregate {
    aggregate(catalog, selection, |r| {
        policy.is_major(r.course.category_label())
    })
}

/// Per-semester point of a GPA series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SemesterGpa {
    /// The slot
    pub semester: ActualSemester,
    /// Its aggregate
    pub gpa: GpaAggregate,
}

impl SemesterGpa {
    /// Chart label, e.g. "1秋"
    #[must_use]
    pub fn label(&self) -> String {
        self.semester.to_string()
    }
}

/// Per-year point of a GPA series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearGpa {
    /// The grade
    pub grade: u8,
    /// Its aggregate
    pub gpa: GpaAggregate,
}

impl YearGpa {
    /// Chart label, e.g. "Year 1"
    #[must_use]
    pub fn label(&self) -> String {
        format!("Year {}", self.grade)
    }
}

/// GPA of every slot holding at least one resolved entry, chronologically
#[must_use]
pub fn semester_series(catalog: &Catalog, selection: &SelectionRecord) -> Vec<SemesterGpa> {
    let mut buckets: BTreeMap<ActualSemester, Accumulator> = BTreeMap::new();
    for r in resolve(catalog, selection) {
        buckets
            .entry(r.entry.actual_semester)
            .or_default()
            .add(r.course.credits, r.entry.gpa);
    }
    buckets
        .into_iter()
        .map(|(semester, acc)| SemesterGpa {
            semester,
            gpa: acc.finish(),
        })
        .collect()
}

/// GPA of every grade holding at least one resolved entry, ascending
#[must_use]
pub fn year_series(catalog: &Catalog, selection: &SelectionRecord) -> Vec<YearGpa> {
    let mut buckets: BTreeMap<u8, Accumulator> = BTreeMap::new();
    for r in resolve(catalog, selection) {
        buckets
            .entry(r.entry.actual_semester.grade)
            .or_default()
            .add(r.course.credits, r.entry.gpa);
    }
    buckets
        .into_iter()
        .map(|(grade, acc)| YearGpa {
            grade,
            gpa: acc.finish(),
        })
        .collect()
}

/// Every GPA aggregate for one snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GpaMetrics {
    /// Over the whole selection
    pub cumulative: GpaAggregate,
    /// Over major categories
    pub major: GpaAggregate,
    /// Per slot, chronological
    pub semesters: Vec<SemesterGpa>,
    /// Per grade, ascending
    pub years: Vec<YearGpa>,
    /// Course ids of orphaned selections
    pub orphans: Vec<String>,
}

/// Compute every GPA aggregate for a snapshot
#[must_use]
pub fn compute_all_metrics(
    catalog: &Catalog,
    selection: &SelectionRecord,
    policy: &CategoryPolicy,
) -> GpaMetrics {
    let orphans: Vec<String> = orphaned(catalog, selection)
        .into_iter()
        .map(|e| e.course_id.clone())
        .collect();
    for id in &orphans {
        crate::warn!("Selection references unknown course {id}; excluded from GPA");
    }

    let metrics = GpaMetrics {
        cumulative: cumulative_gpa(catalog, selection),
        major: major_gpa(catalog, selection, policy),
        semesters: semester_series(catalog, selection),
        years: year_series(catalog, selection),
        orphans,
    };
    crate::debug!(
        "Recomputed GPA metrics: {} courses, {} semesters, {} pending",
        metrics.cumulative.course_count(),
        metrics.semesters.len(),
        metrics.cumulative.missing_count()
    );
    metrics
}
