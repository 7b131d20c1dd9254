//! Column sorting for the catalog, selection and progress tables
//!
//! Sorting is stable. Numeric and semester columns place missing values last
//! in both directions; only the present values are reversed when the
//! direction flips.

use crate::core::models::{CourseDef, SelectionEntry, SemesterToken};
use crate::core::progress::ProgressRow;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A sortable table column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortColumn {
    /// Course id (text)
    CourseId,
    /// Course name (text)
    Name,
    /// Required/elective label (text)
    Kind,
    /// Credits (numeric)
    Credits,
    /// Planned semester (semester)
    Planned,
    /// Actual semester (semester)
    Actual,
    /// Hours, by leading number (numeric)
    Hours,
    /// Category (text)
    Category,
    /// Recorded GPA (numeric)
    Gpa,
    /// Required credits of a progress row (numeric)
    Required,
    /// Selected credits of a progress row (numeric)
    Selected,
    /// Completed credits of a progress row (numeric)
    Completed,
    /// Remaining credits of a progress row (numeric)
    Remaining,
}

impl SortColumn {
    /// Every column with its command-line name
    pub const NAMED: [(&'static str, Self); 13] = [
        ("id", Self::CourseId),
        ("name", Self::Name),
        ("type", Self::Kind),
        ("credits", Self::Credits),
        ("plan_sem", Self::Planned),
        ("semester", Self::Actual),
        ("hours", Self::Hours),
        ("category", Self::Category),
        ("gpa", Self::Gpa),
        ("required", Self::Required),
        ("selected", Self::Selected),
        ("completed", Self::Completed),
        ("remaining", Self::Remaining),
    ];

    /// Command-line name of the column
    #[must_use]
    pub fn name(self) -> &'static str {
        Self::NAMED
            .iter()
            .find(|(_, col)| *col == self)
            .map_or("?", |(name, _)| name)
    }
}

impl FromStr for SortColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::NAMED
            .iter()
            .find(|(name, _)| *name == wanted)
            .map(|(_, col)| *col)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::NAMED.iter().map(|(name, _)| *name).collect();
                format!("Unknown column '{s}' (expected one of: {})", known.join(", "))
            })
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first
    #[default]
    Ascending,
    /// Largest first
    Descending,
}

impl SortDirection {
    /// The other direction
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    const fn apply(self, ord: Ordering) -> Ordering {
        match self {
            Self::Ascending => ord,
            Self::Descending => ord.reverse(),
        }
    }
}

/// Typed cell value used for comparison
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    /// Numeric cell; `None` sorts last
    Number(Option<f64>),
    /// Semester cell, chronological; `None` sorts last
    Semester(Option<SemesterToken>),
    /// Text cell, lexical
    Text(String),
    /// The row has no such column; compares equal
    Unsupported,
}

fn compare_missing_last<T>(
    a: Option<T>,
    b: Option<T>,
    direction: SortDirection,
    cmp: impl Fn(&T, &T) -> Ordering,
) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => direction.apply(cmp(&a, &b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl SortValue {
    /// Compare two cells in `direction`
    #[must_use]
    pub fn compare(&self, other: &Self, direction: SortDirection) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => {
                compare_missing_last(*a, *b, direction, f64::total_cmp)
            }
            (Self::Semester(a), Self::Semester(b)) => {
                compare_missing_last(*a, *b, direction, Ord::cmp)
            }
            (Self::Text(a), Self::Text(b)) => direction.apply(a.cmp(b)),
            _ => Ordering::Equal,
        }
    }
}

/// A table row that can be sorted by column
pub trait SortableRow {
    /// Cell value of `column`
    fn sort_value(&self, column: SortColumn) -> SortValue;
}

/// Stable-sort `rows` by `column`
pub fn sort_rows<R: SortableRow>(rows: &mut [R], column: SortColumn, direction: SortDirection) {
    rows.sort_by(|a, b| {
        a.sort_value(column)
            .compare(&b.sort_value(column), direction)
    });
}

/// Click-to-sort state of one table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortState {
    column: Option<SortColumn>,
    direction: SortDirection,
}

impl SortState {
    /// State sorted by `column` in `direction`
    #[must_use]
    pub const fn new(column: SortColumn, direction: SortDirection) -> Self {
        Self {
            column: Some(column),
            direction,
        }
    }

    /// Active column, if any
    #[must_use]
    pub const fn column(&self) -> Option<SortColumn> {
        self.column
    }

    /// Active direction
    #[must_use]
    pub const fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Select `column`: a new column sorts ascending, the same column flips
    pub fn select(&mut self, column: SortColumn) {
        if self.column == Some(column) {
            self.direction = self.direction.flipped();
        } else {
            self.column = Some(column);
            self.direction = SortDirection::Ascending;
        }
    }

    /// Sort `rows` by the active column; no-op when none is active
    pub fn apply<R: SortableRow>(&self, rows: &mut [R]) {
        if let Some(column) = self.column {
            sort_rows(rows, column, self.direction);
        }
    }
}

impl SortableRow for CourseDef {
    fn sort_value(&self, column: SortColumn) -> SortValue {
        match column {
            SortColumn::CourseId => SortValue::Text(self.course_id.clone()),
            SortColumn::Name => SortValue::Text(self.name.clone()),
            SortColumn::Kind => SortValue::Text(self.kind.label().to_string()),
            SortColumn::Credits => SortValue::Number(Some(self.credits)),
            SortColumn::Planned => SortValue::Semester(self.planned().ok()),
            SortColumn::Hours => SortValue::Number(self.hours_value()),
            SortColumn::Category => SortValue::Text(self.category_label().to_string()),
            _ => SortValue::Unsupported,
        }
    }
}

impl<T: SortableRow> SortableRow for &T {
    fn sort_value(&self, column: SortColumn) -> SortValue {
        (**self).sort_value(column)
    }
}

/// A selection table row; `course` is `None` for an orphaned selection
#[derive(Debug, Clone, Copy)]
pub struct SelectionRow<'a> {
    /// The selection entry
    pub entry: &'a SelectionEntry,
    /// Its catalog course, when it resolves
    pub course: Option<&'a CourseDef>,
}

impl SortableRow for SelectionRow<'_> {
    fn sort_value(&self, column: SortColumn) -> SortValue {
        match column {
            SortColumn::CourseId => SortValue::Text(self.entry.course_id.clone()),
            SortColumn::Actual => SortValue::Semester(Some(self.entry.actual_semester.into())),
            SortColumn::Gpa => SortValue::Number(self.entry.gpa),
            other => match self.course {
                Some(course) => course.sort_value(other),
                None => match other {
                    SortColumn::Credits | SortColumn::Hours => SortValue::Number(None),
                    SortColumn::Planned => SortValue::Semester(None),
                    _ => SortValue::Text(String::new()),
                },
            },
        }
    }
}

impl SortableRow for ProgressRow {
    fn sort_value(&self, column: SortColumn) -> SortValue {
        match column {
            SortColumn::Category => SortValue::Text(self.category.clone()),
            SortColumn::Required => SortValue::Number(Some(self.required)),
            SortColumn::Selected => SortValue::Number(Some(self.selected)),
            SortColumn::Completed => SortValue::Number(Some(self.completed)),
            SortColumn::Remaining => SortValue::Number(Some(self.remaining)),
            _ => SortValue::Unsupported,
        }
    }
}
