//! Semester matching
//!
//! Decides whether a catalog course, planned for some semester token, may be
//! placed into an actual semester slot. The session only ever uses
//! [`MatchMode::SeasonOnly`]: a course planned for "2秋" may be taken in any
//! fall, including "1秋".

use crate::core::models::{ActualSemester, CourseDef, SemesterToken};

/// How a planned token is compared with an actual slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchMode {
    /// Compare seasons only; the planned grade is advisory
    #[default]
    SeasonOnly,
    /// Compare seasons, and grades when the planned token carries one
    Strict,
}

impl MatchMode {
    /// Apply this mode to a planned token and an actual slot
    #[must_use]
    pub fn matches(self, planned: &SemesterToken, actual: &ActualSemester) -> bool {
        match self {
            Self::SeasonOnly => matches_season_only(planned, actual),
            Self::Strict => matches_strict(planned, actual),
        }
    }
}

/// Bare tokens match by season; full tokens need season and grade
#[must_use]
pub fn matches(planned: &SemesterToken, actual: &ActualSemester) -> bool {
    planned.season == actual.season && planned.grade.is_none_or(|grade| grade == actual.grade)
}

/// Grade-exact matching; identical to [`matches`]
#[must_use]
pub fn matches_strict(planned: &SemesterToken, actual: &ActualSemester) -> bool {
    matches(planned, actual)
}

/// Season-only matching, ignoring any planned grade
#[must_use]
pub fn matches_season_only(planned: &SemesterToken, actual: &ActualSemester) -> bool {
    planned.season == actual.season
}

/// Whether `course` may be placed into `slot` under season-only matching
///
/// A malformed planned semester never matches.
#[must_use]
pub fn is_eligible(course: &CourseDef, slot: &ActualSemester) -> bool {
    course
        .planned()
        .is_ok_and(|planned| matches_season_only(&planned, slot))
}
