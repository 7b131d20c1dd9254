//! Errors raised at the selection mutation boundary

use crate::core::models::{ActualSemester, SemesterError};
use thiserror::Error;

/// Why a selection change was rejected; the record is left unchanged
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    /// The course id is not in the catalog
    #[error("unknown course id: {0}")]
    UnknownCourse(String),

    /// The course is already selected
    #[error("course {0} is already selected")]
    DuplicateSelection(String),

    /// The course is not in the selection
    #[error("course {0} is not in the selection")]
    NotSelected(String),

    /// GPA outside `[0.0, 4.0]` (or not a number)
    #[error("GPA {0} is out of range (expected 0.0 to 4.0)")]
    GpaOutOfRange(f64),

    /// Semester token rejected
    #[error(transparent)]
    Semester(#[from] SemesterError),

    /// The course's planned season differs from the slot's season
    #[error("season mismatch: {course_id} is planned for {planned}, cannot be taken in {actual}")]
    SeasonMismatch {
        /// Course being placed
        course_id: String,
        /// Its planned semester token
        planned: String,
        /// Target slot
        actual: ActualSemester,
    },

    /// The course's planned semester is malformed, so it fits no slot
    #[error("course {course_id} has an unusable planned semester: {reason}")]
    NeverOffered {
        /// Course being placed
        course_id: String,
        /// Parse failure of its planned token
        reason: SemesterError,
    },
}
