//! Course catalog

use super::course::CourseDef;
use super::semester::{ActualSemester, Season, SemesterError, SemesterToken};
use crate::core::matcher::MatchMode;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Errors that make a set of course definitions unusable as a catalog
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    /// Two definitions share a course id
    #[error("duplicate course id in catalog: {0}")]
    DuplicateCourse(String),
    /// Credits must be finite and non-negative
    #[error("course {course_id} has invalid credits {credits}")]
    InvalidCredits {
        /// Offending course
        course_id: String,
        /// Offending value
        credits: f64,
    },
}

/// Data-quality issue that does not prevent loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogWarning {
    /// The planned semester does not parse; the course is never offered
    MalformedSemester {
        /// Affected course
        course_id: String,
        /// Why the token was rejected
        reason: SemesterError,
    },
}

impl fmt::Display for CatalogWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedSemester { course_id, reason } => {
                write!(f, "course {course_id} is never offered: {reason}")
            }
        }
    }
}

/// Catalog courses eligible for one slot, split by required/elective
#[derive(Debug, Clone, Default)]
pub struct Offering<'a> {
    /// Required courses, ordered by (planned semester, course id)
    pub required: Vec<&'a CourseDef>,
    /// Elective courses, ordered by (planned semester, course id)
    pub elective: Vec<&'a CourseDef>,
}

impl Offering<'_> {
    /// Total number of offered courses
    #[must_use]
    pub fn len(&self) -> usize {
        self.required.len() + self.elective.len()
    }

    /// Whether nothing is offered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Immutable set of course definitions, in load order
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    courses: Vec<CourseDef>,
    index: HashMap<String, usize>,
    planned: Vec<Option<SemesterToken>>,
    warnings: Vec<CatalogWarning>,
}

impl Catalog {
    /// Build a catalog, parsing every planned semester once
    ///
    /// # Errors
    /// Returns an error on duplicate ids or invalid credits. Malformed planned
    /// semesters are recorded as [`CatalogWarning`]s instead.
    pub fn new(courses: Vec<CourseDef>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(courses.len());
        let mut planned = Vec::with_capacity(courses.len());
        let mut warnings = Vec::new();

        for (pos, course) in courses.iter().enumerate() {
            if !course.credits.is_finite() || course.credits < 0.0 {
                return Err(CatalogError::InvalidCredits {
                    course_id: course.course_id.clone(),
                    credits: course.credits,
                });
            }
            if index.insert(course.course_id.clone(), pos).is_some() {
                return Err(CatalogError::DuplicateCourse(course.course_id.clone()));
            }
            match course.planned() {
                Ok(token) => planned.push(Some(token)),
                Err(reason) => {
                    crate::warn!(
                        "Catalog: course {} has planned semester '{}': {reason}",
                        course.course_id,
                        course.planned_semester
                    );
                    warnings.push(CatalogWarning::MalformedSemester {
                        course_id: course.course_id.clone(),
                        reason,
                    });
                    planned.push(None);
                }
            }
        }

        Ok(Self {
            courses,
            index,
            planned,
            warnings,
        })
    }

    /// Get a course by id
    #[must_use]
    pub fn get(&self, course_id: &str) -> Option<&CourseDef> {
        self.index.get(course_id).map(|&pos| &self.courses[pos])
    }

    /// Whether a course id exists
    #[must_use]
    pub fn contains(&self, course_id: &str) -> bool {
        self.index.contains_key(course_id)
    }

    /// Parsed planned semester of a course; `None` if unknown or malformed
    #[must_use]
    pub fn planned(&self, course_id: &str) -> Option<SemesterToken> {
        self.index.get(course_id).and_then(|&pos| self.planned[pos])
    }

    /// All courses in load order
    #[must_use]
    pub fn courses(&self) -> &[CourseDef] {
        &self.courses
    }

    /// Number of courses
    #[must_use]
    pub fn len(&self) -> usize {
        self.courses.len()
    }

    /// Whether the catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Required courses in load order
    pub fn required_courses(&self) -> impl Iterator<Item = &CourseDef> {
        self.courses.iter().filter(|c| c.is_required())
    }

    /// Data-quality warnings collected at construction
    #[must_use]
    pub fn warnings(&self) -> &[CatalogWarning] {
        &self.warnings
    }

    /// Courses eligible for `slot` under `mode`
    ///
    /// Courses with a malformed planned semester never match.
    #[must_use]
    pub fn offered_in(&self, slot: ActualSemester, mode: MatchMode) -> Offering<'_> {
        let mut matching: Vec<(SemesterToken, &CourseDef)> = self
            .courses
            .iter()
            .zip(&self.planned)
            .filter_map(|(course, planned)| {
                planned
                    .filter(|token| mode.matches(token, &slot))
                    .map(|token| (token, course))
            })
            .collect();
        matching.sort_by(|(ta, a), (tb, b)| ta.cmp(tb).then_with(|| a.course_id.cmp(&b.course_id)));

        let mut offering = Offering::default();
        for (_, course) in matching {
            if course.is_required() {
                offering.required.push(course);
            } else {
                offering.elective.push(course);
            }
        }
        offering
    }

    /// Courses whose planned season is `season`, whatever their grade
    #[must_use]
    pub fn offered_in_season(&self, season: Season) -> Offering<'_> {
        // Season-only matching ignores the grade, so any grade stands in
        self.offered_in(
            ActualSemester { grade: 1, season },
            MatchMode::SeasonOnly,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::CourseKind;

    fn sample() -> Vec<CourseDef> {
        vec![
            CourseDef::new("A", "Operating Systems", CourseKind::Required, 3.0, "3秋"),
            CourseDef::new("B", "PE", CourseKind::Elective, 1.0, "秋"),
            CourseDef::new("C", "Compilers", CourseKind::Required, 3.0, "3春"),
            CourseDef::new("D", "Networks", CourseKind::Required, 3.0, "1秋"),
        ]
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = Catalog::new(sample()).unwrap();
        assert_eq!(catalog.len(), 4);
        assert!(catalog.contains("A"));
        assert_eq!(catalog.get("C").map(|c| c.name.as_str()), Some("Compilers"));
        assert!(catalog.get("Z").is_none());
        assert_eq!(catalog.required_courses().count(), 3);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut courses = sample();
        courses.push(CourseDef::new("A", "Again", CourseKind::Elective, 1.0, "秋"));
        assert_eq!(
            Catalog::new(courses).unwrap_err(),
            CatalogError::DuplicateCourse("A".to_string())
        );
    }

    #[test]
    fn test_negative_credits_rejected() {
        let courses = vec![CourseDef::new("N", "Neg", CourseKind::Elective, -1.0, "秋")];
        assert!(matches!(
            Catalog::new(courses),
            Err(CatalogError::InvalidCredits { .. })
        ));
    }

    #[test]
    fn test_malformed_semester_is_warning() {
        let mut courses = sample();
        courses.push(CourseDef::new("W", "Winter", CourseKind::Elective, 1.0, "冬"));
        let catalog = Catalog::new(courses).unwrap();

        assert_eq!(catalog.warnings().len(), 1);
        assert!(catalog.planned("W").is_none());
        for slot in ActualSemester::all() {
            let offering = catalog.offered_in(slot, MatchMode::SeasonOnly);
            assert!(offering.elective.iter().all(|c| c.course_id != "W"));
        }
    }

    #[test]
    fn test_offered_in_ignores_planned_grade() {
        let catalog = Catalog::new(sample()).unwrap();
        let slot: ActualSemester = "1秋".parse().unwrap();
        let offering = catalog.offered_in(slot, MatchMode::SeasonOnly);

        let required: Vec<&str> = offering.required.iter().map(|c| c.course_id.as_str()).collect();
        // planned order: 1秋 before 3秋
        assert_eq!(required, vec!["D", "A"]);
        assert_eq!(offering.elective.len(), 1);
        assert_eq!(offering.len(), 3);
    }

    #[test]
    fn test_offered_in_strict() {
        let catalog = Catalog::new(sample()).unwrap();
        let slot: ActualSemester = "1秋".parse().unwrap();
        let offering = catalog.offered_in(slot, MatchMode::Strict);
        let ids: Vec<&str> = offering
            .required
            .iter()
            .chain(&offering.elective)
            .map(|c| c.course_id.as_str())
            .collect();
        assert_eq!(ids, vec!["D", "B"]);
    }

    #[test]
    fn test_offered_in_season() {
        let catalog = Catalog::new(sample()).unwrap();
        let spring = catalog.offered_in_season(Season::Spring);
        assert_eq!(spring.len(), 1);
        assert!(catalog.offered_in_season(Season::Summer).is_empty());
    }
}
