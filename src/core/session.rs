//! Plan session: the loaded catalog, plan and selection, plus the file they came from
//!
//! Every selection change goes through the session, which checks it against
//! the catalog before touching the record. A rejected change leaves the
//! record as it was.

use crate::core::document::{DocumentError, PlanDocument};
use crate::core::error::PlanError;
use crate::core::matcher::{is_eligible, MatchMode};
use crate::core::metrics::{compute_all_metrics, orphaned, resolve, GpaMetrics};
use crate::core::models::{
    ActualSemester, Catalog, CatalogWarning, CourseDef, CourseKind, Offering, Plan,
    SelectionEntry, SelectionRecord,
};
use crate::core::progress::{credit_progress, CreditProgress};
use crate::core::sorting::SelectionRow;
use std::fmt;
use std::path::{Path, PathBuf};

/// Grade used by [`PlanSession::auto_add_required`] for bare planned tokens
pub const FALLBACK_GRADE: u8 = 4;

/// A problem found by [`PlanSession::validate`]
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationIssue {
    /// A required course is not selected
    MissingRequired {
        /// Course id
        course_id: String,
        /// Course name
        name: String,
    },
    /// Elective credits fall short of the requirement
    ElectiveShortfall {
        /// Selected elective credits
        selected: f64,
        /// Required elective credits
        required: f64,
    },
    /// A selected course id is not in the catalog
    Orphaned(String),
    /// A semester exceeds the advisory credit cap
    OverLimit {
        /// The slot
        semester: ActualSemester,
        /// Its credits
        credits: f64,
        /// The cap
        limit: f64,
    },
    /// Catalog data-quality warning
    Catalog(CatalogWarning),
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRequired { course_id, name } => {
                write!(f, "missing required course: {course_id} {name}")
            }
            Self::ElectiveShortfall { selected, required } => {
                write!(f, "elective credits short: {selected} < {required}")
            }
            Self::Orphaned(id) => write!(f, "selected course {id} is not in the catalog"),
            Self::OverLimit {
                semester,
                credits,
                limit,
            } => write!(f, "{semester} has {credits} credits, above the limit of {limit}"),
            Self::Catalog(warning) => write!(f, "catalog: {warning}"),
        }
    }
}

/// Catalog, plan and selection loaded from one document
#[derive(Debug, Clone, Default)]
pub struct PlanSession {
    catalog: Catalog,
    plan: Plan,
    selection: SelectionRecord,
    path: Option<PathBuf>,
}

impl PlanSession {
    /// Create a session with no backing file
    #[must_use]
    pub const fn new(catalog: Catalog, plan: Plan, selection: SelectionRecord) -> Self {
        Self {
            catalog,
            plan,
            selection,
            path: None,
        }
    }

    /// Create a session from an in-memory document
    ///
    /// # Errors
    /// Returns an error if the document is inconsistent.
    pub fn from_document(document: PlanDocument) -> Result<Self, DocumentError> {
        let (catalog, plan, selection) = document.into_parts()?;
        Ok(Self::new(catalog, plan, selection))
    }

    /// Open the document at `path`, creating a default one if it is missing
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is inconsistent.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let mut session = Self::from_document(PlanDocument::read(path)?)?;
        session.path = Some(path.to_path_buf());
        crate::info!(
            "Loaded {} courses and {} selections from {}",
            session.catalog.len(),
            session.selection.len(),
            path.display()
        );
        Ok(session)
    }

    /// Replace catalog, plan and selection wholesale; the file path is kept
    ///
    /// # Errors
    /// Returns an error if the document is inconsistent; the session is
    /// unchanged in that case.
    pub fn replace(&mut self, document: PlanDocument) -> Result<(), DocumentError> {
        let (catalog, plan, selection) = document.into_parts()?;
        self.catalog = catalog;
        self.plan = plan;
        self.selection = selection;
        crate::debug!("Session replaced: {} courses", self.catalog.len());
        Ok(())
    }

    /// Current state as a document
    #[must_use]
    pub fn to_document(&self) -> PlanDocument {
        PlanDocument::from_parts(&self.catalog, &self.plan, &self.selection)
    }

    /// Write back to the file the session was opened from
    ///
    /// # Errors
    /// Returns [`DocumentError::NoPath`] for a session without a file, or
    /// the write error.
    pub fn save(&self) -> Result<(), DocumentError> {
        let path = self.path.as_deref().ok_or(DocumentError::NoPath)?;
        self.to_document().write(path)?;
        crate::info!("Saved plan to {}", path.display());
        Ok(())
    }

    /// Write to `path` and make it the session's file
    ///
    /// # Errors
    /// Returns the write error; the session's file is unchanged in that case.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        let path = path.as_ref();
        self.to_document().write(path)?;
        self.path = Some(path.to_path_buf());
        crate::info!("Saved plan to {}", path.display());
        Ok(())
    }

    /// The catalog
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The plan
    #[must_use]
    pub const fn plan(&self) -> &Plan {
        &self.plan
    }

    /// The selection
    #[must_use]
    pub const fn selection(&self) -> &SelectionRecord {
        &self.selection
    }

    /// The backing file, if any
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Courses eligible for `slot`, split by required/elective
    #[must_use]
    pub fn offered_in(&self, slot: ActualSemester) -> Offering<'_> {
        self.catalog.offered_in(slot, MatchMode::SeasonOnly)
    }

    fn check_eligible(
        &self,
        course_id: &str,
        slot: ActualSemester,
    ) -> Result<&CourseDef, PlanError> {
        let course = self
            .catalog
            .get(course_id)
            .ok_or_else(|| PlanError::UnknownCourse(course_id.to_string()))?;
        if let Err(reason) = course.planned() {
            return Err(PlanError::NeverOffered {
                course_id: course_id.to_string(),
                reason,
            });
        }
        if !is_eligible(course, &slot) {
            return Err(PlanError::SeasonMismatch {
                course_id: course_id.to_string(),
                planned: course.planned_semester.clone(),
                actual: slot,
            });
        }
        Ok(course)
    }

    fn warn_if_over_limit(&self, slot: ActualSemester) {
        if self.is_over_limit(slot) {
            crate::warn!(
                "{slot} now has {} credits, above the limit of {}",
                self.semester_credits(slot),
                self.plan.term_credit_limit
            );
        }
    }

    /// Select `course_id` in `slot`
    ///
    /// Exceeding the term credit limit is allowed and only logged.
    ///
    /// # Errors
    /// Returns an error for an unknown or already selected course, or one
    /// whose planned season differs from the slot's.
    pub fn add_course(&mut self, course_id: &str, slot: ActualSemester) -> Result<(), PlanError> {
        self.check_eligible(course_id, slot)?;
        self.selection.insert(course_id, slot)?;
        crate::debug!("Added {course_id} to {slot}");
        self.warn_if_over_limit(slot);
        Ok(())
    }

    /// Drop `course_id` from the selection
    ///
    /// # Errors
    /// Returns [`PlanError::NotSelected`] if it is not selected.
    pub fn remove_course(&mut self, course_id: &str) -> Result<SelectionEntry, PlanError> {
        let entry = self.selection.remove(course_id)?;
        crate::debug!("Removed {course_id} from {}", entry.actual_semester);
        Ok(entry)
    }

    /// Move a selected course to another slot, keeping its grade
    ///
    /// # Errors
    /// Returns an error if the course is not selected or the new slot's
    /// season differs from its planned season.
    pub fn move_course(
        &mut self,
        course_id: &str,
        slot: ActualSemester,
    ) -> Result<ActualSemester, PlanError> {
        if !self.selection.contains(course_id) {
            return Err(PlanError::NotSelected(course_id.to_string()));
        }
        self.check_eligible(course_id, slot)?;
        let previous = self.selection.move_to(course_id, slot)?;
        crate::debug!("Moved {course_id} from {previous} to {slot}");
        self.warn_if_over_limit(slot);
        Ok(previous)
    }

    /// Record or clear the grade of a selected course
    ///
    /// # Errors
    /// Returns an error if the course is not selected or the grade is outside
    /// `[0.0, 4.0]`; the previous grade is kept in both cases.
    pub fn set_gpa(&mut self, course_id: &str, gpa: Option<f64>) -> Result<Option<f64>, PlanError> {
        let previous = self.selection.set_gpa(course_id, gpa)?;
        crate::debug!("GPA of {course_id}: {previous:?} -> {gpa:?}");
        Ok(previous)
    }

    /// Clear the grade of a selected course
    ///
    /// # Errors
    /// Returns [`PlanError::NotSelected`] if it is not selected.
    pub fn clear_gpa(&mut self, course_id: &str) -> Result<Option<f64>, PlanError> {
        self.set_gpa(course_id, None)
    }

    /// Select every unselected required course
    ///
    /// A course planned for a full token goes to that slot; a bare token goes
    /// to grade [`FALLBACK_GRADE`] of its season. Courses with a malformed
    /// planned semester are skipped.
    ///
    /// # Returns
    /// Ids of the courses added, in the order added
    pub fn auto_add_required(&mut self) -> Vec<String> {
        let mut pending: Vec<(ActualSemester, String)> = self
            .catalog
            .required_courses()
            .filter(|course| !self.selection.contains(&course.course_id))
            .filter_map(|course| {
                let planned = course.planned().ok()?;
                let slot = planned.as_actual().unwrap_or(ActualSemester {
                    grade: FALLBACK_GRADE,
                    season: planned.season,
                });
                Some((slot, course.course_id.clone()))
            })
            .collect();
        pending.sort_by(|(sa, a), (sb, b)| sa.season.cmp(&sb.season).then_with(|| a.cmp(b)));

        let mut added = Vec::with_capacity(pending.len());
        for (slot, course_id) in pending {
            match self.add_course(&course_id, slot) {
                Ok(()) => added.push(course_id),
                Err(e) => crate::warn!("Could not add required course {course_id}: {e}"),
            }
        }
        crate::info!("Added {} required courses", added.len());
        added
    }

    /// Credits of every resolved selection
    #[must_use]
    pub fn total_credits(&self) -> f64 {
        resolve(&self.catalog, &self.selection)
            .map(|r| r.course.credits)
            .sum()
    }

    /// Credits of selected elective courses
    #[must_use]
    pub fn elective_credits(&self) -> f64 {
        resolve(&self.catalog, &self.selection)
            .filter(|r| r.course.kind == CourseKind::Elective)
            .map(|r| r.course.credits)
            .sum()
    }

    /// Credits selected in `slot`
    #[must_use]
    pub fn semester_credits(&self, slot: ActualSemester) -> f64 {
        resolve(&self.catalog, &self.selection)
            .filter(|r| r.entry.actual_semester == slot)
            .map(|r| r.course.credits)
            .sum()
    }

    /// Whether `slot` exceeds the advisory credit cap
    #[must_use]
    pub fn is_over_limit(&self, slot: ActualSemester) -> bool {
        self.semester_credits(slot) > self.plan.term_credit_limit
    }

    /// Required courses not yet selected, in catalog order
    #[must_use]
    pub fn required_missing(&self) -> Vec<&CourseDef> {
        self.catalog
            .required_courses()
            .filter(|c| !self.selection.contains(&c.course_id))
            .collect()
    }

    /// Courses selected in `slot`, required first, then by course id
    #[must_use]
    pub fn courses_in_semester(&self, slot: ActualSemester) -> Vec<&CourseDef> {
        let mut courses: Vec<&CourseDef> = resolve(&self.catalog, &self.selection)
            .filter(|r| r.entry.actual_semester == slot)
            .map(|r| r.course)
            .collect();
        courses.sort_by(|a, b| {
            b.is_required()
                .cmp(&a.is_required())
                .then_with(|| a.course_id.cmp(&b.course_id))
        });
        courses
    }

    /// Selection table rows in insertion order, orphans included
    #[must_use]
    pub fn selection_rows(&self) -> Vec<SelectionRow<'_>> {
        self.selection
            .iter()
            .map(|entry| SelectionRow {
                entry,
                course: self.catalog.get(&entry.course_id),
            })
            .collect()
    }

    /// Every GPA aggregate for the current state
    #[must_use]
    pub fn metrics(&self) -> GpaMetrics {
        compute_all_metrics(&self.catalog, &self.selection, &self.plan.categories)
    }

    /// Credit progress for the current state
    #[must_use]
    pub fn progress(&self) -> CreditProgress {
        credit_progress(&self.catalog, &self.plan, &self.selection)
    }

    /// Check the plan rules
    #[must_use]
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues: Vec<ValidationIssue> = self
            .required_missing()
            .into_iter()
            .map(|c| ValidationIssue::MissingRequired {
                course_id: c.course_id.clone(),
                name: c.name.clone(),
            })
            .collect();

        let selected = self.elective_credits();
        if selected < self.plan.elective_credit_requirement {
            issues.push(ValidationIssue::ElectiveShortfall {
                selected,
                required: self.plan.elective_credit_requirement,
            });
        }

        issues.extend(ActualSemester::all().filter(|&slot| self.is_over_limit(slot)).map(|slot| {
            ValidationIssue::OverLimit {
                semester: slot,
                credits: self.semester_credits(slot),
                limit: self.plan.term_credit_limit,
            }
        }));
        issues.extend(
            orphaned(&self.catalog, &self.selection)
                .into_iter()
                .map(|e| ValidationIssue::Orphaned(e.course_id.clone())),
        );
        issues.extend(self.catalog.warnings().iter().cloned().map(ValidationIssue::Catalog));
        crate::debug!("Validation found {} issues", issues.len());
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::CategoryTarget;

    fn slot(s: &str) -> ActualSemester {
        s.parse().unwrap()
    }

    fn session() -> PlanSession {
        let catalog = Catalog::new(vec![
            CourseDef::new("OS", "Operating Systems", CourseKind::Required, 3.0, "3秋"),
            CourseDef::new("PE", "PE", CourseKind::Elective, 1.0, "秋").with_category("体育"),
            CourseDef::new("POL", "Politics", CourseKind::Required, 2.0, "春"),
            CourseDef::new("ML", "Machine Learning", CourseKind::Elective, 2.0, "3春")
                .with_category("专业选修"),
            CourseDef::new("BAD", "Broken", CourseKind::Required, 1.0, "冬"),
        ])
        .unwrap();
        let mut plan = Plan::new(4.0, 3.0);
        plan.set_target(CategoryTarget::new("体育", 2.0));
        PlanSession::new(catalog, plan, SelectionRecord::new())
    }

    #[test]
    fn test_add_course_across_grades() {
        let mut s = session();
        s.add_course("OS", slot("1秋")).unwrap();
        assert_eq!(s.selection().get("OS").unwrap().actual_semester, slot("1秋"));
    }

    #[test]
    fn test_add_course_rejections() {
        let mut s = session();
        assert_eq!(
            s.add_course("NOPE", slot("1秋")),
            Err(PlanError::UnknownCourse("NOPE".to_string()))
        );
        assert!(matches!(
            s.add_course("OS", slot("1春")),
            Err(PlanError::SeasonMismatch { .. })
        ));
        assert!(matches!(
            s.add_course("BAD", slot("1秋")),
            Err(PlanError::NeverOffered { .. })
        ));
        s.add_course("OS", slot("3秋")).unwrap();
        assert_eq!(
            s.add_course("OS", slot("2秋")),
            Err(PlanError::DuplicateSelection("OS".to_string()))
        );
        assert_eq!(s.selection().len(), 1);
    }

    #[test]
    fn test_term_limit_is_advisory() {
        let mut s = session();
        s.add_course("OS", slot("1秋")).unwrap();
        s.add_course("PE", slot("1秋")).unwrap();
        s.add_course("POL", slot("1春")).unwrap();
        assert!(!s.is_over_limit(slot("1秋")));
        s.move_course("POL", slot("2春")).unwrap();
        assert!((s.semester_credits(slot("1秋")) - 4.0).abs() < f64::EPSILON);

        let mut tight = session();
        tight.plan.term_credit_limit = 3.5;
        tight.add_course("OS", slot("1秋")).unwrap();
        tight.add_course("PE", slot("1秋")).unwrap();
        assert!(tight.is_over_limit(slot("1秋")));
        assert!(tight
            .validate()
            .iter()
            .any(|i| matches!(i, ValidationIssue::OverLimit { .. })));
    }

    #[test]
    fn test_move_course_keeps_grade_and_checks_season() {
        let mut s = session();
        s.add_course("OS", slot("1秋")).unwrap();
        s.set_gpa("OS", Some(3.3)).unwrap();
        assert_eq!(s.move_course("OS", slot("3秋")), Ok(slot("1秋")));
        assert_eq!(s.selection().get("OS").unwrap().gpa, Some(3.3));
        assert!(s.move_course("OS", slot("3春")).is_err());
        assert_eq!(s.selection().get("OS").unwrap().actual_semester, slot("3秋"));
        assert_eq!(
            s.move_course("PE", slot("1秋")),
            Err(PlanError::NotSelected("PE".to_string()))
        );
    }

    #[test]
    fn test_gpa_set_and_clear() {
        let mut s = session();
        s.add_course("PE", slot("2秋")).unwrap();
        assert_eq!(s.set_gpa("PE", Some(3.999)), Ok(None));
        assert_eq!(s.selection().get("PE").unwrap().gpa, Some(4.0));
        assert!(s.set_gpa("PE", Some(-1.0)).is_err());
        assert_eq!(s.clear_gpa("PE"), Ok(Some(4.0)));
        assert!(!s.selection().get("PE").unwrap().is_graded());
    }

    #[test]
    fn test_auto_add_required() {
        let mut s = session();
        let added = s.auto_add_required();
        // fall before spring; malformed planned token skipped
        assert_eq!(added, vec!["OS".to_string(), "POL".to_string()]);
        assert_eq!(s.selection().get("OS").unwrap().actual_semester, slot("3秋"));
        assert_eq!(s.selection().get("POL").unwrap().actual_semester, slot("4春"));
        assert!(s.auto_add_required().is_empty());
    }

    #[test]
    fn test_credit_totals() {
        let mut s = session();
        s.add_course("OS", slot("3秋")).unwrap();
        s.add_course("ML", slot("3春")).unwrap();
        s.add_course("PE", slot("3秋")).unwrap();
        assert!((s.total_credits() - 6.0).abs() < f64::EPSILON);
        assert!((s.elective_credits() - 3.0).abs() < f64::EPSILON);
        let ids: Vec<&str> = s
            .courses_in_semester(slot("3秋"))
            .iter()
            .map(|c| c.course_id.as_str())
            .collect();
        assert_eq!(ids, vec!["OS", "PE"]);
    }

    #[test]
    fn test_validate() {
        let mut s = session();
        let issues = s.validate();
        assert!(issues.contains(&ValidationIssue::MissingRequired {
            course_id: "OS".to_string(),
            name: "Operating Systems".to_string(),
        }));
        assert!(issues.contains(&ValidationIssue::ElectiveShortfall {
            selected: 0.0,
            required: 3.0,
        }));
        assert!(issues
            .iter()
            .any(|i| matches!(i, ValidationIssue::Catalog(_))));

        s.add_course("ML", slot("1春")).unwrap();
        s.add_course("PE", slot("1秋")).unwrap();
        assert!(!s
            .validate()
            .iter()
            .any(|i| matches!(i, ValidationIssue::ElectiveShortfall { .. })));
    }

    #[test]
    fn test_offered_in_uses_season_only() {
        let s = session();
        let offering = s.offered_in(slot("1秋"));
        let required: Vec<&str> = offering.required.iter().map(|c| c.course_id.as_str()).collect();
        let elective: Vec<&str> = offering.elective.iter().map(|c| c.course_id.as_str()).collect();
        assert_eq!(required, vec!["OS"]);
        assert_eq!(elective, vec!["PE"]);
    }

    #[test]
    fn test_save_without_path() {
        let s = session();
        assert!(matches!(s.save(), Err(DocumentError::NoPath)));
    }
}
