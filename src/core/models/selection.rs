//! Selection record: the courses a student has placed, with their grades

use super::semester::ActualSemester;
use crate::core::error::PlanError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Lowest accepted grade point
pub const GPA_MIN: f64 = 0.0;

/// Highest accepted grade point
pub const GPA_MAX: f64 = 4.0;

/// Check a grade point and round it to two decimals
///
/// # Errors
/// Returns [`PlanError::GpaOutOfRange`] for values outside `[GPA_MIN, GPA_MAX]` or NaN.
pub fn validate_gpa(gpa: Option<f64>) -> Result<Option<f64>, PlanError> {
    match gpa {
        None => Ok(None),
        Some(value) if (GPA_MIN..=GPA_MAX).contains(&value) => {
            Ok(Some((value * 100.0).round() / 100.0))
        }
        Some(value) => Err(PlanError::GpaOutOfRange(value)),
    }
}

/// One selected course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionEntry {
    /// Catalog course id
    pub course_id: String,

    /// Slot the course is taken in
    pub actual_semester: ActualSemester,

    /// Recorded grade point; `None` while the grade is pending
    #[serde(default)]
    pub gpa: Option<f64>,
}

impl SelectionEntry {
    /// Create an ungraded entry
    #[must_use]
    pub fn new(course_id: impl Into<String>, actual_semester: ActualSemester) -> Self {
        Self {
            course_id: course_id.into(),
            actual_semester,
            gpa: None,
        }
    }

    /// Whether a grade has been recorded
    #[must_use]
    pub const fn is_graded(&self) -> bool {
        self.gpa.is_some()
    }
}

/// The student's selections, at most one per course, in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionRecord {
    entries: Vec<SelectionEntry>,
}

impl SelectionRecord {
    /// Create an empty record
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build a record from stored entries
    ///
    /// # Errors
    /// Returns an error on a repeated course id or an out-of-range grade.
    pub fn from_entries(entries: Vec<SelectionEntry>) -> Result<Self, PlanError> {
        let mut seen = HashSet::with_capacity(entries.len());
        let mut record = Self::new();
        for mut entry in entries {
            if !seen.insert(entry.course_id.clone()) {
                return Err(PlanError::DuplicateSelection(entry.course_id));
            }
            entry.gpa = validate_gpa(entry.gpa)?;
            record.entries.push(entry);
        }
        Ok(record)
    }

    /// All entries in insertion order
    #[must_use]
    pub fn entries(&self) -> &[SelectionEntry] {
        &self.entries
    }

    /// Iterate over entries
    pub fn iter(&self) -> std::slice::Iter<'_, SelectionEntry> {
        self.entries.iter()
    }

    /// Number of selected courses
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is selected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `course_id` is selected
    #[must_use]
    pub fn contains(&self, course_id: &str) -> bool {
        self.get(course_id).is_some()
    }

    /// Entry for `course_id`
    #[must_use]
    pub fn get(&self, course_id: &str) -> Option<&SelectionEntry> {
        self.entries.iter().find(|e| e.course_id == course_id)
    }

    fn get_mut(&mut self, course_id: &str) -> Result<&mut SelectionEntry, PlanError> {
        self.entries
            .iter_mut()
            .find(|e| e.course_id == course_id)
            .ok_or_else(|| PlanError::NotSelected(course_id.to_string()))
    }

    /// Entries placed in `slot`
    pub fn in_semester(&self, slot: ActualSemester) -> impl Iterator<Item = &SelectionEntry> {
        self.entries
            .iter()
            .filter(move |e| e.actual_semester == slot)
    }

    /// Add an ungraded entry
    ///
    /// # Errors
    /// Returns [`PlanError::DuplicateSelection`] if the course is already selected.
    pub fn insert(&mut self, course_id: &str, slot: ActualSemester) -> Result<(), PlanError> {
        if self.contains(course_id) {
            return Err(PlanError::DuplicateSelection(course_id.to_string()));
        }
        self.entries.push(SelectionEntry::new(course_id, slot));
        Ok(())
    }

    /// Remove and return the entry for `course_id`
    ///
    /// # Errors
    /// Returns [`PlanError::NotSelected`] if the course is not selected.
    pub fn remove(&mut self, course_id: &str) -> Result<SelectionEntry, PlanError> {
        let pos = self
            .entries
            .iter()
            .position(|e| e.course_id == course_id)
            .ok_or_else(|| PlanError::NotSelected(course_id.to_string()))?;
        Ok(self.entries.remove(pos))
    }

    /// Set or clear the grade of `course_id`, returning the previous value
    ///
    /// # Errors
    /// Returns an error if the course is not selected or the grade is out of
    /// range; the stored grade is unchanged in both cases.
    pub fn set_gpa(&mut self, course_id: &str, gpa: Option<f64>) -> Result<Option<f64>, PlanError> {
        let gpa = validate_gpa(gpa)?;
        let entry = self.get_mut(course_id)?;
        Ok(std::mem::replace(&mut entry.gpa, gpa))
    }

    /// Move `course_id` to another slot, returning the previous slot
    ///
    /// # Errors
    /// Returns [`PlanError::NotSelected`] if the course is not selected.
    pub fn move_to(
        &mut self,
        course_id: &str,
        slot: ActualSemester,
    ) -> Result<ActualSemester, PlanError> {
        let entry = self.get_mut(course_id)?;
        Ok(std::mem::replace(&mut entry.actual_semester, slot))
    }
}

impl<'a> IntoIterator for &'a SelectionRecord {
    type Item = &'a SelectionEntry;
    type IntoIter = std::slice::Iter<'a, SelectionEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(s: &str) -> ActualSemester {
        s.parse().unwrap()
    }

    #[test]
    fn test_validate_gpa() {
        assert_eq!(validate_gpa(None), Ok(None));
        assert_eq!(validate_gpa(Some(0.0)), Ok(Some(0.0)));
        assert_eq!(validate_gpa(Some(4.0)), Ok(Some(4.0)));
        assert_eq!(validate_gpa(Some(3.456)), Ok(Some(3.46)));
        assert_eq!(validate_gpa(Some(4.01)), Err(PlanError::GpaOutOfRange(4.01)));
        assert_eq!(validate_gpa(Some(-0.5)), Err(PlanError::GpaOutOfRange(-0.5)));
        assert!(validate_gpa(Some(f64::NAN)).is_err());
    }

    #[test]
    fn test_insert_and_duplicate() {
        let mut record = SelectionRecord::new();
        record.insert("A", slot("1秋")).unwrap();
        assert_eq!(
            record.insert("A", slot("2秋")),
            Err(PlanError::DuplicateSelection("A".to_string()))
        );
        assert_eq!(record.len(), 1);
        assert_eq!(record.get("A").unwrap().actual_semester, slot("1秋"));
        assert!(!record.get("A").unwrap().is_graded());
    }

    #[test]
    fn test_remove() {
        let mut record = SelectionRecord::new();
        record.insert("A", slot("1秋")).unwrap();
        assert_eq!(record.remove("A").unwrap().course_id, "A");
        assert!(record.is_empty());
        assert_eq!(
            record.remove("A"),
            Err(PlanError::NotSelected("A".to_string()))
        );
    }

    #[test]
    fn test_set_gpa_out_of_range_keeps_previous() {
        let mut record = SelectionRecord::new();
        record.insert("A", slot("1秋")).unwrap();
        assert_eq!(record.set_gpa("A", Some(3.7)), Ok(None));
        assert!(record.set_gpa("A", Some(4.5)).is_err());
        assert_eq!(record.get("A").unwrap().gpa, Some(3.7));
        assert_eq!(record.set_gpa("A", None), Ok(Some(3.7)));
        assert!(record.set_gpa("B", Some(3.0)).is_err());
    }

    #[test]
    fn test_move_to() {
        let mut record = SelectionRecord::new();
        record.insert("A", slot("1秋")).unwrap();
        assert_eq!(record.move_to("A", slot("3秋")), Ok(slot("1秋")));
        assert_eq!(record.in_semester(slot("3秋")).count(), 1);
        assert_eq!(record.in_semester(slot("1秋")).count(), 0);
    }

    #[test]
    fn test_from_entries_rejects_duplicates() {
        let entries = vec![
            SelectionEntry::new("A", slot("1秋")),
            SelectionEntry::new("A", slot("1春")),
        ];
        assert!(SelectionRecord::from_entries(entries).is_err());
    }

    #[test]
    fn test_from_entries_validates_gpa() {
        let mut entry = SelectionEntry::new("A", slot("1秋"));
        entry.gpa = Some(5.0);
        assert_eq!(
            SelectionRecord::from_entries(vec![entry]),
            Err(PlanError::GpaOutOfRange(5.0))
        );
    }

    #[test]
    fn test_entry_serde_shape() {
        let json = r#"{"course_id": "A", "actual_semester": "2春", "gpa": 3.3}"#;
        let entry: SelectionEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.actual_semester, slot("2春"));
        assert_eq!(entry.gpa, Some(3.3));

        let pending: SelectionEntry =
            serde_json::from_str(r#"{"course_id": "B", "actual_semester": "1秋"}"#).unwrap();
        assert!(pending.gpa.is_none());
    }
}
