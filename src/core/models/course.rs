//! Course definition model

use super::semester::{SemesterError, SemesterToken};
use serde::{Deserialize, Deserializer, Serialize};

/// Category label used for courses without one
pub const UNCATEGORIZED: &str = "未分类";

/// Required/elective flag of a catalog course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CourseKind {
    /// 必修
    #[serde(rename = "必修", alias = "required")]
    Required,
    /// 选修
    #[serde(rename = "选修", alias = "elective")]
    Elective,
}

impl CourseKind {
    /// Display label as stored in plan documents
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Required => "必修",
            Self::Elective => "选修",
        }
    }
}

/// Represents one course in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseDef {
    /// Course id, unique within the catalog (e.g., "23308952")
    pub course_id: String,

    /// Course name (e.g., "数据结构")
    pub name: String,

    /// Required or elective
    #[serde(rename = "course_type")]
    pub kind: CourseKind,

    /// Credits (can be fractional, e.g. 0.5 for physical education)
    pub credits: f64,

    /// Planned semester token as written in the catalog (e.g., "2秋" or "秋")
    #[serde(rename = "semester")]
    pub planned_semester: String,

    /// Contact hours, display only (e.g., "64", "2周")
    #[serde(default)]
    pub hours: Option<String>,

    /// Program module the course counts towards (e.g., "专业必修")
    #[serde(default, deserialize_with = "null_as_empty")]
    pub category: String,
}

/// `null` reads as an empty string so the course lands in [`UNCATEGORIZED`]
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl CourseDef {
    /// Create a new course with no hours and no category
    ///
    /// # Arguments
    /// * `course_id` - Catalog id
    /// * `name` - Course name
    /// * `kind` - Required or elective
    /// * `credits` - Credits (can be fractional)
    /// * `planned_semester` - Planned semester token
    #[must_use]
    pub fn new(
        course_id: impl Into<String>,
        name: impl Into<String>,
        kind: CourseKind,
        credits: f64,
        planned_semester: impl Into<String>,
    ) -> Self {
        Self {
            course_id: course_id.into(),
            name: name.into(),
            kind,
            credits,
            planned_semester: planned_semester.into(),
            hours: None,
            category: String::new(),
        }
    }

    /// Set the category
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the display hours
    #[must_use]
    pub fn with_hours(mut self, hours: impl Into<String>) -> Self {
        self.hours = Some(hours.into());
        self
    }

    /// Whether the course is required
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.kind == CourseKind::Required
    }

    /// Parse the planned semester token
    ///
    /// # Errors
    /// Returns the parse error for a token outside the `<grade>?<season>` grammar.
    pub fn planned(&self) -> Result<SemesterToken, SemesterError> {
        self.planned_semester.parse()
    }

    /// Category used for grouping; blank categories map to [`UNCATEGORIZED`]
    #[must_use]
    pub fn category_label(&self) -> &str {
        let trimmed = self.category.trim();
        if trimmed.is_empty() {
            UNCATEGORIZED
        } else {
            trimmed
        }
    }

    /// Leading number of the hours field ("64" -> 64, "2周" -> 2)
    #[must_use]
    pub fn hours_value(&self) -> Option<f64> {
        let hours = self.hours.as_deref()?.trim();
        let end = hours
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(hours.len());
        hours[..end].parse().ok()
    }
}
