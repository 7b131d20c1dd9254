//! Plan document: the JSON file holding a catalog, its plan and a selection
//!
//! ```json
//! {
//!   "courses": [{"course_id": "...", "course_type": "必修", "semester": "2秋", ...}],
//!   "plan": {
//!     "term_credit_limit": 30.0,
//!     "elective_credit_requirement": 15.0,
//!     "requirements": [{"category": "体育", "required_credits": 4.0}],
//!     "categories": {"major_categories": ["专业必修"], "elective_category": "专业选修"},
//!     "items": [{"course_id": "...", "actual_semester": "1秋", "gpa": 3.7}]
//!   }
//! }
//! ```
//!
//! `plan.items` holds the selection. Category targets live in
//! `plan.requirements` and fall back to the built-in program requirements
//! when absent.

use crate::core::error::PlanError;
use crate::core::metrics::orphaned;
use crate::core::models::plan::{
    default_requirements, DEFAULT_ELECTIVE_CREDIT_REQUIREMENT, DEFAULT_TERM_CREDIT_LIMIT,
};
use crate::core::models::{
    Catalog, CatalogError, CategoryPolicy, CategoryTarget, CourseDef, Plan, SelectionEntry,
    SelectionRecord, UNCATEGORIZED,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_DOCUMENT: &str = include_str!("../assets/default_plan.json");

/// Why a plan document could not be read, parsed or written
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Filesystem failure
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Not valid JSON, or a field has the wrong shape
    #[error("invalid plan document: {0}")]
    Json(#[from] serde_json::Error),

    /// The catalog is inconsistent
    #[error("invalid catalog: {0}")]
    Catalog(#[from] CatalogError),

    /// The stored selection is inconsistent
    #[error("invalid selection: {0}")]
    Selection(#[from] PlanError),

    /// The session has no file to save to
    #[error("no plan file is associated with this session")]
    NoPath,
}

fn default_term_credit_limit() -> f64 {
    DEFAULT_TERM_CREDIT_LIMIT
}

fn default_elective_credit_requirement() -> f64 {
    DEFAULT_ELECTIVE_CREDIT_REQUIREMENT
}

/// The `plan` object of a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSection {
    /// Advisory credit cap per semester
    #[serde(default = "default_term_credit_limit")]
    pub term_credit_limit: f64,

    /// Elective credits required
    #[serde(default = "default_elective_credit_requirement")]
    pub elective_credit_requirement: f64,

    /// Category targets; `None` means the built-in requirements
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<Vec<CategoryTarget>>,

    /// Category policy; `None` means the default policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<CategoryPolicy>,

    /// The selection
    #[serde(default)]
    pub items: Vec<SelectionEntry>,
}

impl Default for PlanSection {
    fn default() -> Self {
        Self {
            term_credit_limit: DEFAULT_TERM_CREDIT_LIMIT,
            elective_credit_requirement: DEFAULT_ELECTIVE_CREDIT_REQUIREMENT,
            requirements: None,
            categories: None,
            items: Vec::new(),
        }
    }
}

/// A whole plan document as stored on disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanDocument {
    /// Catalog courses
    #[serde(default)]
    pub courses: Vec<CourseDef>,

    /// Plan parameters and selection
    #[serde(default)]
    pub plan: PlanSection,
}

impl PlanDocument {
    /// The compiled-in default document: full catalog, empty selection
    ///
    /// # Errors
    /// Returns an error only if the embedded document is not valid JSON.
    pub fn builtin() -> Result<Self, DocumentError> {
        Self::from_json(DEFAULT_DOCUMENT)
    }

    /// Parse a document from JSON text
    ///
    /// # Errors
    /// Returns [`DocumentError::Json`] on malformed JSON, a malformed
    /// `actual_semester` or an unknown `course_type`.
    pub fn from_json(content: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Serialize to pretty JSON
    ///
    /// # Errors
    /// Returns [`DocumentError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Read a document, creating it from [`Self::builtin`] if the file is missing
    ///
    /// # Errors
    /// Returns an error if the file cannot be created, read or parsed.
    pub fn read(path: &Path) -> Result<Self, DocumentError> {
        if !path.exists() {
            Self::builtin()?.write(path)?;
            crate::info!("Created default plan document at {}", path.display());
        }
        let content = fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Check that `path` holds a loadable plan document without creating it
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, does not parse, or its
    /// catalog or selection is invalid.
    pub fn check(path: &Path) -> Result<(), DocumentError> {
        let content = fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)?.into_parts().map(|_| ())
    }

    /// Write the document, creating parent directories as needed
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn write(&self, path: &Path) -> Result<(), DocumentError> {
        let io_err = |source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, self.to_json()?).map_err(io_err)
    }

    /// Split into the engine's catalog, plan and selection
    ///
    /// Blank categories become [`UNCATEGORIZED`]. Selections whose course is
    /// not in the catalog are kept as orphans.
    ///
    /// # Errors
    /// Returns an error on duplicate or invalid catalog courses, duplicate
    /// selections, or out-of-range grades.
    pub fn into_parts(self) -> Result<(Catalog, Plan, SelectionRecord), DocumentError> {
        let courses = self
            .courses
            .into_iter()
            .map(|mut course| {
                course.category = course.category_label().to_string();
                course
            })
            .collect();
        let catalog = Catalog::new(courses)?;

        let section = self.plan;
        let mut plan = Plan::new(section.term_credit_limit, section.elective_credit_requirement);
        if let Some(categories) = section.categories {
            plan.categories = categories;
        }
        for mut target in section.requirements.unwrap_or_else(default_requirements) {
            target.category = target.category.trim().to_string();
            plan.set_target(target);
        }

        let selection = SelectionRecord::from_entries(section.items)?;
        for entry in orphaned(&catalog, &selection) {
            crate::warn!(
                "Selection references course {} which is not in the catalog",
                entry.course_id
            );
        }
        Ok((catalog, plan, selection))
    }

    /// Assemble a document from engine state
    #[must_use]
    pub fn from_parts(catalog: &Catalog, plan: &Plan, selection: &SelectionRecord) -> Self {
        Self {
            courses: catalog.courses().to_vec(),
            plan: PlanSection {
                term_credit_limit: plan.term_credit_limit,
                elective_credit_requirement: plan.elective_credit_requirement,
                requirements: Some(plan.items.clone()),
                categories: Some(plan.categories.clone()),
                items: selection.entries().to_vec(),
            },
        }
    }
}
