//! Data models for `gradeplan`

pub mod catalog;
pub mod course;
pub mod plan;
pub mod selection;
pub mod semester;

pub use catalog::{Catalog, CatalogError, CatalogWarning, Offering};
pub use course::{CourseDef, CourseKind, UNCATEGORIZED};
pub use plan::{CategoryPolicy, CategoryTarget, Plan};
pub use selection::{SelectionEntry, SelectionRecord};
pub use semester::{ActualSemester, Season, SemesterError, SemesterToken};
