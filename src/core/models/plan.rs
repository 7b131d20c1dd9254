//! Plan model: credit limits, category targets and category policy

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Default advisory credit cap per semester
pub const DEFAULT_TERM_CREDIT_LIMIT: f64 = 30.0;

/// Default elective credit requirement
pub const DEFAULT_ELECTIVE_CREDIT_REQUIREMENT: f64 = 15.0;

/// Default category of major-required courses
pub const MAJOR_REQUIRED_CATEGORY: &str = "专业必修";

/// Default category of major-elective courses (also the elective bucket)
pub const MAJOR_ELECTIVE_CATEGORY: &str = "专业选修";

/// Credit target for one program category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTarget {
    /// Category label (e.g., "思政")
    pub category: String,

    /// Credits required; `None` defers to the plan (see [`Plan::required_for`])
    #[serde(default)]
    pub required_credits: Option<f64>,
}

impl CategoryTarget {
    /// Create a target with a fixed requirement; the label is trimmed
    #[must_use]
    pub fn new(category: impl Into<String>, required_credits: f64) -> Self {
        Self {
            category: category.into().trim().to_string(),
            required_credits: Some(required_credits),
        }
    }
}

fn default_major_categories() -> BTreeSet<String> {
    [MAJOR_REQUIRED_CATEGORY, MAJOR_ELECTIVE_CATEGORY]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_elective_category() -> String {
    MAJOR_ELECTIVE_CATEGORY.to_string()
}

/// Which free-text categories carry special meaning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPolicy {
    /// Categories counted by the major GPA
    #[serde(default = "default_major_categories")]
    pub major_categories: BTreeSet<String>,

    /// Category whose requirement falls back to the elective credit requirement
    #[serde(default = "default_elective_category")]
    pub elective_category: String,
}

impl Default for CategoryPolicy {
    fn default() -> Self {
        Self {
            major_categories: default_major_categories(),
            elective_category: default_elective_category(),
        }
    }
}

impl CategoryPolicy {
    /// Whether `category` counts towards the major GPA
    #[must_use]
    pub fn is_major(&self, category: &str) -> bool {
        self.major_categories.contains(category.trim())
    }

    /// Whether `category` is the elective bucket
    #[must_use]
    pub fn is_elective_bucket(&self, category: &str) -> bool {
        self.elective_category.trim() == category.trim()
    }
}

/// Program parameters loaded with the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    /// Advisory credit cap per semester (not enforced)
    pub term_credit_limit: f64,

    /// Elective credits required for graduation
    pub elective_credit_requirement: f64,

    /// Category targets, in display order
    pub items: Vec<CategoryTarget>,

    /// Category policy
    pub categories: CategoryPolicy,
}

impl Default for Plan {
    fn default() -> Self {
        Self::new(DEFAULT_TERM_CREDIT_LIMIT, DEFAULT_ELECTIVE_CREDIT_REQUIREMENT)
    }
}

impl Plan {
    /// Create a plan with no category targets and the default policy
    ///
    /// # Arguments
    /// * `term_credit_limit` - Advisory credit cap per semester
    /// * `elective_credit_requirement` - Elective credits required
    #[must_use]
    pub fn new(term_credit_limit: f64, elective_credit_requirement: f64) -> Self {
        Self {
            term_credit_limit,
            elective_credit_requirement,
            items: Vec::new(),
            categories: CategoryPolicy::default(),
        }
    }

    /// Add a target, replacing any existing target for the same category
    ///
    /// Category labels are compared and stored trimmed.
    pub fn set_target(&mut self, mut target: CategoryTarget) {
        target.category = target.category.trim().to_string();
        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|t| t.category.trim() == target.category)
        {
            *existing = target;
        } else {
            self.items.push(target);
        }
    }

    /// Remove the target for `category`
    ///
    /// # Returns
    /// `true` if a target was removed
    pub fn remove_target(&mut self, category: &str) -> bool {
        let before = self.items.len();
        let category = category.trim();
        self.items.retain(|t| t.category.trim() != category);
        self.items.len() != before
    }

    /// Target for `category`, if listed
    #[must_use]
    pub fn target(&self, category: &str) -> Option<&CategoryTarget> {
        let category = category.trim();
        self.items.iter().find(|t| t.category.trim() == category)
    }

    /// Credits required for `category`
    ///
    /// An explicit target wins. Otherwise the elective bucket requires
    /// `elective_credit_requirement` and any other category requires nothing.
    #[must_use]
    pub fn required_for(&self, category: &str) -> f64 {
        match self.target(category).and_then(|t| t.required_credits) {
            Some(credits) => credits,
            None if self.categories.is_elective_bucket(category) => {
                self.elective_credit_requirement
            }
            None => 0.0,
        }
    }
}

/// Built-in program requirements used when a document lists none
#[must_use]
pub fn default_requirements() -> Vec<CategoryTarget> {
    [
        ("思政", 18.5),
        ("体育", 4.0),
        (MAJOR_REQUIRED_CATEGORY, 33.0),
        (MAJOR_ELECTIVE_CATEGORY, 15.0),
        ("大类平台", 72.5),
        ("学院平台", 25.5),
    ]
    .into_iter()
    .map(|(category, credits)| CategoryTarget::new(category, credits))
    .collect()
}
