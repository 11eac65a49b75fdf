//! Job categories shown on the dashboard.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown category: {0}")]
pub struct UnknownCategory(pub String);

/// A fixed job category; each one is backed by its own sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Professor,
    Supervisor,
    #[serde(alias = "apoio")]
    Support,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Professor, Category::Supervisor, Category::Support];

    /// Human label used for KPI cards and chart bars.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Professor => "Professor",
            Category::Supervisor => "Supervisor",
            Category::Support => "Support",
        }
    }

    /// Upper-case key used by the category selector.
    pub fn selector_key(&self) -> &'static str {
        match self {
            Category::Professor => "PROFESSOR",
            Category::Supervisor => "SUPERVISOR",
            Category::Support => "APOIO",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "professor" => Ok(Category::Professor),
            "supervisor" => Ok(Category::Supervisor),
            "support" | "apoio" => Ok(Category::Support),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}
