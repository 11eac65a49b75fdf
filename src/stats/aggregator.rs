//! Aggregator Module
//! Per-category applicant totals and sums derived from them.

use crate::data::{Category, RosterTable};
use serde::{Deserialize, Serialize};

/// Total applicants for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: u64,
}

/// Category → total, in the order the categories were loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregateSummary {
    totals: Vec<CategoryTotal>,
}

impl AggregateSummary {
    pub fn totals(&self) -> &[CategoryTotal] {
        &self.totals
    }

    /// Total for `category`, or `None` if it was not part of the load.
    pub fn get(&self, category: Category) -> Option<u64> {
        self.totals
            .iter()
            .find(|t| t.category == category)
            .map(|t| t.total)
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.totals.iter().map(|t| t.category)
    }

    /// Sum over every category in the summary.
    pub fn grand_total(&self) -> u64 {
        saturating_sum(self.totals.iter().map(|t| t.total))
    }

    /// Sum of the given categories' totals; absent categories add nothing.
    pub fn sum_of(&self, categories: &[Category]) -> u64 {
        saturating_sum(categories.iter().filter_map(|c| self.get(*c)))
    }

    /// Largest single category total (0 when empty).
    pub fn max_total(&self) -> u64 {
        self.totals.iter().map(|t| t.total).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}

fn saturating_sum(values: impl Iterator<Item = u64>) -> u64 {
    values.fold(0, u64::saturating_add)
}

/// A named cross-category sum requested by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedTotalSpec {
    pub label: String,
    pub categories: Vec<Category>,
}

impl DerivedTotalSpec {
    pub fn new(label: impl Into<String>, categories: &[Category]) -> Self {
        Self {
            label: label.into(),
            categories: categories.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedTotal {
    pub label: String,
    pub total: u64,
}

/// Turns loaded tables into totals.
pub struct Aggregator;

impl Aggregator {
    /// Sum each table's applicant counts, keeping input order.
    pub fn summarize<'a, I>(tables: I) -> AggregateSummary
    where
        I: IntoIterator<Item = (Category, &'a RosterTable)>,
    {
        let totals = tables
            .into_iter()
            .map(|(category, table)| CategoryTotal {
                category,
                total: table.total_applicants(),
            })
            .collect();

        AggregateSummary { totals }
    }

    /// Evaluate derived totals from an existing summary.
    pub fn derive(summary: &AggregateSummary, specs: &[DerivedTotalSpec]) -> Vec<DerivedTotal> {
        specs
            .iter()
            .map(|spec| DerivedTotal {
                label: spec.label.clone(),
                total: summary.sum_of(&spec.categories),
            })
            .collect()
    }
}
