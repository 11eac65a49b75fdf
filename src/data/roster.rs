//! Roster Table Module
//! Typed two-column table of positions and their applicant counts.

use serde::Serialize;

/// One position (city/slot) and how many applicants it received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterRow {
    pub position_label: String,
    pub applicant_count: u64,
}

impl RosterRow {
    pub fn new(position_label: impl Into<String>, applicant_count: u64) -> Self {
        Self {
            position_label: position_label.into(),
            applicant_count,
        }
    }
}

/// Rows sorted descending by applicant count, ties kept in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RosterTable {
    rows: Vec<RosterRow>,
}

impl RosterTable {
    /// Table with zero rows, returned when a load fails.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table from rows in source order, applying the count ordering.
    pub fn from_rows(mut rows: Vec<RosterRow>) -> Self {
        // Vec::sort_by is stable, so equal counts keep their source order.
        rows.sort_by(|a, b| b.applicant_count.cmp(&a.applicant_count));
        Self { rows }
    }

    pub fn rows(&self) -> &[RosterRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of the applicant count column, saturating at `u64::MAX`.
    pub fn total_applicants(&self) -> u64 {
        self.rows
            .iter()
            .fold(0u64, |acc, r| acc.saturating_add(r.applicant_count))
    }

    /// Rows whose label contains `term`, ignoring case.
    ///
    /// A blank term returns the table unchanged. Row order is preserved.
    pub fn filter(&self, term: &str) -> RosterTable {
        let term = term.trim();
        if term.is_empty() {
            return self.clone();
        }

        let needle = term.to_lowercase();
        let rows = self
            .rows
            .iter()
            .filter(|r| r.position_label.to_lowercase().contains(&needle))
            .cloned()
            .collect();

        // Already ordered: filtering a sorted sequence keeps it sorted.
        Self { rows }
    }
}
