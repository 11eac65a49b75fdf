//! Table View
//! Filtered, paginated rows of one category, as the roster grid shows them.

use crate::config::PageSize;
use crate::data::{Category, RosterRow, RosterTable};

/// Rows of one category after applying a search term.
#[derive(Debug, Clone)]
pub struct TableView {
    pub category: Category,
    pub search: String,
    pub page_size: PageSize,
    rows: RosterTable,
}

/// One page of a TableView. `index` is zero-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TablePage<'a> {
    pub rows: &'a [RosterRow],
    pub index: usize,
    pub page_size: usize,
    pub page_count: usize,
    pub total_rows: usize,
}

impl TablePage<'_> {
    /// One-based number of the first row on this page (0 when empty).
    pub fn first_row_number(&self) -> usize {
        if self.rows.is_empty() {
            0
        } else {
            self.index * self.page_size + 1
        }
    }
}

impl TableView {
    pub fn new(category: Category, table: &RosterTable, search: &str, page_size: PageSize) -> Self {
        Self {
            category,
            search: search.to_string(),
            page_size,
            rows: table.filter(search),
        }
    }

    pub fn rows(&self) -> &RosterTable {
        &self.rows
    }

    pub fn total_rows(&self) -> usize {
        self.rows.len()
    }

    /// Always at least one page, even for an empty result.
    pub fn page_count(&self) -> usize {
        self.rows.len().div_ceil(self.page_size.rows()).max(1)
    }

    /// Page `index`, clamped to the last page.
    pub fn page(&self, index: usize) -> TablePage<'_> {
        let page_count = self.page_count();
        let index = index.min(page_count - 1);
        let size = self.page_size.rows();
        let start = (index * size).min(self.rows.len());
        let end = (start + size).min(self.rows.len());

        TablePage {
            rows: &self.rows.rows()[start..end],
            index,
            page_size: size,
            page_count,
            total_rows: self.rows.len(),
        }
    }
}
