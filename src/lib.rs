//! Enrollment Dashboard - spreadsheet ingestion, applicant totals and searchable rosters
//!
//! Each job category is read from one sheet of a published spreadsheet,
//! validated into a typed [`data::RosterTable`], summed by
//! [`stats::Aggregator`] and exposed through [`dashboard::Dashboard`].

pub mod charts;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod stats;

pub use config::{DashboardConfig, PageSize};
pub use dashboard::{Dashboard, DashboardSnapshot};
