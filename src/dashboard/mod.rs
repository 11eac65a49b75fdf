//! Dashboard module - presentation-facing view of the pipeline

mod app;
mod table_view;

pub use app::{Dashboard, DashboardError, DashboardSnapshot, KpiCard, Notice};
pub use table_view::{TablePage, TableView};
