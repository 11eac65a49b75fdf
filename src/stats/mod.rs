//! Stats module - applicant totals

mod aggregator;

pub use aggregator::{AggregateSummary, Aggregator, CategoryTotal, DerivedTotal, DerivedTotalSpec};
