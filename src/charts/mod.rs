//! Charts module - Chart rendering

mod plotter;
mod renderer;

pub use plotter::{Bar, ChartData, ChartPlotter, PALETTE};
pub use renderer::{BarRect, ChartError, StaticChartRenderer};
