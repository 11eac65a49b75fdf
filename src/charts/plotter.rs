//! Chart Plotter Module
//! Turns an AggregateSummary into bar-chart series (one bar per category).

use crate::stats::AggregateSummary;
use serde::Serialize;

/// Tableau10 palette, RGB.
pub const PALETTE: [[u8; 3]; 10] = [
    [78, 121, 167],  // Blue
    [242, 142, 44],  // Orange
    [225, 87, 89],   // Red
    [118, 183, 178], // Teal
    [89, 161, 79],   // Green
    [237, 201, 73],  // Yellow
    [175, 122, 161], // Purple
    [255, 157, 167], // Pink
    [156, 117, 95],  // Brown
    [186, 176, 171], // Grey
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: u64,
    pub color: [u8; 3],
}

/// Bars in category order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartData {
    pub title: String,
    pub bars: Vec<Bar>,
}

impl ChartData {
    pub fn max_value(&self) -> u64 {
        self.bars.iter().map(|b| b.value).max().unwrap_or(0)
    }
}

/// Builds chart series from summaries.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn color_for(index: usize) -> [u8; 3] {
        PALETTE[index % PALETTE.len()]
    }

    pub fn bar_chart(title: &str, summary: &AggregateSummary) -> ChartData {
        let bars = summary
            .totals()
            .iter()
            .enumerate()
            .map(|(i, t)| Bar {
                label: t.category.label().to_string(),
                value: t.total,
                color: Self::color_for(i),
            })
            .collect();

        ChartData {
            title: title.to_string(),
            bars,
        }
    }

    /// Horizontal text bars for terminals, scaled so the largest fills `width` cells.
    pub fn text_bars(chart: &ChartData, width: usize) -> Vec<String> {
        let max = chart.max_value();
        let label_w = chart.bars.iter().map(|b| b.label.chars().count()).max().unwrap_or(0);

        chart
            .bars
            .iter()
            .map(|bar| {
                let cells = if max == 0 {
                    0
                } else {
                    ((bar.value as f64 / max as f64) * width as f64).round() as usize
                };
                format!(
                    "{:<label_w$} │{} {}",
                    bar.label,
                    "█".repeat(cells),
                    bar.value,
                    label_w = label_w
                )
            })
            .collect()
    }
}
