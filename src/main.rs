//! Enrollment Dashboard - console view
//!
//! Refreshes the configured dashboard once and prints KPIs, the category
//! chart and the first page of every category's roster. Optionally writes
//! the chart as a PNG.

use anyhow::{Context, Result};
use clap::Parser;
use enrollment_dashboard::charts::ChartPlotter;
use enrollment_dashboard::{Dashboard, DashboardConfig, DashboardSnapshot};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

const CHART_WIDTH: usize = 40;

#[derive(Parser, Debug)]
#[command(
    name = "enrollment_dashboard",
    version,
    about = "Applicant counts per position, read from the published enrollment spreadsheet"
)]
struct Cli {
    /// JSON config file; the three-category preset is used when omitted.
    config: Option<PathBuf>,

    /// Write the category bar chart to this PNG file.
    #[arg(long = "chart", value_name = "FILE")]
    chart: Option<PathBuf>,

    #[arg(long = "chart-width", default_value_t = 800)]
    chart_width: u32,

    #[arg(long = "chart-height", default_value_t = 450)]
    chart_height: u32,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => DashboardConfig::load(path)
            .with_context(|| format!("loading dashboard config from {}", path.display()))?,
        None => DashboardConfig::three_categories(),
    };
    info!(categories = config.categories.len(), "starting dashboard");

    let mut dashboard = Dashboard::new(config).context("building dashboard")?;
    let snapshot = dashboard.refresh();
    print_snapshot(&snapshot);

    if let Some(path) = &cli.chart {
        let png = snapshot
            .chart_png(cli.chart_width, cli.chart_height)
            .context("rendering chart")?;
        std::fs::write(path, png)
            .with_context(|| format!("writing chart to {}", path.display()))?;
        info!(path = %path.display(), "chart written");
    }

    Ok(())
}

fn print_snapshot(snapshot: &DashboardSnapshot) {
    println!("{}", snapshot.title);
    println!("{}", "=".repeat(snapshot.title.chars().count()));

    for notice in &snapshot.notices {
        println!("! {}", notice.message());
    }

    println!();
    for card in snapshot.kpis() {
        println!("{:<28} {:>8}", card.title, card.value);
    }

    let chart = snapshot.chart();
    println!();
    println!("{}", chart.title);
    for line in ChartPlotter::text_bars(&chart, CHART_WIDTH) {
        println!("  {line}");
    }

    for category in snapshot.categories() {
        let Some(view) = snapshot.table_view(category, "", None) else {
            continue;
        };
        let page = view.page(0);

        println!();
        println!(
            "Inscrições - {} ({} vagas, página {}/{})",
            category.selector_key(),
            page.total_rows,
            page.index + 1,
            page.page_count
        );
        for row in page.rows {
            println!("  {:<60} {:>6}", row.position_label, row.applicant_count);
        }
    }
}
