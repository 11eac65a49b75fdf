//! Dashboard Application
//! Refreshes every configured category and hands the presentation layer a
//! snapshot: tables, totals, KPI cards, chart series and error notices.

use crate::charts::{ChartData, ChartError, ChartPlotter, StaticChartRenderer};
use crate::config::{ConfigError, DashboardConfig, PageSize};
use crate::dashboard::TableView;
use crate::data::{
    Category, Clock, FetchError, HttpTransport, LoadError, RosterLoader, RosterTable, SystemClock,
    Transport,
};
use crate::stats::{AggregateSummary, Aggregator, DerivedTotal};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to build HTTP client: {0}")]
    Transport(#[from] FetchError),
}

/// A load problem to show next to the affected category.
#[derive(Debug, Clone)]
pub struct Notice {
    pub category: Category,
    pub error: LoadError,
}

impl Notice {
    pub fn message(&self) -> String {
        format!("{}: {}", self.category, self.error)
    }
}

/// Headline number card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KpiCard {
    pub title: String,
    pub value: u64,
}

/// Everything one refresh produced.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub title: String,
    pub page_size: PageSize,
    pub tables: Vec<(Category, RosterTable)>,
    pub summary: AggregateSummary,
    pub derived: Vec<DerivedTotal>,
    pub notices: Vec<Notice>,
}

impl DashboardSnapshot {
    pub fn table(&self, category: Category) -> Option<&RosterTable> {
        self.tables
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, t)| t)
    }

    pub fn categories(&self) -> Vec<Category> {
        self.tables.iter().map(|(c, _)| *c).collect()
    }

    /// Derived totals first, then one card per category.
    pub fn kpis(&self) -> Vec<KpiCard> {
        let derived = self.derived.iter().map(|d| KpiCard {
            title: d.label.clone(),
            value: d.total,
        });
        let per_category = self.summary.totals().iter().map(|t| KpiCard {
            title: format!("Inscritos - {}", t.category.label()),
            value: t.total,
        });
        derived.chain(per_category).collect()
    }

    pub fn chart(&self) -> ChartData {
        ChartPlotter::bar_chart("Distribuição de Inscrições por Cargo", &self.summary)
    }

    /// The category chart as a labelled PNG.
    pub fn chart_png(&self, width: u32, height: u32) -> Result<Vec<u8>, ChartError> {
        StaticChartRenderer::render_png(&self.chart(), width, height)
    }

    /// Rows of `category` matching `search`, ready to paginate.
    ///
    /// `None` when the category is not part of this dashboard.
    pub fn table_view(
        &self,
        category: Category,
        search: &str,
        page_size: Option<PageSize>,
    ) -> Option<TableView> {
        let table = self.table(category)?;
        Some(TableView::new(
            category,
            table,
            search,
            page_size.unwrap_or(self.page_size),
        ))
    }

    pub fn has_errors(&self) -> bool {
        !self.notices.is_empty()
    }
}

/// Loader + aggregator wired to one dashboard configuration.
pub struct Dashboard {
    config: DashboardConfig,
    loader: RosterLoader,
}

impl Dashboard {
    /// Dashboard fetching over HTTP with the wall clock.
    pub fn new(config: DashboardConfig) -> Result<Self, DashboardError> {
        let transport = HttpTransport::new(config.timeout())?;
        Ok(Self::with_transport(
            config,
            Box::new(transport),
            Arc::new(SystemClock),
        )?)
    }

    pub fn with_transport(
        config: DashboardConfig,
        transport: Box<dyn Transport>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let loader = RosterLoader::new(
            config.base_url.clone(),
            transport,
            config.cache_ttl(),
            clock,
        );
        Ok(Self { config, loader })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Load every category (cache permitting), then aggregate.
    ///
    /// A failed category contributes an empty table and a notice; the
    /// others are unaffected.
    pub fn refresh(&mut self) -> DashboardSnapshot {
        let mut tables = Vec::with_capacity(self.config.categories.len());
        let mut notices = Vec::new();

        for (category, source) in self.config.sources() {
            let outcome = self.loader.load(&source);
            if let Some(error) = outcome.error {
                warn!(%category, error = %error, "category degraded to empty table");
                notices.push(Notice { category, error });
            }
            tables.push((category, outcome.table));
        }

        let summary = Aggregator::summarize(tables.iter().map(|(c, t)| (*c, t)));
        let derived = Aggregator::derive(&summary, &self.config.derived_totals);
        info!(
            categories = tables.len(),
            failed = notices.len(),
            total = summary.grand_total(),
            "dashboard refreshed"
        );

        DashboardSnapshot {
            title: self.config.title.clone(),
            page_size: self.config.page_size,
            tables,
            summary,
            derived,
            notices,
        }
    }

    /// Drop cached sheets so the next refresh re-fetches everything.
    pub fn invalidate_all(&mut self) {
        self.loader.clear_cache();
    }
}
