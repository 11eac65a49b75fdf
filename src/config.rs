//! Dashboard configuration: which spreadsheet, which sheets, and how long to cache them.

use crate::data::{Category, SourceDescriptor, DEFAULT_BASE_URL};
use crate::stats::DerivedTotalSpec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Spreadsheet published by the enrollment office.
pub const DEFAULT_SPREADSHEET_ID: &str = "1AqbLEIwV_gsDwrw8nLYFq0M4t3LBw28X1dQCI86_Mrs";
pub const DEFAULT_CACHE_TTL_SECS: u64 = 200;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Rows per page offered by the roster table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum PageSize {
    #[default]
    TwentyFive,
    Fifty,
    Hundred,
}

impl PageSize {
    pub const ALL: [PageSize; 3] = [PageSize::TwentyFive, PageSize::Fifty, PageSize::Hundred];

    pub fn rows(&self) -> usize {
        match self {
            PageSize::TwentyFive => 25,
            PageSize::Fifty => 50,
            PageSize::Hundred => 100,
        }
    }
}

impl TryFrom<usize> for PageSize {
    type Error = String;

    fn try_from(n: usize) -> Result<Self, Self::Error> {
        PageSize::ALL
            .into_iter()
            .find(|p| p.rows() == n)
            .ok_or_else(|| format!("page size must be 25, 50 or 100, got {n}"))
    }
}

impl From<PageSize> for usize {
    fn from(p: PageSize) -> usize {
        p.rows()
    }
}

/// One category and the sheet it is read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySource {
    pub category: Category,
    pub sheet: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub title: String,
    pub base_url: String,
    pub spreadsheet_id: String,
    pub cache_ttl_secs: u64,
    pub timeout_secs: u64,
    pub page_size: PageSize,
    pub categories: Vec<CategorySource>,
    pub derived_totals: Vec<DerivedTotalSpec>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self::three_categories()
    }
}

impl DashboardConfig {
    /// Professor, supervisor and support sheets. The headline total covers
    /// professor + supervisor only, matching the published dashboard.
    pub fn three_categories() -> Self {
        Self {
            title: "Dashboard de Inscrições do Edital 027/2024".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            spreadsheet_id: DEFAULT_SPREADSHEET_ID.to_string(),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            page_size: PageSize::default(),
            categories: vec![
                CategorySource {
                    category: Category::Professor,
                    sheet: "dashprof".to_string(),
                },
                CategorySource {
                    category: Category::Supervisor,
                    sheet: "dashsup".to_string(),
                },
                CategorySource {
                    category: Category::Support,
                    sheet: "dashap".to_string(),
                },
            ],
            derived_totals: vec![DerivedTotalSpec::new(
                "Total de Inscritos",
                &[Category::Professor, Category::Supervisor],
            )],
        }
    }

    /// Professor and supervisor sheets only.
    pub fn two_categories() -> Self {
        let mut config = Self::three_categories();
        config
            .categories
            .retain(|c| c.category != Category::Support);
        config
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.spreadsheet_id.trim().is_empty() {
            return Err(ConfigError::Invalid("spreadsheet_id is empty".into()));
        }
        if self.categories.is_empty() {
            return Err(ConfigError::Invalid("no categories configured".into()));
        }
        if self.cache_ttl_secs == 0 {
            return Err(ConfigError::Invalid("cache_ttl_secs must be positive".into()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be positive".into()));
        }

        let mut seen = HashSet::new();
        for source in &self.categories {
            if !seen.insert(source.category) {
                return Err(ConfigError::Invalid(format!(
                    "category '{}' configured twice",
                    source.category
                )));
            }
            if source.sheet.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "category '{}' has no sheet",
                    source.category
                )));
            }
        }
        Ok(())
    }

    /// (category, descriptor) pairs in display order.
    pub fn sources(&self) -> Vec<(Category, SourceDescriptor)> {
        self.categories
            .iter()
            .map(|c| {
                (
                    c.category,
                    SourceDescriptor::new(self.spreadsheet_id.clone(), c.sheet.clone()),
                )
            })
            .collect()
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn presets_are_valid() {
        let three = DashboardConfig::three_categories();
        three.validate().unwrap();
        assert_eq!(three.sources().len(), 3);
        assert_eq!(three.sources()[2].1.sheet_name, "dashap");

        let two = DashboardConfig::two_categories();
        two.validate().unwrap();
        assert_eq!(
            two.sources().iter().map(|(c, _)| *c).collect::<Vec<_>>(),
            vec![Category::Professor, Category::Supervisor]
        );
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config = DashboardConfig::from_json_str(
            r#"{
                "spreadsheet_id": "sheet-xyz",
                "page_size": 50,
                "categories": [{ "category": "apoio", "sheet": "ap" }],
                "derived_totals": []
            }"#,
        )
        .unwrap();

        assert_eq!(config.cache_ttl(), Duration::from_secs(200));
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.page_size, PageSize::Fifty);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(
            config.sources(),
            vec![(Category::Support, SourceDescriptor::new("sheet-xyz", "ap"))]
        );
    }

    #[test]
    fn rejects_bad_page_size() {
        let err = DashboardConfig::from_json_str(r#"{ "page_size": 30 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_duplicate_categories() {
        let err = DashboardConfig::from_json_str(
            r#"{ "categories": [
                { "category": "professor", "sheet": "a" },
                { "category": "professor", "sheet": "b" }
            ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_zero_durations_and_empty_categories() {
        assert!(DashboardConfig::from_json_str(r#"{ "cache_ttl_secs": 0 }"#).is_err());
        assert!(DashboardConfig::from_json_str(r#"{ "categories": [] }"#).is_err());

        let err = DashboardConfig::from_json_str(r#"{ "timeout_secs": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref m) if m.contains("timeout_secs")));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "title": "Edital 2025" }}"#).unwrap();
        let config = DashboardConfig::load(file.path()).unwrap();
        assert_eq!(config.title, "Edital 2025");
        assert_eq!(config.categories.len(), 3);

        let missing = DashboardConfig::load("/nonexistent/dashboard.json").unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
    }
}
