//! Remote Source Module
//! Spreadsheet sheet descriptors and the HTTP transport that fetches their CSV export.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::form_urlencoded;

/// Base URL of published spreadsheets.
pub const DEFAULT_BASE_URL: &str = "https://docs.google.com/spreadsheets/d";

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },
    #[error("Malformed CSV payload: {0}")]
    Csv(String),
}

/// Identifies one sheet (tab) of one spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub spreadsheet_id: String,
    pub sheet_name: String,
}

impl SourceDescriptor {
    pub fn new(spreadsheet_id: impl Into<String>, sheet_name: impl Into<String>) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            sheet_name: sheet_name.into(),
        }
    }

    /// CSV export URL: `{base}/{id}/gviz/tq?tqx=out:csv&sheet={sheet}`.
    pub fn export_url(&self, base: &str) -> String {
        let sheet: String = form_urlencoded::byte_serialize(self.sheet_name.as_bytes()).collect();
        format!(
            "{}/{}/gviz/tq?tqx=out:csv&sheet={}",
            base.trim_end_matches('/'),
            self.spreadsheet_id,
            sheet
        )
    }
}

/// Fetches the raw body behind a URL.
pub trait Transport {
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Blocking reqwest client with a request timeout.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("enrollment_dashboard/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        debug!(url, "GET");
        let resp = self.client.get(url).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(resp.bytes()?.to_vec())
    }
}
