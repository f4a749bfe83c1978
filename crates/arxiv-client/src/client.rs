//! Blocking client for the arXiv query API

use std::time::Duration;

use paper_core::{IdentifierTitleSource, Result, TitleRecord};
use reqwest::blocking::Client as HttpClient;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::ArxivError;
use crate::feed::{parse_feed, FeedEntry};

pub const DEFAULT_API_URL: &str = "http://export.arxiv.org/api/query";

/// Connection settings, usually the `[arxiv]` table of the config file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ArxivConfig {
    pub api_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ArxivConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 30,
            user_agent: format!("paperutils/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

pub struct ArxivClient {
    http: HttpClient,
    config: ArxivConfig,
}

impl ArxivClient {
    pub fn new(config: ArxivConfig) -> std::result::Result<Self, ArxivError> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { http, config })
    }

    /// Fetch the feed entries for `identifiers` in a single request.
    pub fn fetch(&self, identifiers: &[String]) -> std::result::Result<Vec<FeedEntry>, ArxivError> {
        if identifiers.is_empty() {
            return Ok(Vec::new());
        }

        info!("Querying arXiv for {} identifiers", identifiers.len());
        let response = self
            .http
            .get(&self.config.api_url)
            .query(&[
                ("id_list", identifiers.join(",")),
                ("max_results", identifiers.len().to_string()),
            ])
            .send()?
            .error_for_status()?;
        let body = response.text()?;

        let entries = parse_feed(&body)?;
        debug!(
            requested = identifiers.len(),
            returned = entries.len(),
            "arXiv response parsed"
        );
        Ok(entries)
    }
}

impl IdentifierTitleSource for ArxivClient {
    fn lookup_titles(&self, identifiers: &[String]) -> Result<Vec<TitleRecord>> {
        let entries = self.fetch(identifiers)?;
        Ok(entries
            .into_iter()
            .map(|entry| TitleRecord {
                identifier: entry.identifier,
                title: entry.title,
            })
            .collect())
    }
}
