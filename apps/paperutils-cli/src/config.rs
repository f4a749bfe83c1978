//! Optional TOML configuration
//!
//! ```toml
//! [arxiv]
//! api_url = "http://export.arxiv.org/api/query"
//! timeout_secs = 30
//!
//! [report]
//! check_arxiv = true
//! ```

use anyhow::Context;
use arxiv_client::ArxivConfig;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "paperutils.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub arxiv: ArxivConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Resolve arXiv-named files through the metadata service
    pub check_arxiv: bool,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Parse configuration from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("Failed to parse TOML configuration")
    }

    /// `explicit` if given, else `paperutils.toml` under `dir` if present,
    /// else defaults.
    pub fn load_in(explicit: Option<&Path>, dir: &Path) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        let fallback = dir.join(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            tracing::debug!("Using config file {}", fallback.display());
            return Self::from_file(fallback);
        }
        Ok(Self::default())
    }

    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        Self::load_in(explicit, Path::new("."))
    }
}
