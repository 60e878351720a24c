//! Configuration for the gbdate CLI
//!
//! Entrez connection settings. Resolution order: built-in defaults, then
//! environment (a `.env` file is loaded by `main`), then command-line flags.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

// ============================================================================
// Entrez Defaults
// ============================================================================

/// NCBI E-utilities base URL
pub const DEFAULT_EUTILS_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// Value of the `tool` parameter NCBI asks clients to send
pub const DEFAULT_TOOL: &str = "gbdate";

/// Accessions per efetch request
pub const DEFAULT_BATCH_SIZE: usize = 200;

pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Base delay between retries; attempt `n` waits `n` times this
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 1000;

/// NCBI allows 3 requests/s without an API key and 10 with one
const DELAY_WITHOUT_KEY: Duration = Duration::from_millis(334);
const DELAY_WITH_KEY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// E-utilities base URL (without `/efetch.fcgi`)
    pub eutils_url: String,

    /// NCBI API key
    #[serde(default)]
    pub api_key: Option<String>,

    /// Contact e-mail sent with each request
    #[serde(default)]
    pub email: Option<String>,

    pub tool: String,

    pub batch_size: usize,

    pub timeout_secs: u64,

    pub max_retries: u32,

    pub retry_backoff_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            eutils_url: DEFAULT_EUTILS_URL.to_string(),
            api_key: None,
            email: None,
            tool: DEFAULT_TOOL.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from environment variables
    ///
    /// - `GBDATE_EUTILS_URL`
    /// - `NCBI_API_KEY`
    /// - `NCBI_EMAIL`
    /// - `GBDATE_TOOL`
    /// - `GBDATE_BATCH_SIZE`
    /// - `GBDATE_TIMEOUT_SECS`
    /// - `GBDATE_MAX_RETRIES`
    /// - `GBDATE_RETRY_BACKOFF_MS`
    pub fn from_env() -> Result<Self> {
        let mut config = Self::new();

        if let Ok(url) = std::env::var("GBDATE_EUTILS_URL") {
            config.eutils_url = url;
        }

        config.api_key = non_empty_var("NCBI_API_KEY");
        config.email = non_empty_var("NCBI_EMAIL");

        if let Some(tool) = non_empty_var("GBDATE_TOOL") {
            config.tool = tool;
        }

        if let Some(size) = parse_var("GBDATE_BATCH_SIZE")? {
            config.batch_size = size;
        }

        if let Some(secs) = parse_var("GBDATE_TIMEOUT_SECS")? {
            config.timeout_secs = secs;
        }

        if let Some(retries) = parse_var("GBDATE_MAX_RETRIES")? {
            config.max_retries = retries;
        }

        if let Some(ms) = parse_var("GBDATE_RETRY_BACKOFF_MS")? {
            config.retry_backoff_ms = ms;
        }

        Ok(config)
    }

    pub fn with_eutils_url(mut self, url: impl Into<String>) -> Self {
        self.eutils_url = url.into();
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn with_retry_backoff_ms(mut self, ms: u64) -> Self {
        self.retry_backoff_ms = ms;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(CliError::config("batch size must be at least 1"));
        }
        if !self.eutils_url.starts_with("http://") && !self.eutils_url.starts_with("https://") {
            return Err(CliError::config(format!(
                "E-utilities URL '{}' must start with http:// or https://",
                self.eutils_url
            )));
        }
        Ok(())
    }

    /// Full efetch endpoint
    pub fn efetch_url(&self) -> String {
        format!("{}/efetch.fcgi", self.eutils_url.trim_end_matches('/'))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    /// Pause between consecutive batches to stay within NCBI rate limits
    pub fn request_delay(&self) -> Duration {
        if self.api_key.is_some() {
            DELAY_WITH_KEY
        } else {
            DELAY_WITHOUT_KEY
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: FromStr>(key: &str) -> Result<Option<T>> {
    match non_empty_var(key) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| CliError::config(format!("{key}='{value}' is not a valid number"))),
        None => Ok(None),
    }
}
