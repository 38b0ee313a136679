//! Summary document sources.
//!
//! The dashboard reads the document over HTTP from a path relative to a base
//! URL, or straight from a local file. HTTP requests carry a cache-busting
//! query parameter so intermediate caches never serve a stale document.

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::types::SummaryDocument;
use reqwest::{Client, Url};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

/// Query parameter appended to every HTTP request.
pub const CACHE_BUST_PARAM: &str = "_ts";

/// Where summary documents come from.
#[derive(Debug, Clone)]
pub enum SummarySource {
    Http { client: Client, url: Url },
    File(PathBuf),
}

impl SummarySource {
    /// HTTP source with a request timeout.
    pub fn http(url: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self::Http { client, url })
    }

    /// Local file source.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    /// Source selected by configuration; a configured file wins over HTTP.
    pub fn from_config(config: &Config) -> Result<Self> {
        match &config.summary_file {
            Some(path) => Ok(Self::file(path.clone())),
            None => Self::http(config.summary_url()?, config.http_timeout()),
        }
    }

    /// Human-readable location.
    pub fn describe(&self) -> String {
        match self {
            Self::Http { url, .. } => url.to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }

    /// Fetch and parse the document.
    pub async fn fetch(&self) -> Result<SummaryDocument> {
        match self {
            Self::Http { client, url } => {
                let url = cache_busted(url, chrono::Utc::now().timestamp_millis());
                debug!("Fetching summary: {}", url);

                let response = client.get(url).send().await?;
                if !response.status().is_success() {
                    let status = response.status();
                    let text = response.text().await.unwrap_or_default();
                    let snippet: String = text.chars().take(200).collect();
                    warn!("Summary fetch failed: {} - {}", status, snippet);
                    return Err(AppError::Status {
                        status: status.as_u16(),
                        body: snippet,
                    });
                }

                let body = response.text().await?;
                Ok(SummaryDocument::from_json_str(&body)?)
            }
            Self::File(path) => {
                debug!("Reading summary: {}", path.display());
                let body = tokio::fs::read_to_string(path).await?;
                Ok(SummaryDocument::from_json_str(&body)?)
            }
        }
    }
}

/// Copy of `url` with the cache-busting parameter set to `now_ms`.
///
/// Any existing cache-busting parameter is replaced; other query pairs are kept.
pub fn cache_busted(url: &Url, now_ms: i64) -> Url {
    let mut busted = url.clone();
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != CACHE_BUST_PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    {
        let mut pairs = busted.query_pairs_mut();
        pairs.clear();
        for (k, v) in &kept {
            pairs.append_pair(k, v);
        }
        pairs.append_pair(CACHE_BUST_PARAM, &now_ms.to_string());
    }
    busted
}
