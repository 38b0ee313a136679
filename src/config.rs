use crate::error::{AppError, Result};
use crate::services::units::CashUnit;
use reqwest::Url;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Shortest allowed polling interval in seconds.
pub const MIN_POLL_INTERVAL_SECS: u64 = 5;
/// Longest allowed polling interval in seconds.
pub const MAX_POLL_INTERVAL_SECS: u64 = 60;

/// Default deposit total used when `TOTAL_DEPOSITS` is missing or invalid.
pub const DEFAULT_TOTAL_DEPOSITS: f64 = 40.0;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL the summary path is resolved against.
    pub base_url: String,
    /// Path of the summary document, relative to `base_url`.
    pub summary_path: String,
    /// Read the summary from a local file instead of HTTP.
    pub summary_file: Option<PathBuf>,
    /// Seconds between scheduled fetches.
    pub poll_interval_secs: u64,
    /// HTTP request timeout in seconds.
    pub http_timeout_secs: u64,
    /// Unit of settlement cash changes.
    pub cash_unit: CashUnit,
    /// Total deposited into the account, for net profit.
    pub total_deposits: f64,
    /// Lookback window for the generator, in days.
    pub lookback_days: u32,
    /// Where the generator writes the summary document.
    pub output_path: PathBuf,
    /// Lines kept by the in-memory log buffer in TUI mode.
    pub log_buffer_lines: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let poll_interval_secs = lookup("POLL_INTERVAL_SECS")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(30);

        Self {
            base_url: lookup("DASHBOARD_BASE_URL")
                .unwrap_or_else(|| "http://127.0.0.1:8000/".to_string()),
            summary_path: lookup("SUMMARY_PATH")
                .unwrap_or_else(|| "data/kalshi_summary.json".to_string()),
            summary_file: lookup("SUMMARY_FILE")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            poll_interval_secs: clamp_poll_interval(poll_interval_secs),
            http_timeout_secs: lookup("HTTP_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(10),
            cash_unit: lookup("CASH_UNIT")
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            total_deposits: lookup("TOTAL_DEPOSITS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_TOTAL_DEPOSITS),
            lookback_days: lookup("LOOKBACK_DAYS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(365),
            output_path: lookup("SUMMARY_OUTPUT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/kalshi_summary.json")),
            log_buffer_lines: lookup("LOG_BUFFER_LINES")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(500),
        }
    }

    /// Polling interval as a duration.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// HTTP timeout as a duration.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Resolve the summary path against the base URL.
    pub fn summary_url(&self) -> Result<Url> {
        let base = Url::parse(&self.base_url)
            .map_err(|e| AppError::Url(format!("{}: {}", self.base_url, e)))?;
        base.join(&self.summary_path)
            .map_err(|e| AppError::Url(format!("{}: {}", self.summary_path, e)))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// Clamp a polling interval into the supported range.
pub fn clamp_poll_interval(secs: u64) -> u64 {
    secs.clamp(MIN_POLL_INTERVAL_SECS, MAX_POLL_INTERVAL_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_config_default_values() {
        let config = Config::default();

        assert_eq!(config.base_url, "http://127.0.0.1:8000/");
        assert_eq!(config.summary_path, "data/kalshi_summary.json");
        assert!(config.summary_file.is_none());
        assert_eq!(config.poll_interval_secs, 30);
        assert_eq!(config.cash_unit, CashUnit::Dollars);
        assert_eq!(config.total_deposits, 40.0);
        assert_eq!(config.lookback_days, 365);
    }

    #[test]
    fn test_config_poll_interval_clamped() {
        assert_eq!(config_from(&[("POLL_INTERVAL_SECS", "1")]).poll_interval_secs, 5);
        assert_eq!(config_from(&[("POLL_INTERVAL_SECS", "600")]).poll_interval_secs, 60);
        assert_eq!(config_from(&[("POLL_INTERVAL_SECS", "15")]).poll_interval(), Duration::from_secs(15));
    }

    #[test]
    fn test_config_invalid_deposits_fall_back() {
        let config = config_from(&[("TOTAL_DEPOSITS", "lots")]);
        assert_eq!(config.total_deposits, DEFAULT_TOTAL_DEPOSITS);

        let config = config_from(&[("TOTAL_DEPOSITS", "125.5")]);
        assert_eq!(config.total_deposits, 125.5);
    }

    #[test]
    fn test_config_cash_unit() {
        assert_eq!(config_from(&[("CASH_UNIT", "cents")]).cash_unit, CashUnit::Cents);
        assert_eq!(config_from(&[("CASH_UNIT", "AUTO")]).cash_unit, CashUnit::Auto);
        assert_eq!(config_from(&[("CASH_UNIT", "yen")]).cash_unit, CashUnit::Dollars);
    }

    #[test]
    fn test_summary_url_joins_relative_path() {
        let config = config_from(&[
            ("DASHBOARD_BASE_URL", "https://example.com/dash/"),
            ("SUMMARY_PATH", "data/summary.json"),
        ]);
        let url = config.summary_url().unwrap();
        assert_eq!(url.as_str(), "https://example.com/dash/data/summary.json");
    }

    #[test]
    fn test_summary_url_invalid_base() {
        let config = config_from(&[("DASHBOARD_BASE_URL", "not a url")]);
        assert!(matches!(config.summary_url(), Err(AppError::Url(_))));
    }

    #[test]
    fn test_empty_summary_file_ignored() {
        let config = config_from(&[("SUMMARY_FILE", "  ")]);
        assert!(config.summary_file.is_none());
    }
}
