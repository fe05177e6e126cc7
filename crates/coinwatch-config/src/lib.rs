//! Configuration management for coinwatch.
//!
//! Loads configuration from TOML files with serde defaults for every section,
//! so a partial file only overrides what it mentions.

use coinwatch_core::Interval;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub analysis: AnalysisConfig,
    pub discovery: DiscoveryConfig,
    pub forecast: ForecastConfig,
    pub limits: LimitsConfig,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from default locations.
    ///
    /// Searches in order:
    /// 1. `./coinwatch.toml`
    /// 2. `~/.config/coinwatch/coinwatch.toml`
    ///
    /// Returns default config if no file found.
    pub fn load_default() -> Self {
        if let Ok(config) = Self::load("coinwatch.toml") {
            return config;
        }

        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("coinwatch").join("coinwatch.toml");
            if let Ok(config) = Self::load(&config_path) {
                return config;
            }
        }

        Self::default()
    }

    /// Save configuration to a file path.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the default config file path.
    pub fn default_path() -> PathBuf {
        PathBuf::from("coinwatch.toml")
    }
}

/// Provider endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Primary (kline) provider base URL.
    pub primary_url: String,
    /// Secondary (market-chart) provider base URL.
    pub secondary_url: String,
    /// Quote currency suffix appended to symbols for the primary provider.
    pub quote_suffix: String,
    /// Quote currency for the secondary provider.
    pub vs_currency: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// User agent string.
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            primary_url: "https://api.binance.com".to_string(),
            secondary_url: "https://api.coingecko.com".to_string(),
            quote_suffix: "USDT".to_string(),
            vs_currency: "usd".to_string(),
            timeout_secs: 30,
            user_agent: format!("coinwatch/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Multi-timeframe analysis configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Intervals analyzed for each symbol, in report order.
    pub intervals: Vec<Interval>,
    /// Number of bars fetched per interval.
    pub bars: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            intervals: vec![Interval::H1, Interval::H4, Interval::D1],
            bars: 200,
        }
    }
}

/// Batch discovery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Candidate universe scanned by the preliminary pass.
    pub universe: Vec<String>,
    /// Interval used for the preliminary pass.
    pub interval: Interval,
    /// MACD divergence considered significant in the preliminary pass.
    pub macd_divergence: f64,
    /// Minimum preliminary score for a symbol to be retained.
    pub score_cutoff: i32,
    /// Maximum number of retained symbols given the full analysis.
    pub top_n: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            universe: [
                "BTC", "ETH", "ADA", "SOL", "XRP", "BNB", "DOT", "DOGE", "MATIC", "LINK",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            interval: Interval::H4,
            macd_divergence: 1.0,
            score_cutoff: 4,
            top_n: 25,
        }
    }
}

/// Price forecast configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Number of periods forecast ahead.
    pub horizon: usize,
    /// Minimum observations required before fitting.
    pub min_observations: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon: 5,
            min_observations: 30,
        }
    }
}

/// Request throttling configuration, per provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Max primary-provider requests per window.
    pub primary_requests: u32,
    /// Primary window length in seconds.
    pub primary_window_secs: u64,
    /// Max secondary-provider requests per window.
    pub secondary_requests: u32,
    /// Secondary window length in seconds.
    pub secondary_window_secs: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            // Stay well inside the primary provider's public weight budget.
            primary_requests: 1100,
            primary_window_secs: 60,
            // The free market-chart tier is far stricter.
            secondary_requests: 10,
            secondary_window_secs: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.quote_suffix, "USDT");
        assert_eq!(
            config.analysis.intervals,
            vec![Interval::H1, Interval::H4, Interval::D1]
        );
        assert_eq!(config.discovery.score_cutoff, 4);
        assert_eq!(config.forecast.horizon, 5);
    }

    #[test]
    fn test_parse_partial_toml() {
        let toml = r#"
[analysis]
intervals = ["4h", "1d"]
bars = 500

[discovery]
universe = ["BTC", "ETH"]
top_n = 5
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.analysis.intervals, vec![Interval::H4, Interval::D1]);
        assert_eq!(config.analysis.bars, 500);
        assert_eq!(config.discovery.universe, vec!["BTC", "ETH"]);
        assert_eq!(config.discovery.top_n, 5);
        // Untouched sections keep their defaults.
        assert_eq!(config.forecast.min_observations, 30);
        assert_eq!(config.api.vs_currency, "usd");
    }

    #[test]
    fn test_round_trip() {
        let config = Config::default();
        let encoded = toml::to_string_pretty(&config).unwrap();
        let decoded: Config = toml::from_str(&encoded).unwrap();
        assert_eq!(decoded.analysis.bars, config.analysis.bars);
        assert_eq!(decoded.discovery.universe, config.discovery.universe);
    }
}
