//! Serializable screener configuration.
//!
//! Loaded from TOML. Every section has defaults, so a partial file (or no
//! file at all) is valid.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::TickerSymbol;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("write config {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenerConfig {
    pub sources: SourceSettings,
    pub provider: ProviderSettings,
    pub query: QuerySettings,
}

/// Reference pages listing index constituents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    pub sp500_url: String,
    pub djia_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            sp500_url: "https://en.wikipedia.org/wiki/List_of_S%26P_500_companies".into(),
            djia_url: "https://en.wikipedia.org/wiki/Dow_Jones_Industrial_Average".into(),
            user_agent: concat!("screener/", env!("CARGO_PKG_VERSION")).into(),
            timeout_secs: 30,
        }
    }
}

/// Market-data provider endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Scheme and host of the chart, crumb and quoteSummary APIs.
    pub base_url: String,
    /// Page visited once to receive the session cookie the crumb is tied to.
    pub cookie_url: String,
    pub logo_base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: "https://query2.finance.yahoo.com".into(),
            cookie_url: "https://fc.yahoo.com".into(),
            logo_base_url: "https://logo.clearbit.com".into(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".into(),
            timeout_secs: 30,
        }
    }
}

/// Per-query defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuerySettings {
    /// Benchmark the CAPM regression runs against.
    pub benchmark: String,
    pub recommendation_limit: usize,
    pub default_start: NaiveDate,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            benchmark: "SPY".into(),
            recommendation_limit: 10,
            default_start: NaiveDate::from_ymd_opt(2019, 1, 1).unwrap_or_default(),
        }
    }
}

impl QuerySettings {
    pub fn benchmark_symbol(&self) -> Result<TickerSymbol, ConfigError> {
        TickerSymbol::new(&self.benchmark)
            .ok_or_else(|| ConfigError::Invalid("query.benchmark is empty".into()))
    }
}

impl ScreenerConfig {
    /// `<config_dir>/screener/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("screener").join("config.toml"))
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Load an explicit file, else the default location if it exists, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => {
                tracing::debug!(path = %path.display(), "loading config");
                Self::from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Write the config as TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(path, self.to_toml()?).map_err(write_err)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.query.benchmark_symbol()?;
        if self.provider.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("provider.base_url is empty".into()));
        }
        if self.provider.timeout_secs == 0 || self.sources.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ScreenerConfig::default();
        config.validate().unwrap();
        assert_eq!(config.query.benchmark, "SPY");
        assert_eq!(config.query.recommendation_limit, 10);
        assert_eq!(
            config.query.default_start,
            NaiveDate::from_ymd_opt(2019, 1, 1).unwrap()
        );
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config = ScreenerConfig::from_toml(
            r#"
            [query]
            benchmark = "DIA"
            "#,
        )
        .unwrap();
        assert_eq!(config.query.benchmark, "DIA");
        assert_eq!(config.query.recommendation_limit, 10);
        assert_eq!(config.provider, ProviderSettings::default());
    }

    #[test]
    fn toml_roundtrip() {
        let config = ScreenerConfig::default();
        let text = config.to_toml().unwrap();
        assert_eq!(ScreenerConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn empty_benchmark_rejected() {
        let err = ScreenerConfig::from_toml("[query]\nbenchmark = \" \"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = ScreenerConfig::default();
        config.query.recommendation_limit = 5;
        config.save(&path).unwrap();
        let loaded = ScreenerConfig::load(Some(&path)).unwrap();
        assert_eq!(loaded.query.recommendation_limit, 5);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = ScreenerConfig::load(Some(Path::new("/nonexistent/screener.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
