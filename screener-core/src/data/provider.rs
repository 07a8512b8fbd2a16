//! Market-data provider trait and structured error types.
//!
//! The MarketDataProvider trait abstracts over data sources (Yahoo Finance,
//! in-memory fixtures) so the query pipeline can be exercised without a
//! network.

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{CompanyProfile, PriceSeries, Recommendation, TickerSymbol};

/// Structured error types for data operations.
///
/// These are designed to be displayable in both CLI and TUI contexts.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network error: {0}")]
    Network(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("no data for {symbol} between {start} and {end}")]
    EmptyResult {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("HTTP {status} for {symbol}")]
    Http { status: u16, symbol: String },
}

impl DataError {
    /// Short category tag for error history displays.
    pub fn category(&self) -> &'static str {
        match self {
            DataError::Network(_) => "network",
            DataError::Http { .. } | DataError::AuthenticationRequired(_) => "network",
            _ => "data",
        }
    }
}

/// Trait for market-data providers.
///
/// Implementations fetch on every call; nothing is cached.
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Daily OHLCV bars for `symbol` with `start <= date < end`.
    fn history(
        &self,
        symbol: &TickerSymbol,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError>;

    /// Display name, business summary, website and logo.
    fn profile(&self, symbol: &TickerSymbol) -> Result<CompanyProfile, DataError>;

    /// Analyst upgrade/downgrade history, in provider order.
    fn recommendations(&self, symbol: &TickerSymbol) -> Result<Vec<Recommendation>, DataError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_symbol() {
        let err = DataError::EmptyResult {
            symbol: "AAPL".into(),
            start: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2020, 1, 2).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "no data for AAPL between 2020-01-01 and 2020-01-02"
        );
        assert_eq!(err.category(), "data");
    }

    #[test]
    fn network_errors_categorised() {
        assert_eq!(DataError::Network("timeout".into()).category(), "network");
        assert_eq!(
            DataError::Http {
                status: 502,
                symbol: "X".into()
            }
            .category(),
            "network"
        );
    }
}
