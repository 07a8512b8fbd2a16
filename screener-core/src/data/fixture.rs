//! In-memory provider for tests and offline demos.

use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::HashMap;

use super::provider::{DataError, MarketDataProvider};
use crate::domain::{Bar, CompanyProfile, PriceSeries, Recommendation, TickerSymbol};

#[derive(Debug, Clone, Default)]
struct FixtureEntry {
    bars: Vec<Bar>,
    profile: Option<CompanyProfile>,
    recommendations: Vec<Recommendation>,
}

/// Serves canned bars, profiles and recommendations per symbol.
///
/// Unknown symbols fail with `DataError::SymbolNotFound`, like the live
/// provider.
#[derive(Debug, Clone, Default)]
pub struct FixtureProvider {
    entries: HashMap<TickerSymbol, FixtureEntry>,
}

impl FixtureProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bars(mut self, symbol: &TickerSymbol, bars: Vec<Bar>) -> Self {
        self.entries.entry(symbol.clone()).or_default().bars = bars;
        self
    }

    pub fn with_profile(mut self, profile: CompanyProfile) -> Self {
        let key = profile.symbol.clone();
        self.entries.entry(key).or_default().profile = Some(profile);
        self
    }

    pub fn with_recommendations(mut self, symbol: &TickerSymbol, recs: Vec<Recommendation>) -> Self {
        self.entries.entry(symbol.clone()).or_default().recommendations = recs;
        self
    }

    fn entry(&self, symbol: &TickerSymbol) -> Result<&FixtureEntry, DataError> {
        self.entries.get(symbol).ok_or_else(|| DataError::SymbolNotFound {
            symbol: symbol.to_string(),
        })
    }
}

impl MarketDataProvider for FixtureProvider {
    fn name(&self) -> &str {
        "fixture"
    }

    fn history(
        &self,
        symbol: &TickerSymbol,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        let entry = self.entry(symbol)?;
        let series = PriceSeries::new(symbol.clone(), start, end, entry.bars.clone());
        if series.is_empty() {
            return Err(DataError::EmptyResult {
                symbol: symbol.to_string(),
                start,
                end,
            });
        }
        Ok(series)
    }

    fn profile(&self, symbol: &TickerSymbol) -> Result<CompanyProfile, DataError> {
        let entry = self.entry(symbol)?;
        Ok(entry.profile.clone().unwrap_or_else(|| CompanyProfile {
            symbol: symbol.clone(),
            long_name: symbol.to_string(),
            business_summary: None,
            website: None,
            sector: None,
            industry: None,
            logo_url: None,
        }))
    }

    fn recommendations(&self, symbol: &TickerSymbol) -> Result<Vec<Recommendation>, DataError> {
        Ok(self.entry(symbol)?.recommendations.clone())
    }
}

/// Weekday bars from `start` (inclusive) to `end` (exclusive) with closes
/// produced by `close_at(i)` for the i-th trading day.
pub fn weekday_bars(start: NaiveDate, end: NaiveDate, close_at: impl Fn(usize) -> f64) -> Vec<Bar> {
    start
        .iter_days()
        .take_while(|d| *d < end)
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .enumerate()
        .map(|(i, date)| {
            let close = close_at(i);
            Bar {
                date,
                open: close,
                high: close * 1.01,
                low: close * 0.99,
                close,
                volume: 1_000_000,
                adj_close: close,
            }
        })
        .collect()
}
