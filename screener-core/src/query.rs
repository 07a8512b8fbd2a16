//! The query pipeline: one submitted form in, one dashboard out.
//!
//! Each call fetches everything fresh. Nothing from a previous query is
//! reused, so a dashboard always reflects a single request.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ConfigError, QuerySettings};
use crate::data::{DataError, MarketDataProvider};
use crate::domain::{latest_rows, CompanyProfile, PriceSeries, RecommendationRow, TickerSymbol};
use crate::stats::{estimate_capm, price_trend, CapmEstimate, LinearFit, StatsError};

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("start date {start} must be before end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Stats(#[from] StatsError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl QueryError {
    /// Short category tag for error history displays.
    pub fn category(&self) -> &'static str {
        match self {
            QueryError::InvalidRange { .. } => "input",
            QueryError::Data(e) => e.category(),
            QueryError::Stats(_) => "stats",
            QueryError::Config(_) => "config",
        }
    }
}

/// A submitted form: which symbol, over which half-open date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub symbol: TickerSymbol,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl QueryRequest {
    pub fn new(symbol: TickerSymbol, start: NaiveDate, end: NaiveDate) -> Self {
        Self { symbol, start, end }
    }

    pub fn validate(&self) -> Result<(), QueryError> {
        if self.start >= self.end {
            return Err(QueryError::InvalidRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

/// Everything rendered for one query, in display order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub request: QueryRequest,
    pub benchmark: TickerSymbol,
    pub profile: CompanyProfile,
    pub prices: PriceSeries,
    /// Close regressed on days since the first bar.
    pub price_trend: LinearFit,
    pub capm: CapmEstimate,
    pub recommendations: Vec<RecommendationRow>,
}

/// Fetch, compute and assemble a dashboard.
pub fn run_query(
    provider: &dyn MarketDataProvider,
    settings: &QuerySettings,
    request: &QueryRequest,
) -> Result<Dashboard, QueryError> {
    request.validate()?;
    let benchmark = settings.benchmark_symbol()?;
    let QueryRequest { symbol, start, end } = request;

    tracing::info!(
        %symbol,
        %start,
        %end,
        provider = provider.name(),
        "running query"
    );

    let prices = provider.history(symbol, *start, *end)?;
    tracing::info!(%symbol, rows = prices.len(), "fetched price history");

    let profile = provider.profile(symbol)?;

    let bench_prices = provider.history(&benchmark, *start, *end)?;
    tracing::info!(%benchmark, rows = bench_prices.len(), "fetched benchmark history");

    // Benchmark on adjusted closes, stock on raw closes.
    let capm = estimate_capm(&bench_prices.adjusted_returns(), &prices.returns())?;
    let price_trend = price_trend(&prices)?;

    let recs = provider.recommendations(symbol)?;
    let recommendations = latest_rows(&recs, settings.recommendation_limit);
    if recommendations.len() < recs.len().min(settings.recommendation_limit) {
        tracing::warn!(%symbol, "incomplete recommendation rows dropped");
    }

    tracing::info!(
        %symbol,
        beta = capm.stats.beta,
        intercept = capm.stats.intercept,
        recommendations = recommendations.len(),
        "query complete"
    );

    Ok(Dashboard {
        request: request.clone(),
        benchmark,
        profile,
        prices,
        price_trend,
        capm,
        recommendations,
    })
}
