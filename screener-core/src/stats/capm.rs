//! CAPM beta and intercept against a benchmark.
//!
//! Stock returns are regressed on benchmark returns over the dates both
//! series share. The slope is beta; the intercept is the average excess
//! daily return not explained by the benchmark.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::regression::fit_line;
use super::StatsError;
use crate::domain::ReturnSeries;

/// Paired benchmark/stock return on one date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapmSample {
    pub date: NaiveDate,
    pub benchmark: f64,
    pub stock: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapmStats {
    pub beta: f64,
    pub intercept: f64,
    pub observations: usize,
}

/// Fitted statistics plus the samples behind them (for the scatter plot).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapmEstimate {
    pub stats: CapmStats,
    pub samples: Vec<CapmSample>,
}

/// Inner-join two return series on date, keeping only finite pairs.
///
/// Output follows the stock series' date order.
pub fn align_returns(benchmark: &ReturnSeries, stock: &ReturnSeries) -> Vec<CapmSample> {
    let bench_by_date: HashMap<NaiveDate, f64> =
        benchmark.points.iter().map(|p| (p.date, p.value)).collect();

    stock
        .points
        .iter()
        .filter_map(|p| {
            let b = *bench_by_date.get(&p.date)?;
            (b.is_finite() && p.value.is_finite()).then_some(CapmSample {
                date: p.date,
                benchmark: b,
                stock: p.value,
            })
        })
        .collect()
}

/// Fit beta and intercept from already-aligned samples.
pub fn fit_capm(samples: &[CapmSample]) -> Result<CapmStats, StatsError> {
    let (xs, ys): (Vec<f64>, Vec<f64>) = samples.iter().map(|s| (s.benchmark, s.stock)).unzip();
    let fit = fit_line(&xs, &ys)?;
    Ok(CapmStats {
        beta: fit.slope,
        intercept: fit.intercept,
        observations: fit.observations,
    })
}

/// Align, then fit.
pub fn estimate_capm(
    benchmark: &ReturnSeries,
    stock: &ReturnSeries,
) -> Result<CapmEstimate, StatsError> {
    let samples = align_returns(benchmark, stock);
    let stats = fit_capm(&samples)?;
    tracing::debug!(
        benchmark = %benchmark.symbol,
        stock = %stock.symbol,
        beta = stats.beta,
        observations = stats.observations,
        "fitted CAPM"
    );
    Ok(CapmEstimate { stats, samples })
}
