//! Single-variable ordinary least squares.

use serde::{Deserialize, Serialize};

use super::StatsError;
use crate::domain::PriceSeries;

/// A fitted line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Number of (x, y) pairs the fit used.
    pub observations: usize,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fit `ys` on `xs` by ordinary least squares.
///
/// `slope = cov(x, y) / var(x)`, `intercept = mean(y) - slope * mean(x)`.
/// Pairs where either value is non-finite are dropped first.
pub fn fit_line(xs: &[f64], ys: &[f64]) -> Result<LinearFit, StatsError> {
    if xs.len() != ys.len() {
        return Err(StatsError::LengthMismatch {
            x: xs.len(),
            y: ys.len(),
        });
    }

    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|(&x, &y)| (x, y))
        .collect();

    let n = pairs.len();
    if n < 2 {
        return Err(StatsError::InsufficientSample {
            required: 2,
            actual: n,
        });
    }

    let nf = n as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / nf;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / nf;

    let (sxy, sxx) = pairs.iter().fold((0.0, 0.0), |(sxy, sxx), (x, y)| {
        let dx = x - mean_x;
        (sxy + dx * (y - mean_y), sxx + dx * dx)
    });

    // Spread that is rounding noise relative to the magnitude of x is flat.
    let sum_sq: f64 = pairs.iter().map(|(x, _)| x * x).sum();
    if sxx <= f64::EPSILON * sum_sq {
        return Err(StatsError::ZeroVariance);
    }

    let slope = sxy / sxx;
    Ok(LinearFit {
        slope,
        intercept: mean_y - slope * mean_x,
        observations: n,
    })
}

/// Linear trend of the close against calendar days since the first bar.
pub fn price_trend(series: &PriceSeries) -> Result<LinearFit, StatsError> {
    let Some(origin) = series.first_date() else {
        return Err(StatsError::InsufficientSample {
            required: 2,
            actual: 0,
        });
    };
    let (xs, ys): (Vec<f64>, Vec<f64>) = series
        .bars()
        .iter()
        .map(|b| ((b.date - origin).num_days() as f64, b.close))
        .unzip();
    fit_line(&xs, &ys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixture::weekday_bars;
    use crate::domain::TickerSymbol;
    use chrono::NaiveDate;

    #[test]
    fn exact_line_recovered() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys: Vec<f64> = xs.iter().map(|x| 3.0 * x - 1.0).collect();
        let fit = fit_line(&xs, &ys).unwrap();
        assert!((fit.slope - 3.0).abs() < 1e-12);
        assert!((fit.intercept + 1.0).abs() < 1e-12);
        assert_eq!(fit.observations, 4);
        assert!((fit.predict(10.0) - 29.0).abs() < 1e-9);
    }

    #[test]
    fn non_finite_pairs_dropped() {
        let xs = [1.0, f64::NAN, 2.0, 3.0];
        let ys = [2.0, 5.0, f64::INFINITY, 6.0];
        let fit = fit_line(&xs, &ys).unwrap();
        assert_eq!(fit.observations, 2);
        assert!((fit.slope - 2.0).abs() < 1e-12);
    }

    #[test]
    fn single_pair_is_insufficient() {
        let err = fit_line(&[0.5], &[1.0]).unwrap_err();
        assert!(matches!(
            err,
            StatsError::InsufficientSample {
                required: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn flat_x_is_zero_variance() {
        let err = fit_line(&[0.01, 0.01, 0.01], &[0.1, 0.2, 0.3]).unwrap_err();
        assert!(matches!(err, StatsError::ZeroVariance));
    }

    #[test]
    fn tiny_but_varying_x_is_fitted() {
        let xs = [1e-8, -2e-8, 3e-8, -1e-8, 2e-8];
        let ys: Vec<f64> = xs.iter().map(|x| 1.2 * x).collect();
        let fit = fit_line(&xs, &ys).unwrap();
        assert!((fit.slope - 1.2).abs() < 1e-9);
    }

    #[test]
    fn all_zero_x_is_zero_variance() {
        let err = fit_line(&[0.0, 0.0, 0.0], &[0.1, 0.2, 0.3]).unwrap_err();
        assert!(matches!(err, StatsError::ZeroVariance));
    }

    #[test]
    fn mismatched_lengths_rejected() {
        let err = fit_line(&[1.0, 2.0], &[1.0]).unwrap_err();
        assert!(matches!(err, StatsError::LengthMismatch { x: 2, y: 1 }));
    }

    #[test]
    fn trend_of_linear_prices() {
        let start = NaiveDate::from_ymd_opt(2020, 1, 6).unwrap();
        let end = NaiveDate::from_ymd_opt(2020, 1, 11).unwrap();
        // Mon..Fri consecutive days: close rises 2.0 per calendar day.
        let bars = weekday_bars(start, end, |i| 50.0 + 2.0 * i as f64);
        let series = PriceSeries::new(TickerSymbol::new("T").unwrap(), start, end, bars);
        let fit = price_trend(&series).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-9);
        assert!((fit.intercept - 50.0).abs() < 1e-9);
    }
}
