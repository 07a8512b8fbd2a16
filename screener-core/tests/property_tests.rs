//! Property tests for the return and regression kernels.
//!
//! Uses proptest to verify:
//! 1. Constant prices produce all-zero returns
//! 2. Returns are one shorter than prices
//! 3. OLS recovers an exact line y = a*x + b
//! 4. Scaling stock returns scales beta

use chrono::NaiveDate;
use proptest::prelude::*;
use screener_core::domain::{Bar, PriceSeries, ReturnPoint, ReturnSeries, TickerSymbol};
use screener_core::stats::{estimate_capm, fit_line, pct_change};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_price() -> impl Strategy<Value = f64> {
    (1.0..1000.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

fn arb_return() -> impl Strategy<Value = f64> {
    -0.1..0.1_f64
}

fn series_from_closes(closes: &[f64]) -> PriceSeries {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            date: start + chrono::Days::new(i as u64),
            open: close,
            high: close,
            low: close,
            close,
            volume: 100,
            adj_close: close,
        })
        .collect();
    PriceSeries::new(
        TickerSymbol::new("PROP").unwrap(),
        start,
        start + chrono::Days::new(closes.len() as u64),
        bars,
    )
}

fn return_series(name: &str, values: &[f64]) -> ReturnSeries {
    let start = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
    ReturnSeries {
        symbol: TickerSymbol::new(name).unwrap(),
        points: values
            .iter()
            .enumerate()
            .map(|(i, &value)| ReturnPoint {
                date: start + chrono::Days::new(i as u64),
                value,
            })
            .collect(),
    }
}

// ── 1. Constant prices ───────────────────────────────────────────────

proptest! {
    #[test]
    fn constant_prices_have_zero_returns(price in arb_price(), n in 2usize..60) {
        let series = series_from_closes(&vec![price; n]);
        let returns = series.returns();
        prop_assert!(returns.values().all(|r| r == 0.0));
    }
}

// ── 2. Length ────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn returns_one_shorter_than_prices(closes in prop::collection::vec(arb_price(), 1..80)) {
        let series = series_from_closes(&closes);
        prop_assert_eq!(series.returns().len(), series.len() - 1);
        prop_assert_eq!(pct_change(&closes).len(), closes.len() - 1);
    }
}

// ── 3. Exact line recovery ───────────────────────────────────────────

proptest! {
    #[test]
    fn ols_recovers_exact_line(
        a in -5.0..5.0_f64,
        b in -1.0..1.0_f64,
        xs in prop::collection::vec(arb_return(), 3..60),
    ) {
        let spread = xs.iter().cloned().fold(f64::MIN, f64::max)
            - xs.iter().cloned().fold(f64::MAX, f64::min);
        prop_assume!(spread > 1e-3);

        let ys: Vec<f64> = xs.iter().map(|x| a * x + b).collect();
        let fit = fit_line(&xs, &ys).unwrap();
        prop_assert!((fit.slope - a).abs() < 1e-6);
        prop_assert!((fit.intercept - b).abs() < 1e-6);
    }
}

// ── 4. Beta scaling ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn scaling_stock_returns_scales_beta(
        k in 0.5..3.0_f64,
        bench in prop::collection::vec(arb_return(), 5..40),
        noise in prop::collection::vec(-0.01..0.01_f64, 40),
    ) {
        let spread = bench.iter().cloned().fold(f64::MIN, f64::max)
            - bench.iter().cloned().fold(f64::MAX, f64::min);
        prop_assume!(spread > 1e-3);

        let stock: Vec<f64> = bench.iter().zip(&noise).map(|(b, n)| b + n).collect();
        let scaled: Vec<f64> = stock.iter().map(|s| k * s).collect();

        let bench_series = return_series("SPY", &bench);
        let base = estimate_capm(&bench_series, &return_series("X", &stock)).unwrap();
        let more = estimate_capm(&bench_series, &return_series("X", &scaled)).unwrap();
        prop_assert!((more.stats.beta - k * base.stats.beta).abs() < 1e-6);
    }
}
