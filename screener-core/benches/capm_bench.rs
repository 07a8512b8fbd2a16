//! Criterion benchmarks for the statistics kernel.
//!
//! Benchmarks:
//! 1. Return computation over a price series
//! 2. Date alignment of benchmark and stock returns
//! 3. Full CAPM estimate (align + OLS)
//! 4. Price trend fit

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use screener_core::data::fixture::weekday_bars;
use screener_core::domain::{PriceSeries, TickerSymbol};
use screener_core::stats::{align_returns, estimate_capm, price_trend};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_series(symbol: &str, years: u64, amplitude: f64) -> PriceSeries {
    let start = chrono::NaiveDate::from_ymd_opt(2000, 1, 3).unwrap();
    let end = start + chrono::Days::new(365 * years);
    let bars = weekday_bars(start, end, |i| 100.0 + (i as f64 * 0.1).sin() * amplitude);
    PriceSeries::new(TickerSymbol::new(symbol).unwrap(), start, end, bars)
}

// ── Benchmarks ───────────────────────────────────────────────────────

fn bench_returns(c: &mut Criterion) {
    let mut group = c.benchmark_group("returns");
    for years in [1, 5, 20] {
        let series = make_series("SPY", years, 10.0);
        group.bench_with_input(BenchmarkId::from_parameter(years), &series, |b, s| {
            b.iter(|| black_box(s.returns()))
        });
    }
    group.finish();
}

fn bench_align(c: &mut Criterion) {
    let bench = make_series("SPY", 20, 10.0).returns();
    let stock = make_series("AAPL", 20, 15.0).returns();
    c.bench_function("align_returns_20y", |b| {
        b.iter(|| black_box(align_returns(&bench, &stock)))
    });
}

fn bench_capm(c: &mut Criterion) {
    let mut group = c.benchmark_group("estimate_capm");
    for years in [1, 5, 20] {
        let bench = make_series("SPY", years, 10.0).returns();
        let stock = make_series("AAPL", years, 15.0).returns();
        group.bench_with_input(
            BenchmarkId::from_parameter(years),
            &(bench, stock),
            |b, (x, y)| b.iter(|| black_box(estimate_capm(x, y))),
        );
    }
    group.finish();
}

fn bench_trend(c: &mut Criterion) {
    let series = make_series("AAPL", 20, 15.0);
    c.bench_function("price_trend_20y", |b| {
        b.iter(|| black_box(price_trend(&series)))
    });
}

criterion_group!(benches, bench_returns, bench_align, bench_capm, bench_trend);
criterion_main!(benches);
