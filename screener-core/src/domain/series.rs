//! Price and return series for one symbol over one date range.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::bar::Bar;
use super::symbol::TickerSymbol;

/// Ordered daily bars for one symbol over `[start, end)`.
///
/// Construction drops void bars and sorts by date, so every bar carries
/// usable prices and dates are strictly increasing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: TickerSymbol,
    pub start: NaiveDate,
    pub end: NaiveDate,
    bars: Vec<Bar>,
}

impl PriceSeries {
    pub fn new(symbol: TickerSymbol, start: NaiveDate, end: NaiveDate, mut bars: Vec<Bar>) -> Self {
        let before = bars.len();
        bars.retain(|b| !b.is_void() && b.date >= start && b.date < end);
        bars.sort_by_key(|b| b.date);
        bars.dedup_by_key(|b| b.date);
        if bars.len() != before {
            tracing::debug!(
                symbol = %symbol,
                dropped = before - bars.len(),
                "dropped missing or out-of-range rows"
            );
        }
        Self {
            symbol,
            start,
            end,
            bars,
        }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }

    /// Period-over-period fractional change of the close.
    ///
    /// The first bar has no prior close, so the result has `len() - 1` points.
    pub fn returns(&self) -> ReturnSeries {
        self.returns_by(|b| b.close)
    }

    /// Returns on the dividend/split adjusted close, for benchmark series.
    pub fn adjusted_returns(&self) -> ReturnSeries {
        self.returns_by(Bar::adjusted_close)
    }

    fn returns_by(&self, price: impl Fn(&Bar) -> f64) -> ReturnSeries {
        let points = self
            .bars
            .windows(2)
            .map(|w| {
                let prev = price(&w[0]);
                let curr = price(&w[1]);
                ReturnPoint {
                    date: w[1].date,
                    value: (curr - prev) / prev,
                }
            })
            .collect();
        ReturnSeries {
            symbol: self.symbol.clone(),
            points,
        }
    }
}

/// One daily return observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Daily fractional returns keyed by date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnSeries {
    pub symbol: TickerSymbol,
    pub points: Vec<ReturnPoint>,
}

impl ReturnSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }
}
