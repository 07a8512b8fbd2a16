//! One trading day of OHLCV data.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily OHLCV bar for a single symbol.
///
/// `adj_close` is the dividend/split adjusted close reported by the provider.
/// It is NaN when the provider did not report one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub adj_close: f64,
}

impl Bar {
    /// Returns true if any OHLC field is NaN (a missing row).
    pub fn is_void(&self) -> bool {
        self.open.is_nan() || self.high.is_nan() || self.low.is_nan() || self.close.is_nan()
    }

    /// Adjusted close, falling back to the raw close when none was reported.
    pub fn adjusted_close(&self) -> f64 {
        if self.adj_close.is_finite() {
            self.adj_close
        } else {
            self.close
        }
    }
}
