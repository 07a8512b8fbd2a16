//! Return statistics: OLS line fits and CAPM beta.

pub mod capm;
pub mod regression;
pub mod returns;

use thiserror::Error;

pub use capm::{align_returns, estimate_capm, fit_capm, CapmEstimate, CapmSample, CapmStats};
pub use regression::{fit_line, price_trend, LinearFit};
pub use returns::pct_change;

#[derive(Debug, Error, PartialEq)]
pub enum StatsError {
    #[error("insufficient sample: need at least {required} paired observations, got {actual}")]
    InsufficientSample { required: usize, actual: usize },

    #[error("benchmark returns have zero variance; slope is undefined")]
    ZeroVariance,

    #[error("input length mismatch: {x} x values, {y} y values")]
    LengthMismatch { x: usize, y: usize },
}
