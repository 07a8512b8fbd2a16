//! Domain types: symbols, bars, series, company metadata, recommendations.

pub mod bar;
pub mod profile;
pub mod recommendation;
pub mod series;
pub mod symbol;

pub use bar::Bar;
pub use profile::CompanyProfile;
pub use recommendation::{latest_rows, Recommendation, RecommendationRow};
pub use series::{PriceSeries, ReturnPoint, ReturnSeries};
pub use symbol::TickerSymbol;
