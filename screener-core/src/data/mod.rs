//! Market-data providers

pub mod fixture;
pub mod provider;
pub mod yahoo;

pub use fixture::FixtureProvider;
pub use provider::{DataError, MarketDataProvider};
pub use yahoo::YahooProvider;
