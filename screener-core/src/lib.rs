//! Screener Core: index universes, market data, CAPM statistics.
//!
//! This crate contains everything the front ends share:
//! - Domain types (bars, price/return series, profiles, recommendations)
//! - Constituent resolution for the S&P 500 and DJIA
//! - Market-data providers (Yahoo Finance, in-memory fixtures)
//! - Return statistics and the CAPM regression
//! - The query pipeline that assembles one dashboard per request

pub mod config;
pub mod data;
pub mod domain;
pub mod format;
pub mod query;
pub mod stats;
pub mod universe;

pub use query::{run_query, Dashboard, QueryError, QueryRequest};
