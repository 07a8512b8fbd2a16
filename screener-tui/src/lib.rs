//! Screener TUI: a seven-panel terminal dashboard over `screener-core`.
//!
//! The main thread owns [`app::AppState`] and draws it; all network I/O
//! happens on the worker thread in [`worker`].

pub mod app;
pub mod input;
pub mod persistence;
pub mod theme;
pub mod ui;
pub mod worker;
