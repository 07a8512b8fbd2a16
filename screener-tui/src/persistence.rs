//! App state persistence: JSON save/load across restarts.

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use screener_core::domain::TickerSymbol;
use screener_core::universe::IndexUniverse;

use crate::app::{AppState, Overlay, Panel};

/// Serializable subset of app state that persists across restarts.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub index: Option<IndexUniverse>,
    pub symbol: Option<TickerSymbol>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub active_panel: Panel,
    pub welcome_dismissed: bool,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            index: None,
            symbol: None,
            start: None,
            end: None,
            active_panel: Panel::Query,
            welcome_dismissed: false,
        }
    }
}

/// Load persisted state from disk. Returns defaults if file is missing or corrupt.
pub fn load(path: &Path) -> PersistedState {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt state file");
            PersistedState::default()
        }),
        Err(_) => PersistedState::default(),
    }
}

/// Save persisted state to disk. Creates parent directories if needed.
pub fn save(path: &Path, state: &PersistedState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Extract persisted state from AppState.
pub fn extract(app: &AppState) -> PersistedState {
    PersistedState {
        index: app.form.index,
        symbol: app
            .form
            .selected_ticker()
            .cloned()
            .or_else(|| app.form.pending_symbol.clone()),
        start: Some(app.form.start),
        end: Some(app.form.end),
        active_panel: app.active_panel,
        welcome_dismissed: app.overlay != Overlay::Welcome,
    }
}

/// Apply persisted state to AppState.
///
/// The end date is not restored when it would fall before the start date.
/// The constituent list is not stored, so the caller re-resolves the index.
pub fn apply(app: &mut AppState, state: PersistedState) {
    app.form.index = state.index;
    app.form.pending_symbol = state.symbol;
    if let Some(start) = state.start {
        app.form.start = start;
    }
    if let Some(end) = state.end.filter(|e| *e > app.form.start) {
        app.form.end = end;
    }
    // Result panels are empty until a new query runs.
    app.active_panel = match state.active_panel {
        Panel::Help => Panel::Help,
        _ => Panel::Query,
    };
    if !state.welcome_dismissed {
        app.overlay = Overlay::Welcome;
    }
}
