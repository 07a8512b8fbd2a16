//! Application state: single-owner, main-thread only.
//!
//! All TUI state lives here. The worker thread communicates via channels.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};

use chrono::{Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use screener_core::domain::TickerSymbol;
use screener_core::universe::IndexUniverse;
use screener_core::{Dashboard, QueryRequest};

use crate::worker::{WorkerCommand, WorkerResponse};

const ERROR_HISTORY_CAP: usize = 50;

/// Which panel is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Panel {
    Query,
    Overview,
    Prices,
    Chart,
    Capm,
    Recommendations,
    Help,
}

impl Panel {
    pub const COUNT: usize = 7;

    pub fn index(self) -> usize {
        match self {
            Panel::Query => 0,
            Panel::Overview => 1,
            Panel::Prices => 2,
            Panel::Chart => 3,
            Panel::Capm => 4,
            Panel::Recommendations => 5,
            Panel::Help => 6,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Panel::Query),
            1 => Some(Panel::Overview),
            2 => Some(Panel::Prices),
            3 => Some(Panel::Chart),
            4 => Some(Panel::Capm),
            5 => Some(Panel::Recommendations),
            6 => Some(Panel::Help),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Panel::Query => "Query",
            Panel::Overview => "Overview",
            Panel::Prices => "Prices",
            Panel::Chart => "Chart",
            Panel::Capm => "CAPM",
            Panel::Recommendations => "Recommendations",
            Panel::Help => "Help",
        }
    }

    pub fn next(self) -> Panel {
        Panel::from_index((self.index() + 1) % Self::COUNT).unwrap_or(Panel::Query)
    }

    pub fn prev(self) -> Panel {
        Panel::from_index((self.index() + Self::COUNT - 1) % Self::COUNT).unwrap_or(Panel::Query)
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// An error record for the error history overlay.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
    pub context: String,
}

/// Error category for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Universe,
    Stats,
    Input,
    Other,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Network => "NET",
            ErrorCategory::Data => "DATA",
            ErrorCategory::Universe => "IDX",
            ErrorCategory::Stats => "STAT",
            ErrorCategory::Input => "INPUT",
            ErrorCategory::Other => "ERR",
        }
    }

    /// Map a core error category tag.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "network" => ErrorCategory::Network,
            "data" => ErrorCategory::Data,
            "universe" => ErrorCategory::Universe,
            "stats" => ErrorCategory::Stats,
            "input" => ErrorCategory::Input,
            _ => ErrorCategory::Other,
        }
    }
}

/// Form field with keyboard focus on the Query panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Index,
    Ticker,
    Start,
    End,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::Index,
        FormField::Ticker,
        FormField::Start,
        FormField::End,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Index => "Index",
            FormField::Ticker => "Ticker",
            FormField::Start => "Start date",
            FormField::End => "End date",
        }
    }

    pub fn next(self) -> FormField {
        match self {
            FormField::Index => FormField::Ticker,
            FormField::Ticker => FormField::Start,
            FormField::Start => FormField::End,
            FormField::End => FormField::End,
        }
    }

    pub fn prev(self) -> FormField {
        match self {
            FormField::Index => FormField::Index,
            FormField::Ticker => FormField::Index,
            FormField::Start => FormField::Ticker,
            FormField::End => FormField::Start,
        }
    }
}

/// The query form: index, ticker, date range. Submitted as one unit.
#[derive(Debug)]
pub struct QueryForm {
    /// `None` is the "nothing selected" option.
    pub index: Option<IndexUniverse>,
    pub tickers: Vec<TickerSymbol>,
    pub ticker_cursor: usize,
    /// Symbol to select once the constituent list arrives (restored sessions).
    pub pending_symbol: Option<TickerSymbol>,
    pub start: NaiveDate,
    /// Exclusive.
    pub end: NaiveDate,
    pub focus: FormField,
    pub universe_loading: bool,
}

impl QueryForm {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            index: None,
            tickers: Vec::new(),
            ticker_cursor: 0,
            pending_symbol: None,
            start,
            end,
            focus: FormField::Index,
            universe_loading: false,
        }
    }

    pub fn selected_ticker(&self) -> Option<&TickerSymbol> {
        self.tickers.get(self.ticker_cursor)
    }

    /// Cycle None → S&P500 → DJIA → None (or backwards).
    pub fn cycle_index(&mut self, forward: bool) {
        let options: [Option<IndexUniverse>; 3] =
            [None, Some(IndexUniverse::Sp500), Some(IndexUniverse::Djia)];
        let pos = options.iter().position(|o| *o == self.index).unwrap_or(0);
        let next = if forward {
            (pos + 1) % options.len()
        } else {
            (pos + options.len() - 1) % options.len()
        };
        self.index = options[next];
        self.tickers.clear();
        self.ticker_cursor = 0;
    }

    pub fn move_ticker(&mut self, delta: isize) {
        if self.tickers.is_empty() {
            return;
        }
        let max = self.tickers.len() as isize - 1;
        let next = (self.ticker_cursor as isize + delta).clamp(0, max);
        self.ticker_cursor = next as usize;
    }

    /// Put the cursor on the first ticker starting with `prefix`.
    pub fn jump_to_ticker(&mut self, prefix: &str) -> bool {
        let prefix = prefix.trim().to_ascii_uppercase();
        if prefix.is_empty() {
            return false;
        }
        let exact = self.tickers.iter().position(|t| t.as_str() == prefix);
        let found = exact.or_else(|| {
            self.tickers
                .iter()
                .position(|t| t.as_str().starts_with(&prefix))
        });
        match found {
            Some(i) => {
                self.ticker_cursor = i;
                true
            }
            None => false,
        }
    }

    /// Replace the constituent list, honouring a pending symbol.
    pub fn set_tickers(&mut self, tickers: Vec<TickerSymbol>) {
        self.tickers = tickers;
        self.ticker_cursor = 0;
        if let Some(pending) = self.pending_symbol.take() {
            if let Some(i) = self.tickers.iter().position(|t| *t == pending) {
                self.ticker_cursor = i;
            }
        }
    }

    /// Shift a date field by `days` (negative moves back).
    pub fn shift_date(&mut self, field: FormField, days: i64) {
        let target = match field {
            FormField::Start => &mut self.start,
            FormField::End => &mut self.end,
            _ => return,
        };
        let shifted = if days >= 0 {
            target.checked_add_days(Days::new(days as u64))
        } else {
            target.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        if let Some(d) = shifted {
            *target = d;
        }
    }

    /// Build the request for the current form, if a ticker is selected.
    pub fn request(&self) -> Option<QueryRequest> {
        self.selected_ticker()
            .map(|t| QueryRequest::new(t.clone(), self.start, self.end))
    }
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Welcome,
    Edit(FormField),
    ErrorHistory,
}

/// Top-level application state.
pub struct AppState {
    // Navigation
    pub active_panel: Panel,
    pub running: bool,

    // Panel states
    pub form: QueryForm,
    pub dashboard: Option<Dashboard>,
    pub query_in_progress: bool,
    pub prices_scroll: usize,

    // Worker communication
    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,

    // Cross-cutting
    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
    pub overlay: Overlay,
    pub edit_input: String,

    pub state_path: PathBuf,
}

impl AppState {
    pub fn new(
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
        default_start: NaiveDate,
        today: NaiveDate,
        state_path: PathBuf,
    ) -> Self {
        Self {
            active_panel: Panel::Query,
            running: true,
            form: QueryForm::new(default_start, today),
            dashboard: None,
            query_in_progress: false,
            prices_scroll: 0,
            worker_tx,
            worker_rx,
            status_message: None,
            error_history: VecDeque::with_capacity(ERROR_HISTORY_CAP),
            error_scroll: 0,
            overlay: Overlay::None,
            edit_input: String::new(),
            state_path,
        }
    }

    /// Push an error to the history, capping at 50.
    pub fn push_error(&mut self, category: ErrorCategory, message: String, context: String) {
        tracing::warn!(category = category.label(), %context, "{message}");
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message: message.clone(),
            context,
        };
        self.error_history.push_front(record);
        if self.error_history.len() > ERROR_HISTORY_CAP {
            self.error_history.pop_back();
        }
        self.status_message = Some((message, StatusLevel::Error));
    }

    /// Set an info status message.
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    /// Set a warning status message.
    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    /// Ask the worker for the constituents of the selected index.
    pub fn request_universe(&mut self) {
        let Some(index) = self.form.index else {
            self.form.universe_loading = false;
            return;
        };
        self.form.universe_loading = true;
        if self
            .worker_tx
            .send(WorkerCommand::ResolveUniverse { index })
            .is_err()
        {
            self.form.universe_loading = false;
            self.push_error(
                ErrorCategory::Other,
                "worker is not running".into(),
                format!("resolve {index}"),
            );
            return;
        }
        self.set_status(format!("Loading {index} constituents..."));
    }

    /// Submit the form. Each submission starts a fresh dashboard.
    pub fn submit_query(&mut self) {
        if self.query_in_progress {
            self.set_warning("A query is already running");
            return;
        }
        let Some(request) = self.form.request() else {
            self.set_warning("Select an index and a ticker first");
            return;
        };
        if request.start >= request.end {
            self.push_error(
                ErrorCategory::Input,
                format!(
                    "start date {} must be before end date {}",
                    request.start, request.end
                ),
                request.symbol.to_string(),
            );
            return;
        }

        let symbol = request.symbol.clone();
        if self
            .worker_tx
            .send(WorkerCommand::RunQuery { request })
            .is_err()
        {
            self.push_error(
                ErrorCategory::Other,
                "worker is not running".into(),
                symbol.to_string(),
            );
            return;
        }
        self.dashboard = None;
        self.prices_scroll = 0;
        self.query_in_progress = true;
        self.set_status(format!("Querying {symbol}..."));
    }

    /// Apply one worker response.
    pub fn handle_response(&mut self, resp: WorkerResponse) {
        match resp {
            WorkerResponse::UniverseResolved { index, symbols } => {
                // A stale answer for an index the user has since moved away from.
                if self.form.index != Some(index) {
                    return;
                }
                self.form.universe_loading = false;
                let count = symbols.len();
                self.form.set_tickers(symbols);
                self.set_status(format!("{index}: {count} tickers"));
            }
            WorkerResponse::UniverseFailed { index, error } => {
                if self.form.index == Some(index) {
                    self.form.universe_loading = false;
                }
                self.push_error(ErrorCategory::Universe, error, index.to_string());
            }
            WorkerResponse::QueryComplete { dashboard } => {
                self.query_in_progress = false;
                self.set_status(format!(
                    "{}: {} rows, beta {}",
                    dashboard.request.symbol,
                    dashboard.prices.len(),
                    screener_core::format::beta(dashboard.capm.stats.beta)
                ));
                self.dashboard = Some(*dashboard);
                self.active_panel = Panel::Overview;
            }
            WorkerResponse::QueryFailed {
                symbol,
                category,
                error,
            } => {
                self.query_in_progress = false;
                self.push_error(ErrorCategory::from_tag(category), error, symbol);
            }
        }
    }
}
