//! Background worker thread: all network I/O runs here.
//!
//! Communication with the TUI main thread is via `mpsc` channels. Commands
//! are handled one at a time in arrival order.

use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use screener_core::config::QuerySettings;
use screener_core::data::MarketDataProvider;
use screener_core::domain::TickerSymbol;
use screener_core::universe::{ConstituentSource, IndexUniverse};
use screener_core::{run_query, Dashboard, QueryRequest};

/// Commands sent from the TUI to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    ResolveUniverse { index: IndexUniverse },
    RunQuery { request: QueryRequest },
    Shutdown,
}

/// Responses sent from the worker back to the TUI.
#[derive(Debug)]
pub enum WorkerResponse {
    UniverseResolved {
        index: IndexUniverse,
        symbols: Vec<TickerSymbol>,
    },
    UniverseFailed {
        index: IndexUniverse,
        error: String,
    },
    QueryComplete {
        dashboard: Box<Dashboard>,
    },
    QueryFailed {
        symbol: String,
        category: &'static str,
        error: String,
    },
}

/// Upstream services the worker talks to.
pub struct WorkerServices {
    pub constituents: Arc<dyn ConstituentSource>,
    pub market: Arc<dyn MarketDataProvider>,
    pub query: QuerySettings,
}

/// Spawn the background worker thread.
pub fn spawn_worker(
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
    services: WorkerServices,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("screener-worker".into())
        .spawn(move || worker_loop(rx, tx, services))
}

fn worker_loop(rx: Receiver<WorkerCommand>, tx: Sender<WorkerResponse>, services: WorkerServices) {
    loop {
        match rx.recv() {
            Ok(WorkerCommand::Shutdown) | Err(_) => break,
            Ok(cmd) => {
                let resp = handle_command(cmd, &services);
                if let Some(resp) = resp {
                    if tx.send(resp).is_err() {
                        break;
                    }
                }
            }
        }
    }
    tracing::debug!("worker stopped");
}

fn handle_command(cmd: WorkerCommand, services: &WorkerServices) -> Option<WorkerResponse> {
    match cmd {
        WorkerCommand::ResolveUniverse { index } => Some(resolve_universe(index, services)),
        WorkerCommand::RunQuery { request } => Some(query(&request, services)),
        WorkerCommand::Shutdown => None, // handled in loop
    }
}

fn resolve_universe(index: IndexUniverse, services: &WorkerServices) -> WorkerResponse {
    match services.constituents.constituents(index) {
        Ok(symbols) => WorkerResponse::UniverseResolved { index, symbols },
        Err(e) => WorkerResponse::UniverseFailed {
            index,
            error: e.to_string(),
        },
    }
}

fn query(request: &QueryRequest, services: &WorkerServices) -> WorkerResponse {
    match run_query(services.market.as_ref(), &services.query, request) {
        Ok(dashboard) => WorkerResponse::QueryComplete {
            dashboard: Box::new(dashboard),
        },
        Err(e) => WorkerResponse::QueryFailed {
            symbol: request.symbol.to_string(),
            category: e.category(),
            error: e.to_string(),
        },
    }
}
