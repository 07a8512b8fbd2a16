//! Screener TUI: seven-panel terminal dashboard with vim-style navigation.
//!
//! Panels:
//! 1. Query: index, ticker and date range form
//! 2. Overview: company metadata and CAPM headline
//! 3. Prices: daily OHLCV table
//! 4. Chart: close prices with trend line
//! 5. CAPM: return scatter with regression line
//! 6. Recommendations: latest analyst grades
//! 7. Help: keyboard shortcuts

use std::fs::{self, File};
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

use screener_core::config::ScreenerConfig;
use screener_core::data::YahooProvider;
use screener_core::universe::WikipediaSource;

use screener_tui::app::AppState;
use screener_tui::worker::{self, WorkerCommand, WorkerServices};
use screener_tui::{input, persistence, ui};

fn main() -> Result<()> {
    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    // Paths
    let base_config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    let state_path = base_config.join("screener").join("state.json");
    let log_dir = dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("screener");

    // The terminal belongs to the UI, so logs go to a file.
    init_logging(&log_dir)?;

    let config = ScreenerConfig::load(None).context("loading configuration")?;
    let services = WorkerServices {
        constituents: Arc::new(WikipediaSource::new(config.sources.clone())?),
        market: Arc::new(YahooProvider::new(&config.provider)?),
        query: config.query.clone(),
    };

    // Load persisted state
    let persisted = persistence::load(&state_path);

    // Worker channels
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();

    let worker_handle = worker::spawn_worker(cmd_rx, resp_tx, services)?;

    let today = chrono::Local::now().date_naive();
    let mut app = AppState::new(
        cmd_tx.clone(),
        resp_rx,
        config.query.default_start,
        today,
        state_path,
    );

    persistence::apply(&mut app, persisted);
    // Constituent lists are not persisted; fetch the restored index again.
    app.request_universe();

    tracing::info!("screener-tui started");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    // Save state before exit
    let persisted = persistence::extract(&app);
    if let Err(e) = persistence::save(&app.state_path, &persisted) {
        tracing::warn!(error = %e, "failed to save state");
    }

    // Shutdown worker
    let _ = cmd_tx.send(WorkerCommand::Shutdown);
    let _ = worker_handle.join();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn init_logging(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join("screener-tui.log");
    let file = File::options()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Drain worker responses (non-blocking)
        while let Ok(resp) = app.worker_rx.try_recv() {
            app.handle_response(resp);
        }

        // 3. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        // 4. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}
