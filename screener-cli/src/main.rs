//! Screener CLI: constituent listing and single-ticker dashboards.
//!
//! Commands:
//! - `tickers`: list the current constituents of an index
//! - `query`: fetch prices, metadata and recommendations for one ticker and
//!   report its CAPM beta against the benchmark
//! - `config init`: write the default configuration file

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use screener_core::config::ScreenerConfig;
use screener_core::data::YahooProvider;
use screener_core::domain::{PriceSeries, TickerSymbol};
use screener_core::format;
use screener_core::universe::{ConstituentSource, IndexUniverse, WikipediaSource};
use screener_core::{run_query, Dashboard, QueryRequest};

#[derive(Parser)]
#[command(
    name = "screener",
    about = "Screener CLI: index constituents, price history and CAPM beta"
)]
struct Cli {
    /// Path to a TOML config file. Defaults to <config_dir>/screener/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the current constituents of an index (S&P500 or DJIA).
    Tickers {
        /// Index name, e.g. "S&P500" or "DJIA".
        index: String,
    },
    /// Build the dashboard for one ticker over a date range.
    Query {
        /// Ticker symbol (e.g., AAPL, BRK.B).
        symbol: String,

        /// Start date (YYYY-MM-DD, inclusive). Defaults to query.default_start.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD, exclusive). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Benchmark symbol. Overrides query.benchmark.
        #[arg(long)]
        benchmark: Option<String>,

        /// Print the dashboard as JSON instead of text.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Also write the price table to this CSV file.
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Configuration file commands.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write the default configuration.
    Init {
        /// Destination. Defaults to <config_dir>/screener/config.toml.
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Config { action } => match action {
            ConfigAction::Init { path, force } => run_config_init(path, force),
        },
        Commands::Tickers { index } => {
            let config = ScreenerConfig::load(cli.config.as_deref())?;
            run_tickers(&config, &index)
        }
        Commands::Query {
            symbol,
            start,
            end,
            benchmark,
            json,
            csv,
        } => {
            let mut config = ScreenerConfig::load(cli.config.as_deref())?;
            if let Some(b) = benchmark {
                config.query.benchmark = b;
            }
            run_query_cmd(&config, &symbol, start, end, json, csv)
        }
    }
}

fn run_config_init(path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = match path {
        Some(p) => p,
        None => ScreenerConfig::default_path()
            .context("no platform config directory; pass --path")?,
    };
    if path.exists() && !force {
        bail!(
            "{} already exists (pass --force to overwrite)",
            path.display()
        );
    }
    ScreenerConfig::default().save(&path)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

fn run_tickers(config: &ScreenerConfig, selection: &str) -> Result<()> {
    let Some(index) = IndexUniverse::from_selection(selection)? else {
        bail!("no index selected (expected S&P500 or DJIA)");
    };
    let source = WikipediaSource::new(config.sources.clone())?;
    let symbols = source.constituents(index)?;

    println!("{index}: {} constituents", symbols.len());
    for symbol in &symbols {
        println!("{symbol}");
    }
    Ok(())
}

fn parse_date(raw: &str, flag: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid {flag} date '{raw}' (expected YYYY-MM-DD)"))
}

fn run_query_cmd(
    config: &ScreenerConfig,
    symbol: &str,
    start: Option<String>,
    end: Option<String>,
    json: bool,
    csv_path: Option<PathBuf>,
) -> Result<()> {
    let Some(symbol) = TickerSymbol::new(symbol) else {
        bail!("ticker symbol is empty");
    };
    let start = start
        .as_deref()
        .map(|s| parse_date(s, "--start"))
        .transpose()?
        .unwrap_or(config.query.default_start);
    let end = end
        .as_deref()
        .map(|s| parse_date(s, "--end"))
        .transpose()?
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let provider = YahooProvider::new(&config.provider)?;
    let request = QueryRequest::new(symbol, start, end);
    let dashboard = run_query(&provider, &config.query, &request)?;

    if let Some(path) = &csv_path {
        write_prices_csv(&dashboard.prices, path)?;
        tracing::info!(path = %path.display(), rows = dashboard.prices.len(), "wrote price table");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
    } else {
        print_dashboard(&dashboard);
    }
    Ok(())
}

/// Price table as CSV: date, open, high, low, close, adj_close, volume.
fn prices_csv(prices: &PriceSeries) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "open", "high", "low", "close", "adj_close", "volume"])?;
    for b in prices.bars() {
        wtr.write_record([
            &b.date.to_string(),
            &format!("{:.6}", b.open),
            &format!("{:.6}", b.high),
            &format!("{:.6}", b.low),
            &format!("{:.6}", b.close),
            &format!("{:.6}", b.adj_close),
            &b.volume.to_string(),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

fn write_prices_csv(prices: &PriceSeries, path: &Path) -> Result<()> {
    let body = prices_csv(prices)?;
    std::fs::write(path, body).with_context(|| format!("failed to write {}", path.display()))
}

fn print_dashboard(dash: &Dashboard) {
    let profile = &dash.profile;
    let request = &dash.request;

    println!();
    println!("=== {} ({}) ===", profile.long_name, profile.symbol);
    if let Some(logo) = &profile.logo_url {
        println!("Logo:      {logo}");
    }
    if let Some(site) = &profile.website {
        println!("Website:   {site}");
    }
    if let (Some(sector), Some(industry)) = (&profile.sector, &profile.industry) {
        println!("Sector:    {sector} / {industry}");
    }
    if let Some(summary) = &profile.business_summary {
        println!();
        println!("{summary}");
    }

    println!();
    println!(
        "--- Prices {} to {} ({} rows) ---",
        request.start,
        request.end,
        dash.prices.len()
    );
    println!(
        "{:<10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>15}",
        "Date", "Open", "High", "Low", "Close", "Adj Close", "Volume"
    );
    println!("{}", "-".repeat(81));
    for b in dash.prices.bars() {
        println!(
            "{:<10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>15}",
            b.date.to_string(),
            format::price(b.open),
            format::price(b.high),
            format::price(b.low),
            format::price(b.close),
            format::price(b.adj_close),
            format::volume(b.volume)
        );
    }

    println!();
    println!("--- Price trend ---");
    println!(
        "Close ~ {:.4} per day from {:.2}",
        dash.price_trend.slope, dash.price_trend.intercept
    );

    println!();
    println!("--- CAPM vs {} ---", dash.benchmark);
    println!("Beta:      {}", format::beta(dash.capm.stats.beta));
    println!("Intercept: {}", format::intercept(dash.capm.stats.intercept));
    println!("Samples:   {}", dash.capm.stats.observations);

    println!();
    println!("--- Recommendations (latest {}) ---", dash.recommendations.len());
    if dash.recommendations.is_empty() {
        println!("(none)");
    } else {
        println!("{:<10}  {:<32}  {}", "Date", "Firm", "To Grade");
        println!("{}", "-".repeat(60));
        for r in &dash.recommendations {
            println!(
                "{:<10}  {:<32}  {}",
                r.date.to_string(),
                format::truncate(&r.firm, 32),
                r.to_grade
            );
        }
    }
    println!();
}
