//! Constituent lists scraped from Wikipedia.
//!
//! The constituent table is the first `<table>` whose header row has a
//! `Symbol` column. If the page stops containing such a table the
//! resolution fails with `UniverseError::SchemaDrift`; there is no fallback
//! list.

use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::time::Duration;

use super::{ConstituentSource, IndexUniverse, UniverseError};
use crate::config::SourceSettings;
use crate::domain::TickerSymbol;

const SYMBOL_HEADERS: [&str; 3] = ["symbol", "ticker symbol", "ticker"];

/// Fetches constituent pages over HTTP and parses their symbol tables.
pub struct WikipediaSource {
    client: reqwest::blocking::Client,
    sources: SourceSettings,
}

impl WikipediaSource {
    pub fn new(sources: SourceSettings) -> Result<Self, UniverseError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(sources.timeout_secs))
            .user_agent(sources.user_agent.clone())
            .build()
            .map_err(|e| UniverseError::Client(e.to_string()))?;
        Ok(Self { client, sources })
    }

    fn fetch_page(&self, index: IndexUniverse) -> Result<String, UniverseError> {
        let url = index.source_url(&self.sources);
        tracing::debug!(%index, url, "fetching constituent page");
        let network = |reason: String| UniverseError::Network { index, reason };

        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| network(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(network(format!("HTTP {status} from {url}")));
        }
        resp.text().map_err(|e| network(e.to_string()))
    }
}

impl ConstituentSource for WikipediaSource {
    fn constituents(&self, index: IndexUniverse) -> Result<Vec<TickerSymbol>, UniverseError> {
        let html = self.fetch_page(index)?;
        let symbols = parse_constituents(&html, index)?;
        tracing::info!(%index, count = symbols.len(), "resolved constituents");
        Ok(symbols)
    }
}

fn selector(css: &str, index: IndexUniverse) -> Result<Selector, UniverseError> {
    Selector::parse(css).map_err(|e| UniverseError::SchemaDrift {
        index,
        reason: format!("bad selector {css}: {e}"),
    })
}

/// Direct `th`/`td` children of a row, in column order.
fn row_cells<'a>(row: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|e| matches!(e.value().name(), "th" | "td"))
        .collect()
}

fn cell_text(cell: &ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// Symbol text as shown on the page, without footnote markers or exchange
/// prefixes (`AAPL[1]` → `AAPL`, `NYSE: MMM` → `MMM`).
fn clean_symbol(raw: &str) -> &str {
    let no_note = raw.split('[').next().unwrap_or(raw);
    no_note.rsplit(':').next().unwrap_or(no_note).trim()
}

/// Extract the ordered, duplicate-free symbol column from a constituent page.
pub fn parse_constituents(
    html: &str,
    index: IndexUniverse,
) -> Result<Vec<TickerSymbol>, UniverseError> {
    let document = Html::parse_document(html);
    let table_sel = selector("table", index)?;
    let row_sel = selector("tr", index)?;

    for table in document.select(&table_sel) {
        let rows: Vec<ElementRef> = table.select(&row_sel).collect();

        let Some((header_pos, symbol_col)) = rows.iter().enumerate().find_map(|(i, row)| {
            let cells = row_cells(*row);
            let is_header = !cells.is_empty() && cells.iter().all(|c| c.value().name() == "th");
            if !is_header {
                return None;
            }
            cells
                .iter()
                .position(|c| SYMBOL_HEADERS.contains(&cell_text(c).to_lowercase().as_str()))
                .map(|col| (i, col))
        }) else {
            continue;
        };

        let mut seen = HashSet::new();
        let mut symbols = Vec::new();
        for row in &rows[header_pos + 1..] {
            let cells = row_cells(*row);
            let Some(cell) = cells.get(symbol_col) else {
                continue;
            };
            let text = cell_text(cell);
            let Some(symbol) = TickerSymbol::new(clean_symbol(&text)) else {
                continue;
            };
            if seen.insert(symbol.clone()) {
                symbols.push(symbol);
            } else {
                tracing::warn!(%index, %symbol, "duplicate constituent dropped");
            }
        }

        if symbols.is_empty() {
            return Err(UniverseError::Empty { index });
        }
        return Ok(symbols);
    }

    Err(UniverseError::SchemaDrift {
        index,
        reason: "no table with a Symbol column".into(),
    })
}
