//! Index universes: which constituent list a user is choosing from.
//!
//! The constituent lists are not stored: every resolution re-reads the
//! public reference page, so membership is whatever the page currently says.

pub mod wikipedia;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::config::SourceSettings;
use crate::domain::TickerSymbol;

pub use wikipedia::{parse_constituents, WikipediaSource};

#[derive(Debug, Error)]
pub enum UniverseError {
    #[error("unknown index selection '{0}' (expected S&P500 or DJIA)")]
    UnknownSelection(String),

    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("network error fetching {index} constituents: {reason}")]
    Network { index: IndexUniverse, reason: String },

    #[error("{index} constituent page changed structure: {reason}")]
    SchemaDrift { index: IndexUniverse, reason: String },

    #[error("{index} constituent table has no symbols")]
    Empty { index: IndexUniverse },
}

/// Stock index whose membership defines the selectable tickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexUniverse {
    Sp500,
    Djia,
}

impl IndexUniverse {
    pub const ALL: [IndexUniverse; 2] = [IndexUniverse::Sp500, IndexUniverse::Djia];

    pub fn label(self) -> &'static str {
        match self {
            IndexUniverse::Sp500 => "S&P500",
            IndexUniverse::Djia => "DJIA",
        }
    }

    /// Parse a form selection. The empty selection means "nothing chosen yet".
    pub fn from_selection(raw: &str) -> Result<Option<Self>, UniverseError> {
        let normalized: String = raw
            .trim()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '&' && *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "" => Ok(None),
            "sp500" | "spx" => Ok(Some(IndexUniverse::Sp500)),
            "djia" | "dow" | "dowjones" => Ok(Some(IndexUniverse::Djia)),
            _ => Err(UniverseError::UnknownSelection(raw.to_string())),
        }
    }

    pub fn source_url(self, sources: &SourceSettings) -> &str {
        match self {
            IndexUniverse::Sp500 => &sources.sp500_url,
            IndexUniverse::Djia => &sources.djia_url,
        }
    }
}

impl fmt::Display for IndexUniverse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Resolves an index to its current ordered, duplicate-free constituents.
pub trait ConstituentSource: Send + Sync {
    fn constituents(&self, index: IndexUniverse) -> Result<Vec<TickerSymbol>, UniverseError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_parsing() {
        assert_eq!(IndexUniverse::from_selection("").unwrap(), None);
        assert_eq!(
            IndexUniverse::from_selection("S&P500").unwrap(),
            Some(IndexUniverse::Sp500)
        );
        assert_eq!(
            IndexUniverse::from_selection("s&p 500").unwrap(),
            Some(IndexUniverse::Sp500)
        );
        assert_eq!(
            IndexUniverse::from_selection("DJIA").unwrap(),
            Some(IndexUniverse::Djia)
        );
        assert!(matches!(
            IndexUniverse::from_selection("NASDAQ"),
            Err(UniverseError::UnknownSelection(_))
        ));
    }

    #[test]
    fn labels_roundtrip_through_selection() {
        for index in IndexUniverse::ALL {
            assert_eq!(
                IndexUniverse::from_selection(index.label()).unwrap(),
                Some(index)
            );
        }
    }

    #[test]
    fn source_url_per_index() {
        let sources = SourceSettings::default();
        assert!(IndexUniverse::Sp500.source_url(&sources).contains("S%26P_500"));
        assert!(IndexUniverse::Djia.source_url(&sources).contains("Dow_Jones"));
    }
}
