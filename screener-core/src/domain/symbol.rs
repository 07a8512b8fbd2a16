//! Ticker symbols.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A short code identifying a tradable security (e.g. `AAPL`, `BRK.B`).
///
/// Stored trimmed and upper-cased. The only validation is presence: an
/// empty or whitespace-only string is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TickerSymbol(String);

impl TickerSymbol {
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Symbol as the market-data provider spells it.
    ///
    /// Reference pages list class shares with a dot (`BRK.B`); the provider
    /// uses a dash (`BRK-B`).
    pub fn provider_form(&self) -> String {
        self.0.replace('.', "-")
    }
}

impl fmt::Display for TickerSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TickerSymbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
