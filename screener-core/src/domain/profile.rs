//! Descriptive company metadata.

use serde::{Deserialize, Serialize};

use super::symbol::TickerSymbol;

/// Company metadata shown above the price data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub symbol: TickerSymbol,
    /// Display name; falls back to the symbol when the provider has none.
    pub long_name: String,
    pub business_summary: Option<String>,
    pub website: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub logo_url: Option<String>,
}

/// Bare domain of a company website: no scheme, no `www.`, no path.
pub fn website_domain(website: &str) -> Option<String> {
    let without_scheme = website
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    let host = without_scheme.split(['/', '?', '#']).next()?;
    let host = host.trim_start_matches("www.");
    if host.is_empty() {
        None
    } else {
        Some(host.to_lowercase())
    }
}

/// Logo image URL served by a logo service keyed by website domain.
pub fn logo_url(logo_base_url: &str, website: &str) -> Option<String> {
    website_domain(website).map(|domain| format!("{}/{domain}", logo_base_url.trim_end_matches('/')))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_strips_scheme_www_and_path() {
        assert_eq!(
            website_domain("https://www.apple.com/investor"),
            Some("apple.com".to_string())
        );
        assert_eq!(website_domain("http://IBM.com"), Some("ibm.com".to_string()));
        assert_eq!(website_domain(""), None);
    }

    #[test]
    fn logo_url_joins_base_and_domain() {
        assert_eq!(
            logo_url("https://logo.clearbit.com/", "https://www.microsoft.com"),
            Some("https://logo.clearbit.com/microsoft.com".to_string())
        );
    }
}
