//! Yahoo Finance data provider.
//!
//! Daily OHLCV bars come from the v8 chart API. Company metadata and analyst
//! upgrade/downgrade history come from the v10 quoteSummary API, which only
//! answers requests carrying a session cookie and the crumb issued for it.
//! The cookie jar is primed once from `cookie_url`, the crumb is fetched from
//! `/v1/test/getcrumb`, and both are reused until Yahoo rejects them.
//!
//! Yahoo Finance has no official API and is subject to unannounced format
//! changes; anything that does not parse surfaces as
//! `DataError::ResponseFormatChanged`. Requests are made once, without retry.

use chrono::{NaiveDate, NaiveTime};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use super::provider::{DataError, MarketDataProvider};
use crate::config::ProviderSettings;
use crate::domain::profile::logo_url;
use crate::domain::{Bar, CompanyProfile, PriceSeries, Recommendation, TickerSymbol};

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    adjclose: Vec<Option<f64>>,
}

/// Yahoo Finance v10 quoteSummary API response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResponse {
    quote_summary: SummaryEnvelope,
}

#[derive(Debug, Deserialize)]
struct SummaryEnvelope {
    result: Option<Vec<SummaryModules>>,
    error: Option<ApiError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryModules {
    asset_profile: Option<AssetProfile>,
    price: Option<PriceModule>,
    upgrade_downgrade_history: Option<UpgradeDowngradeHistory>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssetProfile {
    long_business_summary: Option<String>,
    website: Option<String>,
    sector: Option<String>,
    industry: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceModule {
    long_name: Option<String>,
    short_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpgradeDowngradeHistory {
    #[serde(default)]
    history: Vec<GradeChange>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GradeChange {
    epoch_grade_date: i64,
    firm: Option<String>,
    to_grade: Option<String>,
    from_grade: Option<String>,
    action: Option<String>,
}

/// Yahoo Finance data provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    base_url: String,
    cookie_url: String,
    logo_base_url: String,
    /// Crumb for quoteSummary, cleared when Yahoo rejects it.
    crumb: Mutex<Option<String>>,
}

impl YahooProvider {
    pub fn new(settings: &ProviderSettings) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.clone())
            .cookie_store(true)
            .build()
            .map_err(|e| DataError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            cookie_url: settings.cookie_url.clone(),
            logo_base_url: settings.logo_base_url.clone(),
            crumb: Mutex::new(None),
        })
    }

    /// Build the chart API URL for a symbol and a half-open date range.
    fn chart_url(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let start_ts = start.and_time(NaiveTime::default()).and_utc().timestamp();
        let end_ts = end.and_time(NaiveTime::default()).and_utc().timestamp();
        format!(
            "{}/v8/finance/chart/{symbol}\
             ?period1={start_ts}&period2={end_ts}&interval=1d\
             &includeAdjustedClose=true",
            self.base_url
        )
    }

    fn summary_url(&self, symbol: &str, modules: &str, crumb: &str) -> Result<String, DataError> {
        let base = format!("{}/v10/finance/quoteSummary/{symbol}", self.base_url);
        reqwest::Url::parse_with_params(&base, &[("modules", modules), ("crumb", crumb)])
            .map(String::from)
            .map_err(|e| DataError::Network(format!("invalid request URL {base}: {e}")))
    }

    /// Return the cached crumb, or run the cookie and crumb handshake.
    fn crumb(&self) -> Result<String, DataError> {
        let mut cached = self.crumb.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(crumb) = cached.as_ref() {
            return Ok(crumb.clone());
        }

        // Only the Set-Cookie header matters here; the page itself often errors.
        tracing::debug!(url = %self.cookie_url, "priming session cookie");
        self.client
            .get(&self.cookie_url)
            .send()
            .map_err(|e| DataError::Network(e.to_string()))?;

        let url = format!("{}/v1/test/getcrumb", self.base_url);
        tracing::debug!(url, "GET");
        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| DataError::Network(e.to_string()))?;
        let status = resp.status();
        let body = resp.text().map_err(|e| DataError::Network(e.to_string()))?;
        let crumb = body.trim();
        if !status.is_success()
            || crumb.is_empty()
            || crumb.contains(|c: char| c == '<' || c == '{' || c.is_whitespace())
        {
            return Err(DataError::AuthenticationRequired(format!(
                "Yahoo Finance did not issue a crumb (HTTP {status})"
            )));
        }

        tracing::debug!("obtained quoteSummary crumb");
        *cached = Some(crumb.to_string());
        Ok(crumb.to_string())
    }

    fn forget_crumb(&self) {
        *self.crumb.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Issue one GET and decode the JSON body, mapping HTTP failures.
    fn get_json<T: DeserializeOwned>(&self, url: &str, symbol: &str) -> Result<T, DataError> {
        tracing::debug!(url, "GET");
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| DataError::Network(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(DataError::AuthenticationRequired(format!(
                "Yahoo Finance refused the request for {symbol} (HTTP {status})"
            )));
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        if !status.is_success() {
            return Err(DataError::Http {
                status: status.as_u16(),
                symbol: symbol.to_string(),
            });
        }

        resp.json().map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse response for {symbol}: {e}"))
        })
    }

    /// Parse the chart API response into bars.
    fn parse_chart(symbol: &str, resp: ChartResponse) -> Result<Vec<Bar>, DataError> {
        let result = resp
            .chart
            .result
            .ok_or_else(|| api_error(symbol, resp.chart.error))?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("result array is empty".into()))?;

        // A range with no trading days comes back without timestamps.
        let Some(timestamps) = data.timestamp else {
            return Ok(Vec::new());
        };

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

        let adj_closes = data
            .indicators
            .adjclose
            .and_then(|v| v.into_iter().next())
            .map(|a| a.adjclose);

        let mut bars = Vec::with_capacity(timestamps.len());
        let mut missing_volume = 0usize;
        for (i, &ts) in timestamps.iter().enumerate() {
            let date = chrono::DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.naive_utc().date())
                .ok_or_else(|| {
                    DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
                })?;

            // A row with any column missing is dropped whole.
            let Some(volume) = quote.volume.get(i).copied().flatten() else {
                missing_volume += 1;
                continue;
            };

            let field = |v: &Vec<Option<f64>>| v.get(i).copied().flatten().unwrap_or(f64::NAN);
            bars.push(Bar {
                date,
                open: field(&quote.open),
                high: field(&quote.high),
                low: field(&quote.low),
                close: field(&quote.close),
                volume,
                adj_close: adj_closes.as_ref().map_or(f64::NAN, field),
            });
        }
        if missing_volume > 0 {
            tracing::debug!(symbol, rows = missing_volume, "dropped rows without volume");
        }

        Ok(bars)
    }

    fn quote_summary(&self, symbol: &TickerSymbol, modules: &str) -> Result<SummaryModules, DataError> {
        let provider_symbol = symbol.provider_form();
        let crumb = self.crumb()?;
        let url = self.summary_url(&provider_symbol, modules, &crumb)?;
        let resp: SummaryResponse = match self.get_json(&url, symbol.as_str()) {
            Err(e @ DataError::AuthenticationRequired(_)) => {
                // A stale crumb; the next request starts a fresh session.
                self.forget_crumb();
                return Err(e);
            }
            other => other?,
        };
        let result = resp
            .quote_summary
            .result
            .ok_or_else(|| api_error(symbol.as_str(), resp.quote_summary.error))?;
        result
            .into_iter()
            .next()
            .ok_or_else(|| DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            })
    }
}

fn api_error(symbol: &str, error: Option<ApiError>) -> DataError {
    match error {
        Some(err) if err.code == "Not Found" => DataError::SymbolNotFound {
            symbol: symbol.to_string(),
        },
        Some(err) => DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description)),
        None => DataError::ResponseFormatChanged("empty result with no error".into()),
    }
}

impl MarketDataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn history(
        &self,
        symbol: &TickerSymbol,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        let url = self.chart_url(&symbol.provider_form(), start, end);
        let chart: ChartResponse = self.get_json(&url, symbol.as_str())?;
        let bars = Self::parse_chart(symbol.as_str(), chart)?;
        let series = PriceSeries::new(symbol.clone(), start, end, bars);
        if series.is_empty() {
            return Err(DataError::EmptyResult {
                symbol: symbol.to_string(),
                start,
                end,
            });
        }
        tracing::debug!(symbol = %symbol, rows = series.len(), "fetched price history");
        Ok(series)
    }

    fn profile(&self, symbol: &TickerSymbol) -> Result<CompanyProfile, DataError> {
        let modules = self.quote_summary(symbol, "assetProfile,price")?;
        let asset = modules.asset_profile;
        let price = modules.price;

        let long_name = price
            .and_then(|p| p.long_name.or(p.short_name))
            .unwrap_or_else(|| symbol.to_string());
        let (business_summary, website, sector, industry) = match asset {
            Some(a) => (a.long_business_summary, a.website, a.sector, a.industry),
            None => (None, None, None, None),
        };
        let logo = website
            .as_deref()
            .and_then(|w| logo_url(&self.logo_base_url, w));

        Ok(CompanyProfile {
            symbol: symbol.clone(),
            long_name,
            business_summary,
            website,
            sector,
            industry,
            logo_url: logo,
        })
    }

    fn recommendations(&self, symbol: &TickerSymbol) -> Result<Vec<Recommendation>, DataError> {
        let modules = self.quote_summary(symbol, "upgradeDowngradeHistory")?;
        let history = modules
            .upgrade_downgrade_history
            .map(|h| h.history)
            .unwrap_or_default();

        history
            .into_iter()
            .map(|g| {
                let date = chrono::DateTime::from_timestamp(g.epoch_grade_date, 0)
                    .map(|dt| dt.naive_utc().date())
                    .ok_or_else(|| {
                        DataError::ResponseFormatChanged(format!(
                            "invalid grade date: {}",
                            g.epoch_grade_date
                        ))
                    })?;
                Ok(Recommendation {
                    date,
                    firm: g.firm,
                    to_grade: g.to_grade,
                    from_grade: g.from_grade,
                    action: g.action,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> YahooProvider {
        YahooProvider::new(&ProviderSettings::default()).unwrap()
    }

    #[test]
    fn chart_url_uses_half_open_midnight_bounds() {
        let url = provider().chart_url(
            "AAPL",
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2020, 1, 10).unwrap(),
        );
        assert!(url.starts_with("https://query2.finance.yahoo.com/v8/finance/chart/AAPL?"));
        assert!(url.contains("period1=1577836800"));
        assert!(url.contains("period2=1578614400"));
        assert!(url.contains("interval=1d"));
    }

    #[test]
    fn summary_url_carries_encoded_crumb() {
        let url = provider()
            .summary_url("AAPL", "assetProfile,price", "ab/c+d")
            .unwrap();
        assert!(url.starts_with("https://query2.finance.yahoo.com/v10/finance/quoteSummary/AAPL?"));
        assert!(url.contains("modules=assetProfile%2Cprice"));
        assert!(url.ends_with("&crumb=ab%2Fc%2Bd"));
    }

    #[test]
    fn parse_chart_keeps_missing_prices_as_nan() {
        let json = r#"{"chart":{"result":[{"timestamp":[1577975400,1578061800],
            "indicators":{"quote":[{"open":[74.06,null],"high":[75.15,null],
            "low":[73.8,null],"close":[75.09,null],"volume":[135480400,0]}],
            "adjclose":[{"adjclose":[73.45,null]}]}}],"error":null}}"#;
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        let bars = YahooProvider::parse_chart("AAPL", resp).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2020, 1, 2).unwrap());
        assert_eq!(bars[0].adj_close, 73.45);
        assert!(bars[1].is_void());
    }

    #[test]
    fn parse_chart_drops_rows_without_volume() {
        let json = r#"{"chart":{"result":[{"timestamp":[1577975400,1578061800,1578321000],
            "indicators":{"quote":[{"open":[74.06,74.29,73.45],"high":[75.15,75.14,74.99],
            "low":[73.8,74.13,73.19],"close":[75.09,74.36,74.95],
            "volume":[135480400,null,118387200]}]}}],"error":null}}"#;
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        let bars = YahooProvider::parse_chart("AAPL", resp).unwrap();
        let dates: Vec<_> = bars.iter().map(|b| b.date).collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2020, 1, 2).unwrap(),
                NaiveDate::from_ymd_opt(2020, 1, 6).unwrap(),
            ]
        );
        assert_eq!(bars[1].volume, 118_387_200);
    }

    #[test]
    fn parse_chart_not_found() {
        let json = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        let err = YahooProvider::parse_chart("ZZZZ", resp).unwrap_err();
        assert!(matches!(err, DataError::SymbolNotFound { .. }));
    }

    #[test]
    fn parse_chart_without_timestamps_is_empty() {
        let json = r#"{"chart":{"result":[{"indicators":{"quote":[{}]}}],"error":null}}"#;
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        assert!(YahooProvider::parse_chart("AAPL", resp).unwrap().is_empty());
    }
}
