//! YahooProvider against a local mock HTTP server.

use chrono::NaiveDate;
use mockito::{Matcher, Mock, Server};
use screener_core::config::ProviderSettings;
use screener_core::data::{DataError, MarketDataProvider, YahooProvider};
use screener_core::domain::{latest_rows, TickerSymbol};

fn provider(server: &Server) -> YahooProvider {
    let settings = ProviderSettings {
        base_url: server.url(),
        cookie_url: format!("{}/session", server.url()),
        ..ProviderSettings::default()
    };
    YahooProvider::new(&settings).unwrap()
}

const CRUMB: &str = "Xq7/crumb.9";

/// Cookie page and crumb endpoint. The crumb is only issued to a client
/// that kept the session cookie.
fn session(server: &mut Server) -> (Mock, Mock) {
    let cookie = server
        .mock("GET", "/session")
        .with_status(404)
        .with_header("set-cookie", "A3=d=AQAB; Path=/")
        .expect(1)
        .create();
    let crumb = server
        .mock("GET", "/v1/test/getcrumb")
        .match_header("cookie", Matcher::Regex("A3=d=AQAB".into()))
        .with_status(200)
        .with_body(CRUMB)
        .expect(1)
        .create();
    (cookie, crumb)
}

fn summary_query(modules: &str) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("modules".into(), modules.into()),
        Matcher::UrlEncoded("crumb".into(), CRUMB.into()),
    ])
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn sym(s: &str) -> TickerSymbol {
    TickerSymbol::new(s).unwrap()
}

// Five sessions, 2020-01-02 .. 2020-01-08, at 14:30 UTC market open.
const CHART_5_DAYS: &str = r#"{"chart":{"result":[{
    "meta":{"symbol":"AAPL","currency":"USD"},
    "timestamp":[1577975400,1578061800,1578321000,1578407400,1578493800],
    "indicators":{
      "quote":[{
        "open":[74.06,74.29,73.45,74.96,74.29],
        "high":[75.15,75.14,74.99,75.22,76.11],
        "low":[73.80,74.13,73.19,74.37,74.29],
        "close":[75.09,74.36,74.95,74.60,75.80],
        "volume":[135480400,146322800,118387200,108872000,132079200]
      }],
      "adjclose":[{"adjclose":[73.45,72.74,73.31,72.97,74.15]}]
    }}],"error":null}}"#;

#[test]
fn history_five_trading_days() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/v8/finance/chart/AAPL")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("period1".into(), "1577836800".into()),
            Matcher::UrlEncoded("period2".into(), "1578614400".into()),
            Matcher::UrlEncoded("interval".into(), "1d".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(CHART_5_DAYS)
        .create();

    let series = provider(&server)
        .history(&sym("AAPL"), d(2020, 1, 1), d(2020, 1, 10))
        .unwrap();

    mock.assert();
    assert_eq!(series.len(), 5);
    assert_eq!(series.first_date(), Some(d(2020, 1, 2)));
    assert_eq!(series.last_date(), Some(d(2020, 1, 8)));
    assert_eq!(series.bars()[0].volume, 135_480_400);
    assert_eq!(series.returns().len(), 4);
}

#[test]
fn dotted_symbols_use_dash_form() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/v8/finance/chart/BRK-B")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(CHART_5_DAYS)
        .create();

    let series = provider(&server)
        .history(&sym("BRK.B"), d(2020, 1, 1), d(2020, 1, 10))
        .unwrap();
    mock.assert();
    assert_eq!(series.symbol.as_str(), "BRK.B");
}

#[test]
fn empty_range_is_empty_result() {
    let mut server = Server::new();
    server
        .mock("GET", "/v8/finance/chart/AAPL")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"chart":{"result":[{"meta":{},"indicators":{"quote":[{}]}}],"error":null}}"#)
        .create();

    let err = provider(&server)
        .history(&sym("AAPL"), d(2020, 1, 4), d(2020, 1, 6))
        .unwrap_err();
    assert!(matches!(err, DataError::EmptyResult { .. }));
}

#[test]
fn http_404_is_symbol_not_found() {
    let mut server = Server::new();
    server
        .mock("GET", "/v8/finance/chart/ZZZZ")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found"}}}"#)
        .create();

    let err = provider(&server)
        .history(&sym("ZZZZ"), d(2020, 1, 1), d(2020, 1, 10))
        .unwrap_err();
    assert!(matches!(err, DataError::SymbolNotFound { .. }));
}

#[test]
fn http_401_is_authentication_required() {
    let mut server = Server::new();
    session(&mut server);
    server
        .mock("GET", "/v10/finance/quoteSummary/AAPL")
        .match_query(Matcher::Any)
        .with_status(401)
        .create();

    let err = provider(&server).profile(&sym("AAPL")).unwrap_err();
    assert!(matches!(err, DataError::AuthenticationRequired(_)));
}

#[test]
fn quote_summary_sends_cookie_and_crumb_once_per_session() {
    let mut server = Server::new();
    let (cookie, crumb) = session(&mut server);
    let summary = server
        .mock("GET", "/v10/finance/quoteSummary/AAPL")
        .match_header("cookie", Matcher::Regex("A3=d=AQAB".into()))
        .match_query(summary_query("upgradeDowngradeHistory"))
        .with_status(200)
        .with_body(r#"{"quoteSummary":{"result":[{}],"error":null}}"#)
        .expect(2)
        .create();

    let yahoo = provider(&server);
    assert!(yahoo.recommendations(&sym("AAPL")).unwrap().is_empty());
    assert!(yahoo.recommendations(&sym("AAPL")).unwrap().is_empty());

    summary.assert();
    cookie.assert();
    crumb.assert();
}

#[test]
fn refused_crumb_is_authentication_required() {
    let mut server = Server::new();
    server
        .mock("GET", "/session")
        .with_status(404)
        .create();
    server
        .mock("GET", "/v1/test/getcrumb")
        .with_status(401)
        .with_body("Unauthorized")
        .create();
    let summary = server
        .mock("GET", "/v10/finance/quoteSummary/AAPL")
        .match_query(Matcher::Any)
        .expect(0)
        .create();

    let err = provider(&server).profile(&sym("AAPL")).unwrap_err();
    assert!(matches!(err, DataError::AuthenticationRequired(_)));
    summary.assert();
}

#[test]
fn consent_page_instead_of_crumb_is_authentication_required() {
    let mut server = Server::new();
    server
        .mock("GET", "/session")
        .with_status(200)
        .create();
    server
        .mock("GET", "/v1/test/getcrumb")
        .with_status(200)
        .with_body("<html>consent</html>")
        .create();

    let err = provider(&server).profile(&sym("AAPL")).unwrap_err();
    assert!(matches!(err, DataError::AuthenticationRequired(_)));
}

#[test]
fn server_error_is_http() {
    let mut server = Server::new();
    server
        .mock("GET", "/v8/finance/chart/AAPL")
        .match_query(Matcher::Any)
        .with_status(503)
        .create();

    let err = provider(&server)
        .history(&sym("AAPL"), d(2020, 1, 1), d(2020, 1, 10))
        .unwrap_err();
    assert!(matches!(err, DataError::Http { status: 503, .. }));
    assert_eq!(err.category(), "network");
}

#[test]
fn garbage_body_is_format_change() {
    let mut server = Server::new();
    server
        .mock("GET", "/v8/finance/chart/AAPL")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>consent</html>")
        .create();

    let err = provider(&server)
        .history(&sym("AAPL"), d(2020, 1, 1), d(2020, 1, 10))
        .unwrap_err();
    assert!(matches!(err, DataError::ResponseFormatChanged(_)));
}

#[test]
fn profile_from_quote_summary() {
    let mut server = Server::new();
    session(&mut server);
    let mock = server
        .mock("GET", "/v10/finance/quoteSummary/AAPL")
        .match_query(summary_query("assetProfile,price"))
        .with_status(200)
        .with_body(
            r#"{"quoteSummary":{"result":[{
                "assetProfile":{
                  "longBusinessSummary":"Apple Inc. designs smartphones.",
                  "website":"https://www.apple.com",
                  "sector":"Technology",
                  "industry":"Consumer Electronics"
                },
                "price":{"longName":"Apple Inc.","shortName":"Apple"}
              }],"error":null}}"#,
        )
        .create();

    let profile = provider(&server).profile(&sym("AAPL")).unwrap();
    mock.assert();
    assert_eq!(profile.long_name, "Apple Inc.");
    assert_eq!(
        profile.business_summary.as_deref(),
        Some("Apple Inc. designs smartphones.")
    );
    assert_eq!(
        profile.logo_url.as_deref(),
        Some("https://logo.clearbit.com/apple.com")
    );
    assert_eq!(profile.sector.as_deref(), Some("Technology"));
}

#[test]
fn profile_without_modules_falls_back_to_symbol() {
    let mut server = Server::new();
    session(&mut server);
    server
        .mock("GET", "/v10/finance/quoteSummary/XYZ")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"quoteSummary":{"result":[{}],"error":null}}"#)
        .create();

    let profile = provider(&server).profile(&sym("XYZ")).unwrap();
    assert_eq!(profile.long_name, "XYZ");
    assert!(profile.logo_url.is_none());
}

#[test]
fn recommendations_from_upgrade_history() {
    let mut server = Server::new();
    session(&mut server);
    server
        .mock("GET", "/v10/finance/quoteSummary/AAPL")
        .match_query(summary_query("upgradeDowngradeHistory"))
        .with_status(200)
        .with_body(
            r#"{"quoteSummary":{"result":[{"upgradeDowngradeHistory":{"history":[
                {"epochGradeDate":1578528000,"firm":"Morgan Stanley","toGrade":"Overweight","fromGrade":"","action":"main"},
                {"epochGradeDate":1578441600,"firm":"Wedbush","toGrade":"Outperform","fromGrade":"Neutral","action":"up"},
                {"epochGradeDate":1578355200,"firm":"","toGrade":"Buy","fromGrade":"","action":"init"}
              ]}}],"error":null}}"#,
        )
        .create();

    let recs = provider(&server).recommendations(&sym("AAPL")).unwrap();
    assert_eq!(recs.len(), 3);
    assert_eq!(recs[0].date, d(2020, 1, 9));
    assert_eq!(recs[1].action.as_deref(), Some("up"));

    let rows = latest_rows(&recs, 10);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].firm, "Wedbush");
    assert_eq!(rows[1].to_grade, "Overweight");
}
