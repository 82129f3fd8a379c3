//! Scripted transport and provider payload fixtures shared by the
//! integration suites.

#![allow(dead_code)]

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use quotewatch_core::{
    ApiFunction, EndpointBuilder, FetchClient, HttpClient, HttpError, HttpRequest, HttpResponse,
    MarketDataClient, RetryConfig,
};
use serde_json::{json, Map, Value};
use tokio::time::Instant;

pub const TEST_BASE_URL: &str = "https://av.test/query";
pub const TEST_API_KEY: &str = "test-key";

type Responder =
    dyn Fn(ApiFunction, &str, usize) -> Result<HttpResponse, HttpError> + Send + Sync;

/// One request seen by [`ScriptedHttp`].
#[derive(Debug, Clone)]
pub struct Call {
    pub function: ApiFunction,
    pub symbol: String,
    pub accept: Option<String>,
    pub at: Instant,
}

/// Transport that answers from a closure keyed by provider function, symbol,
/// and how many times that pair has been requested before.
pub struct ScriptedHttp {
    responder: Box<Responder>,
    delays: HashMap<(ApiFunction, String), Duration>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedHttp {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(ApiFunction, &str, usize) -> Result<HttpResponse, HttpError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            delays: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every function answers with healthy data for every symbol.
    pub fn healthy() -> Self {
        Self::new(|function, symbol, _| Ok(HttpResponse::ok_json(healthy_body(function, symbol))))
    }

    /// Hold responses for `function`/`symbol` for `delay` before answering.
    pub fn with_delay(mut self, function: ApiFunction, symbol: &str, delay: Duration) -> Self {
        self.delays.insert((function, symbol.to_owned()), delay);
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn count(&self, function: ApiFunction, symbol: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.function == function && call.symbol == symbol)
            .count()
    }

    pub fn total(&self) -> usize {
        self.calls.lock().expect("calls lock").len()
    }

    /// Start times of `GLOBAL_QUOTE` requests, in order.
    pub fn quote_starts(&self) -> Vec<(String, Instant)> {
        self.calls()
            .into_iter()
            .filter(|call| call.function == ApiFunction::GlobalQuote)
            .map(|call| (call.symbol, call.at))
            .collect()
    }
}

impl HttpClient for ScriptedHttp {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        Box::pin(async move {
            let function = ApiFunction::from_url(&request.url).expect("known function in url");
            let symbol = symbol_from_url(&request.url);

            let previous = {
                let mut calls = self.calls.lock().expect("calls lock");
                let previous = calls
                    .iter()
                    .filter(|call| call.function == function && call.symbol == symbol)
                    .count();
                calls.push(Call {
                    function,
                    symbol: symbol.clone(),
                    accept: request.headers.get("accept").cloned(),
                    at: Instant::now(),
                });
                previous
            };

            if let Some(delay) = self.delays.get(&(function, symbol.clone())) {
                tokio::time::sleep(*delay).await;
            }

            (self.responder)(function, &symbol, previous)
        })
    }
}

fn symbol_from_url(url: &str) -> String {
    url.split_once('?')
        .map_or(url, |(_, query)| query)
        .split('&')
        .find_map(|pair| pair.strip_prefix("symbol="))
        .unwrap_or_default()
        .to_owned()
}

pub fn endpoints() -> EndpointBuilder {
    EndpointBuilder::new(TEST_BASE_URL, TEST_API_KEY)
}

pub fn fetch_client(http: Arc<ScriptedHttp>) -> FetchClient {
    FetchClient::new(http, RetryConfig::default())
}

pub fn market(http: Arc<ScriptedHttp>) -> MarketDataClient {
    MarketDataClient::with_http_client(http, endpoints())
}

pub fn url(function: ApiFunction, symbol: &str) -> String {
    let symbol = quotewatch_core::Symbol::parse(symbol).expect("valid symbol");
    endpoints().url(function, &symbol)
}

// =============================================================================
// Provider payloads
// =============================================================================

pub fn ok(value: Value) -> Result<HttpResponse, HttpError> {
    Ok(HttpResponse::ok_json(value.to_string()))
}

pub fn rate_limit_note() -> Value {
    json!({
        "Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute and 500 calls per day."
    })
}

pub fn error_message(message: &str) -> Value {
    json!({ "Error Message": message })
}

pub fn global_quote(symbol: &str, price: f64) -> Value {
    json!({
        "Global Quote": {
            "01. symbol": symbol,
            "05. price": format!("{price:.4}"),
            "06. volume": "1200300",
            "09. change": "1.5000",
            "10. change percent": "0.8000%"
        }
    })
}

/// First expiration's calls as `(strike, implied volatility)` pairs.
pub fn option_chain(calls: &[(f64, f64)]) -> Value {
    let calls = calls
        .iter()
        .map(|(strike, iv)| {
            json!({"strike": strike.to_string(), "impliedVolatility": iv.to_string()})
        })
        .collect::<Vec<_>>();
    json!({ "options": [ { "callExpiration": calls } ] })
}

/// `count` daily bars, newest first, closes counting down from `count`.
pub fn daily_series(count: usize) -> Value {
    let start = time::Date::from_calendar_date(2024, time::Month::June, 28).expect("valid date");
    let mut series = Map::new();
    for offset in 0..count {
        let date = start - time::Duration::days(offset as i64);
        let close = (count - offset) as f64;
        series.insert(
            date_key(date),
            json!({
                "1. open": format!("{close:.4}"),
                "2. high": format!("{:.4}", close + 1.0),
                "3. low": format!("{:.4}", close - 0.5),
                "4. close": format!("{close:.4}"),
                "5. volume": "1000"
            }),
        );
    }
    json!({
        "Meta Data": {"2. Symbol": "TEST"},
        "Time Series (Daily)": Value::Object(series)
    })
}

fn date_key(date: time::Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// `count` annual balance-sheet reports, fiscal years descending from 2023.
pub fn balance_sheet_reports(count: usize) -> Value {
    let reports = (0..count)
        .map(|index| {
            json!({
                "fiscalDateEnding": format!("{}-09-30", 2023 - index as i32),
                "totalAssets": format!("{}", 350_000_000_000_u64 - index as u64 * 1_000_000_000),
                "totalCurrentAssets": "143566000000",
                "cashAndCashEquivalentsAtCarryingValue": "29965000000",
                "totalLiabilities": "290437000000",
                "totalShareholderEquity": "62146000000",
                "totalCurrentLiabilities": "145308000000",
                "longTermDebt": "95281000000"
            })
        })
        .collect::<Vec<_>>();
    json!({ "symbol": "TEST", "annualReports": reports })
}

/// `count` annual income-statement reports, fiscal years descending from 2023.
pub fn income_statement_reports(count: usize) -> Value {
    let reports = (0..count)
        .map(|index| {
            json!({
                "fiscalDateEnding": format!("{}-09-30", 2023 - index as i32),
                "totalRevenue": "383285000000",
                "grossProfit": "169148000000",
                "operatingIncome": "114301000000",
                "netIncome": "96995000000",
                "ebitda": "125820000000",
                "reportedEPS": "6.13"
            })
        })
        .collect::<Vec<_>>();
    json!({ "symbol": "TEST", "annualReports": reports })
}

/// Healthy body for any function: price 100, one call at strike 100.2.
pub fn healthy_body(function: ApiFunction, symbol: &str) -> String {
    let value = match function {
        ApiFunction::GlobalQuote => global_quote(symbol, 100.0),
        ApiFunction::OptionChain => option_chain(&[(100.2, 0.31)]),
        ApiFunction::TimeSeriesDaily => daily_series(5),
        ApiFunction::BalanceSheet => balance_sheet_reports(4),
        ApiFunction::IncomeStatement => income_statement_reports(4),
    };
    value.to_string()
}
