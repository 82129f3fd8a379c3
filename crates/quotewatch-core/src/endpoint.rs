use std::fmt::{Debug, Display, Formatter};

use crate::Symbol;

pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";

/// Alpha Vantage `function=` values used by quotewatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiFunction {
    GlobalQuote,
    OptionChain,
    TimeSeriesDaily,
    BalanceSheet,
    IncomeStatement,
}

impl ApiFunction {
    pub const ALL: [Self; 5] = [
        Self::GlobalQuote,
        Self::OptionChain,
        Self::TimeSeriesDaily,
        Self::BalanceSheet,
        Self::IncomeStatement,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GlobalQuote => "GLOBAL_QUOTE",
            Self::OptionChain => "OPTION_CHAIN",
            Self::TimeSeriesDaily => "TIME_SERIES_DAILY",
            Self::BalanceSheet => "BALANCE_SHEET",
            Self::IncomeStatement => "INCOME_STATEMENT",
        }
    }

    /// Recover the function from a built URL.
    pub fn from_url(url: &str) -> Option<Self> {
        let query = url.split_once('?').map_or(url, |(_, query)| query);
        let value = query
            .split('&')
            .find_map(|pair| pair.strip_prefix("function="))?;
        Self::ALL.into_iter().find(|function| function.as_str() == value)
    }
}

impl Display for ApiFunction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds query URLs against the provider endpoint.
#[derive(Clone)]
pub struct EndpointBuilder {
    base_url: String,
    api_key: String,
}

impl EndpointBuilder {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, function: ApiFunction, symbol: &Symbol) -> String {
        let separator = if self.base_url.contains('?') { '&' } else { '?' };
        format!(
            "{}{separator}function={}&symbol={}&apikey={}",
            self.base_url,
            function.as_str(),
            urlencoding::encode(symbol.as_str()),
            urlencoding::encode(&self.api_key)
        )
    }
}

impl Default for EndpointBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, "demo")
    }
}

impl Debug for EndpointBuilder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointBuilder")
            .field("base_url", &self.base_url)
            .field("api_key", &"***")
            .finish()
    }
}

/// Replace the `apikey` query value so URLs can be logged.
pub fn redact_api_key(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_owned();
    };

    let query = query
        .split('&')
        .map(|pair| {
            if pair.starts_with("apikey=") {
                "apikey=***"
            } else {
                pair
            }
        })
        .collect::<Vec<_>>()
        .join("&");
    format!("{base}?{query}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbol(raw: &str) -> Symbol {
        Symbol::parse(raw).expect("valid symbol")
    }

    #[test]
    fn builds_query_with_function_symbol_and_key() {
        let endpoints = EndpointBuilder::new(DEFAULT_BASE_URL, "secret-key");

        assert_eq!(
            endpoints.url(ApiFunction::GlobalQuote, &symbol("aapl")),
            "https://www.alphavantage.co/query?function=GLOBAL_QUOTE&symbol=AAPL&apikey=secret-key"
        );
    }

    #[test]
    fn appends_to_existing_query_string() {
        let endpoints = EndpointBuilder::new("http://localhost:8080/query?datatype=json", "k");

        assert_eq!(
            endpoints.url(ApiFunction::BalanceSheet, &symbol("INTC")),
            "http://localhost:8080/query?datatype=json&function=BALANCE_SHEET&symbol=INTC&apikey=k"
        );
    }

    #[test]
    fn encodes_key_characters() {
        let endpoints = EndpointBuilder::new(DEFAULT_BASE_URL, "a&b");
        let url = endpoints.url(ApiFunction::OptionChain, &symbol("GME"));

        assert!(url.ends_with("apikey=a%26b"), "{url}");
    }

    #[test]
    fn recovers_function_from_url() {
        let endpoints = EndpointBuilder::default();
        for function in ApiFunction::ALL {
            let url = endpoints.url(function, &symbol("TSLA"));
            assert_eq!(ApiFunction::from_url(&url), Some(function));
        }
        assert_eq!(ApiFunction::from_url("https://example.test/"), None);
    }

    #[test]
    fn redacts_api_key_for_logging() {
        let redacted = redact_api_key(
            "https://www.alphavantage.co/query?function=GLOBAL_QUOTE&symbol=AAPL&apikey=secret",
        );

        assert!(!redacted.contains("secret"));
        assert!(redacted.ends_with("&apikey=***"));
    }

    #[test]
    fn debug_output_hides_key() {
        let endpoints = EndpointBuilder::new(DEFAULT_BASE_URL, "secret");
        assert!(!format!("{endpoints:?}").contains("secret"));
    }
}
