//! Market data operations: fetch client + normalizers per endpoint.

use std::sync::Arc;

use tracing::debug;

use crate::endpoint::{ApiFunction, EndpointBuilder};
use crate::fetch::FetchClient;
use crate::http_client::HttpClient;
use crate::normalize::{
    normalize_balance_sheet, normalize_history, normalize_income_statement, normalize_quote,
};
use crate::retry::RetryConfig;
use crate::{
    BalanceSheetPeriod, FetchError, HistorySeries, IncomeStatementPeriod, Quote, Symbol,
    SymbolDetails,
};

/// Typed access to the five provider functions quotewatch uses.
#[derive(Clone)]
pub struct MarketDataClient {
    fetcher: FetchClient,
    endpoints: EndpointBuilder,
}

impl MarketDataClient {
    pub fn new(fetcher: FetchClient, endpoints: EndpointBuilder) -> Self {
        Self { fetcher, endpoints }
    }

    /// Client with the default retry policy against `endpoints`.
    pub fn with_http_client(http: Arc<dyn HttpClient>, endpoints: EndpointBuilder) -> Self {
        Self::new(FetchClient::new(http, RetryConfig::default()), endpoints)
    }

    pub fn fetcher(&self) -> &FetchClient {
        &self.fetcher
    }

    pub fn endpoints(&self) -> &EndpointBuilder {
        &self.endpoints
    }

    /// Quote plus nearest-the-money call IV. Both payloads are requested
    /// concurrently; a permanent failure of either fails the quote.
    pub async fn quote(&self, symbol: &Symbol) -> Result<Quote, FetchError> {
        let quote_url = self.endpoints.url(ApiFunction::GlobalQuote, symbol);
        let options_url = self.endpoints.url(ApiFunction::OptionChain, symbol);

        let (quote_payload, option_chain) = tokio::try_join!(
            self.fetcher.fetch(&quote_url),
            self.fetcher.fetch(&options_url)
        )?;

        let quote = normalize_quote(symbol, &quote_payload, &option_chain)?;
        debug!(%symbol, price = quote.price, iv = ?quote.implied_volatility, "quote normalized");
        Ok(quote)
    }

    pub async fn history(&self, symbol: &Symbol) -> Result<HistorySeries, FetchError> {
        let url = self.endpoints.url(ApiFunction::TimeSeriesDaily, symbol);
        let payload = self.fetcher.fetch(&url).await?;
        normalize_history(symbol, &payload)
    }

    pub async fn balance_sheet(
        &self,
        symbol: &Symbol,
    ) -> Result<Vec<BalanceSheetPeriod>, FetchError> {
        let url = self.endpoints.url(ApiFunction::BalanceSheet, symbol);
        let payload = self.fetcher.fetch(&url).await?;
        normalize_balance_sheet(symbol, &payload)
    }

    pub async fn income_statement(
        &self,
        symbol: &Symbol,
    ) -> Result<Vec<IncomeStatementPeriod>, FetchError> {
        let url = self.endpoints.url(ApiFunction::IncomeStatement, symbol);
        let payload = self.fetcher.fetch(&url).await?;
        normalize_income_statement(symbol, &payload)
    }

    /// History and both statements, fetched concurrently.
    pub async fn details(&self, symbol: &Symbol) -> Result<SymbolDetails, FetchError> {
        let (history, balance_sheet, income_statement) = tokio::try_join!(
            self.history(symbol),
            self.balance_sheet(symbol),
            self.income_statement(symbol)
        )?;

        Ok(SymbolDetails {
            history,
            balance_sheet,
            income_statement,
        })
    }
}
