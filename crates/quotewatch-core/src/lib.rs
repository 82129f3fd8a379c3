//! # quotewatch core
//!
//! Market-data fetching for the quotewatch dashboard.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Runtime configuration and environment overrides |
//! | [`controller`] | Polling controller: initial load, refresh, selection |
//! | [`display`] | Formatting helpers for views |
//! | [`domain`] | Quote, bar, and statement records |
//! | [`endpoint`] | Provider URL construction |
//! | [`error`] | Fetch and validation errors |
//! | [`fetch`] | GET + JSON + retry on throttling and transient failure |
//! | [`http_client`] | Transport trait and reqwest implementation |
//! | [`market`] | Typed operations: quote, history, statements |
//! | [`normalize`] | Provider JSON to domain records |
//! | [`pacing`] | Request pacing (fixed interval, token bucket) |
//! | [`retry`] | Retry policy and backoff |
//! | [`state`] | Dashboard state container |
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐      ┌──────────────┐
//! │ View (CLI)      │◀─────│ Store        │
//! └─────────────────┘      └──────▲───────┘
//!                                 │ Action
//! ┌─────────────────┐      ┌──────┴───────┐
//! │ Pacer           │─────▶│ Controller   │
//! └─────────────────┘      └──────┬───────┘
//!                                 ▼
//!                          ┌──────────────┐     ┌──────────────┐
//!                          │ MarketData   │────▶│ Normalizers  │
//!                          └──────┬───────┘     └──────────────┘
//!                                 ▼
//!                          ┌──────────────┐     ┌──────────────┐
//!                          │ FetchClient  │────▶│ HttpClient   │
//!                          └──────────────┘     └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use quotewatch_core::{Config, ReqwestHttpClient, Symbol};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let market = config.market_client(Arc::new(ReqwestHttpClient::new()));
//!
//!     let quote = market.quote(&Symbol::parse("AAPL")?).await?;
//!     println!("AAPL {:.2}", quote.price);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod controller;
pub mod display;
pub mod domain;
pub mod endpoint;
pub mod error;
pub mod fetch;
pub mod http_client;
pub mod market;
pub mod normalize;
pub mod pacing;
pub mod retry;
pub mod state;

pub use config::Config;
pub use controller::{ControllerSettings, PollingController, TaskHandle};
pub use domain::{
    BalanceSheetPeriod, CalendarDate, HistoricalBar, HistorySeries, IncomeStatementPeriod, Quote,
    Symbol, SymbolDetails,
};
pub use endpoint::{ApiFunction, EndpointBuilder};
pub use error::{FetchError, FetchErrorKind, ValidationError};
pub use fetch::FetchClient;
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};
pub use market::MarketDataClient;
pub use pacing::{FixedIntervalGate, Pacer, PacingMode, TokenBucketPacer};
pub use retry::{Backoff, RetryConfig};
pub use state::{Action, DashboardState, Store};
