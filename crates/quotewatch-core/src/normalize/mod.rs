//! Provider payload normalizers.
//!
//! Each normalizer takes the raw JSON returned by the fetch client and either
//! yields a domain record or a [`FetchError`](crate::FetchError) with kind
//! `NotFound` (section absent or empty) or `Malformed` (section present but a
//! field fails validation). Numeric fields are read leniently.

mod history;
mod lenient;
mod quote;
mod statements;

pub use history::{normalize_history, DAILY_SERIES_KEY, HISTORY_LIMIT};
pub use quote::{
    nearest_call_implied_volatility, normalize_quote, ATM_STRIKE_WINDOW, GLOBAL_QUOTE_KEY,
};
pub use statements::{
    normalize_balance_sheet, normalize_income_statement, ANNUAL_REPORTS_KEY, STATEMENT_LIMIT,
};
