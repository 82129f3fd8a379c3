//! Domain records produced by the normalizers and held by the dashboard
//! state.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Quote`] | Price, volume, change and optional implied volatility |
//! | [`HistoricalBar`] | Daily OHLCV bar |
//! | [`HistorySeries`] | Up to 30 bars, newest first |
//! | [`BalanceSheetPeriod`] | Annual balance sheet, metrics as decimal strings |
//! | [`IncomeStatementPeriod`] | Annual income statement, metrics as decimal strings |
//! | [`Symbol`] | Validated ticker |
//! | [`CalendarDate`] | `YYYY-MM-DD` day |

mod date;
mod models;
mod symbol;

pub use date::CalendarDate;
pub use models::{
    BalanceSheetPeriod, HistoricalBar, HistorySeries, IncomeStatementPeriod, Quote, SymbolDetails,
};
pub use symbol::Symbol;
