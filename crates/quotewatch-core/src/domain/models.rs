use serde::{Deserialize, Serialize};

use crate::{CalendarDate, Symbol};

/// Latest quote for one symbol. A refresh replaces the whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: Symbol,
    pub price: f64,
    pub volume: u64,
    pub change: f64,
    pub change_percent: f64,
    /// IV of the call whose strike is nearest the current price, when one
    /// lies within half a currency unit of it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implied_volatility: Option<f64>,
}

/// Daily OHLCV bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalBar {
    pub date: CalendarDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Most recent daily bars for a symbol, newest first as the provider delivers
/// them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySeries {
    pub symbol: Symbol,
    pub bars: Vec<HistoricalBar>,
}

impl HistorySeries {
    pub fn new(symbol: Symbol, bars: Vec<HistoricalBar>) -> Self {
        Self { symbol, bars }
    }

    /// Oldest-first copy of the bars, the order charts expect.
    pub fn chronological(&self) -> Vec<HistoricalBar> {
        self.bars.iter().rev().cloned().collect()
    }

    pub fn latest(&self) -> Option<&HistoricalBar> {
        self.bars.first()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn into_bars(self) -> Vec<HistoricalBar> {
        self.bars
    }
}

/// One annual balance-sheet report. Metrics stay decimal strings exactly as
/// the provider sent them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSheetPeriod {
    pub fiscal_date_ending: CalendarDate,
    pub total_assets: String,
    pub total_current_assets: String,
    pub cash_and_cash_equivalents: String,
    pub total_liabilities: String,
    pub total_shareholder_equity: String,
    pub total_current_liabilities: String,
    pub long_term_debt: String,
}

/// One annual income-statement report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeStatementPeriod {
    pub fiscal_date_ending: CalendarDate,
    pub total_revenue: String,
    pub gross_profit: String,
    pub operating_income: String,
    pub net_income: String,
    pub ebitda: String,
    pub eps: String,
}

/// Everything fetched when a symbol becomes the selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolDetails {
    pub history: HistorySeries,
    pub balance_sheet: Vec<BalanceSheetPeriod>,
    pub income_statement: Vec<IncomeStatementPeriod>,
}
