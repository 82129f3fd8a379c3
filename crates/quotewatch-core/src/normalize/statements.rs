use serde_json::{Map, Value};

use super::lenient::decimal_string;
use crate::{BalanceSheetPeriod, CalendarDate, FetchError, IncomeStatementPeriod, Symbol};

pub const ANNUAL_REPORTS_KEY: &str = "annualReports";

/// Annual reports kept, newest first.
pub const STATEMENT_LIMIT: usize = 4;

pub fn normalize_balance_sheet(
    symbol: &Symbol,
    payload: &Value,
) -> Result<Vec<BalanceSheetPeriod>, FetchError> {
    annual_reports(payload)
        .ok_or_else(|| {
            FetchError::not_found(format!(
                "No balance sheet data available for symbol: {symbol}"
            ))
        })?
        .iter()
        .take(STATEMENT_LIMIT)
        .map(|report| -> Result<BalanceSheetPeriod, FetchError> {
            let fields = report_fields(report)?;
            Ok(BalanceSheetPeriod {
                fiscal_date_ending: fiscal_date(fields)?,
                total_assets: decimal_string(fields, &["totalAssets"]),
                total_current_assets: decimal_string(fields, &["totalCurrentAssets"]),
                cash_and_cash_equivalents: decimal_string(
                    fields,
                    &[
                        "cashAndCashEquivalents",
                        "cashAndCashEquivalentsAtCarryingValue",
                    ],
                ),
                total_liabilities: decimal_string(fields, &["totalLiabilities"]),
                total_shareholder_equity: decimal_string(fields, &["totalShareholderEquity"]),
                total_current_liabilities: decimal_string(fields, &["totalCurrentLiabilities"]),
                long_term_debt: decimal_string(fields, &["longTermDebt"]),
            })
        })
        .collect()
}

pub fn normalize_income_statement(
    symbol: &Symbol,
    payload: &Value,
) -> Result<Vec<IncomeStatementPeriod>, FetchError> {
    annual_reports(payload)
        .ok_or_else(|| {
            FetchError::not_found(format!(
                "No income statement data available for symbol: {symbol}"
            ))
        })?
        .iter()
        .take(STATEMENT_LIMIT)
        .map(|report| -> Result<IncomeStatementPeriod, FetchError> {
            let fields = report_fields(report)?;
            Ok(IncomeStatementPeriod {
                fiscal_date_ending: fiscal_date(fields)?,
                total_revenue: decimal_string(fields, &["totalRevenue"]),
                gross_profit: decimal_string(fields, &["grossProfit"]),
                operating_income: decimal_string(fields, &["operatingIncome"]),
                net_income: decimal_string(fields, &["netIncome"]),
                ebitda: decimal_string(fields, &["ebitda"]),
                eps: decimal_string(fields, &["eps", "reportedEPS"]),
            })
        })
        .collect()
}

fn annual_reports(payload: &Value) -> Option<&Vec<Value>> {
    payload
        .get(ANNUAL_REPORTS_KEY)
        .and_then(Value::as_array)
        .filter(|reports| !reports.is_empty())
}

fn report_fields(report: &Value) -> Result<&Map<String, Value>, FetchError> {
    report
        .as_object()
        .ok_or_else(|| FetchError::malformed("annual report is not an object"))
}

fn fiscal_date(fields: &Map<String, Value>) -> Result<CalendarDate, FetchError> {
    let raw = fields
        .get("fiscalDateEnding")
        .and_then(Value::as_str)
        .ok_or_else(|| FetchError::malformed("annual report is missing fiscalDateEnding"))?;
    Ok(CalendarDate::parse(raw)?)
}
