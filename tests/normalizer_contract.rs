//! Contract tests for the payload normalizers.
//!
//! Each test feeds a provider-shaped payload through a normalizer and checks
//! the record shape the dashboard relies on.

mod support;

use quotewatch_core::normalize::{
    nearest_call_implied_volatility, normalize_balance_sheet, normalize_history,
    normalize_income_statement, normalize_quote, HISTORY_LIMIT, STATEMENT_LIMIT,
};
use quotewatch_core::{CalendarDate, FetchErrorKind, Symbol};
use serde_json::json;
use support::{
    balance_sheet_reports, daily_series, global_quote, income_statement_reports, option_chain,
};

fn symbol(raw: &str) -> Symbol {
    Symbol::parse(raw).expect("valid symbol")
}

fn date(raw: &str) -> CalendarDate {
    CalendarDate::parse(raw).expect("valid date")
}

// =============================================================================
// Quote + implied volatility
// =============================================================================

#[test]
fn quote_takes_iv_from_the_call_nearest_the_price() {
    // Given: A price of 100 and calls at 99.6, 100.3, and 101.0
    let quote_payload = global_quote("AAPL", 100.0);
    let chain = option_chain(&[(99.6, 0.41), (100.3, 0.28), (101.0, 0.19)]);

    // When: The quote is normalized
    let quote = normalize_quote(&symbol("AAPL"), &quote_payload, &chain).expect("quote");

    // Then: The 100.3 strike wins and 101.0 is outside the window
    assert_eq!(quote.price, 100.0);
    assert_eq!(quote.implied_volatility, Some(0.28));
}

#[test]
fn quote_without_options_has_no_iv() {
    let quote = normalize_quote(&symbol("AAPL"), &global_quote("AAPL", 189.84), &json!({}))
        .expect("quote");

    assert_eq!(quote.implied_volatility, None);
    assert_eq!(quote.volume, 1_200_300);
    assert_eq!(quote.change_percent, 0.8);
}

#[test]
fn strikes_exactly_half_a_dollar_away_do_not_qualify() {
    let chain = option_chain(&[(100.5, 0.3), (99.5, 0.4)]);
    assert_eq!(nearest_call_implied_volatility(&chain, 100.0), None);
}

#[test]
fn equidistant_strikes_keep_payload_order() {
    let chain = option_chain(&[(100.25, 0.3), (99.75, 0.4)]);
    assert_eq!(nearest_call_implied_volatility(&chain, 100.0), Some(0.3));
}

#[test]
fn only_the_first_expiration_is_considered() {
    let chain = json!({
        "options": [
            {"callExpiration": [{"strike": "120", "impliedVolatility": "0.5"}]},
            {"callExpiration": [{"strike": "100", "impliedVolatility": "0.2"}]}
        ]
    });
    assert_eq!(nearest_call_implied_volatility(&chain, 100.0), None);
}

#[test]
fn unexpected_chain_shape_leaves_iv_unset() {
    let chain = json!({"options": "not-a-list"});
    assert_eq!(nearest_call_implied_volatility(&chain, 100.0), None);
}

#[test]
fn empty_global_quote_is_not_found() {
    let error = normalize_quote(&symbol("ZZZZ"), &json!({"Global Quote": {}}), &json!({}))
        .expect_err("no data");

    assert_eq!(error.kind(), FetchErrorKind::NotFound);
    assert_eq!(error.to_string(), "No data available for symbol: ZZZZ");
}

// =============================================================================
// History
// =============================================================================

#[test]
fn history_keeps_the_first_thirty_bars_in_payload_order() {
    // Given: 45 daily bars, newest first
    let payload = daily_series(45);

    // When: The series is normalized
    let series = normalize_history(&symbol("TSLA"), &payload).expect("history");

    // Then: Exactly 30 bars remain, still newest first
    assert_eq!(series.len(), HISTORY_LIMIT);
    assert_eq!(series.bars[0].date, date("2024-06-28"));
    assert_eq!(series.bars[29].date, date("2024-05-30"));
    assert!(series
        .bars
        .windows(2)
        .all(|pair| pair[0].date > pair[1].date));
    assert_eq!(series.bars[0].close, 45.0);
}

#[test]
fn short_history_is_returned_whole() {
    let series = normalize_history(&symbol("GME"), &daily_series(3)).expect("history");

    assert_eq!(series.len(), 3);
    assert_eq!(series.latest().map(|bar| bar.close), Some(3.0));
    let chronological = series.chronological();
    assert_eq!(chronological[0].date, date("2024-06-26"));
}

#[test]
fn missing_time_series_is_not_found() {
    let error = normalize_history(&symbol("GME"), &json!({"Meta Data": {}})).expect_err("absent");

    assert_eq!(error.kind(), FetchErrorKind::NotFound);
    assert_eq!(error.message(), "No historical data available for symbol: GME");
}

#[test]
fn date_keys_with_signed_fields_are_malformed() {
    // Given: A series whose only key has signed month and day fields
    let payload = json!({
        "Time Series (Daily)": {
            "2024-+1-+5": {"1. open": "1", "2. high": "1", "3. low": "1", "4. close": "1"}
        }
    });

    // When: The history is normalized
    let error = normalize_history(&symbol("GME"), &payload).expect_err("bad key");

    // Then: The key is rejected instead of being reformatted
    assert_eq!(error.kind(), FetchErrorKind::Malformed);
    assert!(error.message().contains("2024-+1-+5"));
}

// =============================================================================
// Statements
// =============================================================================

#[test]
fn balance_sheet_keeps_the_first_four_reports_unmodified() {
    // Given: Six annual reports
    let payload = balance_sheet_reports(6);

    // When: The balance sheet is normalized
    let periods = normalize_balance_sheet(&symbol("AAPL"), &payload).expect("balance sheet");

    // Then: The first four are kept in order with values untouched
    assert_eq!(periods.len(), STATEMENT_LIMIT);
    assert_eq!(periods[0].fiscal_date_ending, date("2023-09-30"));
    assert_eq!(periods[3].fiscal_date_ending, date("2020-09-30"));
    assert_eq!(periods[0].total_assets, "350000000000");
    assert_eq!(periods[1].total_assets, "349000000000");
    assert_eq!(periods[0].cash_and_cash_equivalents, "29965000000");
    assert_eq!(periods[0].long_term_debt, "95281000000");
}

#[test]
fn income_statement_keeps_the_first_four_reports_unmodified() {
    let periods =
        normalize_income_statement(&symbol("AAPL"), &income_statement_reports(5)).expect("income");

    assert_eq!(periods.len(), STATEMENT_LIMIT);
    assert_eq!(periods[0].total_revenue, "383285000000");
    assert_eq!(periods[0].net_income, "96995000000");
    assert_eq!(periods[0].eps, "6.13");
    assert_eq!(periods[2].fiscal_date_ending, date("2021-09-30"));
}

#[test]
fn missing_metrics_default_to_zero_strings() {
    let payload = json!({"annualReports": [{"fiscalDateEnding": "2023-12-31"}]});

    let periods = normalize_income_statement(&symbol("INTC"), &payload).expect("income");

    assert_eq!(periods.len(), 1);
    assert_eq!(periods[0].ebitda, "0");
    assert_eq!(periods[0].gross_profit, "0");
}

#[test]
fn fiscal_date_with_signed_year_is_malformed() {
    let payload = json!({"annualReports": [{"fiscalDateEnding": "+2023-12-31"}]});

    let error = normalize_balance_sheet(&symbol("INTC"), &payload).expect_err("bad date");

    assert_eq!(error.kind(), FetchErrorKind::Malformed);
}

#[test]
fn empty_reports_are_not_found_with_statement_specific_messages() {
    let empty = json!({"annualReports": []});

    let balance = normalize_balance_sheet(&symbol("INTC"), &empty).expect_err("empty");
    let income = normalize_income_statement(&symbol("INTC"), &empty).expect_err("empty");

    assert_eq!(balance.kind(), FetchErrorKind::NotFound);
    assert_eq!(balance.message(), "No balance sheet data available for symbol: INTC");
    assert_eq!(income.message(), "No income statement data available for symbol: INTC");
}
