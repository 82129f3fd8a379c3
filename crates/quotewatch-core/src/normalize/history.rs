use serde_json::Value;

use super::lenient::{number_or_zero, volume_or_zero};
use crate::{CalendarDate, FetchError, HistoricalBar, HistorySeries, Symbol};

pub const DAILY_SERIES_KEY: &str = "Time Series (Daily)";

/// Bars kept from the provider's newest-first series.
pub const HISTORY_LIMIT: usize = 30;

/// Take the first [`HISTORY_LIMIT`] entries of a `TIME_SERIES_DAILY` payload
/// in the order the provider sent them (newest first).
///
/// Entries are counted, not calendar days, so gaps from holidays do not widen
/// the window.
pub fn normalize_history(symbol: &Symbol, payload: &Value) -> Result<HistorySeries, FetchError> {
    let series = payload
        .get(DAILY_SERIES_KEY)
        .and_then(Value::as_object)
        .filter(|series| !series.is_empty())
        .ok_or_else(|| {
            FetchError::not_found(format!("No historical data available for symbol: {symbol}"))
        })?;

    let bars = series
        .iter()
        .take(HISTORY_LIMIT)
        .map(|(date, fields)| -> Result<HistoricalBar, FetchError> {
            let date = CalendarDate::parse(date)?;
            let fields = fields.as_object().ok_or_else(|| {
                FetchError::malformed(format!("daily bar for {date} is not an object"))
            })?;

            Ok(HistoricalBar {
                date,
                open: number_or_zero(fields, "1. open"),
                high: number_or_zero(fields, "2. high"),
                low: number_or_zero(fields, "3. low"),
                close: number_or_zero(fields, "4. close"),
                volume: volume_or_zero(fields, "5. volume"),
            })
        })
        .collect::<Result<Vec<_>, FetchError>>()?;

    Ok(HistorySeries::new(symbol.clone(), bars))
}
