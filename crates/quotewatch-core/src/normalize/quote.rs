use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use super::lenient::{
    deserialize_lenient_f64, number_or_zero, percent_or_zero, volume_or_zero,
};
use crate::{FetchError, Quote, Symbol};

pub const GLOBAL_QUOTE_KEY: &str = "Global Quote";

/// Calls further than this from the price never count as at-the-money.
pub const ATM_STRIKE_WINDOW: f64 = 0.5;

#[derive(Debug, Default, Deserialize)]
struct OptionChainPayload {
    #[serde(default)]
    options: Vec<OptionExpiration>,
}

#[derive(Debug, Default, Deserialize)]
struct OptionExpiration {
    #[serde(rename = "callExpiration", default)]
    calls: Vec<OptionContract>,
}

#[derive(Debug, Default, Deserialize)]
struct OptionContract {
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    strike: Option<f64>,
    #[serde(
        rename = "impliedVolatility",
        default,
        deserialize_with = "deserialize_lenient_f64"
    )]
    implied_volatility: Option<f64>,
}

/// Build a [`Quote`] from a `GLOBAL_QUOTE` payload and the matching
/// `OPTION_CHAIN` payload.
pub fn normalize_quote(
    symbol: &Symbol,
    quote_payload: &Value,
    option_chain: &Value,
) -> Result<Quote, FetchError> {
    let fields = quote_section(quote_payload).ok_or_else(|| {
        FetchError::not_found(format!("No data available for symbol: {symbol}"))
    })?;

    let price = number_or_zero(fields, "05. price");

    Ok(Quote {
        symbol: symbol.clone(),
        price,
        volume: volume_or_zero(fields, "06. volume"),
        change: number_or_zero(fields, "09. change"),
        change_percent: percent_or_zero(fields, "10. change percent"),
        implied_volatility: nearest_call_implied_volatility(option_chain, price),
    })
}

fn quote_section(payload: &Value) -> Option<&Map<String, Value>> {
    payload
        .get(GLOBAL_QUOTE_KEY)
        .and_then(Value::as_object)
        .filter(|fields| !fields.is_empty())
}

/// IV of the first-expiration call whose strike is closest to `price`.
///
/// Only strikes strictly within [`ATM_STRIKE_WINDOW`] qualify; ties keep
/// payload order. Returns `None` when the chain has no options, nothing
/// qualifies, or the winner has no usable IV.
pub fn nearest_call_implied_volatility(option_chain: &Value, price: f64) -> Option<f64> {
    let chain = match OptionChainPayload::deserialize(option_chain) {
        Ok(chain) => chain,
        Err(error) => {
            debug!(%error, "option chain payload not understood; skipping implied volatility");
            return None;
        }
    };

    let calls = &chain.options.first()?.calls;
    let mut candidates = calls
        .iter()
        .filter_map(|call| call.strike.map(|strike| ((strike - price).abs(), call)))
        .filter(|(distance, _)| *distance < ATM_STRIKE_WINDOW)
        .collect::<Vec<_>>();
    candidates.sort_by(|left, right| left.0.total_cmp(&right.0));

    candidates
        .first()
        .and_then(|(_, call)| call.implied_volatility)
}
