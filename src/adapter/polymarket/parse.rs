//! Gamma API market payload parsing.
//!
//! The markets endpoint is served in two shapes depending on the route and
//! API generation: Gamma-format objects carry `outcomes`/`outcomePrices` as
//! JSON-encoded string arrays (sometimes plain arrays), while CLOB-format
//! objects carry a `tokens` array with `outcome` and `price` fields. Both
//! are accepted here.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::domain::MarketSnapshot;
use crate::error::FetchError;

/// Parse one raw market object into a validated snapshot.
pub(crate) fn parse_market(
    data: &Value,
    fetched_at: DateTime<Utc>,
) -> Result<MarketSnapshot, FetchError> {
    let market_id = string_field(data, &["conditionId", "condition_id", "id"]).ok_or_else(
        || FetchError::Malformed {
            market_id: "<unknown>".into(),
            reason: "missing market id field".into(),
        },
    )?;

    let question = string_field(data, &["question", "title"]).unwrap_or_default();

    let (yes_price, no_price) = extract_prices(data).ok_or_else(|| FetchError::Malformed {
        market_id: market_id.clone(),
        reason: "could not extract YES/NO prices".into(),
    })?;

    let volume = data
        .get("volumeNum")
        .and_then(value_to_decimal)
        .or_else(|| data.get("volume").and_then(value_to_decimal));
    let liquidity = data
        .get("liquidityNum")
        .and_then(value_to_decimal)
        .or_else(|| data.get("liquidity").and_then(value_to_decimal));

    let active = data.get("active").and_then(Value::as_bool).unwrap_or(true);
    let closed = data.get("closed").and_then(Value::as_bool).unwrap_or(false);

    validate(MarketSnapshot {
        market_id: market_id.into(),
        question,
        yes_price,
        no_price,
        volume,
        liquidity,
        active,
        closed,
        fetched_at,
    })
}

/// Range checks on the parsed snapshot. Out-of-range values are a
/// data-quality failure: the market is skipped this cycle rather than fed
/// into detection.
fn validate(snapshot: MarketSnapshot) -> Result<MarketSnapshot, FetchError> {
    let in_unit = |p: Decimal| p >= Decimal::ZERO && p <= Decimal::ONE;

    if !in_unit(snapshot.yes_price) {
        return Err(FetchError::DataQuality {
            market_id: snapshot.market_id.to_string(),
            field: "yes_price",
            reason: format!("{} outside [0, 1]", snapshot.yes_price),
        });
    }
    if !in_unit(snapshot.no_price) {
        return Err(FetchError::DataQuality {
            market_id: snapshot.market_id.to_string(),
            field: "no_price",
            reason: format!("{} outside [0, 1]", snapshot.no_price),
        });
    }
    if snapshot.volume.is_some_and(|v| v < Decimal::ZERO) {
        return Err(FetchError::DataQuality {
            market_id: snapshot.market_id.to_string(),
            field: "volume",
            reason: "negative".into(),
        });
    }
    if snapshot.liquidity.is_some_and(|l| l < Decimal::ZERO) {
        return Err(FetchError::DataQuality {
            market_id: snapshot.market_id.to_string(),
            field: "liquidity",
            reason: "negative".into(),
        });
    }

    Ok(snapshot)
}

/// Try Gamma `outcomes`/`outcomePrices` first, then the CLOB `tokens` array.
fn extract_prices(data: &Value) -> Option<(Decimal, Decimal)> {
    let mut yes_price = None;
    let mut no_price = None;

    let outcomes = data.get("outcomes").and_then(embedded_array);
    let prices = data.get("outcomePrices").and_then(embedded_array);

    if let (Some(outcomes), Some(prices)) = (outcomes, prices) {
        if outcomes.len() == 2 && prices.len() == 2 {
            for (outcome, price) in outcomes.iter().zip(prices.iter()) {
                let Some(name) = outcome.as_str() else {
                    continue;
                };
                let Some(price) = value_to_decimal(price) else {
                    continue;
                };
                assign_outcome(name, price, &mut yes_price, &mut no_price);
            }
        }
    }

    if yes_price.is_none() || no_price.is_none() {
        if let Some(tokens) = data.get("tokens").and_then(Value::as_array) {
            for token in tokens {
                let Some(name) = token.get("outcome").and_then(Value::as_str) else {
                    continue;
                };
                let Some(price) = token.get("price").and_then(value_to_decimal) else {
                    continue;
                };
                assign_outcome(name, price, &mut yes_price, &mut no_price);
            }
        }
    }

    Some((yes_price?, no_price?))
}

fn assign_outcome(
    name: &str,
    price: Decimal,
    yes_price: &mut Option<Decimal>,
    no_price: &mut Option<Decimal>,
) {
    match name.to_ascii_lowercase().as_str() {
        "yes" | "long" if yes_price.is_none() => *yes_price = Some(price),
        "no" | "short" if no_price.is_none() => *no_price = Some(price),
        _ => {}
    }
}

fn string_field(data: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| data.get(k).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .map(str::to_owned)
}

/// An array that may arrive either in place or JSON-encoded inside a string.
fn embedded_array(value: &Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items.clone()),
        Value::String(s) => serde_json::from_str(s).ok(),
        _ => None,
    }
}

fn value_to_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => n.as_f64().and_then(Decimal::from_f64_retain),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn parses_gamma_format_with_stringified_arrays() {
        let data = json!({
            "conditionId": "0xdeadbeef",
            "question": "Will X happen?",
            "outcomes": "[\"Yes\", \"No\"]",
            "outcomePrices": "[\"0.62\", \"0.39\"]",
            "volumeNum": 12345.5,
            "liquidityNum": "678.25",
            "active": true,
            "closed": false
        });

        let snap = parse_market(&data, Utc::now()).unwrap();
        assert_eq!(snap.market_id.as_str(), "0xdeadbeef");
        assert_eq!(snap.yes_price, dec!(0.62));
        assert_eq!(snap.no_price, dec!(0.39));
        assert_eq!(snap.liquidity, Some(dec!(678.25)));
        assert!(snap.is_tradeable());
    }

    #[test]
    fn falls_back_to_clob_tokens_format() {
        let data = json!({
            "condition_id": "0xfeed",
            "question": "Will Y happen?",
            "tokens": [
                { "outcome": "Yes", "price": 0.25 },
                { "outcome": "No", "price": 0.76 }
            ]
        });

        let snap = parse_market(&data, Utc::now()).unwrap();
        assert_eq!(snap.yes_price, dec!(0.25));
        assert_eq!(snap.no_price, dec!(0.76));
    }

    #[test]
    fn missing_prices_are_malformed() {
        let data = json!({
            "conditionId": "0x1",
            "question": "?",
            "outcomes": "[\"Up\", \"Down\"]",
            "outcomePrices": "[\"0.5\", \"0.5\"]"
        });

        let err = parse_market(&data, Utc::now()).unwrap_err();
        assert!(matches!(err, FetchError::Malformed { .. }));
    }

    #[test]
    fn missing_id_is_malformed() {
        let data = json!({ "question": "?" });
        assert!(matches!(
            parse_market(&data, Utc::now()),
            Err(FetchError::Malformed { .. })
        ));
    }

    #[test]
    fn out_of_range_price_is_data_quality_failure() {
        let data = json!({
            "conditionId": "0x2",
            "outcomes": ["Yes", "No"],
            "outcomePrices": ["1.4", "0.1"]
        });

        let err = parse_market(&data, Utc::now()).unwrap_err();
        assert!(matches!(
            err,
            FetchError::DataQuality { field: "yes_price", .. }
        ));
    }

    #[test]
    fn closed_flag_is_surfaced() {
        let data = json!({
            "conditionId": "0x3",
            "outcomes": ["Yes", "No"],
            "outcomePrices": ["0.9", "0.1"],
            "closed": true
        });

        let snap = parse_market(&data, Utc::now()).unwrap();
        assert!(snap.closed);
        assert!(!snap.is_tradeable());
    }
}
