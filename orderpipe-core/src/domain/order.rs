//! Order record as it appears on one line of the transaction log.

use super::Symbol;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// A single trading order decoded from the input feed.
///
/// Any JSON object is an order: absent or `null` fields take their zero
/// value, the same as an empty string id. A field of the wrong JSON type
/// still fails the decode. Orders are never mutated after decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Order {
    /// Unique within a run; used as the request path segment.
    #[serde(rename = "order_id", deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub symbol: Symbol,
    #[serde(deserialize_with = "null_as_default")]
    pub quantity: i64,
    /// Accepts a JSON number or a decimal string. Numbers beyond the
    /// `Decimal` range saturate to its bounds.
    #[serde(deserialize_with = "lenient_price")]
    pub price: Decimal,
    /// Expected to be "buy" or "sell", compared verbatim by the filter.
    #[serde(deserialize_with = "null_as_default")]
    pub side: String,
    pub timestamp: Option<DateTime<Utc>>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_price<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(Decimal::ZERO),
        Some(serde_json::Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                return Ok(Decimal::from(i));
            }
            if let Some(u) = n.as_u64() {
                return Ok(Decimal::from(u));
            }
            let text = n.to_string();
            if let Ok(price) =
                Decimal::from_str(&text).or_else(|_| Decimal::from_scientific(&text))
            {
                return Ok(price);
            }
            match n.as_f64() {
                Some(f) => Ok(Decimal::from_f64(f).unwrap_or(if f.abs() < 1.0 {
                    Decimal::ZERO
                } else if f.is_sign_negative() {
                    Decimal::MIN
                } else {
                    Decimal::MAX
                })),
                None => Err(de::Error::custom(format!("unrepresentable price {text}"))),
            }
        }
        Some(serde_json::Value::String(s)) => Decimal::from_str(&s)
            .or_else(|_| Decimal::from_scientific(&s))
            .map_err(|e| de::Error::custom(format!("invalid price {s:?}: {e}"))),
        Some(other) => Err(de::Error::invalid_type(
            de::Unexpected::Other(&other.to_string()),
            &"a number or a decimal string",
        )),
    }
}

impl Order {
    /// Decode one feed line.
    pub fn from_json_slice(line: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(line)
    }

    /// Short human description used in log lines, e.g. `sell 10 TSLA at $250.50`.
    pub fn describe(&self) -> String {
        format!(
            "{} {} {} at ${:.2}",
            self.side,
            self.quantity,
            self.symbol,
            self.price.round_dp(2)
        )
    }
}
