//! Field resolution and record mapping.
//!
//! Producers name the same logical field differently (`size`, `quantity`,
//! `contracts`, ...). Each logical field gets one ordered alias list here and
//! raw records are mapped into typed values in a single place.

use crate::services::timestamp;
use crate::services::units::CashUnit;
use crate::types::{Fill, Settlement, TradeAction};
use serde_json::Value;

/// Ordered list of keys that may carry one logical field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldAliases {
    keys: &'static [&'static str],
}

impl FieldAliases {
    pub const fn new(keys: &'static [&'static str]) -> Self {
        Self { keys }
    }

    pub fn keys(&self) -> &'static [&'static str] {
        self.keys
    }

    /// First defined (present and non-null) value among the aliases.
    pub fn resolve<'a>(&self, record: &'a Value) -> Option<&'a Value> {
        self.keys
            .iter()
            .filter_map(|key| record.get(*key))
            .find(|value| !value.is_null())
    }

    /// First defined value as a number.
    ///
    /// A defined but non-numeric value yields `None`; later aliases are not
    /// consulted.
    pub fn number(&self, record: &Value) -> Option<f64> {
        self.resolve(record).and_then(as_number)
    }

    /// First defined value as a number, 0 when missing or invalid.
    pub fn number_or_zero(&self, record: &Value) -> f64 {
        self.number(record).unwrap_or(0.0)
    }

    /// First defined value as text. Numbers and booleans are stringified.
    pub fn text(&self, record: &Value) -> Option<String> {
        match self.resolve(record)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// First defined value as text, empty when missing.
    pub fn text_or_empty(&self, record: &Value) -> String {
        self.text(record).unwrap_or_default()
    }

    /// First defined value as an array slice, empty when missing or not an array.
    pub fn array<'a>(&self, record: &'a Value) -> &'a [Value] {
        match self.resolve(record) {
            Some(Value::Array(items)) => items.as_slice(),
            _ => &[],
        }
    }
}

/// Interpret a JSON value as a finite number.
///
/// Numeric strings are accepted since several producers serialize decimals
/// as text.
pub fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Alias lists for every logical field the dashboard reads.
pub mod aliases {
    use super::FieldAliases;

    pub const FILL_SIZE: FieldAliases =
        FieldAliases::new(&["size", "quantity", "contracts", "contracts_count", "count"]);
    pub const FILL_PRICE: FieldAliases = FieldAliases::new(&["price"]);
    pub const FILL_ACTION: FieldAliases = FieldAliases::new(&["action"]);
    pub const FILL_SIDE: FieldAliases = FieldAliases::new(&["side"]);

    pub const TICKER: FieldAliases =
        FieldAliases::new(&["ticker", "market_ticker", "market_id", "market"]);
    pub const TIMESTAMP: FieldAliases = FieldAliases::new(&[
        "time",
        "ts",
        "created_time",
        "created_ts",
        "settled_time",
        "timestamp",
    ]);

    pub const CASH_CHANGE: FieldAliases = FieldAliases::new(&["cash_change", "cashChange"]);
    pub const OUTCOME: FieldAliases =
        FieldAliases::new(&["outcome", "result", "market_result"]);

    pub const FILL_LISTS: FieldAliases =
        FieldAliases::new(&["fills_last_1_day", "fills_last_n_days", "fills"]);
    pub const SETTLEMENT_LISTS: FieldAliases = FieldAliases::new(&[
        "settlements_last_1_day",
        "settlements_last_n_days",
        "settlements",
    ]);
    pub const GENERATED_AT: FieldAliases = FieldAliases::new(&["generated_at", "last_updated"]);
    pub const DRY_RUN: FieldAliases = FieldAliases::new(&["dry_run"]);
    pub const FORECAST: FieldAliases = FieldAliases::new(&["forecast"]);
}

/// Map a raw fill record.
pub fn map_fill(record: &Value) -> Fill {
    Fill {
        ticker: aliases::TICKER.text_or_empty(record),
        action: aliases::FILL_ACTION
            .text(record)
            .and_then(|label| TradeAction::parse(&label)),
        side: aliases::FILL_SIDE.text_or_empty(record),
        size: aliases::FILL_SIZE.number_or_zero(record),
        price: aliases::FILL_PRICE.number_or_zero(record),
        ts_ms: timestamp::resolve(record, &aliases::TIMESTAMP),
    }
}

/// Map a raw settlement record, converting its cash change to dollars.
pub fn map_settlement(record: &Value, unit: CashUnit) -> Settlement {
    Settlement {
        ticker: aliases::TICKER.text_or_empty(record),
        outcome: aliases::OUTCOME.text_or_empty(record),
        cash_change: aliases::CASH_CHANGE
            .number(record)
            .map(|raw| unit.to_dollars(raw)),
        ts_ms: timestamp::resolve(record, &aliases::TIMESTAMP),
    }
}

/// Map every raw fill.
pub fn map_fills(records: &[Value]) -> Vec<Fill> {
    records.iter().map(map_fill).collect()
}

/// Map every raw settlement.
pub fn map_settlements(records: &[Value], unit: CashUnit) -> Vec<Settlement> {
    records.iter().map(|r| map_settlement(r, unit)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_skips_null() {
        let record = json!({"size": null, "quantity": 7});
        assert_eq!(aliases::FILL_SIZE.number(&record), Some(7.0));
    }

    #[test]
    fn test_first_present_wins() {
        let record = json!({"contracts": 3, "count": 9});
        assert_eq!(aliases::FILL_SIZE.number(&record), Some(3.0));
    }

    #[test]
    fn test_invalid_number_is_zero_for_arithmetic() {
        let record = json!({"size": "lots", "count": 4});
        assert_eq!(aliases::FILL_SIZE.number(&record), None);
        assert_eq!(aliases::FILL_SIZE.number_or_zero(&record), 0.0);
    }

    #[test]
    fn test_numeric_strings() {
        assert_eq!(as_number(&json!(" 0.55 ")), Some(0.55));
        assert_eq!(as_number(&json!("NaN")), None);
        assert_eq!(as_number(&json!(true)), None);
    }

    #[test]
    fn test_text_stringifies_numbers() {
        let record = json!({"market_id": 42});
        assert_eq!(aliases::TICKER.text(&record), Some("42".to_string()));
        assert_eq!(aliases::OUTCOME.text_or_empty(&record), "");
    }

    #[test]
    fn test_array_non_array_is_empty() {
        let record = json!({"fills": "oops"});
        assert!(aliases::FILL_LISTS.array(&record).is_empty());
    }

    #[test]
    fn test_map_fill() {
        let fill = map_fill(&json!({
            "ticker": "KXNBAGAME-25DEC25LALGSW-LAL",
            "action": "Buy",
            "side": "yes",
            "contracts_count": 12,
            "price": "0.41",
            "created_time": "2025-12-25T20:00:00Z",
        }));

        assert_eq!(fill.action, Some(TradeAction::Buy));
        assert_eq!(fill.size, 12.0);
        assert_eq!(fill.price, 0.41);
        assert_eq!(fill.side, "yes");
        assert!(fill.ts_ms.is_some());
    }

    #[test]
    fn test_map_settlement_camel_case_alias() {
        let settlement = map_settlement(&json!({"cashChange": -12.5, "ts": 100}), CashUnit::Dollars);
        assert_eq!(settlement.cash_change, Some(-12.5));
        assert_eq!(settlement.ts_ms, Some(100_000));
    }

    #[test]
    fn test_map_settlement_missing_cash_change() {
        let settlement = map_settlement(&json!({"ticker": "X", "result": "yes"}), CashUnit::Dollars);
        assert_eq!(settlement.cash_change, None);
        assert_eq!(settlement.outcome, "yes");
        assert_eq!(settlement.ts_ms, None);
    }

    #[test]
    fn test_map_settlement_cents() {
        let settlement = map_settlement(&json!({"cash_change": 250}), CashUnit::Cents);
        assert_eq!(settlement.cash_change, Some(2.5));
    }
}
