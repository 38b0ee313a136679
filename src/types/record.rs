//! Normalized trading records.
//!
//! Raw producer records arrive with inconsistent field names and units; the
//! mapping layer in `services::fields` turns them into these typed values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of an executed fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeAction {
    Buy,
    Sell,
}

impl TradeAction {
    /// Parse an action label, ignoring case and surrounding whitespace.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "buy" => Some(TradeAction::Buy),
            "sell" => Some(TradeAction::Sell),
            _ => None,
        }
    }
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeAction::Buy => write!(f, "buy"),
            TradeAction::Sell => write!(f, "sell"),
        }
    }
}

/// One executed trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    /// Market identifier.
    pub ticker: String,
    /// Buy or sell; `None` when the producer sent something else.
    pub action: Option<TradeAction>,
    /// Contract side label (yes/no) if present.
    pub side: String,
    /// Contracts filled.
    pub size: f64,
    /// Dollars per contract.
    pub price: f64,
    /// Normalized timestamp in epoch milliseconds.
    pub ts_ms: Option<i64>,
}

impl Fill {
    /// Cash moved by this fill.
    pub fn cost(&self) -> f64 {
        self.size * self.price
    }
}

/// One market resolution affecting cash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    /// Market identifier.
    pub ticker: String,
    /// Outcome or result label.
    pub outcome: String,
    /// Signed cash change in dollars; `None` when the producer omitted it.
    pub cash_change: Option<f64>,
    /// Normalized timestamp in epoch milliseconds.
    pub ts_ms: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trade_action_parse_case_insensitive() {
        assert_eq!(TradeAction::parse("BUY"), Some(TradeAction::Buy));
        assert_eq!(TradeAction::parse(" Sell "), Some(TradeAction::Sell));
        assert_eq!(TradeAction::parse("hold"), None);
        assert_eq!(TradeAction::parse(""), None);
    }

    #[test]
    fn test_fill_cost() {
        let fill = Fill {
            ticker: "KXNFLGAME-25NOV02DALPHI-DAL".to_string(),
            action: Some(TradeAction::Buy),
            side: "yes".to_string(),
            size: 10.0,
            price: 0.5,
            ts_ms: None,
        };
        assert!((fill.cost() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_trade_action_serialization() {
        let json = serde_json::to_string(&TradeAction::Sell).unwrap();
        assert_eq!(json, "\"sell\"");
    }
}
