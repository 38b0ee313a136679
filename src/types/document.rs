//! The summary document fetched by the dashboard.
//!
//! Every field is optional and producers disagree on names, so the document
//! keeps the raw JSON and exposes accessors that resolve aliases on demand.

use crate::services::fields::{aliases, FieldAliases};
use crate::services::timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SummaryDocument {
    root: Value,
}

impl SummaryDocument {
    /// Wrap an already-parsed JSON value.
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    /// Parse a document from JSON text.
    pub fn from_json_str(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text).map(Self::from_value)
    }

    /// Pre-computed stats block, if the producer sent one.
    pub fn summary(&self) -> Option<&Value> {
        self.object_field("summary")
    }

    /// Pre-computed account block, if the producer sent one.
    pub fn account(&self) -> Option<&Value> {
        self.object_field("account")
    }

    /// Raw fill records from the first present fills list.
    pub fn raw_fills(&self) -> &[Value] {
        aliases::FILL_LISTS.array(&self.root)
    }

    /// Raw settlement records from the first present settlements list.
    pub fn raw_settlements(&self) -> &[Value] {
        aliases::SETTLEMENT_LISTS.array(&self.root)
    }

    /// When the producer generated this document, in epoch milliseconds.
    pub fn generated_at_ms(&self) -> Option<i64> {
        timestamp::resolve(&self.root, &aliases::GENERATED_AT)
    }

    /// Whether the producer marked this as a dry run.
    pub fn dry_run(&self) -> bool {
        match aliases::DRY_RUN.resolve(&self.root) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().map(|v| v != 0.0).unwrap_or(false),
            Some(Value::String(s)) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"),
            _ => false,
        }
    }

    /// Free-form forecast text.
    ///
    /// Strings are shown as-is; objects and arrays are shown as compact JSON.
    pub fn forecast(&self) -> Option<String> {
        match aliases::FORECAST.resolve(&self.root)? {
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Lookback window the producer used, in days.
    pub fn lookback_days(&self) -> Option<u32> {
        FieldAliases::new(&["lookback_days"])
            .number(&self.root)
            .filter(|d| *d >= 0.0)
            .map(|d| d as u32)
    }

    fn object_field(&self, key: &str) -> Option<&Value> {
        self.root.get(key).filter(|v| v.is_object())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fill_list_aliases_first_present_wins() {
        let doc = SummaryDocument::from_value(json!({
            "fills_last_1_day": null,
            "fills_last_n_days": [{"size": 1}],
            "fills": [{"size": 2}, {"size": 3}],
        }));
        assert_eq!(doc.raw_fills().len(), 1);
    }

    #[test]
    fn test_missing_lists_default_empty() {
        let doc = SummaryDocument::from_value(json!({"summary": {}}));
        assert!(doc.raw_fills().is_empty());
        assert!(doc.raw_settlements().is_empty());
    }

    #[test]
    fn test_non_object_root_degrades() {
        let doc = SummaryDocument::from_value(json!([1, 2, 3]));
        assert!(doc.summary().is_none());
        assert!(doc.raw_fills().is_empty());
        assert!(!doc.dry_run());
    }

    #[test]
    fn test_dry_run_variants() {
        assert!(SummaryDocument::from_value(json!({"dry_run": true})).dry_run());
        assert!(SummaryDocument::from_value(json!({"dry_run": "True"})).dry_run());
        assert!(SummaryDocument::from_value(json!({"dry_run": 1})).dry_run());
        assert!(!SummaryDocument::from_value(json!({"dry_run": 0})).dry_run());
    }

    #[test]
    fn test_generated_at_falls_back_to_last_updated() {
        let doc = SummaryDocument::from_value(json!({
            "last_updated": "2024-01-01T00:00:00Z",
        }));
        assert_eq!(doc.generated_at_ms(), Some(1_704_067_200_000));
    }

    #[test]
    fn test_forecast_object_rendered_as_json() {
        let doc = SummaryDocument::from_value(json!({"forecast": {"edge": 0.1}}));
        assert_eq!(doc.forecast(), Some("{\"edge\":0.1}".to_string()));
    }

    #[test]
    fn test_deserialize_transparent() {
        let doc = SummaryDocument::from_json_str(r#"{"summary": {"realized_pnl": 3}}"#).unwrap();
        assert!(doc.summary().is_some());
    }
}
