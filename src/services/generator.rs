//! Producer side of the summary document.
//!
//! Takes a raw export (balance, open positions, fills, settlements), trims it
//! to the lookback window and writes the document the dashboard polls.

use crate::error::Result;
use crate::services::fields::{self, as_number, FieldAliases};
use crate::services::summary::compute_stats;
use crate::services::timestamp;
use crate::services::units::CashUnit;
use crate::types::{AccountSnapshot, DepositMetrics, SummaryStats};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

const BALANCE: FieldAliases = FieldAliases::new(&["balance", "cash_cents"]);
const POSITIONS_CENTS: FieldAliases = FieldAliases::new(&["positions_cents"]);
const POSITIONS: FieldAliases = FieldAliases::new(&["positions"]);
const EVENT_POSITIONS: FieldAliases = FieldAliases::new(&["event_positions"]);
const EXPOSURE_DOLLARS: FieldAliases = FieldAliases::new(&["event_exposure_dollars"]);
const COST_DOLLARS: FieldAliases = FieldAliases::new(&["total_cost_dollars"]);
const UPDATED_TS: FieldAliases = FieldAliases::new(&["updated_ts"]);
const RAW_FILLS: FieldAliases = FieldAliases::new(&["fills"]);
const RAW_SETTLEMENTS: FieldAliases = FieldAliases::new(&["settlements"]);

/// Generator settings.
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    pub lookback_days: u32,
    pub total_deposits: f64,
    pub cash_unit: CashUnit,
    pub now: DateTime<Utc>,
}

/// Stats block of the generated document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedStats {
    #[serde(flatten)]
    pub stats: SummaryStats,
    #[serde(flatten)]
    pub deposits: DepositMetrics,
}

/// The summary document as written to disk.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedSummary {
    pub generated_at: String,
    pub lookback_days: u32,
    pub account: AccountSnapshot,
    pub fills_last_n_days: Vec<Value>,
    pub settlements_last_n_days: Vec<Value>,
    pub summary: GeneratedStats,
}

/// Build the account snapshot from a raw export.
///
/// Open exposure is read per event from `event_exposure_dollars`, falling
/// back to `total_cost_dollars`, and rounded to cents. A flat
/// `positions_cents` wins when present.
pub fn build_account(raw: &Value) -> AccountSnapshot {
    let cash_cents = BALANCE.number_or_zero(raw).round() as i64;

    let positions_cents = match POSITIONS_CENTS.number(raw) {
        Some(cents) => cents.round() as i64,
        None => {
            let container = POSITIONS.resolve(raw).unwrap_or(raw);
            EVENT_POSITIONS
                .array(container)
                .iter()
                .filter_map(event_exposure_cents)
                .sum()
        }
    };

    AccountSnapshot::from_cents(
        cash_cents,
        positions_cents,
        timestamp::resolve(raw, &UPDATED_TS),
    )
}

fn event_exposure_cents(position: &Value) -> Option<i64> {
    let dollars = non_empty(&EXPOSURE_DOLLARS, position)
        .or_else(|| non_empty(&COST_DOLLARS, position))?;
    as_number(dollars).map(|d| (d * 100.0).round() as i64)
}

fn non_empty<'a>(aliases: &FieldAliases, record: &'a Value) -> Option<&'a Value> {
    aliases.resolve(record).filter(|v| match v {
        Value::String(s) => !s.trim().is_empty(),
        Value::Number(n) => n.as_f64().map(|x| x != 0.0).unwrap_or(false),
        _ => false,
    })
}

/// Generate the summary document from a raw export.
pub fn generate(raw: &Value, options: &GeneratorOptions) -> GeneratedSummary {
    let min_ts = options.now.timestamp_millis() - i64::from(options.lookback_days) * DAY_MS;

    // Fills without a timestamp are kept; settlements without one are dropped.
    let raw_fills: Vec<Value> = RAW_FILLS
        .array(raw)
        .iter()
        .filter(|f| timestamp::resolve(f, &fields::aliases::TIMESTAMP).map_or(true, |ts| ts >= min_ts))
        .cloned()
        .collect();
    let raw_settlements: Vec<Value> = RAW_SETTLEMENTS
        .array(raw)
        .iter()
        .filter(|s| timestamp::resolve(s, &fields::aliases::TIMESTAMP).is_some_and(|ts| ts >= min_ts))
        .cloned()
        .collect();

    debug!(
        fills = raw_fills.len(),
        settlements = raw_settlements.len(),
        min_ts,
        "Filtered raw export to lookback window"
    );

    let fills = fields::map_fills(&raw_fills);
    let settlements = fields::map_settlements(&raw_settlements, options.cash_unit);
    let stats = compute_stats(&fills, &settlements);

    let account = build_account(raw);
    let deposits = DepositMetrics::compute(&account, options.total_deposits, stats.realized_pnl);

    GeneratedSummary {
        generated_at: options.now.to_rfc3339(),
        lookback_days: options.lookback_days,
        account,
        fills_last_n_days: raw_fills,
        settlements_last_n_days: raw_settlements,
        summary: GeneratedStats { stats, deposits },
    }
}

/// Write the document as pretty JSON, creating parent directories.
pub fn write_summary(path: &Path, summary: &GeneratedSummary) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, json)?;
    info!("Summary JSON generated at {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn options() -> GeneratorOptions {
        GeneratorOptions {
            lookback_days: 30,
            total_deposits: 40.0,
            cash_unit: CashUnit::Dollars,
            now: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        }
    }

    #[test]
    fn test_build_account_event_positions() {
        let account = build_account(&json!({
            "balance": 4_000,
            "positions": {
                "event_positions": [
                    {"event_exposure_dollars": "3.51"},
                    {"event_exposure_dollars": "", "total_cost_dollars": "1.25"},
                    {"event_exposure_dollars": null},
                ]
            }
        }));

        assert_eq!(account.cash_cents, 4_000);
        assert_eq!(account.positions_cents, 476);
        assert_eq!(account.portfolio_total, 44.76);
    }

    #[test]
    fn test_build_account_flat_positions_cents() {
        let account = build_account(&json!({"cash_cents": 100, "positions_cents": 250}));
        assert_eq!(account.positions_value, 2.5);
    }

    #[test]
    fn test_lookback_filter() {
        let now_s = 1_700_000_000_i64;
        let old = now_s - 40 * 86_400;
        let raw = json!({
            "balance": 5_000,
            "fills": [
                {"action": "buy", "count": 10, "price": 0.5, "created_time": now_s - 60},
                {"action": "buy", "count": 10, "price": 0.5, "created_time": old},
                {"action": "sell", "count": 4, "price": 0.6},
            ],
            "settlements": [
                {"cash_change": 5.0, "settled_time": now_s - 120},
                {"cash_change": 9.0, "settled_time": old},
                {"cash_change": 1.0},
            ],
        });

        let summary = generate(&raw, &options());

        assert_eq!(summary.fills_last_n_days.len(), 2);
        assert_eq!(summary.settlements_last_n_days.len(), 1);
        assert!((summary.summary.stats.total_invested - 5.0).abs() < 1e-9);
        assert_eq!(summary.summary.stats.realized_pnl, 5.0);
        assert_eq!(summary.summary.deposits.net_profit, 10.0);
        assert_eq!(summary.generated_at, "2023-11-14T22:13:20+00:00");
    }

    #[test]
    fn test_generated_json_is_flat() {
        let summary = generate(&json!({"balance": 4_000}), &options());
        let value = serde_json::to_value(&summary).unwrap();

        assert!(value["summary"]["realized_pnl"].is_number());
        assert!(value["summary"]["net_profit"].is_number());
        assert!(value["summary"]["cumulative_series"].is_array());
        assert_eq!(value["account"]["portfolio_total"], json!(40.0));
    }
}
