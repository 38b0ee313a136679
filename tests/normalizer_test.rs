//! Tests for record normalization and summary stats

use kalshi_dash::services::{fields, settlements, timestamp, ticker, CashUnit, DashboardView};
use kalshi_dash::types::{SummaryDocument, TradeAction};
use kalshi_dash::compute_stats;
use serde_json::json;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_seconds_and_millis_agree() {
    let secs = timestamp::normalize(&json!(1_700_000_000));
    let millis = timestamp::normalize(&json!(1_700_000_000_000_i64));
    let text = timestamp::normalize(&json!("2023-11-14T22:13:20Z"));

    assert_eq!(secs, Some(1_700_000_000_000));
    assert_eq!(secs, millis);
    assert_eq!(secs, text);
}

#[test]
fn test_unparseable_timestamp_is_absent() {
    assert_eq!(timestamp::normalize(&json!("not a date")), None);
    assert_eq!(timestamp::normalize(&json!(null)), None);
    assert_eq!(timestamp::normalize(&json!({"ts": 1})), None);
}

#[test]
fn test_fill_alias_fallback() {
    let fill = fields::map_fill(&json!({
        "market_ticker": "KXNBAGAME-26JAN15LALBOS",
        "action": "Buy",
        "contracts": "3",
        "price": 0.25,
        "created_time": "2024-01-01T00:00:00Z",
    }));

    assert_eq!(fill.ticker, "KXNBAGAME-26JAN15LALBOS");
    assert_eq!(fill.action, Some(TradeAction::Buy));
    assert_eq!(fill.size, 3.0);
    assert_eq!(fill.ts_ms, Some(1_704_067_200_000));
}

#[test]
fn test_settlement_order_and_series() {
    let raw = vec![
        json!({"cash_change": -3.0, "ts": 2_000}),
        json!({"cash_change": 5.0, "ts": 1_000}),
        json!({"ts": 3_000}),
    ];
    let parsed = fields::map_settlements(&raw, CashUnit::Dollars);
    let totals = settlements::aggregate(&parsed);

    assert_eq!(totals.realized_pnl, 2.0);
    assert_eq!(totals.series.len(), 2);
    assert_eq!(totals.series[0].cumulative, 5.0);
    assert_eq!(totals.series[1].cumulative, 2.0);
    assert!(totals.series[0].ts < totals.series[1].ts);
}

#[test]
fn test_series_ends_at_realized_total() {
    let raw = vec![
        json!({"cash_change": 1.5}),
        json!({"cash_change": 2.0, "ts": 1_700_000_000}),
        json!({"cash_change": -0.5, "ts": 1_700_000_100}),
    ];
    let parsed = fields::map_settlements(&raw, CashUnit::Dollars);
    let stats = compute_stats(&[], &parsed);

    let last = stats.cumulative_series.last().unwrap();
    assert_eq!(last.cumulative, stats.realized_pnl);
    assert_eq!(stats.realized_pnl, 3.0);
}

#[test]
fn test_cents_cash_unit() {
    let raw = vec![json!({"cash_change": 1_250})];
    let parsed = fields::map_settlements(&raw, CashUnit::Cents);
    assert_eq!(parsed[0].cash_change, Some(12.5));
}

#[test]
fn test_capital_flow() {
    let raw = vec![
        json!({"action": "buy", "size": 10, "price": 0.5}),
        json!({"action": "sell", "size": 4, "price": 0.6}),
        json!({"action": "hold", "size": 99, "price": 1.0}),
    ];
    let fills = fields::map_fills(&raw);
    let stats = compute_stats(&fills, &[]);

    assert!(approx(stats.total_invested, 5.0));
    assert!(approx(stats.cash_generated, 2.4));
    assert!(approx(stats.reinvested, 2.4));
    assert!(approx(stats.cash_invested, 2.6));
    assert!(approx(stats.reinvested + stats.cash_invested, stats.total_invested));
    assert_eq!(stats.return_rate, 0.0);
}

#[test]
fn test_precomputed_summary_wins() {
    let doc = SummaryDocument::from_value(json!({
        "fills": [{"action": "buy", "size": 10, "price": 0.5}],
        "settlements": [{"cash_change": 2.0, "ts": 1_700_000_000}],
        "summary": {"realized_pnl": 7.25},
    }));
    let view = DashboardView::from_document(&doc, CashUnit::Dollars);

    assert_eq!(view.stats.realized_pnl, 7.25);
    assert!(approx(view.stats.total_invested, 5.0));
    assert!(view.precomputed_fields >= 1);
    // A curve ending at 2.00 would contradict the reported 7.25.
    assert!(view.stats.cumulative_series.is_empty());
}

#[test]
fn test_empty_document() {
    let doc = SummaryDocument::from_value(json!({}));
    let view = DashboardView::from_document(&doc, CashUnit::Dollars);

    assert_eq!(view.stats.realized_pnl, 0.0);
    assert!(view.stats.cumulative_series.is_empty());
    assert!(view.fills.is_empty());
    assert!(view.account.is_none());
    assert!(!view.dry_run);
}

#[test]
fn test_categories_follow_ticker_series() {
    let doc = SummaryDocument::from_value(json!({
        "settlements": [
            {"ticker": "KXNFLGAME-25NOV02DALPHI-DAL", "cash_change": 4.0, "ts": 1},
            {"ticker": "KXNFLGAME-25NOV09NYGDAL-NYG", "cash_change": -1.0, "ts": 2},
            {"ticker": "KXPOPE-25-PIETRO", "cash_change": -6.0, "ts": 3},
        ],
    }));
    let view = DashboardView::from_document(&doc, CashUnit::Dollars);

    assert_eq!(view.categories.len(), 2);
    assert_eq!(view.categories[0].category, "POPE");
    assert_eq!(view.categories[1].category, ticker::category("KXNFLGAME-X"));
    assert_eq!(view.categories[1].realized_pnl, 3.0);
    assert_eq!(view.categories[1].settlements, 2);
}

#[test]
fn test_realized_pnl_ignores_input_order() {
    let raw = vec![
        json!({"cash_change": 50, "ts": 100}),
        json!({"cashChange": -20, "ts": 200}),
        json!({"cash_change": 7.5}),
    ];
    let forward = fields::map_settlements(&raw, CashUnit::Dollars);
    let mut reversed = forward.clone();
    reversed.reverse();

    let a = settlements::aggregate(&forward);
    let b = settlements::aggregate(&reversed);

    assert_eq!(a.realized_pnl, 37.5);
    assert_eq!(a.realized_pnl, b.realized_pnl);
    assert_eq!(a.series, b.series);
    assert_eq!(a.series.last().unwrap().cumulative, 37.5);
}
