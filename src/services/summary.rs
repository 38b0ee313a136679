//! Summary computation and the dashboard view model.
//!
//! Stats are always recomputed from the document's records, then any
//! pre-computed `summary` / `account` fields the producer sent take
//! precedence over the local figures.

use crate::services::fields::{self, FieldAliases};
use crate::services::{fills, settlements, ticker, timestamp};
use crate::services::units::CashUnit;
use crate::types::{
    AccountSnapshot, CategoryTotal, CumulativePoint, DepositMetrics, Fill, Settlement,
    SummaryDocument, SummaryStats,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Compute stats from normalized records.
pub fn compute_stats(fills: &[Fill], settlements: &[Settlement]) -> SummaryStats {
    let fill_totals = fills::aggregate(fills);
    let settlement_totals = settlements::aggregate(settlements);

    let reinvested = fill_totals.reinvested();
    let cash_invested = fill_totals.cash_invested();
    let realized_pnl = settlement_totals.realized_pnl;

    SummaryStats {
        total_invested: fill_totals.total_invested,
        cash_generated: fill_totals.cash_generated,
        reinvested,
        cash_invested,
        realized_pnl,
        portfolio_value: cash_invested + reinvested + realized_pnl,
        return_rate: return_rate(realized_pnl, fill_totals.total_invested),
        cash_in: settlement_totals.cash_in,
        cash_out: settlement_totals.cash_out,
        cumulative_series: settlement_totals.series,
    }
}

/// `realized / invested`, 0 when nothing was invested.
pub fn return_rate(realized_pnl: f64, total_invested: f64) -> f64 {
    if total_invested > 0.0 {
        realized_pnl / total_invested
    } else {
        0.0
    }
}

/// Realized P&L grouped by ticker category, largest magnitude first.
pub fn category_breakdown(settlements: &[Settlement]) -> Vec<CategoryTotal> {
    let mut groups: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for settlement in settlements {
        if let Some(change) = settlement.cash_change {
            let entry = groups.entry(ticker::category(&settlement.ticker)).or_default();
            entry.0 += change;
            entry.1 += 1;
        }
    }

    let mut totals: Vec<CategoryTotal> = groups
        .into_iter()
        .map(|(category, (realized_pnl, settlements))| CategoryTotal {
            category,
            realized_pnl,
            settlements,
        })
        .collect();
    totals.sort_by(|a, b| b.realized_pnl.abs().total_cmp(&a.realized_pnl.abs()));
    totals
}

mod keys {
    use crate::services::fields::FieldAliases;

    pub const TOTAL_INVESTED: FieldAliases = FieldAliases::new(&["total_invested"]);
    pub const CASH_GENERATED: FieldAliases = FieldAliases::new(&["cash_generated"]);
    pub const REINVESTED: FieldAliases = FieldAliases::new(&["reinvested"]);
    pub const CASH_INVESTED: FieldAliases = FieldAliases::new(&["cash_invested"]);
    pub const REALIZED_PNL: FieldAliases = FieldAliases::new(&["realized_pnl"]);
    pub const PORTFOLIO_VALUE: FieldAliases = FieldAliases::new(&["portfolio_value"]);
    pub const RETURN_RATE: FieldAliases = FieldAliases::new(&["return_rate", "roi"]);
    pub const CASH_IN: FieldAliases = FieldAliases::new(&["cash_in"]);
    pub const CASH_OUT: FieldAliases = FieldAliases::new(&["cash_out"]);
    pub const CUMULATIVE_SERIES: FieldAliases = FieldAliases::new(&["cumulative_series"]);
    pub const SERIES_TS: FieldAliases = FieldAliases::new(&["ts", "time", "timestamp"]);
    pub const SERIES_VALUE: FieldAliases = FieldAliases::new(&["cumulative", "value", "pnl"]);

    pub const TOTAL_DEPOSITS: FieldAliases = FieldAliases::new(&["total_deposits"]);
    pub const NET_PROFIT: FieldAliases = FieldAliases::new(&["net_profit"]);
    pub const NET_PROFIT_PERCENT: FieldAliases = FieldAliases::new(&["net_profit_percent"]);
    pub const UNREALIZED_PNL: FieldAliases = FieldAliases::new(&["unrealized_pnl"]);

    pub const CASH: FieldAliases = FieldAliases::new(&["cash"]);
    pub const CASH_CENTS: FieldAliases = FieldAliases::new(&["cash_cents", "balance"]);
    pub const POSITIONS_VALUE: FieldAliases = FieldAliases::new(&["positions_value"]);
    pub const POSITIONS_CENTS: FieldAliases = FieldAliases::new(&["positions_cents"]);
    pub const PORTFOLIO_TOTAL: FieldAliases = FieldAliases::new(&["portfolio_total"]);
    pub const UPDATED_TS: FieldAliases = FieldAliases::new(&["updated_ts"]);
}

/// Apply pre-computed stats from a producer `summary` block.
///
/// Returns how many fields were taken from the block. Derived fields the
/// block omits are recomputed from the (possibly overridden) inputs.
pub fn apply_precomputed(stats: &mut SummaryStats, block: &Value) -> usize {
    let mut taken = 0;
    let mut take = |aliases: &FieldAliases, slot: &mut f64| -> bool {
        match aliases.number(block) {
            Some(v) => {
                *slot = v;
                taken += 1;
                true
            }
            None => false,
        }
    };

    take(&keys::TOTAL_INVESTED, &mut stats.total_invested);
    take(&keys::CASH_GENERATED, &mut stats.cash_generated);
    let has_reinvested = take(&keys::REINVESTED, &mut stats.reinvested);
    let has_cash_invested = take(&keys::CASH_INVESTED, &mut stats.cash_invested);
    let has_realized = take(&keys::REALIZED_PNL, &mut stats.realized_pnl);
    let has_portfolio_value = take(&keys::PORTFOLIO_VALUE, &mut stats.portfolio_value);
    let has_return_rate = take(&keys::RETURN_RATE, &mut stats.return_rate);
    take(&keys::CASH_IN, &mut stats.cash_in);
    take(&keys::CASH_OUT, &mut stats.cash_out);

    if !has_reinvested {
        stats.reinvested = stats.total_invested.min(stats.cash_generated);
    }
    if !has_cash_invested {
        stats.cash_invested = stats.total_invested - stats.reinvested;
    }
    if !has_portfolio_value {
        stats.portfolio_value = stats.cash_invested + stats.reinvested + stats.realized_pnl;
    }
    if !has_return_rate {
        stats.return_rate = return_rate(stats.realized_pnl, stats.total_invested);
    }

    match keys::CUMULATIVE_SERIES.resolve(block) {
        Some(Value::Array(points)) => {
            stats.cumulative_series = parse_series(points);
            taken += 1;
        }
        // The local curve must end at the realized total shown beside it.
        _ if has_realized && !series_ends_at(&stats.cumulative_series, stats.realized_pnl) => {
            debug!(
                realized_pnl = stats.realized_pnl,
                "Dropping local series that disagrees with pre-computed realized P&L"
            );
            stats.cumulative_series.clear();
        }
        _ => {}
    }

    taken
}

fn series_ends_at(series: &[CumulativePoint], realized_pnl: f64) -> bool {
    series
        .last()
        .map_or(true, |p| (p.cumulative - realized_pnl).abs() < 1e-9)
}

/// Parse a pre-computed cumulative series, dropping unusable points and
/// sorting by time.
pub fn parse_series(points: &[Value]) -> Vec<CumulativePoint> {
    let mut series: Vec<CumulativePoint> = points
        .iter()
        .filter_map(|point| {
            let ts = timestamp::resolve(point, &keys::SERIES_TS)?;
            let cumulative = keys::SERIES_VALUE.number(point)?;
            Some(CumulativePoint { ts, cumulative })
        })
        .collect();
    series.sort_by_key(|p| p.ts);
    series
}

/// Read an `account` block, preferring dollar fields over cent fields.
pub fn resolve_account(block: &Value) -> AccountSnapshot {
    let cash = keys::CASH
        .number(block)
        .or_else(|| keys::CASH_CENTS.number(block).map(|c| c / 100.0))
        .unwrap_or(0.0);
    let positions_value = keys::POSITIONS_VALUE
        .number(block)
        .or_else(|| keys::POSITIONS_CENTS.number(block).map(|c| c / 100.0))
        .unwrap_or(0.0);
    let portfolio_total = keys::PORTFOLIO_TOTAL
        .number(block)
        .unwrap_or(cash + positions_value);

    AccountSnapshot {
        cash_cents: keys::CASH_CENTS
            .number(block)
            .map(|c| c.round() as i64)
            .unwrap_or_else(|| (cash * 100.0).round() as i64),
        positions_cents: keys::POSITIONS_CENTS
            .number(block)
            .map(|c| c.round() as i64)
            .unwrap_or_else(|| (positions_value * 100.0).round() as i64),
        cash,
        positions_value,
        portfolio_total,
        updated_ts: timestamp::resolve(block, &keys::UPDATED_TS),
    }
}

/// Deposit metrics from a `summary` block, completed from the account when possible.
pub fn resolve_deposits(
    block: &Value,
    account: Option<&AccountSnapshot>,
    realized_pnl: f64,
) -> Option<DepositMetrics> {
    let total_deposits = keys::TOTAL_DEPOSITS.number(block);
    let net_profit = keys::NET_PROFIT.number(block);
    if total_deposits.is_none() && net_profit.is_none() {
        return None;
    }

    let mut metrics = match (account, total_deposits) {
        (Some(account), Some(deposits)) => DepositMetrics::compute(account, deposits, realized_pnl),
        _ => DepositMetrics {
            total_deposits: total_deposits.unwrap_or(0.0),
            ..DepositMetrics::default()
        },
    };

    if let Some(v) = net_profit {
        metrics.net_profit = v;
    }
    match keys::NET_PROFIT_PERCENT.number(block) {
        Some(v) => metrics.net_profit_percent = v,
        None if metrics.total_deposits > 0.0 => {
            metrics.net_profit_percent = metrics.net_profit / metrics.total_deposits;
        }
        None => {}
    }
    if let Some(v) = keys::UNREALIZED_PNL.number(block) {
        metrics.unrealized_pnl = v;
    }

    Some(metrics)
}

/// Everything the dashboard renders for one fetched document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardView {
    pub stats: SummaryStats,
    pub account: Option<AccountSnapshot>,
    pub deposits: Option<DepositMetrics>,
    /// Newest first.
    pub fills: Vec<Fill>,
    /// Newest first.
    pub settlements: Vec<Settlement>,
    pub categories: Vec<CategoryTotal>,
    pub generated_at_ms: Option<i64>,
    /// Lookback window the producer filtered records to, in days.
    pub lookback_days: Option<u32>,
    pub dry_run: bool,
    pub forecast: Option<String>,
    /// Number of fields taken from the producer's pre-computed blocks.
    pub precomputed_fields: usize,
}

impl DashboardView {
    /// Build the view for a document.
    pub fn from_document(doc: &SummaryDocument, unit: CashUnit) -> Self {
        let mut fills = fields::map_fills(doc.raw_fills());
        let mut settlements = fields::map_settlements(doc.raw_settlements(), unit);

        let mut stats = compute_stats(&fills, &settlements);
        let mut precomputed_fields = 0;
        if let Some(block) = doc.summary() {
            precomputed_fields += apply_precomputed(&mut stats, block);
        }

        let account = doc.account().map(resolve_account);
        let deposits = doc
            .summary()
            .and_then(|block| resolve_deposits(block, account.as_ref(), stats.realized_pnl));

        let categories = category_breakdown(&settlements);

        fills.sort_by(|a, b| b.ts_ms.cmp(&a.ts_ms));
        settlements.sort_by(|a, b| b.ts_ms.cmp(&a.ts_ms));

        debug!(
            fills = fills.len(),
            settlements = settlements.len(),
            precomputed_fields,
            "Built dashboard view"
        );

        Self {
            stats,
            account,
            deposits,
            fills,
            settlements,
            categories,
            generated_at_ms: doc.generated_at_ms(),
            lookback_days: doc.lookback_days(),
            dry_run: doc.dry_run(),
            forecast: doc.forecast(),
            precomputed_fields,
        }
    }
}
