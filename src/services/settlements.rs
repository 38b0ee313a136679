//! Settlement aggregation: realized P&L and the cumulative series.

use crate::types::{CumulativePoint, Settlement};

/// Totals folded from a collection of settlements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettlementTotals {
    pub realized_pnl: f64,
    pub cash_in: f64,
    pub cash_out: f64,
    pub series: Vec<CumulativePoint>,
}

/// Fold settlements into realized P&L and a cumulative series.
///
/// Settlements are visited in ascending timestamp order; the sort is stable,
/// so equal timestamps keep their input order, and settlements without a
/// timestamp come first. Those still add to the running total but get no
/// series point, which keeps the last point equal to the realized total.
/// Settlements without a cash change are skipped entirely.
pub fn aggregate(settlements: &[Settlement]) -> SettlementTotals {
    let mut ordered: Vec<&Settlement> = settlements.iter().collect();
    ordered.sort_by_key(|s| s.ts_ms);

    let mut totals = SettlementTotals::default();
    for settlement in ordered {
        let Some(change) = settlement.cash_change else {
            continue;
        };

        totals.realized_pnl += change;
        if change > 0.0 {
            totals.cash_in += change;
        } else if change < 0.0 {
            totals.cash_out -= change;
        }

        if let Some(ts) = settlement.ts_ms {
            totals.series.push(CumulativePoint {
                ts,
                cumulative: totals.realized_pnl,
            });
        }
    }

    totals
}
