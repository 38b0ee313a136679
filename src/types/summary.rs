use serde::{Deserialize, Serialize};

/// A point on the cumulative realized P&L curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CumulativePoint {
    /// Epoch milliseconds.
    pub ts: i64,
    /// Running realized P&L after this settlement.
    pub cumulative: f64,
}

/// Derived investment and P&L statistics for one computation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Sum of buy costs.
    pub total_invested: f64,
    /// Sum of sell proceeds.
    pub cash_generated: f64,
    /// `min(total_invested, cash_generated)`.
    pub reinvested: f64,
    /// `total_invested - reinvested`.
    pub cash_invested: f64,
    /// Sum of settlement cash changes.
    pub realized_pnl: f64,
    /// `cash_invested + reinvested + realized_pnl`.
    pub portfolio_value: f64,
    /// `realized_pnl / total_invested`, 0 when nothing was invested.
    pub return_rate: f64,
    /// Sum of positive settlement cash changes.
    pub cash_in: f64,
    /// Sum of magnitudes of negative settlement cash changes.
    pub cash_out: f64,
    pub cumulative_series: Vec<CumulativePoint>,
}

/// Realized P&L attributed to one market category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub realized_pnl: f64,
    pub settlements: usize,
}
