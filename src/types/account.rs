//! Account-level balances and deposit-based profit figures.

use serde::{Deserialize, Serialize};

/// Positions below this value count as "no open positions".
pub const OPEN_POSITION_EPSILON: f64 = 1e-6;

/// Cash plus open-position exposure at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub cash_cents: i64,
    pub positions_cents: i64,
    /// Dollars.
    pub cash: f64,
    /// Dollars.
    pub positions_value: f64,
    /// Dollars.
    pub portfolio_total: f64,
    #[serde(default)]
    pub updated_ts: Option<i64>,
}

impl AccountSnapshot {
    /// Build a snapshot from cent balances.
    pub fn from_cents(cash_cents: i64, positions_cents: i64, updated_ts: Option<i64>) -> Self {
        Self {
            cash_cents,
            positions_cents,
            cash: cash_cents as f64 / 100.0,
            positions_value: positions_cents as f64 / 100.0,
            portfolio_total: (cash_cents + positions_cents) as f64 / 100.0,
            updated_ts,
        }
    }

    /// Whether any exposure remains open.
    pub fn has_open_positions(&self) -> bool {
        self.positions_value > OPEN_POSITION_EPSILON
    }
}

/// Net profit measured against total deposits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DepositMetrics {
    pub total_deposits: f64,
    pub net_profit: f64,
    pub net_profit_percent: f64,
    pub unrealized_pnl: f64,
}

impl DepositMetrics {
    /// Derive deposit metrics from the account and realized P&L.
    ///
    /// With no open positions everything is realized into cash, so unrealized
    /// P&L is forced to zero regardless of net profit.
    pub fn compute(account: &AccountSnapshot, total_deposits: f64, realized_pnl: f64) -> Self {
        let net_profit = account.portfolio_total - total_deposits;
        let unrealized_pnl = if account.has_open_positions() {
            net_profit - realized_pnl
        } else {
            0.0
        };
        let net_profit_percent = if total_deposits > 0.0 {
            net_profit / total_deposits
        } else {
            0.0
        };

        Self {
            total_deposits,
            net_profit,
            net_profit_percent,
            unrealized_pnl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_from_cents() {
        let account = AccountSnapshot::from_cents(4_250, 1_000, Some(1_700_000_000));
        assert_eq!(account.cash, 42.5);
        assert_eq!(account.positions_value, 10.0);
        assert_eq!(account.portfolio_total, 52.5);
        assert!(account.has_open_positions());
    }

    #[test]
    fn test_unrealized_zero_without_positions() {
        let account = AccountSnapshot::from_cents(5_000, 0, None);
        let metrics = DepositMetrics::compute(&account, 40.0, 3.0);

        assert!((metrics.net_profit - 10.0).abs() < 1e-9);
        assert_eq!(metrics.unrealized_pnl, 0.0);
        assert!((metrics.net_profit_percent - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_unrealized_with_positions() {
        let account = AccountSnapshot::from_cents(3_000, 2_000, None);
        let metrics = DepositMetrics::compute(&account, 40.0, 4.0);

        assert!((metrics.net_profit - 10.0).abs() < 1e-9);
        assert!((metrics.unrealized_pnl - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_deposits_percent() {
        let account = AccountSnapshot::from_cents(1_000, 0, None);
        let metrics = DepositMetrics::compute(&account, 0.0, 0.0);
        assert_eq!(metrics.net_profit_percent, 0.0);
    }
}
