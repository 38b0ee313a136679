//! Fill aggregation and the invested / reinvested split.

use crate::types::{Fill, TradeAction};

/// Buy and sell totals folded from fills.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FillTotals {
    /// Sum of buy costs.
    pub total_invested: f64,
    /// Sum of sell proceeds.
    pub cash_generated: f64,
}

impl FillTotals {
    /// Capital approximately recycled from sells into new buys.
    ///
    /// Without lot tracking there is no way to tell which buy dollars came
    /// from earlier sells, so this is `min(total_invested, cash_generated)`.
    pub fn reinvested(&self) -> f64 {
        self.total_invested.min(self.cash_generated)
    }

    /// Fresh capital: invested minus reinvested.
    pub fn cash_invested(&self) -> f64 {
        self.total_invested - self.reinvested()
    }
}

/// Fold fills into buy and sell totals. Fills with no recognized action are ignored.
pub fn aggregate(fills: &[Fill]) -> FillTotals {
    fills.iter().fold(FillTotals::default(), |mut totals, fill| {
        match fill.action {
            Some(TradeAction::Buy) => {
                totals.total_invested += fill.cost();
            }
            Some(TradeAction::Sell) => {
                totals.cash_generated += fill.cost();
            }
            None => {}
        }
        totals
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(action: Option<TradeAction>, size: f64, price: f64) -> Fill {
        Fill {
            ticker: "KXTEST-1".to_string(),
            action,
            side: "yes".to_string(),
            size,
            price,
            ts_ms: None,
        }
    }

    #[test]
    fn test_buy_sell_split() {
        let totals = aggregate(&[
            fill(Some(TradeAction::Buy), 10.0, 0.50),
            fill(Some(TradeAction::Sell), 4.0, 0.60),
        ]);

        assert!((totals.total_invested - 5.0).abs() < 1e-9);
        assert!((totals.cash_generated - 2.4).abs() < 1e-9);
        assert!((totals.reinvested() - 2.4).abs() < 1e-9);
        assert!((totals.cash_invested() - 2.6).abs() < 1e-9);
    }

    #[test]
    fn test_reinvested_capped_by_invested() {
        let totals = aggregate(&[
            fill(Some(TradeAction::Buy), 1.0, 0.30),
            fill(Some(TradeAction::Sell), 10.0, 0.90),
        ]);

        assert!((totals.reinvested() - 0.3).abs() < 1e-9);
        assert_eq!(totals.cash_invested(), 0.0);
    }

    #[test]
    fn test_unknown_action_ignored() {
        let totals = aggregate(&[fill(None, 100.0, 1.0)]);
        assert_eq!(totals, FillTotals::default());
    }
}
