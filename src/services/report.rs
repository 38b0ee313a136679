//! Plain-text rendering of a dashboard view, for non-interactive output.

use crate::services::display::{
    format_currency, format_money, format_percent, format_signed, format_timestamp,
};
use crate::services::summary::DashboardView;
use crate::services::ticker;
use std::fmt::{self, Write};

/// Render the view as a text report listing at most `limit` rows per table.
pub fn render(view: &DashboardView, limit: usize) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, view, limit);
    out
}

fn write_report(out: &mut String, view: &DashboardView, limit: usize) -> fmt::Result {
    let stats = &view.stats;

    writeln!(out, "Portfolio summary (generated {})", format_timestamp(view.generated_at_ms))?;
    if let Some(days) = view.lookback_days {
        writeln!(out, "Lookback: last {} days", days)?;
    }
    if view.dry_run {
        writeln!(out, "DRY RUN")?;
    }
    if let Some(forecast) = &view.forecast {
        writeln!(out, "Forecast: {}", forecast)?;
    }
    writeln!(out)?;

    if let Some(account) = &view.account {
        writeln!(out, "  Cash              {:>14}", format_currency(account.cash))?;
        writeln!(out, "  Positions         {:>14}", format_currency(account.positions_value))?;
        writeln!(out, "  Portfolio total   {:>14}", format_currency(account.portfolio_total))?;
    }
    if let Some(deposits) = &view.deposits {
        writeln!(out, "  Deposits          {:>14}", format_currency(deposits.total_deposits))?;
        writeln!(
            out,
            "  Net profit        {:>14}  ({})",
            format_signed(deposits.net_profit),
            format_percent(deposits.net_profit_percent)
        )?;
        writeln!(out, "  Unrealized P&L    {:>14}", format_signed(deposits.unrealized_pnl))?;
    }

    writeln!(out, "  Total invested    {:>14}", format_currency(stats.total_invested))?;
    writeln!(out, "  Cash generated    {:>14}", format_currency(stats.cash_generated))?;
    writeln!(out, "  Reinvested        {:>14}", format_currency(stats.reinvested))?;
    writeln!(out, "  Fresh capital     {:>14}", format_currency(stats.cash_invested))?;
    writeln!(out, "  Realized P&L      {:>14}", format_signed(stats.realized_pnl))?;
    writeln!(out, "  Portfolio value   {:>14}", format_currency(stats.portfolio_value))?;
    writeln!(out, "  Return rate       {:>14}", format_percent(stats.return_rate))?;

    if !view.settlements.is_empty() {
        writeln!(out, "\nRecent settlements")?;
        for settlement in view.settlements.iter().take(limit) {
            writeln!(
                out,
                "  {:<16} {:>10}  {:<6} {}",
                format_timestamp(settlement.ts_ms),
                settlement
                    .cash_change
                    .map(format_signed)
                    .unwrap_or_else(|| format_money(None)),
                settlement.outcome,
                ticker::prettify(&settlement.ticker)
            )?;
        }
    }

    if !view.fills.is_empty() {
        writeln!(out, "\nRecent fills")?;
        for fill in view.fills.iter().take(limit) {
            writeln!(
                out,
                "  {:<16} {:<4} {:<3} {:>6} @ {:<6} {}",
                format_timestamp(fill.ts_ms),
                fill.action.map(|a| a.to_string()).unwrap_or_else(|| "?".to_string()),
                fill.side,
                fill.size,
                format_currency(fill.price),
                ticker::prettify(&fill.ticker)
            )?;
        }
    }

    if !view.categories.is_empty() {
        writeln!(out, "\nP&L by category")?;
        for category in view.categories.iter().take(limit) {
            writeln!(
                out,
                "  {:<20} {:>12}  ({} settled)",
                category.category,
                format_signed(category.realized_pnl),
                category.settlements
            )?;
        }
    }

    Ok(())
}
