//! Dashboard view - headline figures and charts.

use crate::services::display::{
    format_currency, format_money, format_percent, format_signed, format_timestamp,
};
use crate::services::summary::DashboardView;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::{App, Theme};

/// Render the dashboard view.
pub fn render(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),  // Feed status
            Constraint::Length(10), // Stat panels
            Constraint::Min(0),     // Charts
        ])
        .split(area);

    render_status(frame, chunks[0], app, theme);

    let Some(view) = app.poll_state().view() else {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled("Waiting for the first summary…", theme.muted())),
        ];
        let block = Paragraph::new(text).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border()),
        );
        let rest = Rect {
            height: chunks[1].height + chunks[2].height,
            ..chunks[1]
        };
        frame.render_widget(block, rest);
        return;
    };

    render_panels(frame, chunks[1], view, theme);

    let chart_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[2]);

    app.charts().render_cumulative(frame, chart_chunks[0], theme);
    app.charts().render_breakdown(frame, chart_chunks[1], theme);
}

/// Source, freshness and error line.
fn render_status(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let state = app.poll_state();
    let view = state.view();

    let mut first = vec![
        Span::styled("Source: ", theme.muted()),
        Span::raw(app.source_label().to_string()),
        Span::raw("  "),
        Span::styled("Updated: ", theme.muted()),
        Span::raw(format_timestamp(view.and_then(|v| v.generated_at_ms))),
    ];
    if let Some(days) = view.and_then(|v| v.lookback_days) {
        first.push(Span::raw("  "));
        first.push(Span::styled("Window: ", theme.muted()));
        first.push(Span::raw(format!("{}d", days)));
    }
    if view.map_or(false, |v| v.dry_run) {
        first.push(Span::raw("  "));
        first.push(Span::styled("DRY RUN", theme.warning()));
    }

    let second = match (state.last_error(), view.and_then(|v| v.forecast.as_deref())) {
        (Some(err), _) => Line::from(vec![
            Span::styled("⚠ ", theme.loss()),
            Span::styled(format!("Error loading summary: {}", err), theme.loss()),
        ]),
        (None, Some(forecast)) => Line::from(vec![
            Span::styled("Forecast: ", theme.muted()),
            Span::styled(forecast.to_string(), theme.info()),
        ]),
        (None, None) => Line::from(Span::styled(
            format!("{} loads, {} failures", state.successes(), state.failures()),
            theme.muted(),
        )),
    };

    let block = Paragraph::new(vec![Line::from(first), second])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("📡 Summary Feed")
                .border_style(theme.border()),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(block, area);
}

fn render_panels(frame: &mut Frame, area: Rect, view: &DashboardView, theme: &Theme) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(33),
            Constraint::Percentage(34),
        ])
        .split(area);

    let stats = &view.stats;

    // Capital flow
    let capital = vec![
        labeled("Total invested", format_currency(stats.total_invested), theme.info(), theme),
        labeled("Cash generated", format_currency(stats.cash_generated), theme.info(), theme),
        labeled("Reinvested", format_currency(stats.reinvested), theme.info(), theme),
        labeled("Fresh capital", format_currency(stats.cash_invested), theme.info(), theme),
    ];
    frame.render_widget(panel(capital, "💰 Capital", theme), columns[0]);

    // Performance
    let performance = vec![
        labeled(
            "Realized P&L",
            format_signed(stats.realized_pnl),
            theme.pnl(stats.realized_pnl),
            theme,
        ),
        labeled(
            "Return rate",
            format_percent(stats.return_rate),
            theme.pnl(stats.return_rate),
            theme,
        ),
        labeled(
            "Portfolio value",
            format_currency(stats.portfolio_value),
            theme.info(),
            theme,
        ),
        labeled(
            "Cash in / out",
            format!(
                "{} / {}",
                format_currency(stats.cash_in),
                format_currency(stats.cash_out)
            ),
            theme.muted(),
            theme,
        ),
    ];
    frame.render_widget(panel(performance, "📈 Performance", theme), columns[1]);

    // Account
    let mut account = vec![
        labeled(
            "Cash",
            format_money(view.account.as_ref().map(|a| a.cash)),
            theme.info(),
            theme,
        ),
        labeled(
            "Positions",
            format_money(view.account.as_ref().map(|a| a.positions_value)),
            theme.info(),
            theme,
        ),
        labeled(
            "Total",
            format_money(view.account.as_ref().map(|a| a.portfolio_total)),
            theme.info(),
            theme,
        ),
    ];
    if let Some(deposits) = &view.deposits {
        account.push(labeled(
            "Net profit",
            format!(
                "{} ({})",
                format_signed(deposits.net_profit),
                format_percent(deposits.net_profit_percent)
            ),
            theme.pnl(deposits.net_profit),
            theme,
        ));
        account.push(labeled(
            "Unrealized",
            format_signed(deposits.unrealized_pnl),
            theme.pnl(deposits.unrealized_pnl),
            theme,
        ));
    }
    frame.render_widget(panel(account, "🏦 Account", theme), columns[2]);
}

fn labeled<'a>(
    label: &'a str,
    value: String,
    style: ratatui::style::Style,
    theme: &Theme,
) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{}: ", label), theme.muted()),
        Span::styled(value, style),
    ])
}

fn panel<'a>(lines: Vec<Line<'a>>, title: &'a str, theme: &Theme) -> Paragraph<'a> {
    Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(theme.border()),
    )
}
