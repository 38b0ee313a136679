//! Activity view - recent settlements and fills.

use crate::services::display::{format_currency, format_money, format_signed, format_timestamp};
use crate::services::summary::DashboardView;
use crate::services::ticker;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table},
    Frame,
};

use super::Theme;

/// Which table receives scroll keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pane {
    #[default]
    Settlements,
    Fills,
}

/// Scroll position for the activity tables.
#[derive(Debug, Clone, Default)]
pub struct ActivityState {
    pub focus: Pane,
    pub settlements_offset: usize,
    pub fills_offset: usize,
}

impl ActivityState {
    /// Apply a key press. Lengths bound the scroll offsets.
    pub fn handle_key(&mut self, key: &KeyEvent, settlements: usize, fills: usize) {
        let (offset, len) = match self.focus {
            Pane::Settlements => (&mut self.settlements_offset, settlements),
            Pane::Fills => (&mut self.fills_offset, fills),
        };
        match key.code {
            KeyCode::Tab => {
                self.focus = match self.focus {
                    Pane::Settlements => Pane::Fills,
                    Pane::Fills => Pane::Settlements,
                };
            }
            KeyCode::Down | KeyCode::Char('j') => {
                *offset = (*offset + 1).min(len.saturating_sub(1));
            }
            KeyCode::Up | KeyCode::Char('k') => {
                *offset = offset.saturating_sub(1);
            }
            KeyCode::PageDown => {
                *offset = (*offset + 10).min(len.saturating_sub(1));
            }
            KeyCode::PageUp => {
                *offset = offset.saturating_sub(10);
            }
            KeyCode::Home | KeyCode::Char('g') => *offset = 0,
            _ => {}
        }
    }

    /// Pull offsets back in range after the view shrinks.
    pub fn clamp(&mut self, settlements: usize, fills: usize) {
        self.settlements_offset = self.settlements_offset.min(settlements.saturating_sub(1));
        self.fills_offset = self.fills_offset.min(fills.saturating_sub(1));
    }
}

/// Render the activity view.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    view: Option<&DashboardView>,
    state: &ActivityState,
    theme: &Theme,
) {
    let Some(view) = view else {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled("No summary loaded yet.", theme.muted())),
        ];
        let block = Paragraph::new(text).block(
            Block::default()
                .borders(Borders::ALL)
                .title("📜 Activity")
                .border_style(theme.border()),
        );
        frame.render_widget(block, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_settlements(frame, chunks[0], view, state, theme);
    render_fills(frame, chunks[1], view, state, theme);
}

fn pane_block<'a>(title: String, focused: bool, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(if focused { theme.title() } else { theme.border() })
}

fn render_settlements(
    frame: &mut Frame,
    area: Rect,
    view: &DashboardView,
    state: &ActivityState,
    theme: &Theme,
) {
    let header = Row::new(vec!["Time", "Market", "Outcome", "Cash"]).style(theme.header());

    let rows: Vec<Row> = view
        .settlements
        .iter()
        .skip(state.settlements_offset)
        .map(|s| {
            let (cash, style) = match s.cash_change {
                Some(value) => (format_signed(value), theme.pnl(value)),
                None => (format_money(None), theme.muted()),
            };
            Row::new(vec![
                Line::from(format_timestamp(s.ts_ms)),
                Line::from(ticker::prettify(&s.ticker)),
                Line::from(s.outcome.clone()),
                Line::from(Span::styled(cash, style)),
            ])
        })
        .collect();

    let title = format!("🏁 Settlements ({})", view.settlements.len());
    let table = Table::new(
        rows,
        [
            Constraint::Length(17),
            Constraint::Min(20),
            Constraint::Length(8),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(pane_block(title, state.focus == Pane::Settlements, theme));

    frame.render_widget(table, area);
}

fn render_fills(
    frame: &mut Frame,
    area: Rect,
    view: &DashboardView,
    state: &ActivityState,
    theme: &Theme,
) {
    let header =
        Row::new(vec!["Time", "Market", "Action", "Side", "Size", "Price", "Cost"]).style(theme.header());

    let rows: Vec<Row> = view
        .fills
        .iter()
        .skip(state.fills_offset)
        .map(|f| {
            let action = f
                .action
                .map(|a| a.to_string())
                .unwrap_or_else(|| "?".to_string());
            Row::new(vec![
                format_timestamp(f.ts_ms),
                ticker::prettify(&f.ticker),
                action,
                f.side.clone(),
                format!("{}", f.size),
                format_currency(f.price),
                format_currency(f.cost()),
            ])
        })
        .collect();

    let title = format!("🧾 Fills ({})", view.fills.len());
    let table = Table::new(
        rows,
        [
            Constraint::Length(17),
            Constraint::Min(20),
            Constraint::Length(6),
            Constraint::Length(5),
            Constraint::Length(7),
            Constraint::Length(8),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(pane_block(title, state.focus == Pane::Fills, theme));

    frame.render_widget(table, area);
}
