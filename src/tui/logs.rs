//! Logs view - captured tracing output.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use super::{LogBuffer, LogLevel, Theme};

/// Filter and pause state for the logs view.
#[derive(Debug, Clone)]
pub struct LogsState {
    pub min_level: LogLevel,
    /// Lines captured when paused; `None` while following live output.
    pub frozen: Option<Vec<String>>,
}

impl Default for LogsState {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Trace,
            frozen: None,
        }
    }
}

impl LogsState {
    /// Handle keyboard events for the logs view.
    pub fn handle_key(&mut self, key: &KeyEvent, buffer: &LogBuffer, limit: usize) {
        match key.code {
            KeyCode::Char('a') | KeyCode::Char('A') => self.min_level = LogLevel::Trace,
            KeyCode::Char('e') | KeyCode::Char('E') => self.min_level = LogLevel::Error,
            KeyCode::Char('w') | KeyCode::Char('W') => self.min_level = LogLevel::Warn,
            KeyCode::Char('i') | KeyCode::Char('I') => self.min_level = LogLevel::Info,
            KeyCode::Char('d') | KeyCode::Char('D') => self.min_level = LogLevel::Debug,
            KeyCode::Char('c') | KeyCode::Char('C') => {
                buffer.clear();
                if self.frozen.is_some() {
                    self.frozen = Some(Vec::new());
                }
            }
            KeyCode::Char('p') | KeyCode::Char('P') => {
                self.frozen = match self.frozen {
                    Some(_) => None,
                    None => Some(buffer.recent(limit, LogLevel::Trace)),
                };
            }
            _ => {}
        }
    }

    /// Lines to show, newest last.
    pub fn lines(&self, buffer: &LogBuffer, limit: usize) -> Vec<String> {
        match &self.frozen {
            Some(lines) => lines
                .iter()
                .filter(|line| LogLevel::detect(line).map_or(true, |lvl| lvl >= self.min_level))
                .cloned()
                .collect(),
            None => buffer.recent(limit, self.min_level),
        }
    }
}

/// Render the logs view.
pub fn render(frame: &mut Frame, area: Rect, buffer: &LogBuffer, state: &LogsState, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Log controls
            Constraint::Min(0),    // Log output
        ])
        .split(area);

    render_log_controls(frame, chunks[0], state, theme);
    render_log_output(frame, chunks[1], buffer, state, theme);
}

fn render_log_controls(frame: &mut Frame, area: Rect, state: &LogsState, theme: &Theme) {
    let text = vec![
        Line::from(vec![
            Span::styled("Filter: ", theme.muted()),
            Span::styled("[A]", theme.info()),
            Span::raw(" All  "),
            Span::styled("[E]", theme.loss()),
            Span::raw(" Error  "),
            Span::styled("[W]", theme.warning()),
            Span::raw(" Warn  "),
            Span::styled("[I]", theme.info()),
            Span::raw(" Info  "),
            Span::styled("[D]", theme.muted()),
            Span::raw(" Debug   "),
            Span::styled(format!("showing {:?}+", state.min_level), theme.muted()),
        ]),
        Line::from(vec![
            Span::styled("Actions: ", theme.muted()),
            Span::styled("[C]", theme.info()),
            Span::raw(" Clear  "),
            Span::styled("[P]", theme.info()),
            Span::raw(if state.frozen.is_some() { " Resume" } else { " Pause" }),
        ]),
    ];

    let block = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title("📋 Log Controls")
            .border_style(theme.border()),
    );

    frame.render_widget(block, area);
}

fn render_log_output(
    frame: &mut Frame,
    area: Rect,
    buffer: &LogBuffer,
    state: &LogsState,
    theme: &Theme,
) {
    let title = if state.frozen.is_some() {
        "📝 Logs (Paused)"
    } else {
        "📝 Logs (Live)"
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(theme.border());

    let visible = area.height.saturating_sub(2) as usize;
    let lines = state.lines(buffer, visible.max(1));
    if lines.is_empty() {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled("No logs yet.", theme.muted())),
        ];
        frame.render_widget(Paragraph::new(text).block(block).centered(), area);
        return;
    }

    let skip = lines.len().saturating_sub(visible);
    let items: Vec<ListItem> = lines
        .iter()
        .skip(skip)
        .map(|line| {
            let style = match LogLevel::detect(line) {
                Some(LogLevel::Error) => theme.loss(),
                Some(LogLevel::Warn) => theme.warning(),
                Some(LogLevel::Info) => theme.gain(),
                Some(LogLevel::Debug) | Some(LogLevel::Trace) => theme.muted(),
                None => theme.info(),
            };
            ListItem::new(Line::from(Span::styled(line.clone(), style)))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[test]
    fn test_filter_keys() {
        let buffer = LogBuffer::new(8);
        buffer.push_line("t  INFO kalshi_dash: loaded".to_string());
        buffer.push_line("t ERROR kalshi_dash: broken".to_string());

        let mut state = LogsState::default();
        state.handle_key(&press('e'), &buffer, 10);

        let lines = state.lines(&buffer, 10);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("broken"));
    }

    #[test]
    fn test_pause_freezes_output() {
        let buffer = LogBuffer::new(8);
        buffer.push_line("first".to_string());

        let mut state = LogsState::default();
        state.handle_key(&press('p'), &buffer, 10);
        buffer.push_line("second".to_string());
        assert_eq!(state.lines(&buffer, 10), vec!["first"]);

        state.handle_key(&press('p'), &buffer, 10);
        assert_eq!(state.lines(&buffer, 10), vec!["first", "second"]);
    }
}
