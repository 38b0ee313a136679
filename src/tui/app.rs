//! Main TUI application logic.

use super::activity::{self, ActivityState};
use super::logs::{self, LogsState};
use super::{dashboard, events, ChartRenderer, LogBuffer, Route, Theme};
use crate::config::Config;
use crate::services::poller::{FetchOutcome, PollState, Poller};
use crate::sources::SummarySource;
use crossterm::{
    event::KeyEvent,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Tabs},
    Frame, Terminal,
};
use std::{io, sync::Arc, time::Duration};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Lines kept when the logs view is paused.
const LOG_VIEW_LIMIT: usize = 500;

/// Main TUI application.
pub struct App {
    current_route: Route,
    theme: Theme,
    source_label: String,
    poll_state: PollState,
    charts: ChartRenderer,
    log_buffer: Arc<LogBuffer>,
    activity: ActivityState,
    logs: LogsState,
    should_quit: bool,
    refresh_requested: bool,
}

impl App {
    /// Create a new TUI application.
    pub fn new(config: &Config, source_label: String, log_buffer: Arc<LogBuffer>) -> Self {
        Self {
            current_route: Route::Dashboard,
            theme: Theme::default(),
            source_label,
            poll_state: PollState::new(config.cash_unit),
            charts: ChartRenderer::new(),
            log_buffer,
            activity: ActivityState::default(),
            logs: LogsState::default(),
            should_quit: false,
            refresh_requested: false,
        }
    }

    /// Apply a fetch outcome, rebuilding the charts when the view changes.
    pub fn apply_outcome(&mut self, outcome: FetchOutcome) {
        if !self.poll_state.apply(outcome) {
            return;
        }
        if let Some(view) = self.poll_state.view() {
            self.charts.rebuild(view);
            self.activity.clamp(view.settlements.len(), view.fills.len());
        }
    }

    /// Handle an event.
    pub fn handle_event(&mut self, event: events::Event) {
        match event {
            events::Event::Key(key) => self.handle_key(&key),
            events::Event::Tick => {
                // Redraw only
            }
            events::Event::Resize(_, _) => {
                // Terminal will handle resize automatically
            }
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) {
        if events::is_quit(key) {
            self.should_quit = true;
            return;
        }
        if events::is_refresh(key) {
            self.refresh_requested = true;
            return;
        }

        // Route navigation
        for route in Route::all() {
            if events::is_char(key, route.key()) {
                self.current_route = route;
                return;
            }
        }

        // Pass to current view
        match self.current_route {
            Route::Dashboard => {}
            Route::Activity => {
                let (settlements, fills) = self
                    .poll_state
                    .view()
                    .map_or((0, 0), |v| (v.settlements.len(), v.fills.len()));
                self.activity.handle_key(key, settlements, fills);
            }
            Route::Logs => self.logs.handle_key(key, &self.log_buffer, LOG_VIEW_LIMIT),
        }
    }

    /// Check if the app should quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Take a pending manual refresh request.
    pub fn take_refresh(&mut self) -> bool {
        std::mem::take(&mut self.refresh_requested)
    }

    pub fn current_route(&self) -> Route {
        self.current_route
    }

    pub fn poll_state(&self) -> &PollState {
        &self.poll_state
    }

    pub fn charts(&self) -> &ChartRenderer {
        &self.charts
    }

    pub fn source_label(&self) -> &str {
        &self.source_label
    }

    /// Render the TUI.
    pub fn render(&self, frame: &mut Frame) {
        let area = frame.size();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Tabs
                Constraint::Min(0),    // Content
                Constraint::Length(3), // Status bar
            ])
            .split(area);

        self.render_tabs(frame, chunks[0]);

        match self.current_route {
            Route::Dashboard => dashboard::render(frame, chunks[1], self, &self.theme),
            Route::Activity => activity::render(
                frame,
                chunks[1],
                self.poll_state.view(),
                &self.activity,
                &self.theme,
            ),
            Route::Logs => logs::render(frame, chunks[1], &self.log_buffer, &self.logs, &self.theme),
        }

        self.render_status_bar(frame, chunks[2]);
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let routes = Route::all();
        let titles: Vec<Line> = routes
            .iter()
            .map(|r| {
                Line::from(vec![
                    Span::styled(format!("[{}] ", r.key()), self.theme.muted()),
                    Span::raw(r.name().to_string()),
                ])
            })
            .collect();

        let selected = routes
            .iter()
            .position(|r| *r == self.current_route)
            .unwrap_or(0);

        let tabs = Tabs::new(titles)
            .block(Block::default().borders(Borders::ALL).title("Navigation"))
            .select(selected)
            .style(self.theme.tab_inactive())
            .highlight_style(self.theme.tab_active());

        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let text = Line::from(vec![
            Span::styled("Kalshi Dash", self.theme.title()),
            Span::raw(" | "),
            Span::styled("q", self.theme.muted()),
            Span::raw(" to quit | "),
            Span::styled("r", self.theme.muted()),
            Span::raw(" to refresh | "),
            Span::styled("1-3", self.theme.muted()),
            Span::raw(" to switch views"),
        ]);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border());

        frame.render_widget(block, area);

        let inner = Rect {
            x: area.x + 2,
            y: area.y + 1,
            width: area.width.saturating_sub(4),
            height: 1,
        };

        frame.render_widget(text, inner);
    }
}

/// Run the TUI application until the user quits.
pub async fn run_tui(
    config: &Config,
    source: SummarySource,
    log_buffer: Arc<LogBuffer>,
) -> io::Result<()> {
    let source = Arc::new(source);
    let mut app = App::new(config, source.describe(), log_buffer);
    let (poller, mut outcomes) = Poller::new(source);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut event_handler = events::EventHandler::new(Duration::from_millis(250));
    let poll_task = poller.start(config.poll_interval());

    let result = event_loop(&mut terminal, &mut app, &mut event_handler, &poller, &mut outcomes).await;

    poll_task.abort();
    info!(
        "Dashboard closed after {} loads and {} failures",
        app.poll_state().successes(),
        app.poll_state().failures()
    );

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    event_handler: &mut events::EventHandler,
    poller: &Poller,
    outcomes: &mut mpsc::UnboundedReceiver<FetchOutcome>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;

        tokio::select! {
            event = event_handler.next() => match event {
                Some(event) => app.handle_event(event),
                None => break,
            },
            Some(outcome) = outcomes.recv() => app.apply_outcome(outcome),
        }

        if app.take_refresh() {
            let id = poller.trigger();
            debug!("Manual refresh, fetch #{}", id);
        }

        if app.should_quit() {
            break;
        }
    }
    Ok(())
}
