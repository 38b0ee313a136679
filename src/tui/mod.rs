//! Terminal UI for watching the portfolio summary.

mod activity;
mod app;
pub mod charts;
mod dashboard;
pub mod events;
mod logs;
mod state;
mod theme;

pub use app::{run_tui, App};
pub use charts::{Canvas, ChartHandle, ChartRenderer};
pub use state::{LogBuffer, LogLevel, LogMakeWriter};
pub use theme::Theme;

/// Route/View enum for navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Activity,
    Logs,
}

impl Route {
    /// Get all available routes.
    pub fn all() -> Vec<Self> {
        vec![Self::Dashboard, Self::Activity, Self::Logs]
    }

    /// Get the route name.
    pub fn name(&self) -> &str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Activity => "Activity",
            Self::Logs => "Logs",
        }
    }

    /// Get the route shortcut key.
    pub fn key(&self) -> char {
        match self {
            Self::Dashboard => '1',
            Self::Activity => '2',
            Self::Logs => '3',
        }
    }
}
