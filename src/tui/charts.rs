//! Chart rendering.
//!
//! `ChartRenderer` owns the prepared data behind each chart canvas. Each
//! canvas holds at most one live handle; applying a new summary destroys the
//! old handle before creating its replacement, so a canvas never draws two
//! generations of data on top of each other.

use crate::services::display::format_currency;
use crate::services::summary::DashboardView;
use chrono::{Local, TimeZone};
use ratatui::{
    layout::Rect,
    style::Style,
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};
use std::collections::HashMap;
use tracing::debug;

use super::Theme;

/// Most categories shown in the breakdown chart.
pub const MAX_BARS: usize = 8;

const HOUR_SECS: f64 = 3600.0;

/// Chart canvases on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Canvas {
    CumulativePnl,
    CategoryBreakdown,
}

impl Canvas {
    pub fn all() -> [Canvas; 2] {
        [Canvas::CumulativePnl, Canvas::CategoryBreakdown]
    }

    pub fn title(&self) -> &'static str {
        match self {
            Canvas::CumulativePnl => "📈 Cumulative Realized P&L",
            Canvas::CategoryBreakdown => "📊 P&L by Category",
        }
    }
}

/// Prepared line chart data; x is epoch seconds, y is dollars.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChartHandle {
    pub id: u64,
    pub points: Vec<(f64, f64)>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

/// One bar of the breakdown chart.
#[derive(Debug, Clone, PartialEq)]
pub struct BarDatum {
    pub label: String,
    /// Magnitude in cents; bars cannot go negative.
    pub magnitude: u64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChartHandle {
    pub id: u64,
    pub bars: Vec<BarDatum>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartHandle {
    Line(LineChartHandle),
    Bars(BarChartHandle),
}

impl ChartHandle {
    pub fn id(&self) -> u64 {
        match self {
            ChartHandle::Line(h) => h.id,
            ChartHandle::Bars(h) => h.id,
        }
    }
}

/// Owner of the live chart handles.
#[derive(Debug, Default)]
pub struct ChartRenderer {
    handles: HashMap<Canvas, ChartHandle>,
    next_id: u64,
    destroyed: u64,
}

impl ChartRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every canvas's handle with one built from `view`.
    pub fn rebuild(&mut self, view: &DashboardView) {
        for canvas in Canvas::all() {
            self.destroy(canvas);
            if let Some(handle) = self.create(canvas, view) {
                self.handles.insert(canvas, handle);
            }
        }
        debug!(
            live = self.handles.len(),
            destroyed = self.destroyed,
            "Rebuilt chart handles"
        );
    }

    /// Drop the handle for `canvas`. Returns whether one existed.
    pub fn destroy(&mut self, canvas: Canvas) -> bool {
        let existed = self.handles.remove(&canvas).is_some();
        if existed {
            self.destroyed += 1;
        }
        existed
    }

    pub fn handle(&self, canvas: Canvas) -> Option<&ChartHandle> {
        self.handles.get(&canvas)
    }

    pub fn live_handles(&self) -> usize {
        self.handles.len()
    }

    /// Total handles destroyed over the renderer's lifetime.
    pub fn destroyed(&self) -> u64 {
        self.destroyed
    }

    fn create(&mut self, canvas: Canvas, view: &DashboardView) -> Option<ChartHandle> {
        let handle = match canvas {
            Canvas::CumulativePnl => ChartHandle::Line(self.line_handle(view)?),
            Canvas::CategoryBreakdown => ChartHandle::Bars(self.bar_handle(view)?),
        };
        Some(handle)
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn line_handle(&mut self, view: &DashboardView) -> Option<LineChartHandle> {
        let series = &view.stats.cumulative_series;
        if series.is_empty() {
            return None;
        }

        let points: Vec<(f64, f64)> = series
            .iter()
            .map(|p| (p.ts as f64 / 1000.0, p.cumulative))
            .collect();

        let (mut x_min, mut x_max) = (f64::MAX, f64::MIN);
        // The zero line stays visible.
        let (mut y_min, mut y_max) = (0.0_f64, 0.0_f64);
        for (x, y) in &points {
            x_min = x_min.min(*x);
            x_max = x_max.max(*x);
            y_min = y_min.min(*y);
            y_max = y_max.max(*y);
        }
        if x_max - x_min < HOUR_SECS {
            x_min -= HOUR_SECS;
            x_max += HOUR_SECS;
        }
        let pad = ((y_max - y_min) * 0.1).max(1.0);

        Some(LineChartHandle {
            id: self.allocate_id(),
            points,
            x_bounds: [x_min, x_max],
            y_bounds: [y_min - pad, y_max + pad],
        })
    }

    fn bar_handle(&mut self, view: &DashboardView) -> Option<BarChartHandle> {
        if view.categories.is_empty() {
            return None;
        }

        let bars = view
            .categories
            .iter()
            .take(MAX_BARS)
            .map(|c| BarDatum {
                label: c.category.clone(),
                magnitude: (c.realized_pnl.abs() * 100.0).round() as u64,
                value: c.realized_pnl,
            })
            .collect();

        Some(BarChartHandle {
            id: self.allocate_id(),
            bars,
        })
    }

    /// Draw the cumulative P&L canvas.
    pub fn render_cumulative(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let canvas = Canvas::CumulativePnl;
        let block = canvas_block(canvas, theme);

        let Some(ChartHandle::Line(handle)) = self.handle(canvas) else {
            frame.render_widget(empty_canvas(block, "No settled markets yet.", theme), area);
            return;
        };

        let last = handle.points.last().map(|(_, y)| *y).unwrap_or(0.0);
        let dataset = Dataset::default()
            .name(format_currency(last))
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(theme.pnl(last))
            .data(&handle.points);

        let x_axis = Axis::default()
            .style(theme.muted())
            .bounds(handle.x_bounds)
            .labels(vec![
                Span::raw(date_label(handle.x_bounds[0])),
                Span::raw(date_label(handle.x_bounds[1])),
            ]);
        let y_axis = Axis::default()
            .style(theme.muted())
            .bounds(handle.y_bounds)
            .labels(vec![
                Span::raw(format_currency(handle.y_bounds[0])),
                Span::raw(format_currency(0.0)),
                Span::raw(format_currency(handle.y_bounds[1])),
            ]);

        let chart = Chart::new(vec![dataset])
            .block(block)
            .x_axis(x_axis)
            .y_axis(y_axis);
        frame.render_widget(chart, area);
    }

    /// Draw the category breakdown canvas.
    pub fn render_breakdown(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let canvas = Canvas::CategoryBreakdown;
        let block = canvas_block(canvas, theme);

        let Some(ChartHandle::Bars(handle)) = self.handle(canvas) else {
            frame.render_widget(empty_canvas(block, "No categories yet.", theme), area);
            return;
        };

        let count = handle.bars.len().max(1) as u16;
        let bar_width = (area.width.saturating_sub(2) / count)
            .saturating_sub(1)
            .clamp(3, 14);

        let bars: Vec<Bar> = handle
            .bars
            .iter()
            .map(|bar| {
                let label: String = bar.label.chars().take(bar_width as usize).collect();
                Bar::default()
                    .label(Line::from(label))
                    .value(bar.magnitude)
                    .text_value(format_currency(bar.value))
                    .style(theme.pnl(bar.value))
                    .value_style(Style::default().fg(ratatui::style::Color::Black).bg(
                        if bar.value < 0.0 { theme.loss } else { theme.gain },
                    ))
            })
            .collect();

        let chart = BarChart::default()
            .block(block)
            .data(BarGroup::default().bars(&bars))
            .bar_width(bar_width)
            .bar_gap(1);
        frame.render_widget(chart, area);
    }
}

fn canvas_block(canvas: Canvas, theme: &Theme) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(canvas.title())
        .border_style(theme.border())
}

fn empty_canvas<'a>(block: Block<'a>, message: &'a str, theme: &Theme) -> Paragraph<'a> {
    Paragraph::new(vec![Line::from(""), Line::from(Span::styled(message, theme.muted()))])
        .block(block)
}

fn date_label(epoch_secs: f64) -> String {
    Local
        .timestamp_opt(epoch_secs as i64, 0)
        .single()
        .map(|dt| dt.format("%m/%d").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CategoryTotal, CumulativePoint};

    fn view_with(series: Vec<CumulativePoint>, categories: Vec<CategoryTotal>) -> DashboardView {
        let mut view = DashboardView::default();
        view.stats.cumulative_series = series;
        view.categories = categories;
        view
    }

    fn sample_view() -> DashboardView {
        view_with(
            vec![
                CumulativePoint { ts: 100_000, cumulative: 50.0 },
                CumulativePoint { ts: 200_000_000, cumulative: 30.0 },
            ],
            vec![CategoryTotal {
                category: "NFL".to_string(),
                realized_pnl: -12.34,
                settlements: 2,
            }],
        )
    }

    #[test]
    fn test_rebuild_one_handle_per_canvas() {
        let mut renderer = ChartRenderer::new();
        renderer.rebuild(&sample_view());
        assert_eq!(renderer.live_handles(), 2);
        assert_eq!(renderer.destroyed(), 0);

        let first_id = renderer.handle(Canvas::CumulativePnl).unwrap().id();
        renderer.rebuild(&sample_view());

        assert_eq!(renderer.live_handles(), 2);
        assert_eq!(renderer.destroyed(), 2);
        assert_ne!(renderer.handle(Canvas::CumulativePnl).unwrap().id(), first_id);
    }

    #[test]
    fn test_empty_view_clears_canvases() {
        let mut renderer = ChartRenderer::new();
        renderer.rebuild(&sample_view());
        renderer.rebuild(&DashboardView::default());

        assert_eq!(renderer.live_handles(), 0);
        assert!(renderer.handle(Canvas::CategoryBreakdown).is_none());
    }

    #[test]
    fn test_line_bounds_include_zero() {
        let mut renderer = ChartRenderer::new();
        renderer.rebuild(&sample_view());

        let Some(ChartHandle::Line(handle)) = renderer.handle(Canvas::CumulativePnl) else {
            panic!("expected line handle");
        };
        assert_eq!(handle.points[0], (100.0, 50.0));
        assert!(handle.y_bounds[0] < 0.0);
        assert!(handle.y_bounds[1] > 50.0);
    }

    #[test]
    fn test_single_point_gets_time_padding() {
        let mut renderer = ChartRenderer::new();
        renderer.rebuild(&view_with(
            vec![CumulativePoint { ts: 1_700_000_000_000, cumulative: 5.0 }],
            vec![],
        ));

        let Some(ChartHandle::Line(handle)) = renderer.handle(Canvas::CumulativePnl) else {
            panic!("expected line handle");
        };
        assert!(handle.x_bounds[1] - handle.x_bounds[0] >= 2.0 * HOUR_SECS);
        assert!(renderer.handle(Canvas::CategoryBreakdown).is_none());
    }

    #[test]
    fn test_bar_magnitude_in_cents() {
        let mut renderer = ChartRenderer::new();
        renderer.rebuild(&sample_view());

        let Some(ChartHandle::Bars(handle)) = renderer.handle(Canvas::CategoryBreakdown) else {
            panic!("expected bar handle");
        };
        assert_eq!(handle.bars[0].magnitude, 1234);
        assert_eq!(handle.bars[0].value, -12.34);
    }
}
