//! Theme and color definitions for the TUI.

use ratatui::style::{Color, Modifier, Style};

/// Theme for the TUI with consistent color scheme.
#[derive(Debug, Clone)]
pub struct Theme {
    pub primary: Color,
    pub secondary: Color,
    pub gain: Color,
    pub loss: Color,
    pub warning: Color,
    pub info: Color,
    pub muted: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Color::Cyan,
            secondary: Color::Magenta,
            gain: Color::Green,
            loss: Color::Red,
            warning: Color::Yellow,
            info: Color::Blue,
            muted: Color::DarkGray,
        }
    }
}

impl Theme {
    /// Get style for titles.
    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for table headers.
    pub fn header(&self) -> Style {
        Style::default()
            .fg(self.secondary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn gain(&self) -> Style {
        Style::default().fg(self.gain)
    }

    pub fn loss(&self) -> Style {
        Style::default().fg(self.loss)
    }

    /// Green for gains, red for losses, plain for zero.
    pub fn pnl(&self, value: f64) -> Style {
        if value > 0.0 {
            self.gain()
        } else if value < 0.0 {
            self.loss()
        } else {
            Style::default()
        }
    }

    pub fn warning(&self) -> Style {
        Style::default()
            .fg(self.warning)
            .add_modifier(Modifier::BOLD)
    }

    pub fn info(&self) -> Style {
        Style::default().fg(self.info)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Get style for borders.
    pub fn border(&self) -> Style {
        Style::default().fg(self.primary)
    }

    /// Get style for tabs (active).
    pub fn tab_active(&self) -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for tabs (inactive).
    pub fn tab_inactive(&self) -> Style {
        Style::default().fg(self.muted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pnl_style() {
        let theme = Theme::default();
        assert_eq!(theme.pnl(1.0).fg, Some(Color::Green));
        assert_eq!(theme.pnl(-1.0).fg, Some(Color::Red));
        assert_eq!(theme.pnl(0.0).fg, None);
    }
}
