//! Colours of the progress screen

use crate::tui::state::LineKind;
use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub moved: Color,
    pub skipped: Color,
    pub failed: Color,
}

impl Theme {
    pub fn normal(&self) -> Style {
        Style::new().fg(self.text)
    }

    pub fn title(&self) -> Style {
        Style::new().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn border(&self) -> Style {
        Style::new().fg(self.accent)
    }

    pub fn hint(&self) -> Style {
        Style::new().fg(self.muted)
    }

    /// Gauge fill; turns to the warning colour while the run is held
    pub fn gauge(&self, paused: bool) -> Style {
        let fill = if paused { self.skipped } else { self.accent };
        Style::new().fg(fill)
    }

    /// Colour of a log line or counter by outcome
    pub fn outcome(&self, kind: LineKind) -> Style {
        match kind {
            LineKind::Moved => Style::new().fg(self.moved),
            LineKind::Skipped => Style::new().fg(self.skipped),
            LineKind::Failed => Style::new().fg(self.failed),
            LineKind::Info => self.normal(),
        }
    }
}

pub static THEME: Theme = Theme {
    text: Color::White,
    muted: Color::Gray,
    accent: Color::Cyan,
    moved: Color::Green,
    skipped: Color::Yellow,
    failed: Color::Red,
};

pub fn theme() -> &'static Theme {
    &THEME
}
