//! Common UI components module

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    text::Line,
    widgets::{Block, BorderType, Paragraph, Wrap},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::theme::theme;

/// Rounded, themed block with a title
pub fn titled_block(title: &str) -> Block<'_> {
    Block::bordered()
        .title(Line::from(format!(" {} ", title)).style(theme().title()))
        .border_type(BorderType::Rounded)
        .border_style(theme().border())
        .style(theme().normal())
}

/// Render bottom hint text
pub fn render_hint(hint: &str, frame: &mut Frame, area: Rect) {
    let hint_widget = Paragraph::new(hint)
        .style(theme().hint())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(hint_widget, area);
}

/// Truncate by display width, keeping the tail (file names live at the end)
pub fn truncate_start(value: &str, max_width: usize) -> String {
    if value.width() <= max_width {
        return value.to_string();
    }

    let target_width = max_width.saturating_sub(3);
    let mut current_width = 0;
    let mut tail = Vec::new();

    for ch in value.chars().rev() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if current_width + ch_width > target_width {
            break;
        }
        tail.push(ch);
        current_width += ch_width;
    }

    let mut output = String::from("...");
    output.extend(tail.into_iter().rev());
    output
}
