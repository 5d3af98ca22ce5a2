//! Progress screen rendering

use crate::control::RunSummary;
use crate::tui::components::{render_hint, titled_block, truncate_start};
use crate::tui::state::{LineKind, ProgressView};
use crate::tui::theme::theme;
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Gauge, Paragraph},
};

const HINT_RUNNING: &str = "p/Space: pause  c/Esc: cancel  Ctrl+C: cancel now";
const HINT_PAUSED: &str = "p/Space: resume  c/Esc: cancel  Ctrl+C: cancel now";
const HINT_CONFIRM: &str = "Cancel the run? y: yes  n/Esc: no";
const HINT_CANCELLING: &str = "Waiting for the current file to finish...";
const HINT_FINISHED: &str = "q/Enter/Esc: exit";

/// Draw one frame
pub fn render(
    terminal: &mut DefaultTerminal,
    view: &ProgressView,
    counters: &RunSummary,
) -> std::io::Result<()> {
    terminal.draw(|frame| draw(frame, frame.area(), view, counters))?;
    Ok(())
}

pub fn draw(frame: &mut Frame, area: Rect, view: &ProgressView, counters: &RunSummary) {
    let [header, gauge, stats, log, footer] = Layout::vertical([
        Constraint::Length(5),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(area);

    draw_header(frame, header, view);
    draw_gauge(frame, gauge, view, counters);
    draw_stats(frame, stats, counters);
    draw_log(frame, log, view);
    render_hint(hint_for(view), frame, footer);
}

fn hint_for(view: &ProgressView) -> &'static str {
    if view.is_finished() {
        HINT_FINISHED
    } else if view.confirm_cancel {
        HINT_CONFIRM
    } else if view.cancelling {
        HINT_CANCELLING
    } else if view.paused {
        HINT_PAUSED
    } else {
        HINT_RUNNING
    }
}

fn draw_header(frame: &mut Frame, area: Rect, view: &ProgressView) {
    let width = area.width.saturating_sub(16) as usize;
    let row = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(format!("{:<13}", label), theme().hint()),
            Span::styled(value, theme().normal()),
        ])
    };

    let lines = vec![
        row("Source:", truncate_start(&view.source, width)),
        row("Destination:", truncate_start(&view.destination, width)),
        row("Folders:", view.format.clone()),
    ];

    let paragraph = Paragraph::new(lines).block(titled_block("Photo Date Sorter"));
    frame.render_widget(paragraph, area);
}

fn draw_gauge(frame: &mut Frame, area: Rect, view: &ProgressView, counters: &RunSummary) {
    let title = match &view.summary {
        Some(summary) if summary.cancelled => "Cancelled",
        Some(_) => "Complete",
        None if view.paused => "Paused",
        None => "Sorting",
    };

    let gauge = Gauge::default()
        .block(titled_block(title))
        .gauge_style(theme().gauge(view.paused))
        .ratio(view.ratio)
        .label(format!(
            "{:.0}%  {}/{}",
            view.ratio * 100.0,
            counters.processed,
            counters.total
        ));
    frame.render_widget(gauge, area);
}

fn draw_stats(frame: &mut Frame, area: Rect, counters: &RunSummary) {
    let line = Line::from(vec![
        Span::styled(
            format!(" Moved: {}", counters.moved),
            theme().outcome(LineKind::Moved),
        ),
        Span::styled(
            format!("  Skipped: {}", counters.skipped),
            theme().outcome(LineKind::Skipped),
        ),
        Span::styled(
            format!("  Failed: {}", counters.failed),
            theme().outcome(LineKind::Failed),
        ),
    ]);
    frame.render_widget(line, area);
}

fn draw_log(frame: &mut Frame, area: Rect, view: &ProgressView) {
    // Two rows go to the border
    let visible = area.height.saturating_sub(2) as usize;
    let skip = view.lines.len().saturating_sub(visible);
    let lines: Vec<Line> = view
        .lines
        .iter()
        .skip(skip)
        .map(|line| Line::styled(line.text.clone(), theme().outcome(line.kind)))
        .collect();

    frame.render_widget(Paragraph::new(lines).block(titled_block("Log")), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use ratatui::{Terminal, backend::TestBackend};

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_draw_shows_progress_and_latest_log_lines() {
        let mut view = ProgressView::new(&Config::default());
        for i in 0..50 {
            view.log(format!("Moved: img_{:02}.jpg → 2024-01", i), false);
        }
        view.ratio = 0.5;
        let counters = RunSummary {
            total: 100,
            processed: 50,
            moved: 50,
            ..RunSummary::default()
        };

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).expect("terminal");
        terminal
            .draw(|frame| draw(frame, frame.area(), &view, &counters))
            .expect("draw");

        let text = screen_text(&terminal);
        assert!(text.contains("50/100"));
        assert!(text.contains("Moved: 50"));
        assert!(text.contains("img_49.jpg"));
        assert!(!text.contains("img_00.jpg"));
        assert!(text.contains(HINT_RUNNING));
    }

    #[test]
    fn test_hint_follows_state() {
        let mut view = ProgressView::new(&Config::default());
        view.paused = true;
        assert_eq!(hint_for(&view), HINT_PAUSED);
        view.confirm_cancel = true;
        assert_eq!(hint_for(&view), HINT_CONFIRM);
        view.summary = Some(RunSummary::default());
        assert_eq!(hint_for(&view), HINT_FINISHED);
    }
}
