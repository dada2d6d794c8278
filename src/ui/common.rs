//! Common UI components.
//!
//! This module contains the header bar (status region), the status bar,
//! and the help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;

/// Render the header bar carrying the status region.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let status = app.controller.status();
    let style = app.theme.connection_style(status.class);

    let line = Line::from(vec![
        Span::styled(" ● ", style),
        Span::styled("LEVELWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(status.text, style),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the status bar at the bottom.
///
/// Shows the channel description, time since the last render, and the
/// available controls. Temporary status messages take precedence, then
/// the channel's last error.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    if let Some(err) = app.source_error() {
        let text = format!(" {} | {} | ?:help q:quit", app.source_description(), err);
        let paragraph = Paragraph::new(text).style(Style::default().fg(app.theme.critical));
        frame.render_widget(paragraph, area);
        return;
    }

    let status = match app.last_render {
        Some(at) => format!(
            " {} | Rendered {:.1}s ago | e:export ?:help q:quit",
            app.source_description(),
            at.elapsed().as_secs_f64(),
        ),
        None => format!(
            " {} | Waiting for data... | ?:help q:quit",
            app.source_description()
        ),
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the dashboard.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().fg(app.theme.highlight).add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from("  e         Export to JSON"),
        Line::from("  ?         Toggle this help"),
        Line::from("  q / Esc   Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 36u16.min(area.width.saturating_sub(4));
    let help_height = 9u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
