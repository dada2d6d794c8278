//! Content region rendering.
//!
//! Serializes a [`DisplayDocument`] into ratatui widgets: a timestamp
//! line, the water-level panel with its banner, and one table per sensor
//! group.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::render::{DisplayDocument, Section, Severity};
use crate::ui::Theme;

/// Render the content region.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(doc) = app.controller.content() else {
        let paragraph = Paragraph::new("Waiting for the first measurement...")
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(panel(&app.theme, " Measurements "));
        frame.render_widget(paragraph, area);
        return;
    };

    render_document(frame, &app.theme, doc, area);
}

/// Lines of the water-level panel, in display order.
pub fn water_level_lines<'a>(doc: &'a DisplayDocument, theme: &Theme) -> Vec<Line<'a>> {
    let section = &doc.water_level;
    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!("{}: ", section.level.label), theme.label),
            Span::styled(
                section.level.value.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(
            format!(" {} ", section.banner),
            theme.severity_style(section.severity),
        )),
    ];

    if let Some(ref threshold) = section.threshold {
        lines.push(Line::from(vec![
            Span::styled("Threshold: ", theme.label),
            Span::raw(threshold.as_str()),
        ]));
    }
    if let Some(ref notice) = section.notice {
        lines.push(Line::from(Span::styled(
            notice.as_str(),
            Style::default().fg(theme.critical),
        )));
    }
    lines
}

fn render_document(frame: &mut Frame, theme: &Theme, doc: &DisplayDocument, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(1),                                        // Last update
        Constraint::Length(water_level_height(doc)),                  // Water level
        Constraint::Length(doc.inside.fields.len() as u16 + 3),       // Inside
        Constraint::Min(doc.outside.fields.len() as u16 + 3),         // Outside
    ])
    .split(area);

    let timestamp = Line::from(vec![
        Span::styled(" Last Update: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(doc.last_update.as_str()),
    ]);
    frame.render_widget(Paragraph::new(timestamp), chunks[0]);

    let border_color = match doc.water_level.severity {
        Severity::Critical => theme.critical,
        Severity::Normal => theme.border,
    };
    let water = Paragraph::new(water_level_lines(doc, theme)).block(
        panel(theme, " Water Level ").border_style(Style::default().fg(border_color)),
    );
    frame.render_widget(water, chunks[1]);

    render_section(frame, theme, &doc.inside, chunks[2]);
    render_section(frame, theme, &doc.outside, chunks[3]);
}

fn water_level_height(doc: &DisplayDocument) -> u16 {
    let optional = [
        doc.water_level.threshold.is_some(),
        doc.water_level.notice.is_some(),
    ]
    .iter()
    .filter(|present| **present)
    .count() as u16;
    // Two fixed lines plus borders
    4 + optional
}

fn render_section(frame: &mut Frame, theme: &Theme, section: &Section, area: Rect) {
    let rows: Vec<Row> = section
        .fields
        .iter()
        .map(|field| {
            Row::new(vec![
                Cell::from(field.label.as_str()).style(theme.label),
                Cell::from(field.value.as_str()),
            ])
        })
        .collect();

    let table = Table::new(rows, [Constraint::Length(22), Constraint::Min(10)])
        .block(panel(theme, &format!(" {} ", section.title)));

    frame.render_widget(table, area);
}

fn panel<'a>(theme: &Theme, title: &str) -> Block<'a> {
    Block::default()
        .title(Span::styled(
            title.to_string(),
            Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.border))
}
