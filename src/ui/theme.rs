//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::StatusClass;
use crate::render::Severity;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and section titles.
    pub highlight: Color,
    /// Color while the first connection is pending.
    pub pending: Color,
    /// Color for the critical banner and lost connections.
    pub critical: Color,
    /// Color for the normal banner and live connections.
    pub healthy: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for field labels.
    pub label: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            pending: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            border: Color::Gray,
            label: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            pending: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            border: Color::DarkGray,
            label: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        // Use terminal-light crate to detect background luminance
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Style for the status region.
    pub fn connection_style(&self, class: StatusClass) -> Style {
        match class {
            StatusClass::Connecting => Style::default().fg(self.pending),
            StatusClass::Connected => Style::default().fg(self.healthy),
            StatusClass::Disconnected => {
                Style::default().fg(self.critical).add_modifier(Modifier::BOLD)
            }
        }
    }

    /// Style for the water-level banner.
    pub fn severity_style(&self, severity: Severity) -> Style {
        match severity {
            Severity::Normal => Style::default().fg(self.healthy).add_modifier(Modifier::BOLD),
            Severity::Critical => Style::default()
                .fg(Color::White)
                .bg(self.critical)
                .add_modifier(Modifier::BOLD),
        }
    }
}
