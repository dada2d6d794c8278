//! Application state for the terminal dashboard.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::warn;

use crate::channel::PushChannel;
use crate::controller::{Controller, Outcome};
use crate::export;
use crate::render::Renderer;
use crate::ui::Theme;

/// How long a transient status message stays visible.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// Main application state.
pub struct App {
    pub running: bool,
    pub show_help: bool,

    channel: Box<dyn PushChannel>,
    pub controller: Controller,

    /// When the content region last re-rendered.
    pub last_render: Option<Instant>,

    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App reading from the given channel.
    pub fn new(channel: Box<dyn PushChannel>, renderer: Renderer) -> Self {
        Self::with_theme(channel, renderer, Theme::auto_detect())
    }

    pub fn with_theme(channel: Box<dyn PushChannel>, renderer: Renderer, theme: Theme) -> Self {
        Self {
            running: true,
            show_help: false,
            channel,
            controller: Controller::new(renderer),
            last_render: None,
            theme,
            status_message: None,
        }
    }

    /// Returns a description of the current channel.
    pub fn source_description(&self) -> &str {
        self.channel.description()
    }

    /// Returns the channel's last error, if any.
    pub fn source_error(&self) -> Option<&str> {
        self.channel.error()
    }

    /// Send the startup request for the latest measurement.
    pub fn activate(&mut self) {
        if let Err(e) = self.controller.activate(self.channel.as_mut()) {
            warn!(error = %e, "failed to request latest measurement");
            self.set_status_message(format!("Request failed: {}", e));
        }
    }

    /// Process every pending channel event.
    ///
    /// Returns true if the content region changed.
    pub fn reload_data(&mut self) -> bool {
        let now = chrono::Utc::now().timestamp();
        let outcomes = self.controller.pump(self.channel.as_mut(), now);

        let mut rendered = false;
        for outcome in outcomes {
            if let Outcome::Rendered { announce } = outcome {
                rendered = true;
                if announce {
                    self.set_status_message("Low water alert raised".to_string());
                }
            }
        }
        if rendered {
            self.last_render = Some(Instant::now());
        }
        rendered
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < STATUS_MESSAGE_TTL {
                return Some(msg);
            }
        }
        None
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the status and content regions to a file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        if self.controller.content().is_none() {
            anyhow::bail!("No measurement to export");
        }
        export::write(path, self.controller.status(), self.controller.content())
    }
}
