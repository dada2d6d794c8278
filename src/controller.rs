//! Dispatcher from push channel events to the display regions.
//!
//! The controller owns the only state that survives between messages: the
//! [`AlertState`], the connection indicator, and the last rendered
//! document. All mutation happens on the caller's thread, one event at a
//! time, in arrival order.

use tracing::{debug, info, warn};

use crate::channel::{ChannelError, ChannelEvent, PushChannel};
use crate::data::{
    evaluate, validate, AlertState, ConnectionMonitor, StatusIndicator, THRESHOLD_MM,
};
use crate::render::{DisplayDocument, Renderer};

/// Connectivity as seen by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Disconnected,
    Connected,
}

/// What dispatching a single event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A connect or disconnect updated the status region.
    StatusChanged,
    /// The payload failed validation; nothing changed.
    Skipped,
    /// The content region was re-rendered.
    Rendered {
        /// The alert crossed into a new announce window.
        announce: bool,
    },
}

#[derive(Debug)]
pub struct Controller {
    state: ControllerState,
    monitor: ConnectionMonitor,
    alert: AlertState,
    renderer: Renderer,
    content: Option<DisplayDocument>,
    activated: bool,
}

impl Controller {
    pub fn new(renderer: Renderer) -> Self {
        Self {
            state: ControllerState::Disconnected,
            monitor: ConnectionMonitor::new(),
            alert: AlertState::default(),
            renderer,
            content: None,
            activated: false,
        }
    }

    /// Ask the channel for the latest measurement. Only the first call
    /// sends; later calls return `Ok(false)`.
    pub fn activate(&mut self, channel: &mut dyn PushChannel) -> Result<bool, ChannelError> {
        if self.activated {
            return Ok(false);
        }
        self.activated = true;
        channel.request_latest()?;
        debug!(channel = channel.description(), "requested latest measurement");
        Ok(true)
    }

    /// Handle one inbound event. `now` is the current time in epoch seconds.
    pub fn dispatch(&mut self, event: ChannelEvent, now: i64) -> Outcome {
        match event {
            ChannelEvent::Connected => {
                if self.monitor.on_connected() {
                    info!("push channel connected");
                }
                self.state = ControllerState::Connected;
                Outcome::StatusChanged
            }
            ChannelEvent::Disconnected => {
                if self.monitor.on_disconnected() {
                    info!("push channel disconnected");
                }
                self.state = ControllerState::Disconnected;
                Outcome::StatusChanged
            }
            ChannelEvent::Measurement(payload) => {
                let measurement = match validate(&payload) {
                    Ok(measurement) => measurement,
                    Err(reason) => {
                        debug!(%reason, "skipping measurement");
                        return Outcome::Skipped;
                    }
                };

                let level = measurement.data.water_level.unwrap_or(f64::NAN);
                let (alert, evaluation) = evaluate(self.alert, level, now);
                self.alert = alert;

                if evaluation.should_announce {
                    warn!(
                        water_level = level,
                        threshold = THRESHOLD_MM,
                        "water level at or below threshold"
                    );
                }

                self.content = Some(self.renderer.render(&measurement, &self.alert));
                Outcome::Rendered {
                    announce: evaluation.should_announce,
                }
            }
        }
    }

    /// Drain every event currently pending on the channel.
    pub fn pump(&mut self, channel: &mut dyn PushChannel, now: i64) -> Vec<Outcome> {
        std::iter::from_fn(|| channel.poll_event())
            .map(|event| self.dispatch(event, now))
            .collect()
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Contents of the status region.
    pub fn status(&self) -> StatusIndicator {
        self.monitor.indicator()
    }

    /// Contents of the content region, once a measurement has rendered.
    pub fn content(&self) -> Option<&DisplayDocument> {
        self.content.as_ref()
    }

    pub fn alert(&self) -> AlertState {
        self.alert
    }
}
