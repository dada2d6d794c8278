//! # levelwatch
//!
//! A live status display for a water-level and climate monitoring station.
//!
//! The station pushes measurements over a long-lived channel. This crate
//! tracks connectivity, validates each measurement, raises a low-water
//! alert with a cooldown, and renders everything into a structured
//! document shown in an interactive terminal UI.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Application                          │
//! │  ┌─────────┐    ┌────────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│ controller │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │ (dispatch) │    │         │    │         │ │
//! │  └────┬────┘    └─────┬──────┘    └─────────┘    └─────────┘ │
//! │       │               │                                      │
//! │       │               ├──▶ data (validate, alert, status)    │
//! │       │               └──▶ render (DisplayDocument)          │
//! │       ▼                                                      │
//! │  ┌─────────┐                                                 │
//! │  │ channel │◀── Stream | WebSocket | File | Memory            │
//! │  └─────────┘                                                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`channel`]**: The [`PushChannel`] trait and its transports
//! - **[`data`]**: Measurement validation, the low-water alert, and the
//!   connection indicator
//! - **[`render`]**: Pure rendering of a measurement into a [`DisplayDocument`]
//! - **[`controller`]**: Routes channel events to the status and content regions
//! - **[`ui`]**: Terminal rendering using ratatui
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Follow a station over TCP (newline-delimited JSON frames)
//! levelwatch --connect localhost:5001
//!
//! # Follow a station over WebSocket
//! levelwatch --ws ws://localhost:5000/measurements
//!
//! # Poll a JSON file holding the latest measurement
//! levelwatch --file measurement.json
//! ```
//!
//! ### As a library
//!
//! ```
//! use levelwatch::{Controller, MemoryChannel, Outbound, Renderer, TimeFormat};
//! use serde_json::json;
//!
//! let (mut handle, mut channel) = MemoryChannel::create("station");
//! let mut controller = Controller::new(Renderer::new(TimeFormat::Utc));
//! controller.activate(&mut channel).unwrap();
//! assert_eq!(handle.try_recv_request(), Some(Outbound::RequestLatest));
//!
//! handle.connect();
//! handle.push(json!({ "timestamp": 0, "data": { "water_level": 12 } }));
//! controller.pump(&mut channel, 0);
//!
//! let doc = controller.content().unwrap();
//! assert_eq!(doc.water_level.banner, "CRITICAL - Water level low");
//! ```
//!
//! ### With a stream channel (TCP, etc.)
//!
//! ```no_run
//! use levelwatch::StreamChannel;
//!
//! # tokio_test::block_on(async {
//! let (client, _server) = tokio::io::duplex(1024);
//! let channel = StreamChannel::spawn(client, "example");
//! # });
//! ```

pub mod app;
pub mod channel;
pub mod config;
pub mod controller;
pub mod data;
pub mod events;
pub mod export;
pub mod logging;
pub mod render;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use channel::{
    ChannelError, ChannelEvent, FileChannel, MemoryChannel, MemoryHandle, Outbound, PushChannel,
    ReconnectPolicy, StreamChannel, WebSocketChannel,
};
pub use config::{Settings, Source};
pub use controller::{Controller, ControllerState, Outcome};
pub use data::{
    evaluate, validate, AlertState, Evaluation, Invalid, Measurement, StatusClass,
    StatusIndicator, COOLDOWN_SECS, THRESHOLD_MM,
};
pub use render::{DisplayDocument, Renderer, Severity, TimeFormat};
