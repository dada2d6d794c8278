//! JSON serialization of the display regions.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::channel::ChannelEvent;
use crate::controller::{Controller, Outcome};
use crate::data::StatusIndicator;
use crate::render::{DisplayDocument, Renderer};

#[derive(Debug, Serialize)]
struct Export<'a> {
    status: StatusIndicator,
    content: Option<&'a DisplayDocument>,
}

/// Serialize the status and content regions as pretty-printed JSON.
pub fn to_json(status: StatusIndicator, content: Option<&DisplayDocument>) -> Result<String> {
    Ok(serde_json::to_string_pretty(&Export { status, content })?)
}

/// Write the status and content regions to `path`.
pub fn write(path: &Path, status: StatusIndicator, content: Option<&DisplayDocument>) -> Result<()> {
    let json = to_json(status, content)?;
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

/// Run a single payload through a fresh controller, as the live dashboard
/// would on its first message.
///
/// Fails if the payload does not validate.
pub fn replay(payload: serde_json::Value, renderer: Renderer, now: i64) -> Result<Controller> {
    let mut controller = Controller::new(renderer);
    match controller.dispatch(ChannelEvent::Measurement(payload), now) {
        Outcome::Rendered { .. } => Ok(controller),
        _ => anyhow::bail!("payload is not a valid measurement"),
    }
}

/// Read a measurement file and write its rendering to `export_path`.
pub fn file_to_file(
    measurement_path: &Path,
    export_path: &Path,
    renderer: Renderer,
    now: i64,
) -> Result<()> {
    let content = std::fs::read_to_string(measurement_path)
        .with_context(|| format!("failed to read {}", measurement_path.display()))?;
    let payload: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", measurement_path.display()))?;
    let controller = replay(payload, renderer, now)
        .with_context(|| format!("invalid measurement in {}", measurement_path.display()))?;

    write(export_path, controller.status(), controller.content())
}
