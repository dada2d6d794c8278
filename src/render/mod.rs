//! Deterministic rendering of a measurement into a [`DisplayDocument`].
//!
//! Rendering is a pure function of the measurement, the alert state, and
//! the configured [`TimeFormat`]. Turning the document into terminal
//! widgets or JSON is a separate step (see [`crate::ui`] and
//! [`crate::export`]).

mod document;
mod format;

pub use document::{DisplayDocument, Field, Section, Severity, WaterLevelSection};
pub use format::{format_timestamp, format_value, TimeFormat, PLACEHOLDER};

use crate::data::{AlertState, LightSensor, Measurement, Sensor, THRESHOLD_MM};

const MM: &str = " mm";
const CELSIUS: &str = "°C";
const PERCENT: &str = "%";
const LUX: &str = " lux";

/// Builds display documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer {
    time_format: TimeFormat,
}

impl Renderer {
    pub fn new(time_format: TimeFormat) -> Self {
        Self { time_format }
    }

    /// Render a validated measurement together with the current alert state.
    pub fn render(&self, measurement: &Measurement, alert: &AlertState) -> DisplayDocument {
        let reading = &measurement.data;

        DisplayDocument {
            last_update: format_timestamp(measurement.timestamp, self.time_format),
            water_level: water_level_section(reading.water_level, alert),
            inside: Section {
                title: "Inside Measurements".to_string(),
                fields: [("Up", reading.inside_up()), ("Down", reading.inside_down())]
                    .into_iter()
                    .flat_map(|(position, sensor)| climate_fields(position, sensor))
                    .collect(),
            },
            outside: Section {
                title: "Outside Measurements".to_string(),
                fields: [("Up", reading.outside_up()), ("Down", reading.outside_down())]
                    .into_iter()
                    .flat_map(|(position, sensor)| light_fields(position, sensor))
                    .collect(),
            },
        }
    }
}

fn water_level_section(level: Option<f64>, alert: &AlertState) -> WaterLevelSection {
    let severity = if alert.is_low {
        Severity::Critical
    } else {
        Severity::Normal
    };
    let critical = severity == Severity::Critical;

    WaterLevelSection {
        level: Field::new("Level", format_value(level, MM)),
        severity,
        banner: severity.banner().to_string(),
        threshold: critical.then(|| format_value(Some(THRESHOLD_MM), MM)),
        notice: (critical && alert.last_notified_at.is_some())
            .then(|| "Operator notified".to_string()),
    }
}

fn climate_fields(position: &str, sensor: Option<&Sensor>) -> [Field; 2] {
    [
        Field::new(
            format!("{} - Temperature", position),
            format_value(sensor.and_then(|s| s.temperature), CELSIUS),
        ),
        Field::new(
            format!("{} - Humidity", position),
            format_value(sensor.and_then(|s| s.humidity), PERCENT),
        ),
    ]
}

fn light_fields(position: &str, sensor: Option<&LightSensor>) -> [Field; 3] {
    [
        Field::new(
            format!("{} - Temperature", position),
            format_value(sensor.and_then(|s| s.temperature), CELSIUS),
        ),
        Field::new(
            format!("{} - Humidity", position),
            format_value(sensor.and_then(|s| s.humidity), PERCENT),
        ),
        Field::new(
            format!("{} - Lux", position),
            format_value(sensor.and_then(|s| s.lux), LUX),
        ),
    ]
}
