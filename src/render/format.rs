//! Text formatting for timestamps and sensor values.
//!
//! Missing or non-finite inputs render as [`PLACEHOLDER`].

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Shown in place of any value missing from the payload.
pub const PLACEHOLDER: &str = "--";

/// How measurement timestamps are turned into text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TimeFormat {
    /// `1970-01-01 00:00:00 UTC`. Independent of the host time zone.
    Utc,
    /// `1970-01-01 01:00:00` in the process time zone.
    #[default]
    Local,
}

/// Format epoch seconds (possibly fractional) for display.
pub fn format_timestamp(timestamp: Option<f64>, format: TimeFormat) -> String {
    let Some(datetime) = timestamp.and_then(to_datetime) else {
        return PLACEHOLDER.to_string();
    };

    match format {
        TimeFormat::Utc => datetime.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        TimeFormat::Local => datetime.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string(),
    }
}

fn to_datetime(timestamp: f64) -> Option<DateTime<Utc>> {
    if !timestamp.is_finite() {
        return None;
    }
    let secs = timestamp.floor();
    let nanos = ((timestamp - secs) * 1_000_000_000.0) as u32;
    DateTime::from_timestamp(secs as i64, nanos)
}

/// Format a reading with its unit suffix, e.g. `15 mm` or `23.5°C`.
///
/// Numbers use their shortest form, so `43.0` renders as `43`.
pub fn format_value(value: Option<f64>, suffix: &str) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{}{}", v, suffix),
        _ => PLACEHOLDER.to_string(),
    }
}
