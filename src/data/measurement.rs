//! Measurement payload types.
//!
//! Every nested field is optional and decoded leniently: a field that is
//! missing, `null`, or of the wrong JSON type becomes `None` instead of
//! failing the whole payload. Such gaps surface later as placeholder values
//! in the rendered document.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// A validated, timestamped snapshot of all sensor readings.
///
/// Only [`validate`](super::validator::validate) produces this type, so a
/// `Measurement` always carries a `data` section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    /// Seconds since the Unix epoch, if the payload carried a usable number.
    pub timestamp: Option<f64>,
    pub data: Reading,
}

/// The nested sensor payload of a measurement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Water level in millimetres.
    #[serde(default, deserialize_with = "lenient")]
    pub water_level: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub inside: Option<SiteReadings>,
    #[serde(default, deserialize_with = "lenient")]
    pub outside: Option<SiteReadingsExt>,
}

/// Inside sensors: one near the ceiling, one near the floor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteReadings {
    #[serde(default, deserialize_with = "lenient")]
    pub up: Option<Sensor>,
    #[serde(default, deserialize_with = "lenient")]
    pub down: Option<Sensor>,
}

/// Outside sensors, which additionally report illuminance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteReadingsExt {
    #[serde(default, deserialize_with = "lenient")]
    pub up: Option<LightSensor>,
    #[serde(default, deserialize_with = "lenient")]
    pub down: Option<LightSensor>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    /// Degrees Celsius.
    #[serde(default, deserialize_with = "lenient")]
    pub temperature: Option<f64>,
    /// Relative humidity in percent.
    #[serde(default, deserialize_with = "lenient")]
    pub humidity: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LightSensor {
    #[serde(default, deserialize_with = "lenient")]
    pub temperature: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub humidity: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub lux: Option<f64>,
}

impl Reading {
    pub fn inside_up(&self) -> Option<&Sensor> {
        self.inside.as_ref()?.up.as_ref()
    }

    pub fn inside_down(&self) -> Option<&Sensor> {
        self.inside.as_ref()?.down.as_ref()
    }

    pub fn outside_up(&self) -> Option<&LightSensor> {
        self.outside.as_ref()?.up.as_ref()
    }

    pub fn outside_down(&self) -> Option<&LightSensor> {
        self.outside.as_ref()?.down.as_ref()
    }
}

/// Decode a field, mapping any shape mismatch to `None`.
///
/// Arrays are rejected outright: serde would otherwise fill struct fields
/// positionally from them.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if value.is_array() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}
