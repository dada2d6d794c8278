//! The structured content region.
//!
//! A [`DisplayDocument`] is plain data: the terminal view and the JSON
//! export both consume it, and tests assert on it directly.

use serde::Serialize;

/// Rendered content for one measurement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayDocument {
    /// Formatted measurement time.
    pub last_update: String,
    pub water_level: WaterLevelSection,
    pub inside: Section,
    pub outside: Section,
}

/// Banner severity for the water-level section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Normal,
    Critical,
}

impl Severity {
    pub fn banner(&self) -> &'static str {
        match self {
            Severity::Normal => "Normal",
            Severity::Critical => "CRITICAL - Water level low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterLevelSection {
    pub level: Field,
    pub severity: Severity,
    pub banner: String,
    /// Threshold note, present only when critical.
    pub threshold: Option<String>,
    /// Notification indicator, present only when critical and an announce
    /// has happened at some point.
    pub notice: Option<String>,
}

/// A titled group of labelled values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub title: String,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub label: String,
    pub value: String,
}

impl Field {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

impl Section {
    /// Look up a field value by label.
    pub fn value(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.value.as_str())
    }
}
