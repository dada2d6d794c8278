//! Data models and the pure stages of the update pipeline.
//!
//! ## Submodules
//!
//! - [`measurement`]: Payload types ([`Measurement`], [`Reading`], sensors)
//! - [`validator`]: Minimal structural check of inbound payloads
//! - [`alert`]: Water-level threshold evaluation with an announce cooldown
//! - [`connection`]: Connectivity state shown in the status region
//!
//! ## Data Flow
//!
//! ```text
//! payload (raw JSON)
//!        │
//!        ▼
//! validator::validate() ──▶ Invalid (silently skipped)
//!        │
//!        ▼
//! Measurement ──▶ alert::evaluate(state, water_level, now)
//!        │                  │
//!        ▼                  ▼
//!     Renderer ◀────── AlertState
//! ```

pub mod alert;
pub mod connection;
pub mod measurement;
pub mod validator;

pub use alert::{evaluate, AlertState, Evaluation, COOLDOWN_SECS, THRESHOLD_MM};
pub use connection::{ConnectionMonitor, StatusClass, StatusIndicator};
pub use measurement::{LightSensor, Measurement, Reading, Sensor, SiteReadings, SiteReadingsExt};
pub use validator::{validate, Invalid};
