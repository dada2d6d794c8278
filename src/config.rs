//! Layered settings.
//!
//! Sources, lowest precedence first: built-in defaults, an optional TOML
//! file, environment variables prefixed with `LEVELWATCH_`, then CLI flags
//! (applied by the binary).
//!
//! ```toml
//! connect = "127.0.0.1:5001"
//! reconnect_base_ms = 500
//! time_format = "utc"
//! log_file = "levelwatch.log"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::channel::ReconnectPolicy;
use crate::render::TimeFormat;

/// File polled when no network endpoint is configured.
pub const DEFAULT_FILE: &str = "measurement.json";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// TCP endpoint (`host:port`) speaking newline-delimited JSON frames.
    pub connect: Option<String>,
    /// WebSocket URL.
    pub ws: Option<String>,
    /// Measurement file to poll.
    pub file: Option<PathBuf>,
    /// UI tick interval in milliseconds.
    pub refresh_ms: u64,
    pub reconnect_base_ms: u64,
    pub reconnect_max_ms: u64,
    pub time_format: TimeFormat,
    /// Log destination. Logging is off when unset.
    pub log_file: Option<PathBuf>,
    /// Filter directive used when `RUST_LOG` is not set.
    pub log_level: String,
}

/// Where measurements come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Tcp(String),
    WebSocket(String),
    File(PathBuf),
}

impl Settings {
    /// Load settings from defaults, an optional file, and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("refresh_ms", 100)?
            .set_default("reconnect_base_ms", 1000)?
            .set_default("reconnect_max_ms", 30_000)?
            .set_default("time_format", "local")?
            .set_default("log_level", "info")?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        builder
            .add_source(Environment::with_prefix("LEVELWATCH"))
            .build()?
            .try_deserialize()
    }

    /// The configured source. A WebSocket URL wins over a TCP endpoint,
    /// which wins over a file.
    pub fn source(&self) -> Source {
        if let Some(ref url) = self.ws {
            Source::WebSocket(url.clone())
        } else if let Some(ref addr) = self.connect {
            Source::Tcp(addr.clone())
        } else {
            Source::File(
                self.file
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_FILE)),
            )
        }
    }

    /// Replace whatever source was configured.
    pub fn set_source(&mut self, source: Source) {
        self.connect = None;
        self.ws = None;
        self.file = None;
        match source {
            Source::Tcp(addr) => self.connect = Some(addr),
            Source::WebSocket(url) => self.ws = Some(url),
            Source::File(path) => self.file = Some(path),
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_ms.max(1))
    }

    pub fn reconnect_policy(&self) -> ReconnectPolicy {
        ReconnectPolicy {
            base_delay: Duration::from_millis(self.reconnect_base_ms),
            max_delay: Duration::from_millis(self.reconnect_max_ms.max(self.reconnect_base_ms)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn toml_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings.refresh_ms, 100);
        assert_eq!(settings.time_format, TimeFormat::Local);
        assert_eq!(settings.log_level, "info");
        assert_eq!(
            settings.reconnect_policy(),
            ReconnectPolicy {
                base_delay: Duration::from_millis(1000),
                max_delay: Duration::from_millis(30_000),
            }
        );
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = toml_file(
            r#"
            ws = "ws://sensors.local:5000/events"
            reconnect_base_ms = 250
            reconnect_max_ms = 100
            time_format = "utc"
            "#,
        );

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(
            settings.source(),
            Source::WebSocket("ws://sensors.local:5000/events".to_string())
        );
        assert_eq!(settings.time_format, TimeFormat::Utc);
        // Max delay never drops below the base delay
        assert_eq!(
            settings.reconnect_policy().max_delay,
            Duration::from_millis(250)
        );
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(Settings::load(Some(Path::new("/nonexistent/levelwatch.toml"))).is_err());
    }

    #[test]
    fn test_source_precedence_and_override() {
        let file = toml_file(
            r#"
            connect = "127.0.0.1:5001"
            file = "latest.json"
            "#,
        );
        let mut settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.source(), Source::Tcp("127.0.0.1:5001".to_string()));

        settings.set_source(Source::File(PathBuf::from("other.json")));
        assert_eq!(settings.source(), Source::File(PathBuf::from("other.json")));
        assert!(settings.connect.is_none());
    }

    #[test]
    fn test_default_source_is_file() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings.source(), Source::File(PathBuf::from(DEFAULT_FILE)));
    }
}
