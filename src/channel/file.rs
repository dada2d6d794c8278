//! File-based push channel.
//!
//! Polls a JSON file holding a single measurement payload. A producer that
//! rewrites the file stands in for the remote push side.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, info};

use super::{ChannelError, ChannelEvent, PushChannel};

/// A push channel that re-reads a file whenever it changes.
///
/// The first successful read reports `Connected`; a read failure after that
/// reports `Disconnected` until the file is readable again. A
/// `request_latest` forces the next poll to re-read the file.
#[derive(Debug)]
pub struct FileChannel {
    path: PathBuf,
    description: String,
    last_error: Option<String>,
    last_modified: Option<SystemTime>,
    connected: bool,
    force_reload: bool,
    pending: VecDeque<ChannelEvent>,
}

impl FileChannel {
    /// Create a new file channel for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            last_error: None,
            last_modified: None,
            connected: false,
            force_reload: false,
            pending: VecDeque::new(),
        }
    }

    /// Returns the path being polled.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn get_modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).ok()?.modified().ok()
    }

    /// Check the file and queue any resulting events.
    fn refresh(&mut self) {
        let current_modified = self.get_modified_time();

        let file_changed = match (&self.last_modified, &current_modified) {
            (None, _) => true,
            (Some(_), None) => true, // File disappeared
            (Some(last), Some(current)) => current > last,
        };

        if !file_changed && !self.force_reload && self.connected {
            return;
        }
        self.force_reload = false;

        match fs::read_to_string(&self.path) {
            Ok(content) => {
                self.last_error = None;
                self.last_modified = current_modified;
                if !self.connected {
                    self.connected = true;
                    info!(path = %self.path.display(), "measurement file readable");
                    self.pending.push_back(ChannelEvent::Connected);
                }
                match serde_json::from_str(&content) {
                    Ok(payload) => self.pending.push_back(ChannelEvent::Measurement(payload)),
                    Err(e) => debug!(error = %e, "skipping unparsable measurement file"),
                }
            }
            Err(e) => {
                if self.last_error.is_none() {
                    debug!(path = %self.path.display(), error = %e, "measurement file unreadable");
                }
                self.last_error = Some(format!("Read error: {}", e));
                self.last_modified = None;
                if self.connected {
                    self.connected = false;
                    self.pending.push_back(ChannelEvent::Disconnected);
                }
            }
        }
    }
}

impl PushChannel for FileChannel {
    fn poll_event(&mut self) -> Option<ChannelEvent> {
        if self.pending.is_empty() {
            self.refresh();
        }
        self.pending.pop_front()
    }

    fn request_latest(&mut self) -> Result<(), ChannelError> {
        self.force_reload = true;
        Ok(())
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample_json(level: u32) -> String {
        format!(
            r#"{{ "timestamp": 1700000000, "data": {{ "water_level": {} }} }}"#,
            level
        )
    }

    fn drain(channel: &mut FileChannel) -> Vec<ChannelEvent> {
        std::iter::from_fn(|| channel.poll_event()).collect()
    }

    #[test]
    fn test_file_channel_new() {
        let channel = FileChannel::new("/tmp/measurement.json");
        assert_eq!(channel.path(), Path::new("/tmp/measurement.json"));
        assert_eq!(channel.description(), "file: /tmp/measurement.json");
        assert!(channel.error().is_none());
    }

    #[test]
    fn test_first_poll_connects_and_delivers() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json(15)).unwrap();

        let mut channel = FileChannel::new(file.path());
        let events = drain(&mut channel);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], ChannelEvent::Connected);
        assert!(matches!(&events[1], ChannelEvent::Measurement(p) if p["data"]["water_level"] == serde_json::json!(15)));

        // Unchanged file yields nothing further
        assert!(channel.poll_event().is_none());
    }

    #[test]
    fn test_request_latest_forces_reread() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json(40)).unwrap();

        let mut channel = FileChannel::new(file.path());
        let _ = drain(&mut channel);
        assert!(channel.poll_event().is_none());

        channel.request_latest().unwrap();
        let events = drain(&mut channel);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], ChannelEvent::Measurement(_)));
    }

    #[test]
    fn test_missing_file_never_connects() {
        let mut channel = FileChannel::new("/nonexistent/path/measurement.json");
        assert!(channel.poll_event().is_none());
        assert!(channel.error().unwrap().contains("Read error"));
    }

    #[test]
    fn test_file_removed_reports_disconnect() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json(40)).unwrap();
        let path = file.path().to_path_buf();

        let mut channel = FileChannel::new(&path);
        let _ = drain(&mut channel);

        drop(file);
        assert_eq!(channel.poll_event(), Some(ChannelEvent::Disconnected));
        assert!(channel.poll_event().is_none());
    }

    #[test]
    fn test_invalid_json_connects_without_measurement() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let mut channel = FileChannel::new(file.path());
        assert_eq!(drain(&mut channel), vec![ChannelEvent::Connected]);
    }
}
