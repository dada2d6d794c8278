//! Push channel connectivity as shown in the status region.

use serde::Serialize;

/// Styling class of the status region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusClass {
    /// No connection has been established yet.
    Connecting,
    Connected,
    Disconnected,
}

impl StatusClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusClass::Connecting => "connecting",
            StatusClass::Connected => "connected",
            StatusClass::Disconnected => "disconnected",
        }
    }
}

/// Contents of the status region: a class plus a line of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusIndicator {
    pub class: StatusClass,
    pub text: &'static str,
}

impl StatusIndicator {
    pub const CONNECTING: Self = Self {
        class: StatusClass::Connecting,
        text: "Connecting...",
    };
    pub const CONNECTED: Self = Self {
        class: StatusClass::Connected,
        text: "Connected - Real-time updates active",
    };
    pub const DISCONNECTED: Self = Self {
        class: StatusClass::Disconnected,
        text: "Disconnected - Reconnecting...",
    };
}

/// Tracks last known connectivity. Purely cosmetic: it never gates
/// measurement processing.
#[derive(Debug, Clone)]
pub struct ConnectionMonitor {
    indicator: StatusIndicator,
}

impl Default for ConnectionMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionMonitor {
    pub fn new() -> Self {
        Self {
            indicator: StatusIndicator::CONNECTING,
        }
    }

    /// Returns true if the indicator changed.
    pub fn on_connected(&mut self) -> bool {
        self.set(StatusIndicator::CONNECTED)
    }

    /// Returns true if the indicator changed.
    pub fn on_disconnected(&mut self) -> bool {
        self.set(StatusIndicator::DISCONNECTED)
    }

    pub fn indicator(&self) -> StatusIndicator {
        self.indicator
    }

    fn set(&mut self, indicator: StatusIndicator) -> bool {
        let changed = self.indicator != indicator;
        self.indicator = indicator;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_connecting() {
        let monitor = ConnectionMonitor::new();
        assert_eq!(monitor.indicator().class, StatusClass::Connecting);
    }

    #[test]
    fn test_transitions() {
        let mut monitor = ConnectionMonitor::new();

        assert!(monitor.on_connected());
        assert_eq!(monitor.indicator(), StatusIndicator::CONNECTED);

        assert!(monitor.on_disconnected());
        let indicator = monitor.indicator();
        assert_eq!(indicator.class.as_str(), "disconnected");
        assert_eq!(indicator.text, "Disconnected - Reconnecting...");
    }

    #[test]
    fn test_transitions_are_idempotent() {
        let mut monitor = ConnectionMonitor::new();
        assert!(monitor.on_disconnected());
        assert!(!monitor.on_disconnected());
        assert_eq!(monitor.indicator(), StatusIndicator::DISCONNECTED);

        assert!(monitor.on_connected());
        assert!(!monitor.on_connected());
        assert_eq!(monitor.indicator(), StatusIndicator::CONNECTED);
    }
}
