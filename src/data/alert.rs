//! Water-level alert evaluation with an announce cooldown.
//!
//! The critical state (`is_low`) is recomputed from every reading. The
//! announce signal, which drives external notification, fires at most once
//! per cooldown window. The window is anchored at the last announce and is
//! not reset when the level recovers.

use serde::Serialize;

/// Water level at or below which the alert is critical, in millimetres.
pub const THRESHOLD_MM: f64 = 20.0;

/// Minimum time between two announces, in seconds.
pub const COOLDOWN_SECS: i64 = 300;

/// Alert state carried between measurements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AlertState {
    /// Whether the most recent reading was at or below the threshold.
    pub is_low: bool,
    /// Epoch seconds of the last announce, if one was ever made.
    pub last_notified_at: Option<i64>,
}

/// Result of evaluating one reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub is_low: bool,
    /// True when this reading should trigger an external notification.
    pub should_announce: bool,
}

/// Evaluate a water level at time `now` against the previous state.
///
/// Returns the next state together with the evaluation. A NaN level (used
/// for a missing reading) is never low and never announces.
pub fn evaluate(state: AlertState, water_level: f64, now: i64) -> (AlertState, Evaluation) {
    let is_low = water_level <= THRESHOLD_MM;

    let cooled_down = match state.last_notified_at {
        None => true,
        Some(last) => now.saturating_sub(last) >= COOLDOWN_SECS,
    };
    let should_announce = is_low && cooled_down;

    let next = AlertState {
        is_low,
        last_notified_at: if should_announce {
            Some(now)
        } else {
            state.last_notified_at
        },
    };

    (
        next,
        Evaluation {
            is_low,
            should_announce,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: i64 = 1_700_000_000;

    fn notified_at(at: i64) -> AlertState {
        AlertState {
            is_low: true,
            last_notified_at: Some(at),
        }
    }

    #[test]
    fn test_threshold_is_inclusive() {
        for level in [-5.0, 0.0, 19.9, 20.0] {
            let (_, eval) = evaluate(AlertState::default(), level, T);
            assert!(eval.is_low, "{level} should be low");
        }
        for level in [20.01, 21.0, 45.0, 1000.0] {
            let (_, eval) = evaluate(AlertState::default(), level, T);
            assert!(!eval.is_low, "{level} should not be low");
        }
    }

    #[test]
    fn test_first_low_reading_announces() {
        let (state, eval) = evaluate(AlertState::default(), 15.0, T);
        assert!(eval.should_announce);
        assert_eq!(state.last_notified_at, Some(T));
        assert!(state.is_low);
    }

    #[test]
    fn test_normal_reading_never_announces() {
        let (state, eval) = evaluate(AlertState::default(), 45.0, T);
        assert!(!eval.should_announce);
        assert_eq!(state, AlertState::default());
    }

    #[test]
    fn test_cooldown_boundary() {
        let (state, eval) = evaluate(notified_at(T), 10.0, T + 299);
        assert!(eval.is_low);
        assert!(!eval.should_announce);
        assert_eq!(state.last_notified_at, Some(T));

        let (state, eval) = evaluate(notified_at(T), 10.0, T + 300);
        assert!(eval.should_announce);
        assert_eq!(state.last_notified_at, Some(T + 300));
    }

    #[test]
    fn test_recovery_does_not_reset_cooldown() {
        let (state, first) = evaluate(AlertState::default(), 10.0, T);
        assert!(first.should_announce);

        let (state, recovered) = evaluate(state, 50.0, T + 10);
        assert!(!recovered.is_low);
        assert_eq!(state.last_notified_at, Some(T));

        let (state, relapse) = evaluate(state, 10.0, T + 50);
        assert!(relapse.is_low);
        assert!(!relapse.should_announce);
        assert_eq!(state.last_notified_at, Some(T));
    }

    #[test]
    fn test_missing_level_is_not_low() {
        let (state, eval) = evaluate(notified_at(T), f64::NAN, T + 1000);
        assert!(!eval.is_low);
        assert!(!eval.should_announce);
        assert_eq!(state.last_notified_at, Some(T));
    }

    #[test]
    fn test_clock_going_backwards_keeps_last_notified() {
        let (state, eval) = evaluate(notified_at(T), 5.0, T - 1000);
        assert!(!eval.should_announce);
        assert_eq!(state.last_notified_at, Some(T));
    }
}
