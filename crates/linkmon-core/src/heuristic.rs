//! Traffic delta heuristic
//!
//! Infers link activity from received-byte counters on interfaces where no
//! physical carrier is visible, e.g. receive-only taps.
//!
//! Given a threshold `T` and two counter readings, `d = |current - previous|`:
//!
//! | believed status | d > T | d <= T |
//! |-----------------|-------|--------|
//! | not `Up`        | `Up`  | unchanged |
//! | `Up`            | unchanged | `Down` |
//!
//! The heuristic cannot tell an idle link from a dead one: a quiet but
//! connected interface drops to `Down` after one poll period without
//! traffic. Interfaces that have ever reported `Up` physically are exempt
//! (see the monitor's sticky confirmation).

use crate::traits::InterfaceStatus;
use serde::{Deserialize, Serialize};

/// Heuristic settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HeuristicConfig {
    /// Whether the heuristic runs at all
    #[serde(default)]
    pub enabled: bool,

    /// Bytes received per poll period at or below which a link counts as idle
    #[serde(default)]
    pub threshold: u64,
}

impl HeuristicConfig {
    /// Enabled heuristic with the given threshold
    pub fn with_threshold(threshold: u64) -> Self {
        Self {
            enabled: true,
            threshold,
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }
}

/// Apply the delta rule to one interface
pub fn apply_delta(
    believed: InterfaceStatus,
    previous: u64,
    current: u64,
    threshold: u64,
) -> InterfaceStatus {
    let delta = current.abs_diff(previous);

    if believed != InterfaceStatus::Up && delta > threshold {
        InterfaceStatus::Up
    } else if believed == InterfaceStatus::Up && delta <= threshold {
        InterfaceStatus::Down
    } else {
        believed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use InterfaceStatus::*;

    #[test]
    fn traffic_above_threshold_brings_link_up() {
        assert_eq!(apply_delta(Down, 0, 5000, 1000), Up);
        assert_eq!(apply_delta(Error, 100, 1101, 1000), Up);
    }

    #[test]
    fn quiet_link_goes_down() {
        assert_eq!(apply_delta(Up, 5000, 5200, 1000), Down);
        assert_eq!(apply_delta(Up, 5000, 6000, 1000), Down);
    }

    #[test]
    fn otherwise_unchanged() {
        assert_eq!(apply_delta(Up, 0, 5000, 1000), Up);
        assert_eq!(apply_delta(Down, 0, 1000, 1000), Down);
        assert_eq!(apply_delta(Error, 0, 0, 0), Error);
    }

    #[test]
    fn delta_is_absolute() {
        // counter reset (driver reload) still counts as movement
        assert_eq!(apply_delta(Down, 9000, 1000, 1000), Up);
    }

    #[test]
    fn zero_threshold_needs_any_traffic() {
        assert_eq!(apply_delta(Down, 10, 11, 0), Up);
        assert_eq!(apply_delta(Up, 11, 11, 0), Down);
    }
}
