//! Configuration types for the link monitor
//!
//! This module defines the configuration accepted by [`crate::LinkStatusMonitor`].

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

pub use crate::heuristic::HeuristicConfig;

/// Kernel interface name limit (`IFNAMSIZ` minus the terminating NUL)
pub const MAX_INTERFACE_NAME_LEN: usize = 15;

/// Main monitor configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Interfaces to watch, in reporting order
    pub interfaces: Vec<String>,

    /// Poll period (in milliseconds)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Optional traffic delta heuristic
    #[serde(default)]
    pub heuristic: HeuristicConfig,
}

impl MonitorConfig {
    /// Create a configuration for the given interfaces with defaults
    pub fn new<I, S>(interfaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            interfaces: interfaces.into_iter().map(Into::into).collect(),
            poll_interval_ms: default_poll_interval_ms(),
            heuristic: HeuristicConfig::default(),
        }
    }

    /// Set the poll period
    pub fn with_poll_interval(mut self, period: Duration) -> Self {
        self.poll_interval_ms = u64::try_from(period.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the heuristic configuration
    pub fn with_heuristic(mut self, heuristic: HeuristicConfig) -> Self {
        self.heuristic = heuristic;
        self
    }

    /// Poll period as a [`Duration`]
    pub fn poll_period(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.poll_interval_ms == 0 {
            return Err(crate::Error::config("Poll interval must be > 0"));
        }

        if self.interfaces.is_empty() {
            return Err(crate::Error::config("No interfaces configured"));
        }

        let mut seen = HashSet::new();
        for name in &self.interfaces {
            if name.is_empty() {
                return Err(crate::Error::config("Interface name cannot be empty"));
            }
            if name.len() > MAX_INTERFACE_NAME_LEN {
                return Err(crate::Error::config(format!(
                    "Interface name too long: '{}' ({} bytes, max {})",
                    name,
                    name.len(),
                    MAX_INTERFACE_NAME_LEN
                )));
            }
            if !seen.insert(name.as_str()) {
                return Err(crate::Error::config(format!(
                    "Interface '{}' configured more than once",
                    name
                )));
            }
        }

        Ok(())
    }
}

fn default_poll_interval_ms() -> u64 {
    2000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = MonitorConfig::new(["eth0", "eth1"]);
        assert_eq!(config.poll_period(), Duration::from_secs(2));
        assert!(!config.heuristic.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_period() {
        let config = MonitorConfig::new(["eth0"]).with_poll_interval(Duration::ZERO);
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_bad_interface_sets() {
        assert!(MonitorConfig::new(Vec::<String>::new()).validate().is_err());
        assert!(MonitorConfig::new(["eth0", "eth0"]).validate().is_err());
        assert!(MonitorConfig::new([""]).validate().is_err());
        assert!(MonitorConfig::new(["averyveryverylongname0"]).validate().is_err());
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: MonitorConfig =
            serde_json::from_str(r#"{"interfaces": ["eth0", "tap0"]}"#).unwrap();
        assert_eq!(config.interfaces, vec!["eth0", "tap0"]);
        assert_eq!(config.poll_interval_ms, 2000);
        assert_eq!(config.heuristic, HeuristicConfig::disabled());

        let config: MonitorConfig = serde_json::from_str(
            r#"{"interfaces": ["tap0"], "heuristic": {"enabled": true, "threshold": 1000}}"#,
        )
        .unwrap();
        assert_eq!(config.heuristic, HeuristicConfig::with_threshold(1000));
    }

    #[test]
    fn builder_sets_heuristic() {
        let config = MonitorConfig::new(["tap0"])
            .with_poll_interval(Duration::from_millis(500))
            .with_heuristic(HeuristicConfig::with_threshold(1000));

        assert_eq!(config.poll_interval_ms, 500);
        assert_eq!(config.heuristic, HeuristicConfig { enabled: true, threshold: 1000 });
    }
}
