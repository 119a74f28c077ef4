// # Monitor History
//
// Per-interface memory of a running monitor. Owned by the poll task and
// dropped with it; nothing outside the task reads or writes it.

use crate::traits::InterfaceStatus;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
pub(crate) struct MonitorHistory {
    /// Last emitted status per interface
    last_status: HashMap<String, InterfaceStatus>,
    /// Last observed received-byte counter per interface
    last_rx_bytes: HashMap<String, u64>,
    /// Interfaces that have reported `Up` through physical detection
    confirmed: HashSet<String>,
}

impl MonitorHistory {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Last emitted status, `Unknown` before the first emission
    pub(crate) fn last_status(&self, interface: &str) -> InterfaceStatus {
        self.last_status
            .get(interface)
            .copied()
            .unwrap_or_default()
    }

    /// Record `status`; returns true when it differs from the last one
    pub(crate) fn record_status(&mut self, interface: &str, status: InterfaceStatus) -> bool {
        if self.last_status(interface) == status {
            return false;
        }
        self.last_status.insert(interface.to_string(), status);
        true
    }

    /// Mark `interface` as physically confirmed; returns true the first time
    pub(crate) fn confirm(&mut self, interface: &str) -> bool {
        if self.confirmed.contains(interface) {
            return false;
        }
        self.confirmed.insert(interface.to_string());
        true
    }

    pub(crate) fn is_confirmed(&self, interface: &str) -> bool {
        self.confirmed.contains(interface)
    }

    /// Store the new counter and return the previous one (0 if none)
    pub(crate) fn swap_rx_bytes(&mut self, interface: &str, current: u64) -> u64 {
        self.last_rx_bytes
            .insert(interface.to_string(), current)
            .unwrap_or(0)
    }
}
