//! Test doubles and common utilities for monitor contract tests
//!
//! The doubles stand in for the kernel: tests flip link states and counters
//! between ticks and count how often the monitor asked.

#![allow(dead_code)]

use linkmon_core::error::{Error, Result};
use linkmon_core::traits::{CounterSource, InterfaceStatus, LinkProbe};
use linkmon_core::{HeuristicConfig, LinkStatusMonitor, LinkStatusSample, MonitorConfig, SampleReceiver};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A probe whose per-interface answers are set by the test
///
/// Interfaces without a scripted answer resolve to `Down`. Clones share
/// state, so a test keeps one clone and hands the other to the monitor.
#[derive(Clone, Default)]
pub struct ScriptedProbe {
    statuses: Arc<Mutex<HashMap<String, InterfaceStatus>>>,
    failing: Arc<Mutex<Vec<String>>>,
    probe_call_count: Arc<AtomicUsize>,
}

impl ScriptedProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the status the next probes of `interface` return
    pub fn set(&self, interface: &str, status: InterfaceStatus) {
        self.statuses
            .lock()
            .unwrap()
            .insert(interface.to_string(), status);
    }

    /// Make probes of `interface` fail with a control channel error
    pub fn fail(&self, interface: &str) {
        self.failing.lock().unwrap().push(interface.to_string());
    }

    /// Let probes of `interface` succeed again
    pub fn recover(&self, interface: &str) {
        self.failing.lock().unwrap().retain(|i| i != interface);
    }

    /// Get the number of times probe() was called
    pub fn probe_call_count(&self) -> usize {
        self.probe_call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl LinkProbe for ScriptedProbe {
    async fn probe(&self, interface: &str) -> Result<InterfaceStatus> {
        self.probe_call_count.fetch_add(1, Ordering::SeqCst);

        if self.failing.lock().unwrap().iter().any(|i| i == interface) {
            return Err(Error::control_channel("socket: permission denied"));
        }

        Ok(self
            .statuses
            .lock()
            .unwrap()
            .get(interface)
            .copied()
            .unwrap_or(InterfaceStatus::Down))
    }

    fn probe_name(&self) -> &'static str {
        "scripted"
    }
}

/// Counter source whose readings are set by the test
#[derive(Clone, Default)]
pub struct ScriptedCounters {
    rx_bytes: Arc<Mutex<HashMap<String, u64>>>,
    unavailable: Arc<AtomicBool>,
    read_call_count: Arc<AtomicUsize>,
}

impl ScriptedCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, interface: &str, rx_bytes: u64) {
        self.rx_bytes
            .lock()
            .unwrap()
            .insert(interface.to_string(), rx_bytes);
    }

    /// Make subsequent reads fail (or succeed again)
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Get the number of times rx_bytes() was called
    pub fn read_call_count(&self) -> usize {
        self.read_call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl CounterSource for ScriptedCounters {
    async fn rx_bytes(&self) -> Result<HashMap<String, u64>> {
        self.read_call_count.fetch_add(1, Ordering::SeqCst);

        if self.unavailable.load(Ordering::SeqCst) {
            return Err(Error::counter_read("/proc/net/dev: no such file"));
        }

        Ok(self.rx_bytes.lock().unwrap().clone())
    }
}

/// Poll period used by most contract tests
pub const POLL: Duration = Duration::from_secs(2);

/// Helper to create a monitor over `interfaces` with the given heuristic
pub fn monitor_with(
    interfaces: &[&str],
    heuristic: HeuristicConfig,
    probe: &ScriptedProbe,
    counters: &ScriptedCounters,
) -> (LinkStatusMonitor, SampleReceiver) {
    let config = MonitorConfig::new(interfaces.iter().copied())
        .with_poll_interval(POLL)
        .with_heuristic(heuristic);

    LinkStatusMonitor::new(config, Box::new(probe.clone()), Box::new(counters.clone()))
        .expect("monitor construction succeeds")
}

/// Helper to create a monitor without the heuristic
pub fn physical_monitor(
    interfaces: &[&str],
    probe: &ScriptedProbe,
) -> (LinkStatusMonitor, SampleReceiver) {
    monitor_with(
        interfaces,
        HeuristicConfig::disabled(),
        probe,
        &ScriptedCounters::new(),
    )
}

/// Wait for the next sample, failing the test after `within`
pub async fn next_sample(
    rx: &mut SampleReceiver,
    within: Duration,
) -> LinkStatusSample {
    tokio::time::timeout(within, rx.recv())
        .await
        .expect("sample arrives in time")
        .expect("monitor still running")
}

/// Assert that no sample arrives within `window`
pub async fn assert_quiet(rx: &mut SampleReceiver, window: Duration) {
    if let Ok(sample) = tokio::time::timeout(window, rx.recv()).await {
        panic!("expected no sample, got {:?}", sample);
    }
}
