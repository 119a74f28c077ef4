//! Link status monitor
//!
//! The LinkStatusMonitor is responsible for:
//! - Polling a [`LinkProbe`] for every configured interface on each tick
//! - Tracking which interfaces were ever confirmed up by physical detection
//! - Optionally correcting unconfirmed interfaces with the traffic heuristic
//! - Emitting a full snapshot whenever any interface changed
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐        ┌───────────────┐
//! │  LinkProbe  │        │ CounterSource │
//! └─────────────┘        └───────────────┘
//!        │ status               │ rx bytes
//!        ▼                      ▼
//!   ┌──────────────────────────────────┐
//!   │        poll task (one per        │
//!   │  monitor, owns MonitorHistory)   │
//!   └──────────────────────────────────┘
//!                   │ LinkStatusSample (on change only)
//!                   ▼
//!       SampleReceiver (consumer, rendezvous)
//! ```
//!
//! ## Cycle
//!
//! 1. Probe every interface; a probe error reports `Error` for that interface
//! 2. Mark interfaces seen `Up` as confirmed (permanent)
//! 3. If enabled, apply the traffic heuristic to unconfirmed interfaces
//! 4. Diff against the last emitted statuses; emit the snapshot if anything changed

mod handoff;
mod history;
mod sample;

pub use handoff::SampleReceiver;
pub use sample::{InterfaceReport, LinkStatusSample};

use crate::config::{HeuristicConfig, MonitorConfig};
use crate::error::{Error, Result};
use crate::heuristic::apply_delta;
use crate::traits::{CounterSource, InterfaceStatus, LinkProbe, NoCounters};
use handoff::Handoff;
use history::MonitorHistory;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Lifecycle of a monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    /// Constructed, not yet polling
    Idle,
    /// Poll task running
    Running,
    /// Stop requested, waiting for the poll task to acknowledge
    Stopping,
    /// Terminal
    Stopped,
}

/// Periodic link status monitor
///
/// ## Lifecycle
///
/// 1. Create with [`LinkStatusMonitor::new()`], which also hands back the sample receiver
/// 2. Start with [`LinkStatusMonitor::run()`]
/// 3. Consume samples from the receiver
/// 4. Terminate with [`LinkStatusMonitor::stop()`] (or drop the monitor)
///
/// ## Backpressure
///
/// Samples are handed over, not buffered: the poll task waits until the
/// consumer has taken each sample before polling again. A consumer that
/// stops reading stalls polling; `stop()` still completes because a pending
/// handoff is abandoned when the stop signal arrives, and an abandoned
/// sample is never delivered.
pub struct LinkStatusMonitor {
    /// Poll task state, taken by `run()`
    cycle: Option<PollCycle>,

    /// Poll period
    period: std::time::Duration,

    /// Configured interfaces, in reporting order
    interfaces: Vec<String>,

    state: MonitorState,

    /// Stop signal for the poll task
    shutdown_tx: Option<oneshot::Sender<()>>,

    /// Poll task handle, awaited by `stop()`
    task: Option<JoinHandle<()>>,
}

impl LinkStatusMonitor {
    /// Create a new monitor
    ///
    /// # Parameters
    ///
    /// - `config`: interfaces, poll period and heuristic settings
    /// - `probe`: link probe implementation
    /// - `counters`: traffic counter source (only read when the heuristic is enabled)
    ///
    /// # Returns
    ///
    /// A tuple of (monitor, sample_receiver)
    pub fn new(
        config: MonitorConfig,
        probe: Box<dyn LinkProbe>,
        counters: Box<dyn CounterSource>,
    ) -> Result<(Self, SampleReceiver)> {
        config.validate()?;

        let (tx, rx) = handoff::channel();

        let monitor = Self {
            cycle: Some(PollCycle {
                interfaces: config.interfaces.clone(),
                heuristic: config.heuristic,
                probe,
                counters,
                history: MonitorHistory::new(),
                sample_tx: tx,
            }),
            period: config.poll_period(),
            interfaces: config.interfaces,
            state: MonitorState::Idle,
            shutdown_tx: None,
            task: None,
        };

        Ok((monitor, rx))
    }

    /// Create a monitor that only uses physical detection
    pub fn with_probe(
        config: MonitorConfig,
        probe: Box<dyn LinkProbe>,
    ) -> Result<(Self, SampleReceiver)> {
        if config.heuristic.enabled {
            return Err(Error::config(
                "Traffic heuristic enabled but no counter source given",
            ));
        }
        Self::new(config, probe, Box::new(NoCounters))
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn interfaces(&self) -> &[String] {
        &self.interfaces
    }

    /// Start polling in the background
    ///
    /// The first cycle runs immediately, then one per poll period. Must be
    /// called from within a tokio runtime.
    pub fn run(&mut self) -> Result<()> {
        if self.state != MonitorState::Idle {
            return Err(Error::invalid_state(format!(
                "run() called on a {:?} monitor",
                self.state
            )));
        }

        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| Error::invalid_state(format!("run() requires a tokio runtime: {}", e)))?;

        let cycle = self
            .cycle
            .take()
            .ok_or_else(|| Error::invalid_state("poll cycle already consumed"))?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let period = self.period;

        info!(
            "Starting link monitor ({} interface(s), period {:?}, heuristic {})",
            self.interfaces.len(),
            period,
            if cycle.heuristic.enabled { "on" } else { "off" }
        );

        self.task = Some(runtime.spawn(cycle.run(period, shutdown_rx)));
        self.shutdown_tx = Some(shutdown_tx);
        self.state = MonitorState::Running;
        Ok(())
    }

    /// Stop polling and wait for the poll task to finish
    ///
    /// No sample is sent after this returns. Stopping an idle monitor moves
    /// it straight to `Stopped`; stopping a stopped monitor does nothing.
    pub async fn stop(&mut self) -> Result<()> {
        match self.state {
            MonitorState::Stopped => return Ok(()),
            MonitorState::Idle => {
                self.cycle = None;
                self.state = MonitorState::Stopped;
                return Ok(());
            }
            MonitorState::Running | MonitorState::Stopping => {}
        }

        self.state = MonitorState::Stopping;

        if let Some(tx) = self.shutdown_tx.take() {
            // The task may already have exited (consumer gone)
            let _ = tx.send(());
        }

        let joined = match self.task.take() {
            Some(task) => task.await,
            None => Ok(()),
        };

        self.state = MonitorState::Stopped;
        info!("Link monitor stopped");

        joined.map_err(|e| Error::Other(format!("poll task failed: {}", e)))
    }
}

/// Everything the poll task owns
struct PollCycle {
    interfaces: Vec<String>,
    heuristic: HeuristicConfig,
    probe: Box<dyn LinkProbe>,
    counters: Box<dyn CounterSource>,
    history: MonitorHistory,
    sample_tx: mpsc::Sender<Handoff>,
}

impl PollCycle {
    async fn run(mut self, period: std::time::Duration, mut shutdown_rx: oneshot::Receiver<()>) {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                // Fires on stop() and when the monitor is dropped
                _ = &mut shutdown_rx => {
                    debug!("Stop signal received");
                    break;
                }

                _ = ticker.tick() => {
                    let Some(sample) = self.poll().await else {
                        continue;
                    };

                    let (ack_tx, ack_rx) = oneshot::channel();
                    let handoff = async {
                        self.sample_tx.send((sample, ack_tx)).await.ok()?;
                        ack_rx.await.ok()
                    };

                    tokio::select! {
                        biased;

                        _ = &mut shutdown_rx => {
                            debug!("Stop signal received while a sample was pending");
                            break;
                        }

                        taken = handoff => {
                            if taken.is_none() {
                                warn!("Sample receiver dropped, stopping monitor");
                                break;
                            }
                        }
                    }
                }
            }
        }
    }

    /// One evaluate-merge-diff cycle; returns the sample to emit, if any
    async fn poll(&mut self) -> Option<LinkStatusSample> {
        let mut snapshot = Vec::with_capacity(self.interfaces.len());

        for interface in &self.interfaces {
            let status = match self.probe.probe(interface).await {
                Ok(InterfaceStatus::Unknown) => {
                    warn!(
                        "{} returned no status for {}",
                        self.probe.probe_name(),
                        interface
                    );
                    InterfaceStatus::Error
                }
                Ok(status) => status,
                Err(e) => {
                    warn!("Failed to probe {}: {}", interface, e);
                    InterfaceStatus::Error
                }
            };

            if status.is_up() && self.history.confirm(interface) {
                debug!("{} confirmed up by physical detection", interface);
            }

            snapshot.push(status);
        }

        if self.heuristic.enabled {
            self.apply_heuristic(&mut snapshot).await;
        }

        let mut changed = false;
        for (interface, status) in self.interfaces.iter().zip(&snapshot) {
            if self.history.record_status(interface, *status) {
                debug!("{} -> {}", interface, status);
                changed = true;
            }
        }

        if !changed {
            return None;
        }

        Some(LinkStatusSample::new(self.interfaces.iter().zip(&snapshot)))
    }

    async fn apply_heuristic(&mut self, snapshot: &mut [InterfaceStatus]) {
        let counters = match self.counters.rx_bytes().await {
            Ok(counters) => counters,
            Err(e) => {
                warn!("Skipping traffic heuristic this cycle: {}", e);
                return;
            }
        };

        for (interface, status) in self.interfaces.iter().zip(snapshot.iter_mut()) {
            let Some(&current) = counters.get(interface) else {
                continue;
            };

            let previous = self.history.swap_rx_bytes(interface, current);

            if self.history.is_confirmed(interface) {
                continue;
            }

            // Only a heuristic Up carries over; anything else starts from
            // this tick's probe result
            let believed = match self.history.last_status(interface) {
                InterfaceStatus::Up => InterfaceStatus::Up,
                _ => *status,
            };

            let adjusted = apply_delta(believed, previous, current, self.heuristic.threshold);
            debug!(
                "{}: {} -> {} bytes, {} -> {}",
                interface, previous, current, believed, adjusted
            );
            *status = adjusted;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct StaticProbe(InterfaceStatus);

    #[async_trait]
    impl LinkProbe for StaticProbe {
        async fn probe(&self, _interface: &str) -> Result<InterfaceStatus> {
            Ok(self.0)
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = MonitorConfig::new(Vec::<String>::new());
        let result = LinkStatusMonitor::with_probe(config, Box::new(StaticProbe(InterfaceStatus::Up)));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn heuristic_requires_counters() {
        let config = MonitorConfig::new(["tap0"]).with_heuristic(HeuristicConfig::with_threshold(10));
        let result = LinkStatusMonitor::with_probe(config, Box::new(StaticProbe(InterfaceStatus::Down)));
        assert!(result.is_err());
    }

    #[test]
    fn run_outside_runtime_fails() {
        let config = MonitorConfig::new(["eth0"]);
        let (mut monitor, _rx) =
            LinkStatusMonitor::with_probe(config, Box::new(StaticProbe(InterfaceStatus::Up))).unwrap();

        assert!(matches!(monitor.run(), Err(Error::InvalidState(_))));
        assert_eq!(monitor.state(), MonitorState::Idle);
    }

    #[tokio::test]
    async fn unknown_from_probe_is_reported_as_error() {
        let config = MonitorConfig::new(["eth0"]);
        let (mut monitor, mut rx) = LinkStatusMonitor::with_probe(
            config,
            Box::new(StaticProbe(InterfaceStatus::Unknown)),
        )
        .unwrap();

        monitor.run().unwrap();
        let sample = rx.recv().await.unwrap();
        assert_eq!(sample.get("eth0"), Some(InterfaceStatus::Error));

        monitor.stop().await.unwrap();
    }

    #[tokio::test]
    async fn lifecycle_transitions() {
        let config = MonitorConfig::new(["eth0"]);
        let (mut monitor, _rx) =
            LinkStatusMonitor::with_probe(config, Box::new(StaticProbe(InterfaceStatus::Up))).unwrap();

        assert_eq!(monitor.state(), MonitorState::Idle);
        monitor.run().unwrap();
        assert_eq!(monitor.state(), MonitorState::Running);
        assert!(monitor.run().is_err());

        monitor.stop().await.unwrap();
        assert_eq!(monitor.state(), MonitorState::Stopped);

        monitor.stop().await.unwrap();
        assert!(monitor.run().is_err());
    }

    #[tokio::test]
    async fn stopping_idle_monitor() {
        let config = MonitorConfig::new(["eth0"]);
        let (mut monitor, mut rx) =
            LinkStatusMonitor::with_probe(config, Box::new(StaticProbe(InterfaceStatus::Up))).unwrap();

        monitor.stop().await.unwrap();
        assert_eq!(monitor.state(), MonitorState::Stopped);
        // sender dropped with the cycle
        assert!(rx.recv().await.is_none());
    }
}
