// # linkmon-core
//
// Core library for network link status detection and monitoring.
//
// ## Architecture Overview
//
// This library provides the platform-independent part of link monitoring:
// - **LinkProbe**: Trait for resolving one interface's link state
// - **detection**: Ordered fallback chain that probe implementations run
//   over their kernel control channel
// - **CounterSource**: Trait for received-byte counters
// - **heuristic**: Traffic delta rule for interfaces without a carrier signal
// - **LinkStatusMonitor**: Poll loop that merges probe and heuristic results
//   and emits full snapshots on change
//
// ## Design Principles
//
// 1. **Platform at the edges**: ioctl layouts live in `linkmon-ioctl`;
//    nothing here touches the kernel
// 2. **Change-only emission**: samples are sent only when something changed,
//    but always carry every configured interface
// 3. **Physical evidence wins**: an interface once seen up by a probe is
//    never second-guessed by the heuristic
// 4. **Single owner**: each monitor has one poll task that owns all history

pub mod traits;
pub mod detection;
pub mod heuristic;
pub mod monitor;
pub mod config;
pub mod error;

// Re-export core types for convenience
pub use traits::{LinkProbe, CounterSource, InterfaceStatus, NoCounters};
pub use detection::{DetectionMethod, Resolution, Strategy};
pub use monitor::{LinkStatusMonitor, LinkStatusSample, InterfaceReport, MonitorState, SampleReceiver};
pub use config::{MonitorConfig, HeuristicConfig};
pub use error::{Error, Result};
