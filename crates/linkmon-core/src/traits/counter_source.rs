// # Counter Source Trait
//
// Defines the interface for reading per-interface received-byte counters.
//
// The monitor reads counters once per poll cycle when the traffic delta
// heuristic is enabled. A failed read only disables the heuristic for that
// cycle; physical probe results still apply.
//
// ## Implementations
//
// - procfs-based (Linux): `linkmon_ioctl::ProcNetDevCounters`
// - [`NoCounters`]: used when the heuristic is disabled

use async_trait::async_trait;
use std::collections::HashMap;

/// Trait for traffic counter sources
#[async_trait]
pub trait CounterSource: Send + Sync {
    /// Received-byte counters for every interface the OS reports
    ///
    /// # Returns
    ///
    /// - `Ok(map)`: interface name → total received bytes
    /// - `Err(Error::CounterRead)`: counters are unavailable right now
    async fn rx_bytes(&self) -> Result<HashMap<String, u64>, crate::Error>;
}

/// Counter source that never has counters
///
/// Suitable for monitors that run without the traffic heuristic.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCounters;

#[async_trait]
impl CounterSource for NoCounters {
    async fn rx_bytes(&self) -> Result<HashMap<String, u64>, crate::Error> {
        Err(crate::Error::counter_read("no counter source configured"))
    }
}
