// # Link Probe Trait
//
// Defines the interface for resolving the link state of a single interface.
//
// ## Implementations
//
// - ioctl-based (Linux): `linkmon-ioctl` crate
// - Test doubles: scripted probes in the contract tests
//
// ## Usage
//
// ```rust,ignore
// use linkmon_core::LinkProbe;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let probe = /* LinkProbe implementation */;
//
//     let status = probe.probe("eth0").await?;
//     println!("eth0: {}", status);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Link status of a network interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceStatus {
    /// No status assigned yet (never returned by a resolved probe)
    #[default]
    Unknown,
    /// A cable is connected / the link is active
    Up,
    /// No link
    Down,
    /// No detection strategy could query the interface
    Error,
}

impl InterfaceStatus {
    /// Map a link bit to `Up`/`Down`
    pub fn from_link(link: bool) -> Self {
        if link {
            InterfaceStatus::Up
        } else {
            InterfaceStatus::Down
        }
    }

    pub fn is_up(self) -> bool {
        self == InterfaceStatus::Up
    }
}

impl fmt::Display for InterfaceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InterfaceStatus::Up => "link",
            InterfaceStatus::Down => "no link",
            InterfaceStatus::Error => "error",
            InterfaceStatus::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Trait for link probe implementations
///
/// A probe is stateless: its answer depends only on the interface name and
/// the current kernel state, so calling it twice against an unchanged link
/// yields the same status.
///
/// # Contract
///
/// - `Ok(status)` is always one of `Up`, `Down` or `Error`, never `Unknown`
/// - `Ok(Error)` means every detection strategy failed for the interface
/// - `Err(_)` is reserved for failures to obtain the kernel query handle
///   itself; callers treat it like `Ok(Error)` for reporting purposes
#[async_trait]
pub trait LinkProbe: Send + Sync {
    /// Resolve the current link status of `interface`
    async fn probe(&self, interface: &str) -> Result<InterfaceStatus, crate::Error>;

    /// Short name for logs
    fn probe_name(&self) -> &'static str {
        "probe"
    }
}
