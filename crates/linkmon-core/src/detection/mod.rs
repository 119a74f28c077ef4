//! Ordered fallback chain for link detection
//!
//! A probe resolves an interface by walking a fixed list of detection
//! strategies over one control channel:
//!
//! ```text
//! ethtool ──err──▶ mii ──err──▶ wireless ──err──▶ flags ──err──▶ Error
//!    │              │              │                │
//!    ok             ok             ok               ok
//!    ▼              ▼              ▼                ▼
//!  Up/Down        Up/Down        Up/Down          Up/Down
//! ```
//!
//! The first strategy whose kernel call succeeds is authoritative, even
//! when it reports no link. A strategy is skipped only when its call errors.
//!
//! The chain is generic over the channel type `C`, so platform crates plug
//! in a real socket and tests plug in a scripted fake.

use crate::error::Error;
use crate::traits::InterfaceStatus;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace};

/// Kernel facility used to determine link state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    /// Driver-reported link bit (`ETHTOOL_GLINK`)
    Ethtool,
    /// PHY basic status register
    Mii,
    /// Wireless access point association
    Wireless,
    /// `IFF_RUNNING` interface flag
    InterfaceFlags,
}

impl DetectionMethod {
    /// All methods in fallback order
    pub const ORDER: [DetectionMethod; 4] = [
        DetectionMethod::Ethtool,
        DetectionMethod::Mii,
        DetectionMethod::Wireless,
        DetectionMethod::InterfaceFlags,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DetectionMethod::Ethtool => "ethtool",
            DetectionMethod::Mii => "mii",
            DetectionMethod::Wireless => "wireless",
            DetectionMethod::InterfaceFlags => "iff",
        }
    }
}

impl fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single link query: `Ok(link bit)` or the kernel error
pub type QueryFn<C> = fn(&C, &str) -> std::io::Result<bool>;

/// One entry of the fallback chain
pub struct Strategy<C> {
    pub method: DetectionMethod,
    pub query: QueryFn<C>,
}

impl<C> Strategy<C> {
    pub const fn new(method: DetectionMethod, query: QueryFn<C>) -> Self {
        Self { method, query }
    }
}

impl<C> Clone for Strategy<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Strategy<C> {}

impl<C> fmt::Debug for Strategy<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Strategy").field("method", &self.method).finish()
    }
}

/// Outcome of walking the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// `Up`, `Down` or `Error`
    pub status: InterfaceStatus,
    /// Strategy that answered; `None` when every strategy failed
    pub method: Option<DetectionMethod>,
}

impl Resolution {
    fn answered(method: DetectionMethod, link: bool) -> Self {
        Self {
            status: InterfaceStatus::from_link(link),
            method: Some(method),
        }
    }

    fn exhausted() -> Self {
        Self {
            status: InterfaceStatus::Error,
            method: None,
        }
    }
}

/// Walk `chain` in order over `channel` until one strategy succeeds
pub fn resolve<C>(channel: &C, interface: &str, chain: &[Strategy<C>]) -> Resolution {
    for strategy in chain {
        match (strategy.query)(channel, interface) {
            Ok(link) => {
                let resolution = Resolution::answered(strategy.method, link);
                debug!(
                    "{}: {} via {}",
                    interface, resolution.status, strategy.method
                );
                return resolution;
            }
            Err(e) => {
                let err = Error::unsupported_query(strategy.method.as_str(), interface, e);
                trace!("{}", err);
            }
        }
    }

    debug!("{}: no detection strategy succeeded", interface);
    Resolution::exhausted()
}
