// ioctl link probe.
//
// Each call opens one control socket, walks the fallback chain over it and
// closes it again. Nothing is cached between calls.

use async_trait::async_trait;
use linkmon_core::{Error, InterfaceStatus, LinkProbe, Resolution, Result};

#[cfg(target_os = "linux")]
use crate::{socket::ControlSocket, strategies::CHAIN};

#[cfg(target_os = "linux")]
use tracing::warn;

/// Link probe backed by ethtool, MII, wireless and interface flag ioctls
#[derive(Debug, Clone, Copy, Default)]
pub struct IoctlProbe;

impl IoctlProbe {
    pub fn new() -> Self {
        Self
    }

    /// Resolve `interface` and report which strategy answered
    #[cfg(target_os = "linux")]
    pub fn resolve(&self, interface: &str) -> Result<Resolution> {
        let socket = ControlSocket::open().map_err(|e| {
            warn!("Failed to open control socket for {}: {}", interface, e);
            Error::control_channel(format!("socket for {}: {}", interface, e))
        })?;

        Ok(linkmon_core::detection::resolve(&socket, interface, &CHAIN))
    }

    #[cfg(not(target_os = "linux"))]
    pub fn resolve(&self, _interface: &str) -> Result<Resolution> {
        Err(Error::unsupported(
            "ioctl link detection is only available on Linux",
        ))
    }
}

#[async_trait]
impl LinkProbe for IoctlProbe {
    async fn probe(&self, interface: &str) -> Result<InterfaceStatus> {
        self.resolve(interface).map(|resolution| resolution.status)
    }

    fn probe_name(&self) -> &'static str {
        "ioctl"
    }
}
