// # ioctl Link Probe
//
// This crate provides the Linux side of linkmon:
// - `IoctlProbe`: a `LinkProbe` that asks the kernel for link state through
//   ethtool, MII, wireless and interface flag ioctls, in that order
// - `ProcNetDevCounters`: a `CounterSource` reading `/proc/net/dev`
//
// ## Platform Support
//
// The ioctl strategies only compile on Linux. Elsewhere `IoctlProbe` still
// exists but every call fails with `Error::Unsupported`.

mod counters;
mod probe;

#[cfg(target_os = "linux")]
mod socket;
#[cfg(target_os = "linux")]
mod strategies;
#[cfg(target_os = "linux")]
mod sys;

pub use counters::{DEFAULT_PROC_NET_DEV, ProcNetDevCounters, parse_net_dev};
pub use probe::IoctlProbe;
