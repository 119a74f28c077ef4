//! Core traits for link monitoring
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`LinkProbe`]: Resolve the link status of one interface
//! - [`CounterSource`]: Read received-byte counters for the traffic heuristic

pub mod link_probe;
pub mod counter_source;

pub use link_probe::{LinkProbe, InterfaceStatus};
pub use counter_source::{CounterSource, NoCounters};
