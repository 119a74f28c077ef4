//! Error types for the link monitor
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for link monitor operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for link detection and monitoring
#[derive(Error, Debug)]
pub enum Error {
    /// The kernel query handle for a probe call could not be opened
    #[error("Control channel error: {0}")]
    ControlChannel(String),

    /// A single detection strategy is not supported for an interface
    #[error("Unsupported query ({method}) on {interface}: {source}")]
    UnsupportedQuery {
        /// Strategy that failed
        method: &'static str,
        /// Interface the query was issued for
        interface: String,
        /// Underlying kernel error
        #[source]
        source: std::io::Error,
    },

    /// Traffic counters could not be read for a cycle
    #[error("Counter read error: {0}")]
    CounterRead(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Lifecycle misuse (e.g. running a monitor twice)
    #[error("Invalid monitor state: {0}")]
    InvalidState(String),

    /// Operation not available on this platform
    #[error("Unsupported platform: {0}")]
    Unsupported(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a control channel error
    pub fn control_channel(msg: impl Into<String>) -> Self {
        Self::ControlChannel(msg.into())
    }

    /// Create an unsupported query error
    pub fn unsupported_query(
        method: &'static str,
        interface: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Self::UnsupportedQuery {
            method,
            interface: interface.into(),
            source,
        }
    }

    /// Create a counter read error
    pub fn counter_read(msg: impl Into<String>) -> Self {
        Self::CounterRead(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid state error
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Create an unsupported platform error
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }
}
