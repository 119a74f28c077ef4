// Received-byte counters from procfs.
//
// /proc/net/dev has two header lines followed by one line per interface:
//
//   eth0: 1234567 890 0 0 0 0 0 0 7654321 ...
//
// The first number after the colon is the received byte total.

use async_trait::async_trait;
use linkmon_core::{CounterSource, Error};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::trace;

pub const DEFAULT_PROC_NET_DEV: &str = "/proc/net/dev";

/// Counter source reading a `/proc/net/dev` style file
#[derive(Debug, Clone)]
pub struct ProcNetDevCounters {
    path: PathBuf,
}

impl ProcNetDevCounters {
    pub fn new() -> Self {
        Self::with_path(DEFAULT_PROC_NET_DEV)
    }

    /// Read from `path` instead of the system file
    pub fn with_path(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for ProcNetDevCounters {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CounterSource for ProcNetDevCounters {
    async fn rx_bytes(&self) -> Result<HashMap<String, u64>, Error> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| Error::counter_read(format!("{}: {}", self.path.display(), e)))?;

        let counters = parse_net_dev(&content);
        trace!("Read rx counters for {} interfaces", counters.len());
        Ok(counters)
    }
}

/// Parse `/proc/net/dev` into interface name → received bytes
///
/// Header lines and lines whose first field is not a number are skipped.
pub fn parse_net_dev(content: &str) -> HashMap<String, u64> {
    let mut map = HashMap::new();

    for line in content.lines() {
        let Some((name, stats)) = line.split_once(':') else {
            continue;
        };

        let name = name.trim();
        if name.is_empty() {
            continue;
        }

        let rx = stats
            .split_whitespace()
            .next()
            .and_then(|field| field.parse::<u64>().ok());

        if let Some(rx) = rx {
            map.insert(name.to_string(), rx);
        }
    }

    map
}
