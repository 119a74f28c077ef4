// # Link Status Samples
//
// A sample is the full snapshot a monitor emits whenever at least one
// interface changed. It always carries every configured interface, in
// configuration order, not just the ones that changed.

use crate::traits::InterfaceStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of one interface within a sample
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceReport {
    pub name: String,
    pub status: InterfaceStatus,
}

/// Link status of every monitored interface as of one poll tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkStatusSample {
    /// When the tick that produced this sample ran
    pub observed_at: DateTime<Utc>,
    /// One entry per configured interface
    pub interfaces: Vec<InterfaceReport>,
}

impl LinkStatusSample {
    pub(crate) fn new<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a InterfaceStatus)>,
    {
        Self {
            observed_at: Utc::now(),
            interfaces: entries
                .into_iter()
                .map(|(name, status)| InterfaceReport {
                    name: name.clone(),
                    status: *status,
                })
                .collect(),
        }
    }

    /// Status of `name`, if it is part of this sample
    pub fn get(&self, name: &str) -> Option<InterfaceStatus> {
        self.interfaces
            .iter()
            .find(|report| report.name == name)
            .map(|report| report.status)
    }

    /// `(name, status)` pairs in configuration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, InterfaceStatus)> {
        self.interfaces
            .iter()
            .map(|report| (report.name.as_str(), report.status))
    }

    pub fn len(&self) -> usize {
        self.interfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }
}
