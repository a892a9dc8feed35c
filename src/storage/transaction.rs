//! Per-host write batches
//!
//! A `HostTransaction` collects every write of one host pass in memory. The
//! store applies the whole batch inside a single database transaction on
//! commit, so readers see all of it or none of it.

use crate::storage::Host;

/// A single pending write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingWrite {
    /// Record that `path` contained `phrase`, creating the endpoint with `title` if absent
    Confirmation {
        path: String,
        phrase: String,
        title: String,
    },

    /// Record `path` with `title` as a known endpoint
    Endpoint { path: String, title: String },
}

/// Buffered writes scoped to exactly one host
#[derive(Debug, Clone)]
pub struct HostTransaction {
    host_id: i64,
    host_name: String,
    writes: Vec<PendingWrite>,
}

impl HostTransaction {
    /// Opens an empty batch for `host`
    pub fn begin(host: &Host) -> Self {
        Self {
            host_id: host.id,
            host_name: host.name.clone(),
            writes: Vec::new(),
        }
    }

    pub fn record_confirmation(&mut self, path: &str, phrase: &str, title: &str) {
        self.writes.push(PendingWrite::Confirmation {
            path: path.to_string(),
            phrase: phrase.to_string(),
            title: title.to_string(),
        });
    }

    pub fn record_endpoint(&mut self, path: &str, title: &str) {
        self.writes.push(PendingWrite::Endpoint {
            path: path.to_string(),
            title: title.to_string(),
        });
    }

    pub fn host_id(&self) -> i64 {
        self.host_id
    }

    pub fn host_name(&self) -> &str {
        &self.host_name
    }

    pub fn writes(&self) -> &[PendingWrite] {
        &self.writes
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}
