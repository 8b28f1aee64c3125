//! Scripted filesystem statistics.

use std::collections::HashMap;

use crate::source::statfs::{FsStats, MountStats, StatsError};

/// Returns canned statistics per mount path; unknown paths fail.
#[derive(Debug, Clone, Default)]
pub struct MockFsStats {
    stats: HashMap<String, MountStats>,
}

impl MockFsStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: impl Into<String>, total: i64, available: i64, used: i64) -> Self {
        self.stats.insert(
            path.into(),
            MountStats {
                bytes_total: total,
                bytes_available: available,
                bytes_used: used,
            },
        );
        self
    }
}

impl FsStats for MockFsStats {
    fn stats(&self, path: &str) -> Result<MountStats, StatsError> {
        self.stats.get(path).copied().ok_or_else(|| StatsError::Query {
            path: path.to_string(),
            message: "no such mount".to_string(),
        })
    }
}
