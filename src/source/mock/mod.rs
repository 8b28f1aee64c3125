//! Mock sources for testing.
//!
//! In-memory stand-ins for every external input a resolver reads, plus
//! pre-built host scenarios, so resolvers can be tested without a real
//! `/proc`, `/sys`, shell or management interface.

mod execution;
mod filesystem;
mod management;
mod scenarios;
mod statfs;

pub use execution::MockExecutor;
pub use filesystem::MockFs;
pub use management::MockManagement;
pub use statfs::MockFsStats;

use std::path::PathBuf;
use std::sync::Arc;

use crate::source::Sources;

/// Builds [`Sources`] from mocks; anything not set is an empty mock.
#[derive(Debug, Clone, Default)]
pub struct MockSources {
    fs: MockFs,
    executor: MockExecutor,
    stats: MockFsStats,
    management: MockManagement,
    proc_path: Option<PathBuf>,
}

impl MockSources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fs(mut self, fs: MockFs) -> Self {
        self.fs = fs;
        self
    }

    pub fn executor(mut self, executor: MockExecutor) -> Self {
        self.executor = executor;
        self
    }

    pub fn stats(mut self, stats: MockFsStats) -> Self {
        self.stats = stats;
        self
    }

    pub fn management(mut self, management: MockManagement) -> Self {
        self.management = management;
        self
    }

    pub fn proc_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.proc_path = Some(path.into());
        self
    }

    pub fn build(self) -> Sources {
        Sources::new(
            Arc::new(self.fs),
            Arc::new(self.executor),
            Arc::new(self.stats),
            Arc::new(self.management),
            self.proc_path
                .unwrap_or_else(|| PathBuf::from(Sources::DEFAULT_PROC_PATH)),
        )
    }
}
