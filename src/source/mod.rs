//! External fact sources.
//!
//! Every input a resolver consumes sits behind a trait so the same resolver
//! code runs against the live system and against in-memory mocks.
//!
//! ```text
//!   ┌────────────┐ ┌────────────┐ ┌────────────┐ ┌─────────────────────┐
//!   │ FileSystem │ │  Executor  │ │  FsStats   │ │ ManagementInterface │
//!   └─────┬──────┘ └─────┬──────┘ └─────┬──────┘ └──────────┬──────────┘
//!         │ RealFs       │ ShellExec.   │ StatvfsStats      │ SysfsDmi
//!         │ MockFs       │ MockExec.    │ MockFsStats       │ MockManagement
//!         └──────────────┴──────┬───────┴───────────────────┘
//!                            Sources
//! ```

pub mod execution;
pub mod management;
pub mod mock;
pub mod mounts;
pub mod odm;
pub mod statfs;
pub mod traits;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub use execution::{ExecutionError, Executor, ShellExecutor};
pub use management::{ManagementError, ManagementInterface, ManagementObject, ManagementQuery, SysfsDmi};
pub use statfs::{FsStats, MountStats, StatsError, StatvfsStats};
pub use traits::{FileSystem, RealFs};

/// The set of sources shared by all resolvers.
#[derive(Clone)]
pub struct Sources {
    pub fs: Arc<dyn FileSystem>,
    pub executor: Arc<dyn Executor>,
    pub stats: Arc<dyn FsStats>,
    pub management: Arc<dyn ManagementInterface>,
    proc_path: PathBuf,
}

impl Sources {
    /// Default path to the proc filesystem.
    pub const DEFAULT_PROC_PATH: &'static str = "/proc";
    /// Default path to sysfs.
    pub const DEFAULT_SYS_PATH: &'static str = "/sys";

    pub fn new(
        fs: Arc<dyn FileSystem>,
        executor: Arc<dyn Executor>,
        stats: Arc<dyn FsStats>,
        management: Arc<dyn ManagementInterface>,
        proc_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            fs,
            executor,
            stats,
            management,
            proc_path: proc_path.into(),
        }
    }

    /// Sources backed by the live system.
    pub fn system(
        proc_path: impl Into<PathBuf>,
        sys_path: impl Into<PathBuf>,
        command_timeout: Duration,
    ) -> Self {
        let fs: Arc<dyn FileSystem> = Arc::new(RealFs::new());
        Self::new(
            fs.clone(),
            Arc::new(ShellExecutor::new(command_timeout)),
            Arc::new(StatvfsStats::new()),
            Arc::new(SysfsDmi::new(fs, sys_path)),
            proc_path,
        )
    }

    /// Path of an entry below the proc filesystem.
    pub fn proc_file(&self, name: &str) -> PathBuf {
        self.proc_path.join(name)
    }
}
