//! Filesystem usage statistics for a mount path.

use thiserror::Error;

/// Byte counters for one mounted filesystem.
///
/// Counters are signed because some platforms report wrapped values;
/// consumers take absolute values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MountStats {
    pub bytes_total: i64,
    pub bytes_available: i64,
    pub bytes_used: i64,
}

/// Failure to obtain statistics for a mount path.
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("statvfs({path}) failed: {message}")]
    Query { path: String, message: String },

    #[error("filesystem statistics are not supported on this platform")]
    Unsupported,
}

/// Platform filesystem-statistics facility.
pub trait FsStats: Send + Sync {
    fn stats(&self, path: &str) -> Result<MountStats, StatsError>;
}

/// `statvfs(3)`-backed statistics.
#[derive(Debug, Default, Clone, Copy)]
pub struct StatvfsStats;

impl StatvfsStats {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(unix)]
impl FsStats for StatvfsStats {
    fn stats(&self, path: &str) -> Result<MountStats, StatsError> {
        use nix::sys::statvfs::statvfs;

        let st = statvfs(path).map_err(|e| StatsError::Query {
            path: path.to_string(),
            message: e.to_string(),
        })?;

        let frsize = st.fragment_size() as i64;
        let blocks = st.blocks() as i64;
        let free = st.blocks_free() as i64;
        let available = st.blocks_available() as i64;

        Ok(MountStats {
            bytes_total: blocks.wrapping_mul(frsize),
            bytes_available: available.wrapping_mul(frsize),
            bytes_used: (blocks - free).wrapping_mul(frsize),
        })
    }
}

#[cfg(not(unix))]
impl FsStats for StatvfsStats {
    fn stats(&self, _path: &str) -> Result<MountStats, StatsError> {
        Err(StatsError::Unsupported)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_statvfs_on_temp_dir() {
        let dir = tempfile::tempdir().unwrap();
        let stats = StatvfsStats::new()
            .stats(dir.path().to_str().unwrap())
            .unwrap();
        assert!(stats.bytes_total > 0);
        assert!(stats.bytes_used >= 0);
    }

    #[test]
    fn test_statvfs_missing_path() {
        let err = StatvfsStats::new()
            .stats("/nonexistent/rfacter/path")
            .unwrap_err();
        assert!(matches!(err, StatsError::Query { .. }));
    }
}
