//! In-memory mock filesystem for testing resolvers without real `/proc`.
//!
//! `MockFs` simulates the pseudo-filesystems in memory so tests run on any
//! platform and do not depend on the host's kernel configuration.

use crate::source::traits::FileSystem;
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// In-memory filesystem for testing.
///
/// Clones share the read counters, so a test can keep a handle while the
/// resolver under test owns another.
#[derive(Debug, Clone, Default)]
pub struct MockFs {
    /// Map from path to file contents.
    files: HashMap<PathBuf, String>,
    /// Directories implied by added files.
    directories: HashSet<PathBuf>,
    /// Paths that exist but fail with `PermissionDenied` on read.
    unreadable: HashSet<PathBuf>,
    /// Number of `read_to_string` calls per path.
    reads: Arc<Mutex<HashMap<PathBuf, usize>>>,
}

impl MockFs {
    /// Creates a new empty mock filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file with the given content.
    ///
    /// Parent directories are automatically created.
    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<String>) {
        let path = path.as_ref().to_path_buf();
        self.add_parents(&path);
        self.files.insert(path, content.into());
    }

    /// Adds an empty directory.
    pub fn add_dir(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        self.add_parents(&path);
        self.directories.insert(path);
    }

    /// Adds a file that exists but cannot be read.
    pub fn add_unreadable(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        self.add_parents(&path);
        self.unreadable.insert(path);
    }

    /// Returns how many times `path` has been read.
    pub fn read_count(&self, path: impl AsRef<Path>) -> usize {
        let reads = self.reads.lock().unwrap_or_else(PoisonError::into_inner);
        reads.get(path.as_ref()).copied().unwrap_or(0)
    }

    fn add_parents(&mut self, path: &Path) {
        let mut parent = path.parent();
        while let Some(p) = parent {
            if !p.as_os_str().is_empty() {
                self.directories.insert(p.to_path_buf());
            }
            parent = p.parent();
        }
    }
}

impl FileSystem for MockFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        *self
            .reads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(path.to_path_buf())
            .or_insert(0) += 1;

        if self.unreadable.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("permission denied: {:?}", path),
            ));
        }

        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {:?}", path),
            )
        })
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
            || self.directories.contains(path)
            || self.unreadable.contains(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_fs_add_file() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/filesystems", "nodev\tsysfs\n\text4\n");

        assert!(fs.exists(Path::new("/proc/filesystems")));
        assert!(fs.exists(Path::new("/proc")));

        let content = fs.read_to_string(Path::new("/proc/filesystems")).unwrap();
        assert_eq!(content, "nodev\tsysfs\n\text4\n");
    }

    #[test]
    fn test_mock_fs_add_dir() {
        let mut fs = MockFs::new();
        fs.add_dir("/proc/xen");

        assert!(fs.exists(Path::new("/proc/xen")));
        assert!(fs.read_to_string(Path::new("/proc/xen")).is_err());
    }

    #[test]
    fn test_mock_fs_not_found() {
        let fs = MockFs::new();
        let result = fs.read_to_string(Path::new("/nonexistent"));
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_mock_fs_unreadable() {
        let mut fs = MockFs::new();
        fs.add_unreadable("/sys/class/dmi/id/product_serial");

        assert!(fs.exists(Path::new("/sys/class/dmi/id/product_serial")));
        let err = fs
            .read_to_string(Path::new("/sys/class/dmi/id/product_serial"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_mock_fs_counts_reads_across_clones() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/cmdline", "root=/dev/sda1\n");
        let handle = fs.clone();

        fs.read_to_string(Path::new("/proc/cmdline")).unwrap();
        let _ = fs.read_to_string(Path::new("/proc/missing"));

        assert_eq!(handle.read_count("/proc/cmdline"), 1);
        assert_eq!(handle.read_count("/proc/missing"), 1);
        assert_eq!(handle.read_count("/proc/other"), 0);
    }
}
