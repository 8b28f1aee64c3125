//! Abstractions for pseudo-filesystem access to enable testing and mocking.
//!
//! The `FileSystem` trait lets resolvers read the real `/proc` and `/sys`
//! trees on Linux and an in-memory `MockFs` in tests.

use std::io;
use std::path::Path;

/// Abstraction for the file reads resolvers perform.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a string.
    ///
    /// # Returns
    /// The file contents, or an I/O error if the file cannot be read.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Checks if a path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Reads a file and returns `None` when it cannot be read for any reason.
    ///
    /// Pseudo-files come and go with kernel configuration, so a missing or
    /// unreadable file is an expected condition for most resolvers.
    fn read_optional(&self, path: &Path) -> Option<String> {
        match self.read_to_string(path) {
            Ok(content) => Some(content),
            Err(e) => {
                tracing::debug!("could not read {}: {}", path.display(), e);
                None
            }
        }
    }
}

/// Real filesystem implementation that delegates to `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    /// Creates a new `RealFs` instance.
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_real_fs_read_to_string() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "ext4").unwrap();

        let fs = RealFs::new();
        let content = fs.read_to_string(file.path()).unwrap();
        assert_eq!(content, "ext4\n");
    }

    #[test]
    fn test_real_fs_exists() {
        let dir = tempfile::tempdir().unwrap();
        let fs = RealFs::new();
        assert!(fs.exists(dir.path()));
        assert!(!fs.exists(&dir.path().join("missing")));
    }

    #[test]
    fn test_read_optional_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let fs = RealFs::new();
        assert_eq!(fs.read_optional(&dir.path().join("filesystems")), None);
    }
}
