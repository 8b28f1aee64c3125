//! Supported filesystem types from `/proc/filesystems`.

use tracing::debug;

use crate::facts::{FactMap, FactValue};
use crate::resolver::{ResolveOptions, Resolver, ResolverError};
use crate::source::Sources;

/// Fact: comma-separated, sorted list of filesystem types.
pub const SYSTEMS: &str = "systems";

/// Excluded because it duplicates the `fuse` entry.
const EXCLUDED: &str = "fuseblk";

pub struct Filesystems {
    sources: Sources,
}

impl Filesystems {
    pub fn new(sources: Sources) -> Self {
        Self { sources }
    }
}

impl Resolver for Filesystems {
    const NAME: &'static str = "Filesystems";

    fn compute(&self, _fact_name: &str, _options: &ResolveOptions) -> Result<FactMap, ResolverError> {
        let mut facts = FactMap::new();
        let path = self.sources.proc_file("filesystems");
        let Some(content) = self.sources.fs.read_optional(&path) else {
            return Ok(facts);
        };

        let systems = parse_filesystems(&content);
        debug!("found {} filesystem types", systems.len());
        facts.insert(SYSTEMS.to_string(), FactValue::from(systems.join(",")));
        Ok(facts)
    }
}

/// Keeps single-token lines (device-backed types) other than `fuseblk`.
///
/// Lines of the form `nodev\tsysfs` carry two tokens and are dropped.
fn parse_filesystems(content: &str) -> Vec<&str> {
    let mut systems: Vec<&str> = content
        .lines()
        .filter_map(|line| {
            let mut tokens = line.split_whitespace();
            match (tokens.next(), tokens.next()) {
                (Some(fs_type), None) if fs_type != EXCLUDED => Some(fs_type),
                _ => None,
            }
        })
        .collect();
    systems.sort_unstable();
    systems
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::CachedResolver;
    use crate::source::mock::{MockFs, MockSources};

    fn resolver(fs: MockFs) -> CachedResolver<Filesystems> {
        CachedResolver::new(Filesystems::new(MockSources::new().fs(fs).build()))
    }

    #[test]
    fn test_parse_filesystems_filters_lines() {
        assert_eq!(
            parse_filesystems("ext4\n fuseblk \nnfs nfs4\n btrfs"),
            vec!["btrfs", "ext4"]
        );
    }

    #[test]
    fn test_resolve_systems() {
        let mut fs = MockFs::new();
        fs.add_file(
            "/proc/filesystems",
            "nodev\tsysfs\nnodev\ttmpfs\n\text3\n\text4\n\txfs\n\tfuseblk\nnodev\tfuse\n\tvfat\n",
        );

        let value = resolver(fs).resolve(SYSTEMS, &ResolveOptions::default()).unwrap();
        assert_eq!(value, Some(FactValue::from("ext3,ext4,vfat,xfs")));
    }

    #[test]
    fn test_unreadable_source_is_absent() {
        let fs = MockFs::new();
        let handle = fs.clone();
        let resolver = resolver(fs);

        assert_eq!(resolver.resolve(SYSTEMS, &ResolveOptions::default()).unwrap(), None);
        assert_eq!(resolver.resolve(SYSTEMS, &ResolveOptions::default()).unwrap(), None);
        // Misses are retried.
        assert_eq!(handle.read_count("/proc/filesystems"), 2);
    }

    #[test]
    fn test_empty_table_resolves_to_empty_string() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/filesystems", "nodev\tproc\n");

        let value = resolver(fs).resolve(SYSTEMS, &ResolveOptions::default()).unwrap();
        assert_eq!(value, Some(FactValue::from("")));
    }
}
