//! One cached instance of every resolver.
//!
//! The registry replaces process-wide resolver singletons: whoever owns it
//! owns the caches, so invalidation and test isolation are explicit.

use std::sync::Arc;

use tracing::debug;

use crate::resolver::{
    CacheStats, CachedResolver, DmiBios, Filesystems, Mountpoints, OsReleaseRpm, Resolver,
    Virtualization, Vmware,
};
use crate::source::Sources;

pub struct ResolverRegistry {
    filesystems: CachedResolver<Filesystems>,
    mountpoints: CachedResolver<Mountpoints>,
    dmi_bios: Arc<CachedResolver<DmiBios>>,
    vmware: Arc<CachedResolver<Vmware>>,
    os_release_rpm: CachedResolver<OsReleaseRpm>,
    virtualization: CachedResolver<Virtualization>,
}

impl ResolverRegistry {
    pub fn new(sources: Sources) -> Self {
        // Virtualization reads the BIOS vendor and VMware product through
        // the same caches that serve those facts.
        let dmi_bios = Arc::new(CachedResolver::new(DmiBios::new(sources.clone())));
        let vmware = Arc::new(CachedResolver::new(Vmware::new(sources.clone())));

        Self {
            filesystems: CachedResolver::new(Filesystems::new(sources.clone())),
            mountpoints: CachedResolver::new(Mountpoints::new(sources.clone())),
            os_release_rpm: CachedResolver::new(OsReleaseRpm::new(sources.clone())),
            virtualization: CachedResolver::new(Virtualization::new(
                sources,
                dmi_bios.clone(),
                vmware.clone(),
            )),
            dmi_bios,
            vmware,
        }
    }

    pub fn filesystems(&self) -> &CachedResolver<Filesystems> {
        &self.filesystems
    }

    pub fn mountpoints(&self) -> &CachedResolver<Mountpoints> {
        &self.mountpoints
    }

    pub fn dmi_bios(&self) -> &CachedResolver<DmiBios> {
        &self.dmi_bios
    }

    pub fn vmware(&self) -> &CachedResolver<Vmware> {
        &self.vmware
    }

    pub fn os_release_rpm(&self) -> &CachedResolver<OsReleaseRpm> {
        &self.os_release_rpm
    }

    pub fn virtualization(&self) -> &CachedResolver<Virtualization> {
        &self.virtualization
    }

    /// Clears every resolver's cache.
    pub fn invalidate_all(&self) {
        self.filesystems.invalidate_cache();
        self.mountpoints.invalidate_cache();
        self.dmi_bios.invalidate_cache();
        self.vmware.invalidate_cache();
        self.os_release_rpm.invalidate_cache();
        self.virtualization.invalidate_cache();
    }

    /// Cache counters per resolver, in registration order.
    pub fn stats(&self) -> Vec<(&'static str, CacheStats)> {
        vec![
            (Filesystems::NAME, self.filesystems.stats()),
            (Mountpoints::NAME, self.mountpoints.stats()),
            (DmiBios::NAME, self.dmi_bios.stats()),
            (Vmware::NAME, self.vmware.stats()),
            (OsReleaseRpm::NAME, self.os_release_rpm.stats()),
            (Virtualization::NAME, self.virtualization.stats()),
        ]
    }

    /// Logs the cache counters at debug level.
    pub fn log_stats(&self) {
        for (name, stats) in self.stats() {
            debug!(
                "{}: {} lookups, {} computes",
                name, stats.lookups, stats.computes
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::ResolveOptions;
    use crate::resolver::filesystems::SYSTEMS;
    use crate::source::mock::{MockFs, MockSources};

    #[test]
    fn test_invalidate_all() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/filesystems", "\text4\n");
        let handle = fs.clone();
        let registry = ResolverRegistry::new(MockSources::new().fs(fs).build());
        let options = ResolveOptions::default();

        registry.filesystems().resolve(SYSTEMS, &options).unwrap();
        registry.filesystems().resolve(SYSTEMS, &options).unwrap();
        registry.invalidate_all();
        registry.filesystems().resolve(SYSTEMS, &options).unwrap();

        assert_eq!(handle.read_count("/proc/filesystems"), 2);
    }

    #[test]
    fn test_stats_per_resolver() {
        let registry = ResolverRegistry::new(MockSources::new().build());
        registry.vmware().resolve("vm", &ResolveOptions::default()).unwrap();

        let stats = registry.stats();
        assert_eq!(stats.len(), 6);
        assert_eq!(stats[3], ("Vmware", CacheStats { lookups: 1, computes: 1 }));
        assert_eq!(stats[0].1, CacheStats::default());
    }
}
