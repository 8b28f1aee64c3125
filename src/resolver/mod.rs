//! Fact resolvers and their caches.
//!
//! A [`Resolver`] knows how to read one external source and turn it into one
//! or more named facts. [`CachedResolver`] wraps it with the cache every
//! resolver shares:
//!
//! - a name already in the cache is served without touching the source;
//! - a name not in the cache runs the compute hook, whose whole result is
//!   merged into the cache (one read may yield several facts);
//! - a name the compute hook did not produce is *not* remembered as
//!   missing, so the next lookup computes again.
//!
//! The read-or-compute sequence runs under a per-resolver mutex, so concurrent
//! callers never duplicate an external read.

pub mod dmi_bios;
mod error;
pub mod filesystems;
pub mod mountpoints;
pub mod os_release_rpm;
mod registry;
pub mod virtualization;
pub mod vmware;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::debug_span;

use crate::facts::{FactMap, FactValue};

pub use dmi_bios::DmiBios;
pub use error::ResolverError;
pub use filesystems::Filesystems;
pub use mountpoints::Mountpoints;
pub use os_release_rpm::OsReleaseRpm;
pub use registry::ResolverRegistry;
pub use virtualization::Virtualization;
pub use vmware::Vmware;

/// Per-call resolution options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Overrides the default bound on external commands run by this call.
    pub timeout: Option<Duration>,
}

/// Reads one external source and produces facts from it.
pub trait Resolver: Send + Sync {
    /// Component name used to tag log output.
    const NAME: &'static str;

    /// Compute hook, run on a cache miss for `fact_name`.
    ///
    /// Returns every fact the read produced, which may include names other
    /// than `fact_name`. Expected unavailability of the source is an empty
    /// map, not an error.
    fn compute(&self, fact_name: &str, options: &ResolveOptions) -> Result<FactMap, ResolverError>;
}

/// Lookup and compute counters for one cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub lookups: u64,
    pub computes: u64,
}

/// A resolver together with its fact cache.
pub struct CachedResolver<R> {
    resolver: R,
    fact_list: Mutex<HashMap<String, FactValue>>,
    lookups: AtomicU64,
    computes: AtomicU64,
}

impl<R: Resolver> CachedResolver<R> {
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            fact_list: Mutex::new(HashMap::new()),
            lookups: AtomicU64::new(0),
            computes: AtomicU64::new(0),
        }
    }

    /// Returns the value of `fact_name`, computing it on a cache miss.
    pub fn resolve(
        &self,
        fact_name: &str,
        options: &ResolveOptions,
    ) -> Result<Option<FactValue>, ResolverError> {
        let _span = debug_span!("resolver", name = R::NAME).entered();
        self.lookups.fetch_add(1, Ordering::Relaxed);

        let mut fact_list = self.lock();
        if let Some(value) = fact_list.get(fact_name) {
            return Ok(Some(value.clone()));
        }

        self.computes.fetch_add(1, Ordering::Relaxed);
        let computed = self.resolver.compute(fact_name, options)?;
        fact_list.extend(computed);

        Ok(fact_list.get(fact_name).cloned())
    }

    /// Drops every cached value of this resolver.
    pub fn invalidate_cache(&self) {
        self.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            lookups: self.lookups.load(Ordering::Relaxed),
            computes: self.computes.load(Ordering::Relaxed),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, FactValue>> {
        // A panic inside a compute hook leaves the map intact; keep serving it.
        self.fact_list.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
