//! Fact implementations.
//!
//! Each [`FactBinding`] variant knows which resolver backs it and how to turn
//! the resolver's raw values into the fact's value.

use std::backtrace::Backtrace;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;

use crate::facts::{FactValue, ResolvedFact, SearchedFact};
use crate::resolver::{
    ResolveOptions, ResolverError, ResolverRegistry, dmi_bios, filesystems, mountpoints,
    os_release_rpm, virtualization, vmware,
};

/// A resolver failure that crossed the fact boundary, with the call stack
/// captured where it did.
#[derive(Debug)]
pub struct FactError {
    error: ResolverError,
    backtrace: Backtrace,
}

impl FactError {
    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }

    /// The error message followed by its chain of causes.
    pub fn chain(&self) -> String {
        let mut message = self.error.to_string();
        let mut source = self.error.source();
        while let Some(cause) = source {
            message.push_str(&format!("\ncaused by: {}", cause));
            source = cause.source();
        }
        message
    }
}

impl From<ResolverError> for FactError {
    fn from(error: ResolverError) -> Self {
        Self {
            error,
            backtrace: Backtrace::force_capture(),
        }
    }
}

impl fmt::Display for FactError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl Error for FactError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.error.source()
    }
}

/// The closed set of facts this crate implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactBinding {
    Filesystems,
    Mountpoints,
    BiosVendor,
    ProductSerialNumber,
    Virtual,
    IsVirtual,
    HypervisorVmware,
    OsReleasePackage,
}

impl FactBinding {
    /// Resolves `searched` against the registry.
    ///
    /// A non-empty user query drills into the fact's structured value.
    pub fn call_the_resolver(
        &self,
        registry: &ResolverRegistry,
        searched: &SearchedFact,
        options: &ResolveOptions,
    ) -> Result<ResolvedFact, FactError> {
        let value = self.value(registry, options)?;
        let value = match searched.user_query() {
            "" => value,
            query => value.and_then(|v| v.dig(query).cloned()),
        };

        Ok(ResolvedFact::new(searched.name(), value, searched.kind())
            .with_user_query(searched.user_query()))
    }

    fn value(
        &self,
        registry: &ResolverRegistry,
        options: &ResolveOptions,
    ) -> Result<Option<FactValue>, ResolverError> {
        match self {
            FactBinding::Filesystems => registry.filesystems().resolve(filesystems::SYSTEMS, options),
            FactBinding::Mountpoints => Ok(registry
                .mountpoints()
                .resolve(mountpoints::MOUNTPOINTS, options)?
                .map(mounts_by_path)),
            FactBinding::BiosVendor => registry.dmi_bios().resolve(dmi_bios::MANUFACTURER, options),
            FactBinding::ProductSerialNumber => {
                registry.dmi_bios().resolve(dmi_bios::SERIAL_NUMBER, options)
            }
            FactBinding::Virtual => {
                let vm = registry.virtualization().resolve(virtualization::VM, options)?;
                Ok(Some(vm.unwrap_or_else(|| FactValue::from("physical"))))
            }
            FactBinding::IsVirtual => {
                let vm = registry.virtualization().resolve(virtualization::VM, options)?;
                Ok(Some(FactValue::Bool(vm.is_some())))
            }
            FactBinding::HypervisorVmware => registry.vmware().resolve(vmware::VM, options),
            FactBinding::OsReleasePackage => {
                let resolver = registry.os_release_rpm();
                let mut package = BTreeMap::new();
                for name in [
                    os_release_rpm::VERSION,
                    os_release_rpm::RELEASE,
                    os_release_rpm::VENDOR,
                ] {
                    if let Some(value) = resolver.resolve(name, options)? {
                        package.insert(name.to_string(), value);
                    }
                }
                Ok((!package.is_empty()).then_some(FactValue::Map(package)))
            }
        }
    }
}

/// Re-keys the mount list by mount path, dropping the path from each entry.
fn mounts_by_path(mounts: FactValue) -> FactValue {
    let FactValue::List(mounts) = mounts else {
        return mounts;
    };

    let mut by_path = BTreeMap::new();
    for mount in mounts {
        let FactValue::Map(mut fields) = mount else {
            continue;
        };
        if let Some(FactValue::String(path)) = fields.remove("path") {
            by_path.insert(path, FactValue::Map(fields));
        }
    }
    FactValue::Map(by_path)
}
