//! VMware product detection through `vmware -v`.

use crate::facts::{FactMap, FactValue};
use crate::resolver::{ResolveOptions, Resolver, ResolverError};
use crate::source::Sources;

pub const VM: &str = "vm";

pub(crate) const VMWARE_COMMAND: &str = "vmware -v";

pub struct Vmware {
    sources: Sources,
}

impl Vmware {
    pub fn new(sources: Sources) -> Self {
        Self { sources }
    }
}

impl Resolver for Vmware {
    const NAME: &'static str = "Vmware";

    fn compute(&self, _fact_name: &str, options: &ResolveOptions) -> Result<FactMap, ResolverError> {
        let mut facts = FactMap::new();
        let output = self.sources.executor.execute(VMWARE_COMMAND, options.timeout)?;
        if let Some(vm) = parse_vmware_version(&output) {
            facts.insert(VM.to_string(), FactValue::from(vm));
        }
        Ok(facts)
    }
}

/// Parses output like `VMware Fusion` into `vmware_fusion`.
///
/// Anything other than exactly two words, `vmware` and an alphabetic
/// product name, is not recognised.
pub(crate) fn parse_vmware_version(output: &str) -> Option<String> {
    let mut words = output.split_whitespace();
    let (Some(vendor), Some(product), None) = (words.next(), words.next(), words.next()) else {
        return None;
    };

    if !vendor.eq_ignore_ascii_case("vmware") || !product.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    Some(format!("vmware_{}", product.to_ascii_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::CachedResolver;
    use crate::source::mock::{MockExecutor, MockSources};

    fn resolve(output: Option<&str>) -> Option<FactValue> {
        let executor = match output {
            Some(out) => MockExecutor::new().on(VMWARE_COMMAND, out),
            None => MockExecutor::new(),
        };
        let resolver = CachedResolver::new(Vmware::new(MockSources::new().executor(executor).build()));
        resolver.resolve(VM, &ResolveOptions::default()).unwrap()
    }

    #[test]
    fn test_valid_format() {
        assert_eq!(resolve(Some("VmWare Fusion")), Some(FactValue::from("vmware_fusion")));
    }

    #[test]
    fn test_invalid_format() {
        assert_eq!(resolve(Some("vmware fusion 7.1")), None);
        assert_eq!(resolve(Some("parallels desktop")), None);
    }

    #[test]
    fn test_command_missing() {
        assert_eq!(resolve(None), None);
    }

    #[test]
    fn test_timeout_is_an_error() {
        let executor = MockExecutor::new().timing_out(VMWARE_COMMAND);
        let resolver = CachedResolver::new(Vmware::new(MockSources::new().executor(executor).build()));
        assert!(resolver.resolve(VM, &ResolveOptions::default()).is_err());
    }
}
