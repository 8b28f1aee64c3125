//! Release package metadata from rpm.
//!
//! On rpm-based distributions `/etc/os-release` is owned by a release package
//! whose version and release identify the distribution build.

use crate::facts::{FactMap, FactValue};
use crate::resolver::{ResolveOptions, Resolver, ResolverError};
use crate::source::Sources;

pub const PACKAGE: &str = "package";
pub const VERSION: &str = "version";
pub const RELEASE: &str = "release";
pub const VENDOR: &str = "vendor";

pub(crate) const RPM_COMMAND: &str =
    "rpm -q --qf '%{NAME}\\n%{VERSION}\\n%{RELEASE}\\n%{VENDOR}' -f /etc/os-release";

pub struct OsReleaseRpm {
    sources: Sources,
}

impl OsReleaseRpm {
    pub fn new(sources: Sources) -> Self {
        Self { sources }
    }
}

impl Resolver for OsReleaseRpm {
    const NAME: &'static str = "OsReleaseRpm";

    fn compute(&self, _fact_name: &str, options: &ResolveOptions) -> Result<FactMap, ResolverError> {
        let mut facts = FactMap::new();
        let output = self.sources.executor.execute(RPM_COMMAND, options.timeout)?;
        if output.is_empty() {
            return Ok(facts);
        }

        for (name, line) in [PACKAGE, VERSION, RELEASE, VENDOR].into_iter().zip(output.lines()) {
            let line = line.trim();
            if !line.is_empty() {
                facts.insert(name.to_string(), FactValue::from(line));
            }
        }
        Ok(facts)
    }
}
