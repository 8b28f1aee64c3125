//! BIOS identification through the management interface.

use tracing::debug;

use crate::facts::{FactMap, FactValue};
use crate::resolver::{ResolveOptions, Resolver, ResolverError};
use crate::source::Sources;
use crate::source::management::{CLASS_BIOS, ManagementQuery};

pub const MANUFACTURER: &str = "manufacturer";
pub const SERIAL_NUMBER: &str = "serial_number";

pub struct DmiBios {
    sources: Sources,
}

impl DmiBios {
    pub fn new(sources: Sources) -> Self {
        Self { sources }
    }
}

impl Resolver for DmiBios {
    const NAME: &'static str = "DmiBios";

    fn compute(&self, _fact_name: &str, _options: &ResolveOptions) -> Result<FactMap, ResolverError> {
        let mut facts = FactMap::new();
        let query = ManagementQuery::new(CLASS_BIOS, &["Manufacturer", "SerialNumber"]);

        let Some(bios) = self.sources.management.return_first(&query)? else {
            debug!("query returned no results for {}", query);
            return Ok(facts);
        };

        if let Some(manufacturer) = bios.get("Manufacturer") {
            facts.insert(MANUFACTURER.to_string(), FactValue::from(manufacturer));
        }
        if let Some(serial) = bios.get("SerialNumber") {
            facts.insert(SERIAL_NUMBER.to_string(), FactValue::from(serial));
        }
        Ok(facts)
    }
}
