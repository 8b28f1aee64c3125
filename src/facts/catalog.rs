//! Known facts and query parsing.
//!
//! A query is a dotted path. The longest prefix naming a known fact selects
//! the binding and the rest of the path becomes the user query, so
//! `mountpoints./boot.device` resolves `mountpoints` and then digs into
//! `/boot` → `device`.

use crate::facts::{FactBinding, FactKind, SearchedFact};

/// A fact name and the binding that serves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactDefinition {
    pub name: &'static str,
    pub kind: FactKind,
    pub binding: FactBinding,
}

const fn fact(name: &'static str, kind: FactKind, binding: FactBinding) -> FactDefinition {
    FactDefinition { name, kind, binding }
}

/// Every fact this crate can resolve, core names first.
pub const FACTS: &[FactDefinition] = &[
    fact("filesystems", FactKind::Core, FactBinding::Filesystems),
    fact("mountpoints", FactKind::Core, FactBinding::Mountpoints),
    fact("dmi.bios.vendor", FactKind::Core, FactBinding::BiosVendor),
    fact("dmi.product.serial_number", FactKind::Core, FactBinding::ProductSerialNumber),
    fact("virtual", FactKind::Core, FactBinding::Virtual),
    fact("is_virtual", FactKind::Core, FactBinding::IsVirtual),
    fact("hypervisors.vmware", FactKind::Core, FactBinding::HypervisorVmware),
    fact("os.release_package", FactKind::Core, FactBinding::OsReleasePackage),
    fact("bios_vendor", FactKind::Legacy, FactBinding::BiosVendor),
    fact("serialnumber", FactKind::Legacy, FactBinding::ProductSerialNumber),
];

#[derive(Debug, Clone)]
pub struct FactCatalog {
    facts: Vec<FactDefinition>,
}

impl Default for FactCatalog {
    fn default() -> Self {
        Self::new(FACTS.to_vec())
    }
}

impl FactCatalog {
    pub fn new(facts: Vec<FactDefinition>) -> Self {
        Self { facts }
    }

    /// Turns user queries into searched facts, one per query, in order.
    ///
    /// With no queries, every core fact is searched, plus the legacy ones
    /// when `show_legacy` is set.
    pub fn search<S: AsRef<str>>(&self, queries: &[S], show_legacy: bool) -> Vec<SearchedFact> {
        if queries.is_empty() {
            return self
                .facts
                .iter()
                .filter(|def| def.kind == FactKind::Core || show_legacy)
                .map(|def| SearchedFact::new(def.name, "", def.binding, def.kind))
                .collect();
        }

        queries.iter().map(|q| self.search_one(q.as_ref())).collect()
    }

    fn search_one(&self, query: &str) -> SearchedFact {
        let segments: Vec<&str> = query.split('.').collect();

        for len in (1..=segments.len()).rev() {
            let prefix = segments[..len].join(".");
            if let Some(def) = self.find(&prefix) {
                let user_query = segments[len..].join(".");
                return SearchedFact::new(query, user_query, def.binding, def.kind);
            }
        }

        tracing::debug!("no fact matches query {}", query);
        SearchedFact::unknown(query)
    }

    fn find(&self, name: &str) -> Option<&FactDefinition> {
        self.facts.iter().find(|def| def.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        let searched = FactCatalog::default().search(&["dmi.bios.vendor"], false);
        assert_eq!(
            searched,
            vec![SearchedFact::new("dmi.bios.vendor", "", FactBinding::BiosVendor, FactKind::Core)]
        );
    }

    #[test]
    fn test_sub_query() {
        let searched = FactCatalog::default().search(&["mountpoints./boot/efi.device"], false);
        assert_eq!(searched[0].name(), "mountpoints./boot/efi.device");
        assert_eq!(searched[0].user_query(), "/boot/efi.device");
        assert_eq!(searched[0].binding(), Some(FactBinding::Mountpoints));
    }

    #[test]
    fn test_legacy_alias() {
        let searched = FactCatalog::default().search(&["serialnumber"], false);
        assert_eq!(searched[0].kind(), FactKind::Legacy);
        assert_eq!(searched[0].binding(), Some(FactBinding::ProductSerialNumber));
    }

    #[test]
    fn test_unknown_fact() {
        let searched = FactCatalog::default().search(&["dmi.bios", "nonexistent"], false);
        assert_eq!(searched, vec![SearchedFact::unknown("dmi.bios"), SearchedFact::unknown("nonexistent")]);
    }

    #[test]
    fn test_preserves_query_order() {
        let names: Vec<String> = FactCatalog::default()
            .search(&["virtual", "filesystems", "virtual"], false)
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        assert_eq!(names, vec!["virtual", "filesystems", "virtual"]);
    }

    #[test]
    fn test_all_facts() {
        let catalog = FactCatalog::default();
        let empty: [&str; 0] = [];

        let core = catalog.search(&empty, false);
        assert_eq!(core.len(), 8);
        assert!(core.iter().all(|s| s.kind() == FactKind::Core));

        let all = catalog.search(&empty, true);
        assert_eq!(all.len(), FACTS.len());
    }
}
