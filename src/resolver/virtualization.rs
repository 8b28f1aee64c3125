//! Hypervisor detection.
//!
//! Checks run from the most specific to the most generic; the first one that
//! recognises an environment wins.

use std::sync::Arc;

use tracing::debug;

use crate::facts::{FactMap, FactValue};
use crate::resolver::{CachedResolver, DmiBios, ResolveOptions, Resolver, ResolverError, Vmware};
use crate::resolver::{dmi_bios, vmware};
use crate::source::Sources;
use crate::source::management::{CLASS_PRODUCT, ManagementQuery};

pub const VM: &str = "vm";

pub(crate) const VIRT_WHAT_COMMAND: &str = "virt-what";

/// DMI product names and the hypervisor each one identifies.
const PRODUCT_NAMES: &[(&str, &str)] = &[
    ("VMware", "vmware"),
    ("VirtualBox", "virtualbox"),
    ("Parallels", "parallels"),
    ("KVM", "kvm"),
    ("Bochs", "bochs"),
    ("Virtual Machine", "hyperv"),
    ("Google", "gce"),
    ("OpenStack", "openstack"),
    ("HVM domU", "xenhvm"),
];

/// `virt-what` names that differ from ours.
const VIRT_WHAT_NAMES: &[(&str, &str)] = &[
    ("xen-hvm", "xenhvm"),
    ("xen-dom0", "xen0"),
    ("xen-domu", "xenu"),
    ("ibm_systemz", "zlinux"),
];

/// Detects the hypervisor, reading the BIOS vendor and the VMware product
/// through their own cached resolvers.
pub struct Virtualization {
    sources: Sources,
    dmi_bios: Arc<CachedResolver<DmiBios>>,
    vmware: Arc<CachedResolver<Vmware>>,
}

impl Virtualization {
    pub fn new(
        sources: Sources,
        dmi_bios: Arc<CachedResolver<DmiBios>>,
        vmware: Arc<CachedResolver<Vmware>>,
    ) -> Self {
        Self {
            sources,
            dmi_bios,
            vmware,
        }
    }

    fn read(&self, name: &str) -> Option<String> {
        self.sources.fs.read_optional(&self.sources.proc_file(name))
    }

    fn exists(&self, name: &str) -> bool {
        self.sources.fs.exists(&self.sources.proc_file(name))
    }

    fn cgroup_vm(&self) -> Option<String> {
        let cgroup = self.read("1/cgroup")?;
        ["docker", "lxc"]
            .into_iter()
            .find(|runtime| cgroup.contains(&format!("/{}", runtime)))
            .map(str::to_string)
    }

    fn gce_vm(&self, options: &ResolveOptions) -> Result<Option<String>, ResolverError> {
        let vendor = self.dmi_bios.resolve(dmi_bios::MANUFACTURER, options)?;
        Ok(vendor
            .as_ref()
            .and_then(FactValue::as_str)
            .filter(|vendor| vendor.contains("Google"))
            .map(|_| "gce".to_string()))
    }

    fn what_vm(&self, options: &ResolveOptions) -> Result<Option<String>, ResolverError> {
        let output = self.sources.executor.execute(VIRT_WHAT_COMMAND, options.timeout)?;
        match parse_virt_what(&output) {
            Some(vm) if vm == "linux_vserver" => Ok(self.vserver_vm()),
            vm => Ok(vm),
        }
    }

    fn vserver_vm(&self) -> Option<String> {
        let status = self.read("self/status")?;
        status.lines().find_map(|line| {
            let value = line
                .strip_prefix("s_context:")
                .or_else(|| line.strip_prefix("VxID:"))?;
            Some(if value.trim() == "0" { "vserver_host" } else { "vserver" }.to_string())
        })
    }

    fn vmware_vm(&self, options: &ResolveOptions) -> Result<Option<String>, ResolverError> {
        let vm = self.vmware.resolve(vmware::VM, options)?;
        Ok(vm.as_ref().and_then(FactValue::as_str).map(str::to_string))
    }

    fn openvz_vm(&self) -> Option<String> {
        if !self.exists("vz/veinfo") {
            return None;
        }
        Some(if self.exists("vz/version") { "openvzhn" } else { "openvzve" }.to_string())
    }

    fn xen_vm(&self) -> Option<String> {
        if let Some(capabilities) = self.read("xen/capabilities") {
            if capabilities.contains("control_d") {
                return Some("xen0".to_string());
            }
        }
        self.exists("xen").then(|| "xenu".to_string())
    }

    fn product_name_vm(&self) -> Result<Option<String>, ResolverError> {
        let query = ManagementQuery::new(CLASS_PRODUCT, &["Name"]);
        let Some(product) = self.sources.management.return_first(&query)? else {
            debug!("query returned no results for {}", query);
            return Ok(None);
        };
        let Some(name) = product.get("Name") else {
            return Ok(None);
        };

        Ok(PRODUCT_NAMES
            .iter()
            .find(|(marker, _)| name.contains(marker))
            .map(|(_, vm)| vm.to_string()))
    }

    fn hypervisor(&self, options: &ResolveOptions) -> Result<Option<String>, ResolverError> {
        if let Some(vm) = self.cgroup_vm() {
            return Ok(Some(vm));
        }
        if let Some(vm) = self.gce_vm(options)? {
            return Ok(Some(vm));
        }
        if let Some(vm) = self.what_vm(options)? {
            return Ok(Some(vm));
        }
        if let Some(vm) = self.vserver_vm() {
            return Ok(Some(vm));
        }
        if let Some(vm) = self.vmware_vm(options)? {
            return Ok(Some(vm));
        }
        if let Some(vm) = self.openvz_vm().or_else(|| self.xen_vm()) {
            return Ok(Some(vm));
        }
        self.product_name_vm()
    }
}

/// First line of `virt-what` output that is not one of its own warnings,
/// lowercased and mapped onto our hypervisor names.
fn parse_virt_what(output: &str) -> Option<String> {
    let line = output
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with("virt-what:"))?
        .to_lowercase();

    let vm = VIRT_WHAT_NAMES
        .iter()
        .find(|(name, _)| *name == line)
        .map_or(line.as_str(), |&(_, vm)| vm);
    Some(vm.to_string())
}

impl Resolver for Virtualization {
    const NAME: &'static str = "Virtualization";

    fn compute(&self, _fact_name: &str, options: &ResolveOptions) -> Result<FactMap, ResolverError> {
        let mut facts = FactMap::new();
        let vm = self.hypervisor(options)?;

        if let Some(vm) = vm {
            debug!("detected hypervisor {}", vm);
            facts.insert(VM.to_string(), FactValue::from(vm));
        }
        Ok(facts)
    }
}
