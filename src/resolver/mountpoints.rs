//! Mounted filesystems with device resolution and usage statistics.

use std::collections::BTreeMap;

use tracing::debug;

use crate::facts::{FactMap, FactValue};
use crate::fmt::{bytes_to_human_readable, compute_capacity};
use crate::resolver::{ResolveOptions, Resolver, ResolverError};
use crate::source::Sources;
use crate::source::mounts::{MountRecord, parse_mounts};

/// Fact: list of mount records.
pub const MOUNTPOINTS: &str = "mountpoints";

/// Generic device name some kernels report for the root filesystem.
const ROOT_PLACEHOLDER: &str = "/dev/root";

/// Block-device enumeration used to map a persistent identifier to a path.
const BLKID_COMMAND: &str = "blkid";

pub struct Mountpoints {
    sources: Sources,
}

impl Mountpoints {
    pub fn new(sources: Sources) -> Self {
        Self { sources }
    }

    fn read_mounts(&self, options: &ResolveOptions) -> Vec<FactValue> {
        let path = self.sources.proc_file("mounts");
        let content = match self.sources.fs.read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                debug!("could not read mounts: {}", e);
                return Vec::new();
            }
        };

        parse_mounts(&content)
            .into_iter()
            .filter(|record| keep_mount(record))
            .map(|record| self.build_mount(record, options))
            .collect()
    }

    fn build_mount(&self, record: MountRecord, options: &ResolveOptions) -> FactValue {
        let device = self.compute_device(record.device, options);
        let mount_options: Vec<FactValue> = record
            .options
            .split(',')
            .map(|o| FactValue::from(o.trim()))
            .collect();

        let (size, available, used) = match self.sources.stats.stats(&record.mount_point) {
            Ok(stats) => (
                stats.bytes_total.unsigned_abs(),
                stats.bytes_available.unsigned_abs(),
                stats.bytes_used.unsigned_abs(),
            ),
            Err(e) => {
                debug!(
                    "could not get stats for mountpoint {}, got {}",
                    record.mount_point, e
                );
                (0, 0, 0)
            }
        };

        let capacity = compute_capacity(used, used.saturating_add(available));
        let mount: BTreeMap<String, FactValue> = [
            ("device", FactValue::from(device)),
            ("filesystem", FactValue::from(record.fs_type)),
            ("path", FactValue::from(record.mount_point)),
            ("options", FactValue::from(mount_options)),
            ("size_bytes", FactValue::from(size)),
            ("available_bytes", FactValue::from(available)),
            ("used_bytes", FactValue::from(used)),
            ("capacity", FactValue::from(capacity)),
            ("size", FactValue::from(bytes_to_human_readable(size))),
            ("available", FactValue::from(bytes_to_human_readable(available))),
            ("used", FactValue::from(bytes_to_human_readable(used))),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect();

        FactValue::Map(mount)
    }

    /// Replaces the root placeholder with the device named on the kernel
    /// command line; any other device is returned unchanged.
    fn compute_device(&self, device: String, options: &ResolveOptions) -> String {
        if device != ROOT_PLACEHOLDER {
            return device;
        }
        self.root_device(options).unwrap_or(device)
    }

    fn root_device(&self, options: &ResolveOptions) -> Option<String> {
        let cmdline = self.sources.fs.read_optional(&self.sources.proc_file("cmdline"))?;
        let root = root_parameter(&cmdline)?;

        if !root.contains('=') {
            return Some(root.to_string());
        }

        // root=PARTUUID=... names the partition indirectly.
        let blkid = match self.sources.executor.execute(BLKID_COMMAND, options.timeout) {
            Ok(out) => out,
            Err(e) => {
                debug!("could not run {}: {}", BLKID_COMMAND, e);
                return None;
            }
        };
        partition_path(&blkid, root)
    }
}

impl Resolver for Mountpoints {
    const NAME: &'static str = "Mountpoints";

    fn compute(&self, _fact_name: &str, options: &ResolveOptions) -> Result<FactMap, ResolverError> {
        let mut facts = FactMap::new();
        facts.insert(
            MOUNTPOINTS.to_string(),
            FactValue::List(self.read_mounts(options)),
        );
        Ok(facts)
    }
}

/// Pseudo filesystems under `/proc` and `/sys` are skipped unless they are
/// `tmpfs`; `autofs` trigger points are never real mounts.
fn keep_mount(record: &MountRecord) -> bool {
    let pseudo = record.mount_point.starts_with("/proc") || record.mount_point.starts_with("/sys");
    !(pseudo && record.fs_type != "tmpfs" || record.fs_type == "autofs")
}

/// Value of the `root=` kernel parameter.
fn root_parameter(cmdline: &str) -> Option<&str> {
    cmdline
        .split_whitespace()
        .find_map(|param| param.strip_prefix("root="))
        .filter(|root| !root.is_empty())
}

/// Finds the device path for `root` (e.g. `PARTUUID=abcd`) in `blkid` output.
///
/// Takes the first line that mentions the identifier after some prefix and
/// returns the text before its first colon.
fn partition_path(blkid: &str, root: &str) -> Option<String> {
    let id = root.rsplit('=').next().filter(|id| !id.is_empty())?;

    blkid
        .lines()
        .find_map(|line| line.rfind(id).filter(|&pos| pos > 0).map(|pos| &line[..pos]))
        .and_then(|prefix| prefix.split(':').next())
        .map(str::to_string)
}
