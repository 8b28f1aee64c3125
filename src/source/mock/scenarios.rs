//! Pre-built host scenarios for testing.

use super::{MockExecutor, MockFs, MockFsStats, MockManagement, MockSources};
use crate::source::ManagementObject;
use crate::source::management::{CLASS_BIOS, CLASS_PRODUCT};

const GIB: i64 = 1024 * 1024 * 1024;

impl MockSources {
    /// A physical server booting from a partition label, with `/` and
    /// `/boot` on disk.
    pub fn typical_host() -> Self {
        let mut fs = MockFs::new();
        fs.add_file(
            "/proc/filesystems",
            "\
nodev\tsysfs
nodev\tproc
nodev\ttmpfs
\text4
\tvfat
nodev\tautofs
\tfuseblk
",
        );
        fs.add_file(
            "/proc/mounts",
            "\
sysfs /sys sysfs rw,nosuid,nodev,noexec,relatime 0 0
proc /proc proc rw,nosuid,nodev,noexec,relatime 0 0
/dev/root / ext4 rw,relatime 0 0
/dev/sda1 /boot vfat rw,relatime,fmask=0022 0 0
systemd-1 /proc/sys/fs/binfmt_misc autofs rw,relatime 0 0
",
        );
        fs.add_file(
            "/proc/cmdline",
            "BOOT_IMAGE=/vmlinuz root=LABEL=rootfs ro quiet\n",
        );

        let executor = MockExecutor::new().on(
            "blkid",
            "/dev/sda1: UUID=\"4A1B-2C3D\" TYPE=\"vfat\"\n\
             /dev/sda2: LABEL=\"rootfs\" UUID=\"0d6c5f4e\" TYPE=\"ext4\"",
        );

        let stats = MockFsStats::new()
            .with("/", 100 * GIB, 60 * GIB, 40 * GIB)
            .with("/boot", GIB, GIB / 2, GIB / 2);

        let management = MockManagement::new()
            .with_object(
                CLASS_BIOS,
                ManagementObject::new()
                    .with("Manufacturer", "Dell Inc.")
                    .with("SerialNumber", "7XK2Q13"),
            )
            .with_object(
                CLASS_PRODUCT,
                ManagementObject::new().with("Name", "PowerEdge R640"),
            );

        Self::new()
            .fs(fs)
            .executor(executor)
            .stats(stats)
            .management(management)
    }

    /// A KVM guest whose proc filesystem is mounted at `/host/proc`.
    pub fn kvm_guest() -> Self {
        let mut fs = MockFs::new();
        fs.add_file("/host/proc/filesystems", "\txfs\nnodev\ttmpfs\n");
        fs.add_file("/host/proc/mounts", "/dev/vda1 / xfs rw,relatime 0 0\n");
        fs.add_file("/host/proc/1/cgroup", "0::/init.scope\n");

        let management = MockManagement::new().with_object(
            CLASS_PRODUCT,
            ManagementObject::new().with("Name", "KVM"),
        );

        Self::new()
            .fs(fs)
            .stats(MockFsStats::new().with("/", 20 * GIB, 15 * GIB, 5 * GIB))
            .management(management)
            .proc_path("/host/proc")
    }
}
