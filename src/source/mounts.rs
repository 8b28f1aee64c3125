//! Mount table parsing.
//!
//! Parses `/proc/mounts` (same layout as `/etc/mtab`):
//! `device mount_point fstype options dump pass`

/// One line of the mount table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountRecord {
    pub device: String,
    pub mount_point: String,
    pub fs_type: String,
    pub options: String,
}

/// Parses mount table content. Lines with fewer than four fields are skipped.
pub fn parse_mounts(content: &str) -> Vec<MountRecord> {
    let mut mounts = Vec::new();

    for line in content.lines() {
        let mut parts = line.split_whitespace();
        let (Some(device), Some(mount_point), Some(fs_type), Some(options)) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            continue;
        };

        mounts.push(MountRecord {
            device: unescape_octal(device),
            mount_point: unescape_octal(mount_point),
            fs_type: fs_type.to_string(),
            options: options.to_string(),
        });
    }

    mounts
}

/// Decodes the `\NNN` octal escapes the kernel uses for spaces, tabs,
/// newlines and backslashes in mount fields.
fn unescape_octal(field: &str) -> String {
    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 4 <= bytes.len() && is_octal_triplet(&bytes[i + 1..i + 4]) {
            let value = (bytes[i + 1] - b'0') * 64 + (bytes[i + 2] - b'0') * 8 + (bytes[i + 3] - b'0');
            out.push(value);
            i += 4;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}

fn is_octal_triplet(digits: &[u8]) -> bool {
    digits.len() == 3 && digits[0] <= b'3' && digits.iter().all(|d| (b'0'..=b'7').contains(d))
}
