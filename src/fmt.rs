//! Shared formatting helpers for derived fact values.

/// Binary unit suffixes above plain bytes.
const UNITS: [&str; 6] = ["KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

/// Format byte count as human-readable size.
///
/// `"512 bytes"`, `"50.00 KiB"`, `"10.50 GiB"`
pub fn bytes_to_human_readable(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{} bytes", bytes);
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    // Compare the value as printed, so 1023.999 KiB becomes 1.00 MiB.
    while (value * 100.0).round() / 100.0 >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, UNITS[unit])
}

/// Format the used share of a filesystem as a percentage.
///
/// `"0%"` when `total` is zero, `"100%"` when full, otherwise two decimals.
pub fn compute_capacity(used: u64, total: u64) -> String {
    if total == 0 {
        "0%".to_string()
    } else if used == total {
        "100%".to_string()
    } else if used > 0 {
        format!("{:.2}%", 100.0 * used as f64 / total as f64)
    } else {
        "0%".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_to_human_readable() {
        assert_eq!(bytes_to_human_readable(0), "0 bytes");
        assert_eq!(bytes_to_human_readable(1023), "1023 bytes");
        assert_eq!(bytes_to_human_readable(1024), "1.00 KiB");
        assert_eq!(bytes_to_human_readable(1536 * 1024), "1.50 MiB");
        assert_eq!(bytes_to_human_readable(11_274_289_152), "10.50 GiB");
        assert_eq!(bytes_to_human_readable(u64::MAX), "16.00 EiB");
    }

    #[test]
    fn test_bytes_just_below_unit_boundary() {
        assert_eq!(bytes_to_human_readable(1024 * 1024 - 1), "1.00 MiB");
        assert_eq!(bytes_to_human_readable(1024 * 1024 * 1024 - 1), "1.00 GiB");
        assert_eq!(bytes_to_human_readable(1024 * 1024 - 6 * 1024), "1018.00 KiB");
    }

    #[test]
    fn test_compute_capacity() {
        assert_eq!(compute_capacity(0, 0), "0%");
        assert_eq!(compute_capacity(0, 100), "0%");
        assert_eq!(compute_capacity(100, 100), "100%");
        assert_eq!(compute_capacity(42, 100), "42.00%");
        assert_eq!(compute_capacity(1, 3), "33.33%");
    }
}
