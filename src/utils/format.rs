// ============================================================================
// FORMATTING HELPERS
// ============================================================================

/// Format bytes into human-readable size string
#[inline]
pub fn format_bytes(bytes: u64) -> String {
    match bytes {
        b if b < 1024 => format!("{} B", b),
        b if b < 1024 * 1024 => format!("{:.1} KB", b as f64 / 1024.0),
        b => format!("{:.1} MB", b as f64 / (1024.0 * 1024.0)),
    }
}

/// Format a millisecond uptime as "2d 5h 11m 8s".
///
/// Leading components are omitted while zero; the seconds component is
/// always present, so zero input yields "0s".
pub fn format_uptime(ms: u64) -> String {
    let mut s = ms / 1000;
    let d = s / 86400;
    s %= 86400;
    let h = s / 3600;
    s %= 3600;
    let m = s / 60;
    s %= 60;

    let mut parts = Vec::new();
    if d > 0 {
        parts.push(format!("{}d", d));
    }
    if h > 0 {
        parts.push(format!("{}h", h));
    }
    if m > 0 {
        parts.push(format!("{}m", m));
    }
    parts.push(format!("{}s", s));
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes_thresholds() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(500), "500 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1024), "1.0 KB");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(1024 * 1024), "1.0 MB");
        assert_eq!(format_bytes(2 * 1024 * 1024), "2.0 MB");
    }

    #[test]
    fn test_format_bytes_one_decimal() {
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(115_000), "112.3 KB");
    }

    #[test]
    fn test_format_uptime_zero() {
        assert_eq!(format_uptime(0), "0s");
    }

    #[test]
    fn test_format_uptime_components() {
        assert_eq!(format_uptime(90_000), "1m 30s");
        assert_eq!(format_uptime(3_600_000), "1h 0s");
        assert_eq!(format_uptime(3_661_000), "1h 1m 1s");
        assert_eq!(format_uptime(90_061_000), "1d 1h 1m 1s");
    }

    #[test]
    fn test_format_uptime_floors_subsecond() {
        assert_eq!(format_uptime(999), "0s");
        assert_eq!(format_uptime(61_900), "1m 1s");
    }
}
