//! Human-readable byte sizes and durations for test reports.

const SIZE_UNITS: [&str; 8] = ["KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

/// Kilobytes, rounded up.
#[must_use]
pub fn bytes_to_kb(bytes: u64) -> u64 {
    bytes.div_ceil(1024)
}

/// Megabytes, rounded up.
#[must_use]
pub fn bytes_to_mb(bytes: u64) -> u64 {
    bytes.div_ceil(1_048_576)
}

/// Readable size with no decimals. `si` selects powers of 1000 instead of
/// 1024; the unit labels are the same either way.
///
/// ```rust
/// use appseed::humanize::bytes_to_size;
///
/// assert_eq!(bytes_to_size(1024, false), "1 KB");
/// assert_eq!(bytes_to_size(1000, true), "1 KB");
/// assert_eq!(bytes_to_size(999, true), "999 B");
/// ```
#[must_use]
pub fn bytes_to_size(bytes: u64, si: bool) -> String {
    let thresh = if si { 1000.0 } else { 1024.0 };
    if (bytes as f64) < thresh {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    value /= thresh;
    while value >= thresh && unit < SIZE_UNITS.len() - 1 {
        value /= thresh;
        unit += 1;
    }

    // Ties round away from zero.
    format!("{} {}", value.round(), SIZE_UNITS[unit])
}

/// Readable duration such as `1h 5m` or `450ms`.
///
/// Below one second the raw milliseconds are shown. Above it, zero hour,
/// minute or second parts are omitted and seconds are rounded.
#[must_use]
pub fn humanize_ms(ms: u64) -> String {
    if ms < 1000 {
        return format!("{}ms", ms);
    }

    let hours = ms / 3_600_000;
    let minutes = (ms - hours * 3_600_000) / 60_000;
    let rest = ms - hours * 3_600_000 - minutes * 60_000;
    let seconds = (rest + 500) / 1000;

    let parts: Vec<String> = [(hours, 'h'), (minutes, 'm'), (seconds, 's')]
        .into_iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, suffix)| format!("{}{}", value, suffix))
        .collect();
    parts.join(" ")
}
