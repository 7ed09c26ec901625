//! Shared formatting helpers

const NS_PER_US: f64 = 1_000.0;
const NS_PER_MS: f64 = 1_000_000.0;
const NS_PER_S: f64 = 1_000_000_000.0;
const KB: f64 = 1024.0;
const MB: f64 = 1024.0 * 1024.0;

/// Format a duration given in nanoseconds (`ns`, `μs`, `ms`, `s`)
#[must_use]
pub fn format_time(nanoseconds: f64) -> String {
    if nanoseconds < NS_PER_US {
        format!("{:.2} ns", nanoseconds)
    } else if nanoseconds < NS_PER_MS {
        format!("{:.2} μs", nanoseconds / NS_PER_US)
    } else if nanoseconds < NS_PER_S {
        format!("{:.2} ms", nanoseconds / NS_PER_MS)
    } else {
        format!("{:.2} s", nanoseconds / NS_PER_S)
    }
}

/// Format a byte count (`B`, `KB`, `MB`)
#[must_use]
pub fn format_memory(bytes: f64) -> String {
    if bytes == 0.0 {
        "0 B".to_string()
    } else if bytes < KB {
        format!("{:.0} B", bytes)
    } else if bytes < MB {
        format!("{:.2} KB", bytes / KB)
    } else {
        format!("{:.2} MB", bytes / MB)
    }
}

/// Format with thousands separators and a fixed number of decimals
#[must_use]
pub fn format_grouped(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let fixed = format!("{:.*}", decimals, value.abs());
    let (integer, fraction) = match fixed.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(fixed.len() + integer.len() / 3 + 1);
    let negative = value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0');
    if negative {
        grouped.push('-');
    }
    for (idx, digit) in integer.chars().enumerate() {
        if idx > 0 && (integer.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

/// Format a whole number with thousands separators
#[inline]
#[must_use]
pub fn format_thousands(value: f64) -> String {
    format_grouped(value, 0)
}
