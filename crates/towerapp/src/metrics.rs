//! Formatting rules for run metrics.
//!
//! Each metric key maps to a value formatter and a column padding. The table is built
//! once and never changes; unknown keys fall back to plain number formatting.

use once_cell::sync::Lazy;
use std::collections::HashMap;

pub type Formatter = fn(f64) -> String;

#[derive(Clone, Copy)]
pub struct MetricFormat {
    pub formatter: Formatter,
    pub padding: usize,
}

/// Keys in the order metric tables show them.
pub const METRIC_KEYS: [&str; 9] = [
    "cpuRaw",
    "cpuUsage",
    "memRaw",
    "memVirtual",
    "memUsage",
    "timeRaw",
    "timeUsage",
    "readsRaw",
    "writesRaw",
];

static STANDARD: Lazy<MetricFormatMapper> = Lazy::new(|| {
    let percent = MetricFormat {
        formatter: percentage,
        padding: 8,
    };
    let bytes = MetricFormat {
        formatter: humanize_bytes,
        padding: 10,
    };
    let time = MetricFormat {
        formatter: duration,
        padding: 12,
    };
    let formats = HashMap::from([
        ("cpuRaw", percent),
        ("cpuUsage", percent),
        ("memRaw", bytes),
        ("memVirtual", bytes),
        ("memUsage", percent),
        ("timeRaw", time),
        ("timeUsage", percent),
        ("readsRaw", bytes),
        ("writesRaw", bytes),
    ]);
    MetricFormatMapper { formats }
});

pub struct MetricFormatMapper {
    formats: HashMap<&'static str, MetricFormat>,
}

impl MetricFormatMapper {
    pub fn standard() -> &'static MetricFormatMapper {
        &STANDARD
    }

    pub fn get_format_transformer(&self, key: &str) -> Option<Formatter> {
        self.formats.get(key).map(|f| f.formatter)
    }

    pub fn get_padding(&self, key: &str) -> Option<usize> {
        self.formats.get(key).map(|f| f.padding)
    }

    /// Formats `value` with the key's formatter, or as a plain number.
    pub fn format(&self, key: &str, value: f64) -> String {
        match self.get_format_transformer(key) {
            Some(transform) => transform(value),
            None => plain(value),
        }
    }

    /// Formatted and left-padded to the key's column width.
    pub fn format_padded(&self, key: &str, value: f64) -> String {
        let text = self.format(key, value);
        match self.get_padding(key) {
            Some(width) => format!("{:>width$}", text, width = width),
            None => text,
        }
    }
}

pub fn plain(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

pub fn percentage(value: f64) -> String {
    format!("{:.1}%", value)
}

pub fn humanize_bytes(value: f64) -> String {
    const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];
    let mut size = value.max(0.0);
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", size as u64)
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

/// Milliseconds as `1d 2h 3m 4s`, omitting zero components.
pub fn duration(millis: f64) -> String {
    let millis = millis.max(0.0) as u64;
    if millis < 1000 {
        return format!("{}ms", millis);
    }
    let total = millis / 1000;
    let parts = [
        (total / 86_400, "d"),
        ((total % 86_400) / 3600, "h"),
        ((total % 3600) / 60, "m"),
        (total % 60, "s"),
    ];
    parts
        .iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, unit)| format!("{}{}", n, unit))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paddings() {
        let m = MetricFormatMapper::standard();
        assert_eq!(m.get_padding("cpuRaw"), Some(8));
        assert_eq!(m.get_padding("memVirtual"), Some(10));
        assert_eq!(m.get_padding("timeRaw"), Some(12));
        assert_eq!(m.get_padding("unknownKey"), None);
    }

    #[test]
    fn test_every_key_is_mapped() {
        let m = MetricFormatMapper::standard();
        for key in METRIC_KEYS {
            assert!(m.get_format_transformer(key).is_some(), "{key}");
        }
    }

    #[test]
    fn test_unknown_key_falls_back_to_plain() {
        let m = MetricFormatMapper::standard();
        assert!(m.get_format_transformer("unknownKey").is_none());
        assert_eq!(m.format("unknownKey", 3.0), "3");
        assert_eq!(m.format("unknownKey", 1.23456), "1.23");
    }

    #[test]
    fn test_bytes() {
        assert_eq!(humanize_bytes(512.0), "512 B");
        assert_eq!(humanize_bytes(1536.0), "1.5 KB");
        assert_eq!(humanize_bytes(1_073_741_824.0), "1.0 GB");
    }

    #[test]
    fn test_duration() {
        assert_eq!(duration(3_723_000.0), "1h 2m 3s");
        assert_eq!(duration(60_000.0), "1m");
        assert_eq!(duration(90_061_000.0), "1d 1h 1m 1s");
        assert_eq!(duration(250.0), "250ms");
    }

    #[test]
    fn test_percentage_padded() {
        let m = MetricFormatMapper::standard();
        assert_eq!(m.format_padded("cpuUsage", 47.5), "   47.5%");
    }
}
