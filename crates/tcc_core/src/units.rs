//! Human-readable sizes and durations.
//!
//! Sizes accept SI (`KB`, `MB`, `GB`, ...) and binary (`KiB`, `MiB`, ...)
//! units. Durations accept `h`, `m`, `s`, `ms`, `us`, `ns` and friends, with
//! or without spaces between components (`1h30m`, `1h 30m`).

use crate::error::{CoreError, CoreResult};
use bytesize::ByteSize;
use std::time::Duration;

const SI_UNITS: [(&str, u64); 5] = [
    ("PB", 1_000_000_000_000_000),
    ("TB", 1_000_000_000_000),
    ("GB", 1_000_000_000),
    ("MB", 1_000_000),
    ("KB", 1_000),
];

const IEC_UNITS: [(&str, u64); 5] = [
    ("PiB", 1 << 50),
    ("TiB", 1 << 40),
    ("GiB", 1 << 30),
    ("MiB", 1 << 20),
    ("KiB", 1 << 10),
];

/// Parse a size string into a byte count
///
/// # Errors
///
/// Returns error if the string is not a valid size
pub fn parse_size(input: &str) -> CoreResult<u64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(invalid("size", input, "empty value"));
    }
    trimmed
        .parse::<ByteSize>()
        .map(|size| size.as_u64())
        .map_err(|reason| invalid("size", input, &reason))
}

/// Format a byte count with the largest unit that divides it exactly.
///
/// The output always parses back to the same count.
#[must_use]
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0B".to_string();
    }
    SI_UNITS
        .iter()
        .chain(IEC_UNITS.iter())
        .find(|(_, factor)| bytes % factor == 0)
        .map(|(unit, factor)| format!("{}{}", bytes / factor, unit))
        .unwrap_or_else(|| format!("{}B", bytes))
}

/// Parse a duration string into nanoseconds
///
/// # Errors
///
/// Returns error if the string is not a valid duration or overflows
pub fn parse_duration(input: &str) -> CoreResult<u64> {
    let duration = humantime::parse_duration(input.trim())
        .map_err(|e| invalid("duration", input, &e.to_string()))?;
    u64::try_from(duration.as_nanos()).map_err(|_| invalid("duration", input, "too large"))
}

/// Format nanoseconds as a duration string that parses back exactly
#[must_use]
pub fn format_duration(nanos: u64) -> String {
    humantime::format_duration(Duration::from_nanos(nanos)).to_string()
}

fn invalid(field: &str, input: &str, reason: &str) -> CoreError {
    CoreError::Validation {
        field: field.to_string(),
        reason: format!("`{}`: {}", input, reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    #[test]
    fn test_parse_size_si() {
        assert_eq!(parse_size("128MB").unwrap(), 128_000_000);
        assert_eq!(parse_size("1GB").unwrap(), 1_000_000_000);
        assert_eq!(parse_size("10KB").unwrap(), 10_000);
    }

    #[test]
    fn test_parse_size_binary() {
        assert_eq!(parse_size("1GiB").unwrap(), 1 << 30);
        assert_eq!(parse_size("64MiB").unwrap(), 64 << 20);
    }

    #[test]
    fn test_parse_size_invalid() {
        assert!(parse_size("").is_err());
        assert!(parse_size("lots").is_err());
        assert!(parse_size("12XB").is_err());
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(128_000_000), "128MB");
        assert_eq!(format_size(1_000_000_000), "1GB");
        assert_eq!(format_size(1 << 30), "1GiB");
        assert_eq!(format_size(1234), "1234B");
        assert_eq!(format_size(0), "0B");
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("5s").unwrap(), 5_000_000_000);
        assert_eq!(parse_duration("1h30m").unwrap(), 5_400_000_000_000);
        assert_eq!(parse_duration("250ms").unwrap(), 250_000_000);
    }

    #[test]
    fn test_parse_duration_invalid() {
        assert!(parse_duration("soon").is_err());
        assert!(parse_duration("").is_err());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(5_000_000_000), "5s");
        assert_eq!(parse_duration(&format_duration(5_400_000_000_000)).unwrap(), 5_400_000_000_000);
    }

    proptest::proptest! {
        #[test]
        fn prop_size_roundtrip(bytes in 0u64..(1u64 << 52)) {
            prop_assert_eq!(parse_size(&format_size(bytes)).unwrap(), bytes);
        }

        #[test]
        fn prop_duration_roundtrip(nanos in 0u64..(1u64 << 46)) {
            prop_assert_eq!(parse_duration(&format_duration(nanos)).unwrap(), nanos);
        }
    }
}
