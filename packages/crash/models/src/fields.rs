//! Column names and numeric coercion for crash rows.
//!
//! Crash exports store every value as text. Counters are read leniently:
//! a blank cell counts as zero and anything that does not parse as a
//! number is treated as absent.

/// Crash date column; its first four characters are the record's year.
pub const DATE: &str = "DATE";
/// Ward identifier column.
pub const WARD: &str = "WARD";
/// Street address column.
pub const ADDRESS: &str = "ADDRESS";
/// Latitude column.
pub const LATITUDE: &str = "LATITUDE";
/// Longitude column.
pub const LONGITUDE: &str = "LONGITUDE";
/// Projected X coordinate (never shown in details).
pub const XCOORD: &str = "XCOORD";
/// Projected Y coordinate (never shown in details).
pub const YCOORD: &str = "YCOORD";

/// Fatality counters in driver, pedestrian, bicyclist order.
pub const FATAL: [&str; 3] = ["FATAL_DRIVER", "FATAL_PEDESTRIAN", "FATAL_BICYCLIST"];
/// Major-injury counters in driver, pedestrian, bicyclist order.
pub const MAJOR_INJURIES: [&str; 3] = [
    "MAJORINJURIES_DRIVER",
    "MAJORINJURIES_PEDESTRIAN",
    "MAJORINJURIES_BICYCLIST",
];
/// Minor-injury counters in driver, pedestrian, bicyclist order.
pub const MINOR_INJURIES: [&str; 3] = [
    "MINORINJURIES_DRIVER",
    "MINORINJURIES_PEDESTRIAN",
    "MINORINJURIES_BICYCLIST",
];
/// Pedestrians involved.
pub const TOTAL_PEDESTRIANS: &str = "TOTAL_PEDESTRIANS";
/// Bicycles involved.
pub const TOTAL_BICYCLES: &str = "TOTAL_BICYCLES";

/// Ward values that mean "no ward" (compared case-insensitively).
pub const WARD_SENTINELS: [&str; 2] = ["unknown", "null"];

/// Parses a cell as a number.
///
/// Surrounding whitespace is ignored and a blank cell is `0`. Accepts
/// signed decimals with an optional exponent, `Infinity` with an optional
/// sign, and unsigned `0x`, `0o` and `0b` integers. Decimals too large for
/// `f64` become infinite. Returns `None` for anything else.
#[must_use]
pub fn numeric_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }

    match trimmed {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    if let Some((radix, digits)) = radix_prefix(trimmed) {
        return radix_integer(digits, radix);
    }

    // `f64::from_str` also accepts "inf" and "nan" spellings.
    if !trimmed
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
    {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Splits a `0x`, `0o` or `0b` prefix off `s`.
fn radix_prefix(s: &str) -> Option<(u32, &str)> {
    let radix = match s.get(..2)? {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    Some((radix, s.get(2..)?))
}

fn radix_integer(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix)
            .map(|d| acc.mul_add(f64::from(radix), f64::from(d)))
    })
}

/// Reads an optional counter cell, treating missing and non-numeric
/// values as zero.
#[must_use]
pub fn counter(raw: Option<&str>) -> f64 {
    raw.and_then(numeric_value).unwrap_or(0.0)
}

/// Parses a coordinate cell. Blank cells and infinite values are not
/// coordinates.
#[must_use]
pub fn coordinate(raw: &str) -> Option<f64> {
    if raw.trim().is_empty() {
        return None;
    }
    numeric_value(raw).filter(|v| v.is_finite())
}

/// Whether a ward value names a real ward.
#[must_use]
pub fn is_known_ward(ward: &str) -> bool {
    !ward.is_empty()
        && !WARD_SENTINELS
            .iter()
            .any(|sentinel| ward.eq_ignore_ascii_case(sentinel))
}
