//! Human-readable size strings ("103.46 MB") to byte counts.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::Error;

/// Decimal units, index = power of 1000.
const UNITS: [&str; 9] = ["B", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

static SIZE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+(?:\.\d+)?)\s*(B|KB|MB|GB|TB|PB|EB|ZB|YB)$").unwrap());

/// Parse `<number><space?><unit>` into bytes, decimal (base-1000) scaling.
pub fn parse_size(s: &str) -> Result<u64, Error> {
    let caps = SIZE_RE.captures(s.trim()).ok_or_else(|| {
        Error::Format(format!(
            "invalid size {s:?}; expected (0-9)+[.(0-9)+] (B|KB|MB|GB|TB|PB|EB|ZB|YB)"
        ))
    })?;

    let value: f64 = caps[1]
        .parse()
        .map_err(|_| Error::Format(format!("size value out of range in {s:?}")))?;
    // Regex guarantees the unit is one of UNITS.
    let index = UNITS
        .iter()
        .position(|u| *u == &caps[2])
        .ok_or_else(|| Error::Format(format!("unknown size unit in {s:?}")))?;

    Ok((value * 10f64.powi(index as i32 * 3)) as u64)
}
