//! Parsers for size specs, time specs and comma lists.
//!
//! - Sizes: decimal number with optional K/M/G/T suffix, base 1024 ("1.5M", "10k").
//! - Times: `YYYY-MM-DD` (local midnight) or `<int>[d|h|m|s]` relative to now.

use chrono::{Local, NaiveDate, TimeZone};
use std::time::{Duration, SystemTime};

use crate::errors::MnfError;

/// Parse a size spec into bytes. Negative values clamp to zero.
pub fn parse_size(s: &str) -> Result<u64, MnfError> {
    let t = s.trim();
    let invalid = || MnfError::InvalidSize(s.to_string());
    if t.is_empty() {
        return Err(invalid());
    }

    let (num, mult) = match t.chars().last() {
        Some(c) if c.is_ascii_alphabetic() => {
            let mult: f64 = match c.to_ascii_uppercase() {
                'K' => 1024.0,
                'M' => 1024.0 * 1024.0,
                'G' => 1024.0 * 1024.0 * 1024.0,
                'T' => 1024.0 * 1024.0 * 1024.0 * 1024.0,
                _ => return Err(invalid()),
            };
            (&t[..t.len() - 1], mult)
        }
        _ => (t, 1.0),
    };

    let val: f64 = num.trim().parse().map_err(|_| invalid())?;
    if !val.is_finite() {
        return Err(invalid());
    }
    Ok((val.max(0.0) * mult) as u64)
}

/// Parse a time spec relative to `now`.
pub fn parse_time_spec_at(s: &str, now: SystemTime) -> Result<SystemTime, MnfError> {
    let t = s.trim();
    let invalid = || MnfError::InvalidTimeSpec(s.to_string());

    if t.len() == 10 && t.as_bytes()[4] == b'-' && t.as_bytes()[7] == b'-' {
        let date = NaiveDate::parse_from_str(t, "%Y-%m-%d").map_err(|_| invalid())?;
        let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(invalid)?;
        let local = Local
            .from_local_datetime(&midnight)
            .earliest()
            .ok_or_else(invalid)?;
        return Ok(SystemTime::from(local));
    }

    let (digits, unit) = match t.chars().last() {
        Some(c) if c.is_ascii_alphabetic() => (&t[..t.len() - 1], c.to_ascii_lowercase()),
        _ => (t, 's'),
    };
    let amount: i64 = digits.parse().map_err(|_| invalid())?;
    let per_unit: i64 = match unit {
        'd' => 24 * 3600,
        'h' => 3600,
        'm' => 60,
        's' => 1,
        _ => return Err(invalid()),
    };
    let secs = amount.checked_mul(per_unit).ok_or_else(invalid)?;
    let offset = Duration::from_secs(secs.unsigned_abs());
    let at = if secs >= 0 {
        now.checked_sub(offset)
    } else {
        now.checked_add(offset)
    };
    at.ok_or_else(invalid)
}

/// Parse a time spec relative to the current instant.
pub fn parse_time_spec(s: &str) -> Result<SystemTime, MnfError> {
    parse_time_spec_at(s, SystemTime::now())
}

/// Flatten possibly repeated comma lists, trimming items and dropping empties.
pub fn split_list<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    items
        .iter()
        .flat_map(|item| item.as_ref().split(','))
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}
