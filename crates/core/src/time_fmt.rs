// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Human-readable duration parsing and formatting.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    #[error("empty duration string")]
    Empty,
    #[error("invalid number in duration: {0}")]
    InvalidNumber(String),
    #[error("unknown duration suffix: {0}")]
    UnknownSuffix(String),
    #[error("duration out of range: {0}")]
    OutOfRange(String),
}

/// Parse a duration such as `"30s"`, `"500ms"`, `"5m"`, `"1h30m"` or `"2d"`.
///
/// A bare number is seconds. Components may be chained (`"1h30m15s"`).
pub fn parse_duration(s: &str) -> Result<Duration, DurationError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(DurationError::Empty);
    }

    let mut total = Duration::ZERO;
    let mut rest = s;
    while !rest.is_empty() {
        let digits_end = rest
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        if digits_end == 0 {
            return Err(DurationError::InvalidNumber(s.to_string()));
        }
        let num: u64 = rest[..digits_end]
            .parse()
            .map_err(|_| DurationError::InvalidNumber(s.to_string()))?;
        rest = &rest[digits_end..];

        let suffix_end = rest
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit())
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let suffix = rest[..suffix_end].trim();
        rest = &rest[suffix_end..];

        let secs_per_unit = match suffix {
            "ms" | "millis" | "millisecond" | "milliseconds" => None,
            "" | "s" | "sec" | "secs" | "second" | "seconds" => Some(1),
            "m" | "min" | "mins" | "minute" | "minutes" => Some(60),
            "h" | "hr" | "hrs" | "hour" | "hours" => Some(3600),
            "d" | "day" | "days" => Some(86400),
            other => return Err(DurationError::UnknownSuffix(other.to_string())),
        };
        let part = match secs_per_unit {
            None => Some(Duration::from_millis(num)),
            Some(unit) => num.checked_mul(unit).map(Duration::from_secs),
        };
        total = part
            .and_then(|part| total.checked_add(part))
            .ok_or_else(|| DurationError::OutOfRange(s.to_string()))?;
    }

    Ok(total)
}

/// Format seconds as a short human-readable duration: `"5s"`, `"2m"`, `"1h30m"`, `"3d"`.
///
/// For the hours range, minutes are included when non-zero (e.g. `"1h"` vs `"1h5m"`).
pub fn format_elapsed(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else if secs < 86400 {
        let h = secs / 3600;
        let m = (secs % 3600) / 60;
        if m > 0 {
            format!("{}h{}m", h, m)
        } else {
            format!("{}h", h)
        }
    } else {
        format!("{}d", secs / 86400)
    }
}

/// Format a run duration for logs: milliseconds below one second, then
/// [`format_elapsed`].
pub fn format_duration(d: Duration) -> String {
    if d < Duration::from_secs(1) {
        format!("{}ms", d.as_millis())
    } else {
        format_elapsed(d.as_secs())
    }
}

#[cfg(test)]
#[path = "time_fmt_tests.rs"]
mod tests;
