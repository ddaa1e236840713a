// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! All things time-related.

pub use chrono::{DateTime, Utc};

/// Converts a Unix timestamp, in seconds, to a UTC date.
///
/// Returns `None` if the timestamp is out of range.
pub fn from_timestamp(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

/// Renders an optional Unix timestamp for log output.
///
/// Timestamps that cannot be represented as a date are printed as the raw
/// number of seconds.
///
/// # Examples
///
/// ```
/// use commentdump::clock::describe;
/// assert_eq!(describe(Some(0)), "1970-01-01T00:00:00Z");
/// assert_eq!(describe(None), "?");
/// ```
pub fn describe(secs: Option<i64>) -> String {
    match secs {
        Some(secs) => from_timestamp(secs)
            .map(|dt| dt.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
            .unwrap_or_else(|| secs.to_string()),
        None => String::from("?"),
    }
}
