//! # Temporal Values — UTC Dates
//!
//! Native representation of the `Date` simple type: a `chrono::DateTime<Utc>`
//! truncated to millisecond precision.
//!
//! ## Canonical Text
//!
//! Dates render as RFC 3339 in UTC with exactly three fractional digits and a
//! `Z` suffix: `YYYY-MM-DDTHH:MM:SS.mmmZ`. Parsing is lenient about the offset
//! (any RFC 3339 offset is accepted and converted to UTC) and truncates
//! sub-millisecond precision, so every canonical rendering parses back to the
//! value it came from.
//!
//! Years outside `0000..=9999` cannot be written in RFC 3339. They render
//! with an explicit sign and at least four digits (`+10000-01-01T00:00:00.000Z`,
//! `-0001-12-31T23:59:59.999Z`), and [`parse_date`] accepts that extended
//! form when it carries the `Z` suffix.

use chrono::{DateTime, NaiveDateTime, Timelike, Utc};

use crate::error::ConversionError;

const TARGET: &str = "java.util.Date";

const EXTENDED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Parse an RFC 3339 date, converting to UTC and truncating to milliseconds.
///
/// # Errors
///
/// Returns a [`ConversionError`] if the string is not valid RFC 3339.
pub fn parse_date(s: &str) -> Result<DateTime<Utc>, ConversionError> {
    let fail = |e: chrono::ParseError| ConversionError::new(TARGET, format!("{s:?}"), e.to_string());
    if let Some(extended) = s.strip_prefix(['+', '-']).and(s.strip_suffix('Z')) {
        let naive = NaiveDateTime::parse_from_str(extended, EXTENDED_FORMAT).map_err(fail)?;
        return Ok(truncate_to_millis(naive.and_utc()));
    }
    let dt = DateTime::parse_from_rfc3339(s).map_err(fail)?;
    Ok(truncate_to_millis(dt.with_timezone(&Utc)))
}

/// Render a date in canonical form (e.g., `2026-01-15T12:00:00.000Z`).
pub fn render_date(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Build a date from Unix epoch milliseconds.
pub fn date_from_epoch_millis(millis: i64) -> Result<DateTime<Utc>, ConversionError> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| ConversionError::new(TARGET, millis.to_string(), "epoch millis out of range"))
}

/// Truncate a `DateTime<Utc>` to milliseconds precision.
pub fn truncate_to_millis(dt: DateTime<Utc>) -> DateTime<Utc> {
    let millis = dt.nanosecond() / 1_000_000;
    dt.with_nanosecond(millis * 1_000_000).unwrap_or(dt)
}
