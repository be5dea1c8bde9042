use chrono::{DateTime, FixedOffset, NaiveDateTime, SecondsFormat};

use crate::core::errors::{FocusError, Result};

/// One `!focus` observation: who, when, and what they are focusing on.
#[derive(Debug, Clone, PartialEq)]
pub struct FocusRecord {
    pub author: String,
    pub timestamp: DateTime<FixedOffset>,
    pub message: String,
}

impl FocusRecord {
    pub fn new(
        author: impl Into<String>,
        message: impl Into<String>,
        timestamp: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            author: author.into(),
            timestamp,
            message: message.into(),
        }
    }
}

/// Render a timestamp as RFC 3339, keeping its offset.
///
/// Fractional seconds are only written when present.
pub fn format_timestamp(ts: &DateTime<FixedOffset>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

/// Parse a stored or user-supplied timestamp.
///
/// Offset-aware ISO 8601 is preferred; a naive `YYYY-MM-DDTHH:MM:SS[.f]`
/// (or with a space separator) is read as UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>> {
    let trimmed = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ts);
    }
    if let Ok(ts) = DateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Ok(ts);
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|naive| naive.and_utc().fixed_offset())
        .ok_or_else(|| FocusError::MalformedTimestamp {
            value: value.to_string(),
            detail: "not an ISO 8601 date-time".into(),
        })
}
