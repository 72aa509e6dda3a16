use anyhow::Result;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

/// Handles parsing timestamps from the various formats used in Claude Code
/// log files. History entries carry epoch milliseconds, transcripts carry
/// RFC 3339 strings, older files sometimes carry naive datetimes.
pub struct TimestampParser;

impl TimestampParser {
    /// Parse a timestamp string into a DateTime<Utc>
    /// Handles both Z suffix and timezone info formats
    pub fn parse(timestamp_str: &str) -> Result<DateTime<Utc>> {
        // Handle both Z suffix and timezone info
        let timestamp = if timestamp_str.ends_with('Z') {
            timestamp_str.replace('Z', "+00:00")
        } else {
            timestamp_str.to_string()
        };

        // Try parsing as ISO 8601
        if let Ok(dt) = DateTime::parse_from_rfc3339(&timestamp) {
            return Ok(dt.with_timezone(&Utc));
        }

        // Try parsing as naive datetime and assume UTC
        if let Ok(naive) = NaiveDateTime::parse_from_str(&timestamp, "%Y-%m-%dT%H:%M:%S%.f") {
            return Ok(DateTime::from_naive_utc_and_offset(naive, Utc));
        }

        anyhow::bail!("Failed to parse timestamp: {}", timestamp_str)
    }

    /// Convert an epoch-milliseconds value (history.jsonl format) to UTC.
    pub fn from_epoch_millis(millis: i64) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(millis).single()
    }
}
