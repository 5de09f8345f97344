use crate::errors::{AppError, AppResult};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

pub type EventId = i64;

/// Canonical on-disk format: fixed width, so lexical order is time order.
const KICK_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// A single logged kick ⇔ one `kick_events` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KickEvent {
    pub id: EventId,
    pub timestamp: DateTime<Utc>, // ⇔ kick_events.kick_time (TEXT, UTC)
}

impl KickEvent {
    pub fn new(id: EventId, timestamp: DateTime<Utc>) -> Self {
        Self { id, timestamp }
    }

    /// The instant seen in the configured fixed offset.
    pub fn local(&self, tz: &FixedOffset) -> DateTime<FixedOffset> {
        self.timestamp.with_timezone(tz)
    }

    /// Calendar date after timezone conversion.
    pub fn local_date(&self, tz: &FixedOffset) -> NaiveDate {
        self.local(tz).date_naive()
    }
}

pub fn format_kick_time(ts: &DateTime<Utc>) -> String {
    ts.format(KICK_TIME_FORMAT).to_string()
}

/// Accepts the canonical format, any RFC 3339 value, and naive timestamps
/// (taken as UTC).
pub fn parse_kick_time(raw: &str) -> AppResult<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(naive.and_utc());
        }
    }

    Err(AppError::InvalidTimestamp(raw.to_string()))
}
