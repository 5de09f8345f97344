// src/export/model.rs

use crate::models::event::{KickEvent, format_kick_time};
use chrono::FixedOffset;
use serde::Serialize;

/// Flat row written by the CSV and JSON exporters.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct EventExport {
    pub id: i64,
    /// Stored instant, canonical UTC text.
    pub kick_time: String,
    pub local_date: String,
    pub local_time: String,
}

impl EventExport {
    pub fn from_event(ev: &KickEvent, tz: &FixedOffset) -> Self {
        let local = ev.local(tz);
        Self {
            id: ev.id,
            kick_time: format_kick_time(&ev.timestamp),
            local_date: local.format("%Y-%m-%d").to_string(),
            local_time: local.format("%H:%M:%S").to_string(),
        }
    }
}

pub(crate) fn events_to_rows(events: &[KickEvent], tz: &FixedOffset) -> Vec<EventExport> {
    events
        .iter()
        .map(|e| EventExport::from_event(e, tz))
        .collect()
}
