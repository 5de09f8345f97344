use chrono::NaiveDate;
use serde::Serialize;

/// Per-date aggregate ⇔ one `kicks` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate, // ⇔ kicks.kick_date (TEXT "YYYY-MM-DD", local)
    pub count: i64,
}

/// A date whose stored count disagrees with its events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountDrift {
    pub date: NaiveDate,
    pub stored: i64,
    pub actual: i64,
}
