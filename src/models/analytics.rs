use chrono::NaiveDate;
use serde::Serialize;

/// Mean gap between consecutive kicks on one local date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalPoint {
    pub date: NaiveDate,
    pub avg_hours: f64,
}

/// One kick placed on the time-of-day axis (`hour + minute / 60`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourPoint {
    pub date: NaiveDate,
    pub hour: f64,
}

/// Time-of-day points split into two display series.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Histogram {
    pub historical: Vec<HourPoint>,
    pub today: Vec<HourPoint>,
}

impl Histogram {
    pub fn is_empty(&self) -> bool {
        self.historical.is_empty() && self.today.is_empty()
    }
}
