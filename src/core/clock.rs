//! Local-day arithmetic for a fixed UTC offset, independent of the host's
//! own timezone.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalClock {
    tz: FixedOffset,
}

impl LocalClock {
    pub fn new(tz: FixedOffset) -> Self {
        Self { tz }
    }

    pub fn tz(&self) -> &FixedOffset {
        &self.tz
    }

    pub fn date_of(&self, ts: &DateTime<Utc>) -> NaiveDate {
        ts.with_timezone(&self.tz).date_naive()
    }

    pub fn today(&self) -> NaiveDate {
        self.date_of(&Utc::now())
    }

    /// `[local midnight, next local midnight)` for `date`, expressed in UTC.
    pub fn day_bounds_utc(&self, date: NaiveDate) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
        let start = self
            .tz
            .from_local_datetime(&date.and_time(NaiveTime::MIN))
            .single()
            .ok_or_else(|| AppError::InvalidDate(date.to_string()))?
            .with_timezone(&Utc);

        Ok((start, start + TimeDelta::days(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn myt() -> LocalClock {
        LocalClock::new(FixedOffset::east_opt(8 * 3600).unwrap())
    }

    #[test]
    fn day_bounds_are_shifted_by_the_offset() {
        let (start, end) = myt()
            .day_bounds_utc(NaiveDate::from_ymd_opt(2025, 3, 2).unwrap())
            .unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 3, 1, 16, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 3, 2, 16, 0, 0).unwrap());
    }

    #[test]
    fn date_of_uses_the_fixed_offset() {
        let clock = myt();
        let late = Utc.with_ymd_and_hms(2025, 12, 31, 16, 0, 0).unwrap();
        assert_eq!(clock.date_of(&late), NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    }
}
