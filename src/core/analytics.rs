//! Analytics over raw kick timestamps. Pure functions: every timestamp is
//! converted to the fixed local offset before any date or hour is taken.

use crate::models::analytics::{Histogram, HourPoint, IntervalPoint};
use crate::models::event::KickEvent;
use chrono::{DateTime, FixedOffset, NaiveDate, Timelike};
use std::collections::BTreeMap;

/// Closed daylight band kept by the time-of-day view, in hours.
pub const BAND_START_HOUR: f64 = 9.0;
pub const BAND_END_HOUR: f64 = 19.0;

fn local_sorted(events: &[KickEvent], tz: &FixedOffset) -> Vec<DateTime<FixedOffset>> {
    let mut out: Vec<_> = events.iter().map(|e| e.local(tz)).collect();
    out.sort();
    out
}

/// `hour + minute / 60` of a local instant.
pub fn hour_fraction(t: &DateTime<FixedOffset>) -> f64 {
    t.hour() as f64 + t.minute() as f64 / 60.0
}

/// Today's kicks in local time, oldest first.
pub fn today_events(
    events: &[KickEvent],
    today: NaiveDate,
    tz: &FixedOffset,
) -> Vec<DateTime<FixedOffset>> {
    local_sorted(events, tz)
        .into_iter()
        .filter(|t| t.date_naive() == today)
        .collect()
}

/// Mean gap in hours between consecutive kicks, per local date, for dates
/// `lookback_days` or fewer days before `today`. Dates with fewer than two
/// kicks have no interval and are left out.
pub fn average_intervals(
    events: &[KickEvent],
    today: NaiveDate,
    lookback_days: u32,
    tz: &FixedOffset,
) -> Vec<IntervalPoint> {
    let mut by_date: BTreeMap<NaiveDate, Vec<DateTime<FixedOffset>>> = BTreeMap::new();
    for t in local_sorted(events, tz) {
        let age = (today - t.date_naive()).num_days();
        if (0..=i64::from(lookback_days)).contains(&age) {
            by_date.entry(t.date_naive()).or_default().push(t);
        }
    }

    by_date
        .into_iter()
        .filter(|(_, times)| times.len() >= 2)
        .map(|(date, times)| {
            let gaps: Vec<f64> = times
                .windows(2)
                .map(|w| (w[1] - w[0]).num_milliseconds() as f64 / 3_600_000.0)
                .collect();
            IntervalPoint {
                date,
                avg_hours: gaps.iter().sum::<f64>() / gaps.len() as f64,
            }
        })
        .collect()
}

/// Kicks inside the daylight band, split into today and every other date.
pub fn time_of_day_histogram(
    events: &[KickEvent],
    today: NaiveDate,
    tz: &FixedOffset,
) -> Histogram {
    let mut hist = Histogram::default();

    for t in local_sorted(events, tz) {
        let hour = hour_fraction(&t);
        if !(BAND_START_HOUR..=BAND_END_HOUR).contains(&hour) {
            continue;
        }
        let point = HourPoint {
            date: t.date_naive(),
            hour,
        };
        if point.date == today {
            hist.today.push(point);
        } else {
            hist.historical.push(point);
        }
    }

    hist
}

/// Everything the analytics view and the PDF report show.
#[derive(Debug, Clone)]
pub struct AnalyticsSnapshot {
    pub today: NaiveDate,
    pub lookback_days: u32,
    pub total_events: usize,
    pub today_events: Vec<DateTime<FixedOffset>>,
    pub intervals: Vec<IntervalPoint>,
    pub histogram: Histogram,
}

impl AnalyticsSnapshot {
    pub fn build(
        events: &[KickEvent],
        today: NaiveDate,
        lookback_days: u32,
        tz: &FixedOffset,
    ) -> Self {
        Self {
            today,
            lookback_days,
            total_events: events.len(),
            today_events: today_events(events, today, tz),
            intervals: average_intervals(events, today, lookback_days, tz),
            histogram: time_of_day_histogram(events, today, tz),
        }
    }
}
