//! PDF report: title page, today's kicks, interval trend, timing pattern.

pub mod chart;
mod pdf;

use crate::core::analytics::AnalyticsSnapshot;
use crate::errors::{AppError, AppResult};
use crate::models::analytics::{HourPoint, IntervalPoint};
use chart::{Axis, BLUE, Chart, LIGHT_BLUE, ORANGE, Series, SeriesStyle};
use chrono::{DateTime, FixedOffset, NaiveDate};
use pdf::PdfManager;
use std::fs;
use std::io::Write;
use std::path::Path;

pub const REPORT_MIME: &str = "application/pdf";

/// x-axis window of the timing chart, in hours.
const TIMING_X_MIN: f64 = 8.0;
const TIMING_X_MAX: f64 = 20.0;
/// Upper bound on tick labels per axis before thinning.
const MAX_TICKS: usize = 10;

pub struct ReportRenderer {
    title: String,
}

impl Default for ReportRenderer {
    fn default() -> Self {
        Self::new("Ethan Kick Report")
    }
}

impl ReportRenderer {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
        }
    }

    /// Serialize the report. Output depends only on the arguments.
    pub fn render(
        &self,
        today_events: &[DateTime<FixedOffset>],
        intervals: &[IntervalPoint],
        historical: &[HourPoint],
        today_hist: &[HourPoint],
        generated_on: &DateTime<FixedOffset>,
    ) -> Vec<u8> {
        self.compose(today_events, intervals, historical, today_hist, generated_on)
            .finish()
    }

    fn compose(
        &self,
        today_events: &[DateTime<FixedOffset>],
        intervals: &[IntervalPoint],
        historical: &[HourPoint],
        today_hist: &[HourPoint],
        generated_on: &DateTime<FixedOffset>,
    ) -> PdfManager {
        let mut pdf = PdfManager::new();

        let generated = format!("Generated on: {}", generated_on.format("%Y-%m-%d %H:%M"));
        pdf.write_centered_page(&[
            (self.title.as_str(), 24.0, 0.7),
            (generated.as_str(), 14.0, 0.6),
            ("Tracking baby kick patterns", 12.0, 0.5),
        ]);

        if today_events.is_empty() {
            pdf.write_message_page("Kicks Today", "No kicks logged today.");
        } else {
            let rows: Vec<Vec<String>> = today_events
                .iter()
                .enumerate()
                .map(|(i, t)| vec![(i + 1).to_string(), t.format("%H:%M").to_string()])
                .collect();
            pdf.write_table("Kicks Today", &["#", "Time (HH:MM)"], &rows);
        }

        if !intervals.is_empty() {
            pdf.write_chart(&interval_chart(intervals));
        }

        pdf.write_chart(&timing_chart(historical, today_hist));

        pdf
    }

    pub fn render_snapshot(
        &self,
        snapshot: &AnalyticsSnapshot,
        generated_on: &DateTime<FixedOffset>,
    ) -> Vec<u8> {
        self.render(
            &snapshot.today_events,
            &snapshot.intervals,
            &snapshot.histogram.historical,
            &snapshot.histogram.today,
            generated_on,
        )
    }
}

/// Every `step`-th entry, so at most `MAX_TICKS` labels remain.
fn thin<T: Clone>(items: &[T]) -> Vec<T> {
    let step = items.len().div_ceil(MAX_TICKS).max(1);
    items.iter().step_by(step).cloned().collect()
}

fn interval_chart(intervals: &[IntervalPoint]) -> Chart {
    let first = intervals[0].date;
    let offset = |d: NaiveDate| (d - first).num_days() as f64;

    let x_max = offset(intervals[intervals.len() - 1].date).max(1.0);
    let x_ticks = thin(intervals)
        .into_iter()
        .map(|p| (offset(p.date), p.date.format("%m-%d").to_string()))
        .collect();

    let peak = intervals
        .iter()
        .map(|p| p.avg_hours)
        .fold(0.0_f64, f64::max);
    let y_max = (peak * 1.15).max(1.0);

    Chart {
        title: "Average Kicking Interval".to_string(),
        x: Axis::new("Date", 0.0, x_max).with_ticks(x_ticks),
        y: Axis::new("Hours per kick", 0.0, y_max).with_even_ticks(5, 1),
        series: vec![Series {
            label: "Average interval".to_string(),
            color: BLUE,
            style: SeriesStyle::LineWithMarkers,
            points: intervals
                .iter()
                .map(|p| (offset(p.date), p.avg_hours))
                .collect(),
        }],
        legend: false,
    }
}

fn timing_chart(historical: &[HourPoint], today_hist: &[HourPoint]) -> Chart {
    let mut dates: Vec<NaiveDate> = historical
        .iter()
        .chain(today_hist)
        .map(|p| p.date)
        .collect();
    dates.sort();
    dates.dedup();

    let row_of = |d: NaiveDate| dates.binary_search(&d).unwrap_or(0) as f64;
    let to_points = |pts: &[HourPoint]| -> Vec<(f64, f64)> {
        pts.iter().map(|p| (p.hour, row_of(p.date))).collect()
    };

    let y_max = (dates.len().max(1) - 1) as f64;
    let y_ticks = thin(&dates)
        .into_iter()
        .map(|d| (row_of(d), d.format("%Y-%m-%d").to_string()))
        .collect();
    let x_ticks = (0..=6)
        .map(|i| {
            let h = TIMING_X_MIN + 2.0 * i as f64;
            (h, format!("{h:.0}"))
        })
        .collect();

    let mut series = vec![Series {
        label: "Historical".to_string(),
        color: LIGHT_BLUE,
        style: SeriesStyle::Markers,
        points: to_points(historical),
    }];
    if !today_hist.is_empty() {
        series.push(Series {
            label: "Today".to_string(),
            color: ORANGE,
            style: SeriesStyle::Markers,
            points: to_points(today_hist),
        });
    }

    Chart {
        title: "Kick Timing Pattern (9am-7pm)".to_string(),
        x: Axis::new("Time of day (hr)", TIMING_X_MIN, TIMING_X_MAX).with_ticks(x_ticks),
        y: Axis::new("Date", 0.0, y_max).with_ticks(y_ticks),
        series,
        legend: true,
    }
}

/// Write the document next to its destination, then move it into place, so a
/// failed write never leaves a truncated report behind.
pub fn write_report(path: &Path, bytes: &[u8]) -> AppResult<()> {
    let partial = path.with_extension("pdf.part");
    let result = fs::File::create(&partial)
        .and_then(|mut f| {
            f.write_all(bytes)?;
            f.sync_all()
        })
        .and_then(|_| fs::rename(&partial, path));

    if let Err(e) = result {
        fs::remove_file(&partial).ok();
        return Err(AppError::ReportWrite {
            path: path.to_path_buf(),
            source: e,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::env;

    fn tz() -> FixedOffset {
        FixedOffset::east_opt(8 * 3600).unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn generated() -> DateTime<FixedOffset> {
        tz().with_ymd_and_hms(2025, 3, 10, 21, 0, 0).unwrap()
    }

    fn sample() -> (
        Vec<DateTime<FixedOffset>>,
        Vec<IntervalPoint>,
        Vec<HourPoint>,
        Vec<HourPoint>,
    ) {
        let today = vec![
            tz().with_ymd_and_hms(2025, 3, 10, 9, 15, 0).unwrap(),
            tz().with_ymd_and_hms(2025, 3, 10, 11, 40, 0).unwrap(),
        ];
        let intervals = vec![
            IntervalPoint { date: date(8), avg_hours: 2.5 },
            IntervalPoint { date: date(10), avg_hours: 2.4 },
        ];
        let historical = vec![HourPoint { date: date(8), hour: 10.5 }];
        let today_hist = vec![
            HourPoint { date: date(10), hour: 9.25 },
            HourPoint { date: date(10), hour: 11.0 + 40.0 / 60.0 },
        ];
        (today, intervals, historical, today_hist)
    }

    #[test]
    fn rendering_is_deterministic() {
        let (t, i, h, th) = sample();
        let renderer = ReportRenderer::default();

        let a = renderer.render(&t, &i, &h, &th, &generated());
        let b = renderer.render(&t, &i, &h, &th, &generated());

        assert!(a.starts_with(b"%PDF-"));
        assert_eq!(a, b);
    }

    #[test]
    fn interval_page_is_omitted_without_intervals() {
        let (t, i, h, th) = sample();
        let renderer = ReportRenderer::default();

        let full = renderer.compose(&t, &i, &h, &th, &generated());
        let short = renderer.compose(&t, &[], &h, &th, &generated());

        assert_eq!(full.page_count(), 4);
        assert_eq!(short.page_count(), 3);
    }

    #[test]
    fn empty_day_renders_placeholder_text() {
        let renderer = ReportRenderer::default();
        let bytes = renderer.render(&[], &[], &[], &[], &generated());
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("No kicks logged today."));
        assert!(text.contains("Generated on: 2025-03-10 21:00"));
    }

    #[test]
    fn timing_chart_clips_x_axis_and_rows_by_date() {
        let (_, _, h, th) = sample();
        let chart = timing_chart(&h, &th);
        assert_eq!(chart.x.min, 8.0);
        assert_eq!(chart.x.max, 20.0);
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[0].points, vec![(10.5, 0.0)]);
        assert!(chart.series[1].points.iter().all(|(_, row)| *row == 1.0));
    }

    #[test]
    fn write_failure_is_a_report_error() {
        let path = env::temp_dir()
            .join("rkickcounter_missing_dir")
            .join("nested")
            .join("report.pdf");
        let err = write_report(&path, b"%PDF-1.7").unwrap_err();
        assert!(matches!(err, AppError::ReportWrite { .. }));
        assert!(!path.with_extension("pdf.part").exists());
    }

    #[test]
    fn written_report_matches_rendered_bytes() {
        let path = env::temp_dir().join("rkickcounter_written_report.pdf");
        fs::remove_file(&path).ok();

        let bytes = ReportRenderer::default().render(&[], &[], &[], &[], &generated());
        write_report(&path, &bytes).unwrap();

        assert_eq!(fs::read(&path).unwrap(), bytes);
        fs::remove_file(&path).ok();
    }
}
