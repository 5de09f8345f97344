use super::{clock, open_db};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::analytics::{AnalyticsSnapshot, BAND_END_HOUR, BAND_START_HOUR};
use crate::core::store::EventStore;
use crate::errors::AppResult;
use crate::models::analytics::HourPoint;
use crate::ui::messages::{header, info, warning};
use crate::utils::table::Table;
use crate::utils::time::format_hours;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Analytics { days } = cmd {
        let lookback = days.unwrap_or(cfg.default_lookback_days);
        let mut pool = open_db(cfg)?;
        let clock = clock(cfg)?;

        let events = EventStore::new(&mut pool, clock).list_events()?;
        let snap = AnalyticsSnapshot::build(&events, clock.today(), lookback, clock.tz());

        header(format!("Kick analytics: {} (last {lookback} days)", snap.today));
        info(format!(
            "{} kicks logged in total, {} today",
            snap.total_events,
            snap.today_events.len()
        ));

        println!("\nAverage interval between kicks:");
        if snap.intervals.is_empty() {
            warning("Not enough data: a day needs at least two kicks.");
        } else {
            let mut table = Table::with_headers(&["Date", "Avg interval"]);
            for p in &snap.intervals {
                table.add_row(vec![p.date.to_string(), format_hours(p.avg_hours)]);
            }
            print!("{}", table.render());
        }

        println!("\nKicks per hour ({BAND_START_HOUR:.0}:00-{BAND_END_HOUR:.0}:00):");
        if snap.histogram.is_empty() {
            warning("No kicks inside the daytime window yet.");
        } else {
            let historical = hourly_buckets(&snap.histogram.historical);
            let today = hourly_buckets(&snap.histogram.today);

            let mut table = Table::with_headers(&["Hour", "Earlier days", "Today"]);
            for (i, (h, t)) in historical.iter().zip(&today).enumerate() {
                let hour = BAND_START_HOUR as usize + i;
                table.add_row(vec![
                    format!("{hour:02}:00"),
                    h.to_string(),
                    t.to_string(),
                ]);
            }
            print!("{}", table.render());
        }
    }

    Ok(())
}

/// Counts per whole hour of the daytime band. The closing instant
/// (exactly 19:00) is folded into the last bucket.
fn hourly_buckets(points: &[HourPoint]) -> Vec<i64> {
    let n = (BAND_END_HOUR - BAND_START_HOUR) as usize;
    let mut out = vec![0; n];
    for p in points {
        let idx = ((p.hour - BAND_START_HOUR).floor() as usize).min(n - 1);
        out[idx] += 1;
    }
    out
}
