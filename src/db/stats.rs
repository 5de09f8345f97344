use crate::core::clock::LocalClock;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, RESET, YELLOW, colorize_optional};
use chrono::NaiveDate;
use std::fs;

/// Summary numbers shown by `db --info`.
#[derive(Debug, Clone, PartialEq)]
pub struct DbStats {
    pub total_events: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    /// Events per calendar day over the whole span, both ends included.
    pub avg_per_day: Option<f64>,
}

pub fn collect(pool: &DbPool, clock: &LocalClock) -> AppResult<DbStats> {
    let events = queries::load_events(&pool.conn)?;
    let first_date = events.first().map(|e| e.local_date(clock.tz()));
    let last_date = events.last().map(|e| e.local_date(clock.tz()));

    let avg_per_day = match (first_date, last_date) {
        (Some(f), Some(l)) => {
            let days = (l - f).num_days() + 1;
            Some(events.len() as f64 / days as f64)
        }
        _ => None,
    };

    Ok(DbStats {
        total_events: events.len(),
        first_date,
        last_date,
        avg_per_day,
    })
}

pub fn print_db_info(pool: &DbPool, db_path: &str, clock: &LocalClock) -> AppResult<()> {
    let stats = collect(pool, clock)?;
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_kb = (file_size as f64) / 1024.0;

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.1} KB", CYAN, RESET, file_kb);

    //
    // 2) TOTAL EVENTS
    //
    println!(
        "{}• Total kicks:{} {}{}{}",
        CYAN, RESET, GREEN, stats.total_events, RESET
    );

    //
    // 3) DATE RANGE
    //
    let fmt = |d: Option<NaiveDate>| colorize_optional(&d.map(|d| d.to_string()).unwrap_or_default());
    println!("{}• Date range:{}", CYAN, RESET);
    println!("    from: {}", fmt(stats.first_date));
    println!("    to:   {}", fmt(stats.last_date));

    //
    // 4) AVERAGE EVENTS/DAY
    //
    if let Some(avg) = stats.avg_per_day {
        println!("{}• Average kicks/day:{} {:.2}", CYAN, RESET, avg);
    }

    println!();
    Ok(())
}
