use super::{clock, open_db};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::store::EventStore;
use crate::errors::{AppError, AppResult};
use crate::export::EventExport;
use crate::export::range::parse_range;
use crate::models::event::KickEvent;
use crate::ui::messages::{info, warning};
use crate::utils::table::Table;
use chrono::{FixedOffset, NaiveDate};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List { today, range, json } = cmd {
        let mut pool = open_db(cfg)?;
        let clock = clock(cfg)?;
        let store = EventStore::new(&mut pool, clock);

        let events = if *today {
            store.list_events_on(clock.today())?
        } else if let Some(r) = range {
            let (from, to) = parse_range(r)?;
            store.list_events_in(from, to)?
        } else {
            store.list_events()?
        };

        if *json {
            let rows: Vec<EventExport> = events
                .iter()
                .map(|e| EventExport::from_event(e, clock.tz()))
                .collect();
            let out = serde_json::to_string_pretty(&rows)
                .map_err(|e| AppError::Export(format!("JSON serialization error: {e}")))?;
            println!("{out}");
            return Ok(());
        }

        if events.is_empty() {
            warning("No kicks found.");
            return Ok(());
        }

        let (table, days) = build_table(&events, clock.tz());
        print!("{}", table.render());
        info(format!("{} kicks over {} day(s)", events.len(), days));
    }
    Ok(())
}

/// One row per kick; the ordinal restarts on every local date.
fn build_table(events: &[KickEvent], tz: &FixedOffset) -> (Table, usize) {
    let mut table = Table::with_headers(&["ID", "Date", "#", "Time"]);
    let mut current: Option<NaiveDate> = None;
    let mut ordinal = 0;
    let mut days = 0;

    for ev in events {
        let local = ev.local(tz);
        let date = local.date_naive();
        if current != Some(date) {
            current = Some(date);
            ordinal = 0;
            days += 1;
        }
        ordinal += 1;

        table.add_row(vec![
            ev.id.to_string(),
            date.to_string(),
            ordinal.to_string(),
            local.format("%H:%M:%S").to_string(),
        ]);
    }

    (table, days)
}
