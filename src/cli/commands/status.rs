use super::{clock, open_db};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::gate::SessionGate;
use crate::core::store::EventStore;
use crate::errors::AppResult;
use crate::ui::messages::{counter, header, info, warning};

/// Today's date, lock state and, once unlocked, the running count.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Status = cmd {
        let mut pool = open_db(cfg)?;
        let clock = clock(cfg)?;
        let today = clock.today();

        header(format!("Kick counter: {today}"));

        if !SessionGate::new(&pool.conn, clock).is_authorized_today() {
            warning("Locked. Run `rkickcounter login` to unlock today.");
            return Ok(());
        }

        let store = EventStore::new(&mut pool, clock);
        counter("kicks today", store.get_today_count());

        if let Some(last) = store.list_events_on(today)?.last() {
            info(format!("Last kick at {}", last.local(clock.tz()).format("%H:%M")));
        }
    }

    Ok(())
}
