use super::{clock, open_db};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::store::EventStore;
use crate::db::log::ttlog_quiet;
use crate::errors::AppResult;
use crate::ui::messages::{confirm, info, success};

/// Delete today's counter and today's kicks.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Reset { yes } = cmd {
        let mut pool = open_db(cfg)?;
        let clock = clock(cfg)?;
        let today = clock.today();

        if !*yes && !confirm(format!("Delete every kick logged on {today}?"))? {
            info("Reset cancelled.");
            return Ok(());
        }

        let deleted = EventStore::new(&mut pool, clock).reset_today()?;

        ttlog_quiet(
            &pool.conn,
            "reset",
            &today.to_string(),
            &format!("Deleted {deleted} kicks"),
        );
        success(format!("Count reset for {today} ({deleted} kicks deleted)."));
    }

    Ok(())
}
