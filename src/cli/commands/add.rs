use super::{clock, open_db};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::store::EventStore;
use crate::db::log::ttlog_quiet;
use crate::errors::AppResult;
use crate::notify::{self, kick_message};
use crate::ui::messages::{counter, success};

/// Log one kick at the current instant and notify the configured chats.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Add = cmd {
        let mut pool = open_db(cfg)?;
        let clock = clock(cfg)?;

        let recorded = EventStore::new(&mut pool, clock).record_event()?;
        let local = recorded.at.with_timezone(clock.tz());

        ttlog_quiet(
            &pool.conn,
            "add",
            &local.date_naive().to_string(),
            &format!("Kick #{} at {}", recorded.day_total, local.format("%H:%M:%S")),
        );

        success(format!("Kick logged at {}", local.format("%H:%M")));
        counter("kicks today", recorded.day_total);

        // delivery outcome never reaches the user; wait only bounds the exit
        notify::from_config(cfg)
            .notify(&kick_message(&local, recorded.day_total))
            .wait();
    }

    Ok(())
}
