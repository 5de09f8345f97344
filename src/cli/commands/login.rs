use super::{clock, open_db};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::gate::SessionGate;
use crate::db::log::ttlog_quiet;
use crate::errors::AppResult;
use crate::ui::messages::{info, prompt, success};

/// Unlock the counter for the current local day.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Login { pin } = cmd {
        let secret = cfg.pin()?;
        let pool = open_db(cfg)?;
        let clock = clock(cfg)?;
        let today = clock.today();
        let gate = SessionGate::new(&pool.conn, clock);

        if pin.is_none() && gate.is_authorized_today() {
            info(format!("Already unlocked for {today}."));
            return Ok(());
        }

        let candidate = match pin {
            Some(p) => p.trim().to_string(),
            None => prompt("PIN")?,
        };

        gate.login(&candidate, secret)?;

        ttlog_quiet(&pool.conn, "login", &today.to_string(), "Unlocked for the day");
        success(format!("Unlocked for {today}."));
    }

    Ok(())
}
