use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (skipped in test mode)
///  - the SQLite database and all pending migrations
pub fn handle(cli: &Cli) -> AppResult<()> {
    let mut cfg = Config::init_all(cli.db.clone(), cli.test)?;
    cfg.apply_env_overrides();

    info("Initializing rKickCounter…");

    let pool = DbPool::new(&cfg.database)?;
    init_db(&pool.conn)?;
    success(format!("Database initialized at {}", cfg.database));

    ttlog_quiet(&pool.conn, "init", &cfg.database, "Database initialized");

    match cfg.pin() {
        Ok(_) => {}
        Err(_) if cfg.pin_code.as_deref().is_none_or(str::is_empty) => warning(format!(
            "No PIN configured yet: set `pin_code` in {} or {}",
            Config::config_file().display(),
            crate::config::ENV_PIN_CODE
        )),
        Err(e) => warning(e),
    }
    if cfg.chat_ids().is_empty() || cfg.telegram_bot_token.is_none() {
        info("Telegram notifications are off (no bot token or chat id).");
    }

    success("rKickCounter initialization completed!");
    Ok(())
}
