//! One handler per subcommand, plus the shared database/gate helpers.

pub mod add;
pub mod analytics;
pub mod backup;
pub mod config;
pub mod db;
pub mod export;
pub mod init;
pub mod list;
pub mod log;
pub mod login;
pub mod report;
pub mod reset;
pub mod status;

use crate::config::Config;
use crate::core::clock::LocalClock;
use crate::core::gate::SessionGate;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

/// Open the configured database with its schema up to date.
pub fn open_db(cfg: &Config) -> AppResult<DbPool> {
    let pool = DbPool::new(&cfg.database)?;
    init_db(&pool.conn)?;
    Ok(pool)
}

pub fn clock(cfg: &Config) -> AppResult<LocalClock> {
    Ok(LocalClock::new(cfg.timezone()?))
}

/// Fail with `NotAuthorized` unless the PIN was entered today.
pub fn ensure_logged_in(cfg: &Config) -> AppResult<()> {
    let pool = open_db(cfg)?;
    SessionGate::new(&pool.conn, clock(cfg)?).require_authorized()
}
