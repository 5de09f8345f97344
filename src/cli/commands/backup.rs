use super::open_db;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::backup::BackupLogic;
use crate::errors::AppResult;
use crate::utils::path::resolve_output;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Backup {
        file,
        compress,
        force,
    } = cmd
    {
        let pool = open_db(cfg)?;
        let dest = resolve_output(file);
        BackupLogic::backup(
            &pool,
            &cfg.database,
            &dest.to_string_lossy(),
            *compress,
            *force,
        )?;
    }

    Ok(())
}
