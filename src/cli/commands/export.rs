use super::{clock, open_db};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::store::EventStore;
use crate::db::log::ttlog_quiet;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::utils::path::resolve_output;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        range,
        force,
    } = cmd
    {
        let path = resolve_output(file);
        let mut pool = open_db(cfg)?;
        let clock = clock(cfg)?;

        let store = EventStore::new(&mut pool, clock);
        let exported = ExportLogic::export(
            &store,
            *format,
            &path.to_string_lossy(),
            range.as_deref(),
            *force,
        )?;

        if exported > 0 {
            ttlog_quiet(
                &pool.conn,
                "export",
                &path.to_string_lossy(),
                &format!("{exported} kicks as {}", format.as_str()),
            );
        }
    }
    Ok(())
}
