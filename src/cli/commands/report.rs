use super::{clock, open_db};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::analytics::AnalyticsSnapshot;
use crate::core::store::EventStore;
use crate::db::log::ttlog_quiet;
use crate::errors::{AppError, AppResult};
use crate::export::ensure_writable;
use crate::report::{REPORT_MIME, ReportRenderer, write_report};
use crate::ui::messages::{info, success};
use crate::utils::path::resolve_output;
use chrono::Utc;

/// Render the PDF report over the whole history and write it to disk.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Report { file, days, force } = cmd {
        let lookback = days.unwrap_or(cfg.default_lookback_days);
        let path = resolve_output(file.as_deref().unwrap_or(&cfg.report_file));

        let mut pool = open_db(cfg)?;
        let clock = clock(cfg)?;

        let events = EventStore::new(&mut pool, clock).list_events()?;
        if events.is_empty() {
            return Err(AppError::NoData("no kicks logged yet".to_string()));
        }

        ensure_writable(&path, *force)?;

        let snapshot = AnalyticsSnapshot::build(&events, clock.today(), lookback, clock.tz());
        let generated_on = Utc::now().with_timezone(clock.tz());

        info(format!("Rendering report ({} kicks)…", events.len()));
        let bytes = ReportRenderer::new(&cfg.report_title).render_snapshot(&snapshot, &generated_on);
        write_report(&path, &bytes)?;

        ttlog_quiet(
            &pool.conn,
            "report",
            &path.to_string_lossy(),
            &format!("{} kicks, {lookback} days look-back", events.len()),
        );
        success(format!(
            "Report written: {} ({REPORT_MIME}, {} bytes)",
            path.display(),
            bytes.len()
        ));
    }

    Ok(())
}
