// src/export/logic.rs

use crate::core::store::EventStore;
use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::events_to_rows;
use crate::export::range::parse_range;
use crate::ui::messages::warning;
use std::path::Path;

/// High-level export of the raw kick events.
pub struct ExportLogic;

impl ExportLogic {
    /// Export kick events.
    ///
    /// - `format`: csv | json
    /// - `file`: absolute output path
    /// - `range`: `None`, `"all"` or a [`parse_range`] expression over local dates
    ///
    /// Returns the number of exported events.
    pub fn export(
        store: &EventStore<'_>,
        format: ExportFormat,
        file: &str,
        range: Option<&str>,
        force: bool,
    ) -> AppResult<usize> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "Output file path must be absolute: {file}"
            )));
        }

        let events = match range {
            None => store.list_events()?,
            Some(r) if r.eq_ignore_ascii_case("all") => store.list_events()?,
            Some(r) => {
                let (from, to) = parse_range(r)?;
                store.list_events_in(from, to)?
            }
        };

        if events.is_empty() {
            warning("No events found for selected range.");
            return Ok(0);
        }

        ensure_writable(path, force)?;

        let rows = events_to_rows(&events, store.clock().tz());
        match format {
            ExportFormat::Csv => export_csv(&rows, path)?,
            ExportFormat::Json => export_json(&rows, path)?,
        }

        Ok(rows.len())
    }
}
