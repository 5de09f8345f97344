use crate::db::queries::load_log;
use crate::errors::AppResult;
use crate::ui::messages::info;
use ansi_term::Colour;
use regex::Regex;
use rusqlite::Connection;
use std::sync::LazyLock;

/// Visible width of the `operation (target)` column.
const OP_COLUMN_MAX: usize = 60;

static ANSI_ESCAPE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\x1B\[[0-9;]*[mK]").ok());

fn strip_ansi(s: &str) -> String {
    match ANSI_ESCAPE.as_ref() {
        Some(re) => re.replace_all(s, "").into_owned(),
        None => s.to_string(),
    }
}

/// ANSI colour for an audit operation
fn color_for_operation(op: &str) -> Colour {
    match op {
        "add" => Colour::Green,
        "reset" => Colour::Red,
        "login" => Colour::Cyan,
        "report" => Colour::Yellow,
        "reconcile" => Colour::Yellow,
        "migration_applied" => Colour::Purple,
        "backup" | "export" => Colour::Blue,
        "init" => Colour::RGB(255, 153, 51), // orange
        _ => Colour::White,
    }
}

/// `operation (target)` cut to the column width, with only the operation
/// word coloured.
fn op_cell(operation: &str, target: &str) -> String {
    let plain = if target.is_empty() {
        operation.to_string()
    } else {
        format!("{operation} ({target})")
    };

    let visible = if plain.chars().count() > OP_COLUMN_MAX {
        let mut s: String = plain.chars().take(OP_COLUMN_MAX - 3).collect();
        s.push_str("...");
        s
    } else {
        plain
    };

    let color = color_for_operation(operation);
    match visible.split_once(' ') {
        Some((op_word, rest)) => format!("{} {}", color.paint(op_word), rest),
        None => color.paint(visible.as_str()).to_string(),
    }
}

pub struct LogLogic;

impl LogLogic {
    /// Print the audit trail, oldest first. Returns the number of rows.
    pub fn print_log(conn: &Connection) -> AppResult<usize> {
        let entries: Vec<(i64, String, String, String)> = load_log(conn)?
            .into_iter()
            .map(|(id, raw_date, operation, target, message)| {
                let date = chrono::DateTime::parse_from_rfc3339(&raw_date)
                    .map(|dt| dt.format("%FT%T%:z").to_string())
                    .unwrap_or(raw_date);
                (id, date, op_cell(&operation, &target), message)
            })
            .collect();

        if entries.is_empty() {
            info("Internal log is empty.");
            return Ok(0);
        }

        let id_w = entries
            .iter()
            .map(|(id, ..)| id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = entries.iter().map(|(_, d, ..)| d.len()).max().unwrap_or(0);
        // padding is computed on the visible text, without escapes
        let op_w = entries
            .iter()
            .map(|(_, _, op, _)| strip_ansi(op).chars().count())
            .max()
            .unwrap_or(0);

        println!("📜 Internal log:\n");

        for (id, date, op, message) in &entries {
            let padding = " ".repeat(op_w.saturating_sub(strip_ansi(op).chars().count()));
            println!("{id:>id_w$}: {date:<date_w$} | {op}{padding} => {message}");
        }

        Ok(entries.len())
    }
}
