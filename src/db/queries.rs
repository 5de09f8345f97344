use crate::errors::AppError;
use crate::models::daily_count::DailyCount;
use crate::models::event::{EventId, KickEvent, format_kick_time, parse_kick_time};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

const DATE_FORMAT: &str = "%Y-%m-%d";

fn date_key(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date_column(idx: usize, raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidDate(raw.to_string())),
        )
    })
}

pub fn map_row(row: &Row) -> Result<KickEvent> {
    let raw: String = row.get("kick_time")?;
    let timestamp = parse_kick_time(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(KickEvent {
        id: row.get("id")?,
        timestamp,
    })
}

// ---------------------------
// kick_events
// ---------------------------

pub fn insert_kick_event(conn: &Connection, ts: &DateTime<Utc>) -> Result<EventId> {
    conn.execute(
        "INSERT INTO kick_events (kick_time) VALUES (?1)",
        [format_kick_time(ts)],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn load_events(conn: &Connection) -> Result<Vec<KickEvent>> {
    let mut stmt =
        conn.prepare("SELECT id, kick_time FROM kick_events ORDER BY kick_time ASC, id ASC")?;
    let rows = stmt.query_map([], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Events in the half-open UTC range `[start, end)`.
pub fn load_events_between(
    conn: &Connection,
    start: &DateTime<Utc>,
    end: &DateTime<Utc>,
) -> Result<Vec<KickEvent>> {
    let mut stmt = conn.prepare(
        "SELECT id, kick_time FROM kick_events
         WHERE kick_time >= ?1 AND kick_time < ?2
         ORDER BY kick_time ASC, id ASC",
    )?;
    let rows = stmt.query_map(
        params![format_kick_time(start), format_kick_time(end)],
        map_row,
    )?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Delete events in the half-open UTC range `[start, end)`.
pub fn delete_events_between(
    conn: &Connection,
    start: &DateTime<Utc>,
    end: &DateTime<Utc>,
) -> Result<usize> {
    conn.execute(
        "DELETE FROM kick_events WHERE kick_time >= ?1 AND kick_time < ?2",
        params![format_kick_time(start), format_kick_time(end)],
    )
}

// ---------------------------
// kicks (daily aggregate)
// ---------------------------

/// Add one to the date's counter, creating the row if needed.
/// Returns the new value.
pub fn increment_daily_count(conn: &Connection, date: &NaiveDate) -> Result<i64> {
    conn.query_row(
        "INSERT INTO kicks (kick_date, count) VALUES (?1, 1)
         ON CONFLICT(kick_date) DO UPDATE SET count = count + 1
         RETURNING count",
        [date_key(date)],
        |row| row.get(0),
    )
}

pub fn load_daily_count(conn: &Connection, date: &NaiveDate) -> Result<Option<i64>> {
    conn.query_row(
        "SELECT count FROM kicks WHERE kick_date = ?1",
        [date_key(date)],
        |row| row.get(0),
    )
    .optional()
}

pub fn delete_daily_count(conn: &Connection, date: &NaiveDate) -> Result<usize> {
    conn.execute("DELETE FROM kicks WHERE kick_date = ?1", [date_key(date)])
}

pub fn load_daily_counts(conn: &Connection) -> Result<Vec<DailyCount>> {
    let mut stmt = conn.prepare("SELECT kick_date, count FROM kicks ORDER BY kick_date ASC")?;
    let rows = stmt.query_map([], |row| {
        let raw: String = row.get(0)?;
        Ok(DailyCount {
            date: parse_date_column(0, &raw)?,
            count: row.get(1)?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Drop every aggregate row and write `counts` in its place.
pub fn replace_daily_counts(conn: &Connection, counts: &[DailyCount]) -> Result<()> {
    conn.execute("DELETE FROM kicks", [])?;

    let mut stmt = conn.prepare("INSERT INTO kicks (kick_date, count) VALUES (?1, ?2)")?;
    for c in counts {
        stmt.execute(params![date_key(&c.date), c.count])?;
    }
    Ok(())
}

// ---------------------------
// login (singleton)
// ---------------------------

pub fn load_last_login(conn: &Connection) -> Result<Option<NaiveDate>> {
    let raw: Option<String> = conn
        .query_row("SELECT last_login_date FROM login WHERE id = 1", [], |row| {
            row.get(0)
        })
        .optional()?;

    raw.map(|r| parse_date_column(0, &r)).transpose()
}

pub fn save_login_date(conn: &Connection, date: &NaiveDate) -> Result<()> {
    conn.execute(
        "INSERT INTO login (id, last_login_date) VALUES (1, ?1)
         ON CONFLICT(id) DO UPDATE SET last_login_date = excluded.last_login_date",
        [date_key(date)],
    )?;
    Ok(())
}

// ---------------------------
// log
// ---------------------------

pub fn load_log(conn: &Connection) -> Result<Vec<(i64, String, String, String, String)>> {
    let mut stmt = conn
        .prepare_cached("SELECT id, date, operation, target, message FROM log ORDER BY id ASC")?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get(0)?,
            row.get(1)?,
            row.get(2)?,
            row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            row.get(4)?,
        ))
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
