use crate::db::log::log_timestamp;
use crate::models::event::{format_kick_time, parse_kick_time};
use crate::ui::messages::{success, warning};
use rusqlite::{Connection, Error, OptionalExtension, Result, params};

/// Ensure that the `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Create the three data tables: daily counts, raw events, login marker.
fn create_data_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS kicks (
            kick_date TEXT PRIMARY KEY,
            count     INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS kick_events (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            kick_time TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS login (
            id              INTEGER PRIMARY KEY CHECK(id = 1),
            last_login_date TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn migration_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_applied(conn: &Connection, version: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, 'migration_applied', ?2, ?3)",
        params![log_timestamp(), version, message],
    )?;
    Ok(())
}

fn migrate_add_kick_time_index(conn: &Connection) -> Result<()> {
    let version = "20260301_0001_kick_time_index";
    if migration_applied(conn, version)? {
        return Ok(());
    }

    conn.execute_batch("CREATE INDEX IF NOT EXISTS idx_kick_events_time ON kick_events(kick_time);")?;
    mark_applied(conn, version, "Added kick_time index to kick_events")?;

    success(format!("Migration applied: {} → indexed kick_events.kick_time", version));
    Ok(())
}

/// Older databases stored `kick_time` with a `+00:00` suffix (or no offset
/// at all). Range deletes compare strings, so
/// every row must use the canonical `...Z` form.
fn migrate_normalize_kick_times(conn: &Connection) -> Result<()> {
    let version = "20260301_0002_normalize_kick_time";
    if migration_applied(conn, version)? {
        return Ok(());
    }

    let rows: Vec<(i64, String)> = {
        let mut stmt = conn.prepare("SELECT id, kick_time FROM kick_events")?;
        stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<_>>()?
    };

    let mut rewritten = 0usize;
    let tx = conn.unchecked_transaction()?;
    for (id, raw) in rows {
        let ts = parse_kick_time(&raw).map_err(|e| {
            Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
        })?;
        let canonical = format_kick_time(&ts);
        if canonical != raw {
            tx.execute(
                "UPDATE kick_events SET kick_time = ?1 WHERE id = ?2",
                params![canonical, id],
            )?;
            rewritten += 1;
        }
    }
    mark_applied(&tx, version, "Normalized kick_time values to canonical UTC")?;
    tx.commit()?;

    if rewritten > 0 {
        warning(format!("Rewrote {} legacy kick_time values.", rewritten));
    }
    success(format!("Migration applied: {}", version));
    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;
    create_data_tables(conn)?;

    migrate_add_kick_time_index(conn)?;
    migrate_normalize_kick_times(conn)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::DbPool;

    #[test]
    fn migrations_are_idempotent() {
        let pool = DbPool::in_memory().unwrap();
        run_pending_migrations(&pool.conn).unwrap();
        run_pending_migrations(&pool.conn).unwrap();

        let applied: i64 = pool
            .conn
            .query_row(
                "SELECT COUNT(*) FROM log WHERE operation = 'migration_applied'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(applied, 2);
    }

    #[test]
    fn migration_rows_share_the_log_date_format() {
        let pool = DbPool::in_memory().unwrap();
        run_pending_migrations(&pool.conn).unwrap();
        crate::db::log::ttlog(&pool.conn, "add", "kick", "Kick #1").unwrap();

        let mut stmt = pool.conn.prepare("SELECT date FROM log").unwrap();
        let dates: Vec<String> = stmt
            .query_map([], |r| r.get(0))
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(dates.len(), 3);
        for d in &dates {
            assert!(chrono::DateTime::parse_from_rfc3339(d).is_ok(), "{d}");
        }
    }

    #[test]
    fn legacy_kick_times_are_normalized() {
        let pool = DbPool::in_memory().unwrap();
        ensure_log_table(&pool.conn).unwrap();
        create_data_tables(&pool.conn).unwrap();
        pool.conn
            .execute_batch(
                "INSERT INTO kick_events (kick_time) VALUES ('2025-03-01T02:30:00.123456+00:00');
                 INSERT INTO kick_events (kick_time) VALUES ('2025-03-01 04:00:00');",
            )
            .unwrap();

        run_pending_migrations(&pool.conn).unwrap();

        let times: Vec<String> = pool
            .conn
            .prepare("SELECT kick_time FROM kick_events ORDER BY id")
            .unwrap()
            .query_map([], |r| r.get(0))
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(
            times,
            vec!["2025-03-01T02:30:00.123456Z", "2025-03-01T04:00:00.000000Z"]
        );
    }

    #[test]
    fn login_table_rejects_a_second_row() {
        let pool = DbPool::in_memory().unwrap();
        run_pending_migrations(&pool.conn).unwrap();
        let err = pool.conn.execute(
            "INSERT INTO login (id, last_login_date) VALUES (2, '2025-01-01')",
            [],
        );
        assert!(err.is_err());
    }
}
