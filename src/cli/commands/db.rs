use super::clock;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::store::EventStore;
use crate::db::initialize::init_db;
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::stats;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, RED, RESET, YELLOW};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db {
        migrate,
        check,
        reconcile,
        vacuum,
        info,
    } = cmd
    {
        let mut pool = DbPool::new(&cfg.database)?;
        let clock = clock(cfg)?;

        //
        // 1) MIGRATE
        //
        if *migrate {
            println!("{}▶ Running migrations…{}", CYAN, RESET);
            init_db(&pool.conn)?;
            println!("{}✔ Migration completed.{}\n", GREEN, RESET);
        }

        //
        // 2) INFO
        //
        if *info {
            stats::print_db_info(&pool, &cfg.database, &clock)?;
        }

        //
        // 3) CHECK
        //
        if *check {
            println!("{}▶ Running integrity check…{}", CYAN, RESET);

            let integrity: String = pool
                .conn
                .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;

            if integrity == "ok" {
                println!("{}✔ Integrity check passed.{}", GREEN, RESET);
            } else {
                println!("{}✘ Integrity check failed:{} {}", RED, RESET, integrity);
            }

            let drift = EventStore::new(&mut pool, clock).drift()?;
            if drift.is_empty() {
                println!("{}✔ Daily counts match the kick events.{}\n", GREEN, RESET);
            } else {
                println!(
                    "{}✘ {} day(s) with a stale count:{}",
                    YELLOW,
                    drift.len(),
                    RESET
                );
                for d in &drift {
                    println!("    {}: stored {}, events {}", d.date, d.stored, d.actual);
                }
                println!("  Run `rkickcounter db --reconcile` to rebuild them.\n");
            }
        }

        //
        // 4) RECONCILE
        //
        if *reconcile {
            println!("{}▶ Rebuilding daily counts…{}", CYAN, RESET);
            let days = EventStore::new(&mut pool, clock).reconcile()?;
            ttlog_quiet(
                &pool.conn,
                "reconcile",
                "kicks",
                &format!("Rebuilt {days} daily counts"),
            );
            println!("{}✔ {} daily counts rebuilt.{}\n", GREEN, days, RESET);
        }

        //
        // 5) VACUUM
        //
        if *vacuum {
            println!("{}▶ Running VACUUM…{}", CYAN, RESET);

            pool.conn.execute_batch("VACUUM;")?;

            println!("{}✔ Vacuum completed.{}\n", GREEN, RESET);
        }
    }

    Ok(())
}
