#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

pub const PIN: &str = "1234";

/// Binary under test with a private HOME (no user config is read), a known
/// PIN and notifications switched off.
pub fn rki() -> Command {
    rki_with_home(&sandbox_home("shared"))
}

pub fn rki_with_home(home: &PathBuf) -> Command {
    let mut cmd = cargo_bin_cmd!("rkickcounter");
    cmd.env("HOME", home)
        .env("KICK_PIN_CODE", PIN)
        .env("TELEGRAM_BOT_TOKEN", "")
        .env_remove("TELEGRAM_CHAT_ID")
        .env_remove("RUST_LOG");
    cmd
}

pub fn sandbox_home(name: &str) -> PathBuf {
    let path = env::temp_dir().join(format!("rkickcounter_home_{name}"));
    fs::create_dir_all(&path).ok();
    path
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rkickcounter.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    for suffix in ["", "-wal", "-shm"] {
        fs::remove_file(format!("{db_path}{suffix}")).ok();
    }
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Fresh database, initialized and unlocked for today.
pub fn init_and_login(name: &str) -> String {
    let db_path = setup_test_db(name);

    rki()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();

    rki()
        .args(["--db", &db_path, "login", "--pin", PIN])
        .assert()
        .success();

    db_path
}

pub fn add_kicks(db_path: &str, n: usize) {
    for _ in 0..n {
        rki().args(["--db", db_path, "add"]).assert().success();
    }
}

/// Parsed `list --today --json` output.
pub fn today_json(db_path: &str) -> serde_json::Value {
    let out = rki()
        .args(["--db", db_path, "list", "--today", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    serde_json::from_slice(&out).expect("list --json prints JSON")
}

/// Move the stored login back to a past day, closing today's session.
pub fn expire_login(db_path: &str) {
    let conn = rusqlite::Connection::open(db_path).expect("open test db");
    conn.execute(
        "UPDATE login SET last_login_date = '2000-01-01' WHERE id = 1",
        [],
    )
    .expect("backdate login");
}
