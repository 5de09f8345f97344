use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{PIN, add_kicks, expire_login, init_and_login, rki, setup_test_db, today_json};

#[test]
fn test_init_creates_database() {
    let db_path = setup_test_db("init_creates_database");

    rki()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    assert!(std::path::Path::new(&db_path).exists());
}

#[test]
fn test_add_requires_login() {
    let db_path = setup_test_db("add_requires_login");

    rki()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();

    rki()
        .args(["--db", &db_path, "add"])
        .assert()
        .failure()
        .stderr(contains("Not logged in today"));
}

#[test]
fn test_wrong_pin_keeps_the_gate_closed() {
    let db_path = setup_test_db("wrong_pin");

    rki()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();

    rki()
        .args(["--db", &db_path, "login", "--pin", "0000"])
        .assert()
        .failure()
        .stderr(contains("Wrong PIN"));

    rki()
        .args(["--db", &db_path, "add"])
        .assert()
        .failure()
        .stderr(contains("Not logged in today"));
}

#[test]
fn test_malformed_pin_is_rejected() {
    let db_path = setup_test_db("malformed_pin");

    rki()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();

    rki()
        .args(["--db", &db_path, "login", "--pin", "12345"])
        .assert()
        .failure()
        .stderr(contains("Wrong PIN"));
}

#[test]
fn test_login_reads_pin_from_stdin() {
    let db_path = setup_test_db("login_stdin");

    rki()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();

    rki()
        .args(["--db", &db_path, "login"])
        .write_stdin(format!("{PIN}\n"))
        .assert()
        .success()
        .stdout(contains("Unlocked for"));

    rki()
        .args(["--db", &db_path, "login"])
        .assert()
        .success()
        .stdout(contains("Already unlocked"));
}

#[test]
fn test_missing_pin_configuration_is_reported() {
    let db_path = setup_test_db("missing_pin");

    rki()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();

    rki()
        .env_remove("KICK_PIN_CODE")
        .args(["--db", &db_path, "login", "--pin", PIN])
        .assert()
        .failure()
        .stderr(contains("no PIN configured"));
}

#[test]
fn test_status_shows_lock_then_count() {
    let db_path = setup_test_db("status_lock");

    rki()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();

    rki()
        .args(["--db", &db_path, "status"])
        .assert()
        .success()
        .stdout(contains("Locked"));

    rki()
        .args(["--db", &db_path, "login", "--pin", PIN])
        .assert()
        .success();
    add_kicks(&db_path, 2);

    rki()
        .args(["--db", &db_path, "status"])
        .assert()
        .success()
        .stdout(contains("kicks today").and(contains("Locked").not()));
}

#[test]
fn test_add_increments_the_day_total() {
    let db_path = init_and_login("add_increments");

    rki()
        .args(["--db", &db_path, "add"])
        .assert()
        .success()
        .stdout(contains("Kick logged at"));

    add_kicks(&db_path, 2);

    let listed = today_json(&db_path);
    assert_eq!(listed.as_array().map(Vec::len), Some(3));
}

#[test]
fn test_reset_clears_today() {
    let db_path = init_and_login("reset_today");
    add_kicks(&db_path, 3);

    rki()
        .args(["--db", &db_path, "reset", "--yes"])
        .assert()
        .success()
        .stdout(contains("3 kicks deleted"));

    let listed = today_json(&db_path);
    assert_eq!(listed.as_array().map(Vec::len), Some(0));
}

#[test]
fn test_reset_can_be_declined() {
    let db_path = init_and_login("reset_declined");
    add_kicks(&db_path, 1);

    rki()
        .args(["--db", &db_path, "reset"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(contains("Reset cancelled"));

    let listed = today_json(&db_path);
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
}

#[test]
fn test_maintenance_reads_stay_behind_the_gate() {
    let db_path = init_and_login("maintenance_gate");
    add_kicks(&db_path, 2);
    expire_login(&db_path);

    rki()
        .args(["--db", &db_path, "status"])
        .assert()
        .success()
        .stdout(contains("Locked"));

    for args in [
        vec!["log", "--print"],
        vec!["db", "--info"],
        vec!["db", "--reconcile"],
        vec!["db", "--vacuum"],
    ] {
        rki()
            .args(["--db", &db_path])
            .args(&args)
            .assert()
            .failure()
            .stdout(contains("Kick #").not().and(contains("rebuilt").not()))
            .stderr(contains("Not logged in today"));
    }

    rki()
        .args(["--db", &db_path, "db", "--migrate"])
        .assert()
        .success();
}

#[test]
fn test_pin_with_wrong_shape_is_a_config_error() {
    let db_path = setup_test_db("pin_shape");

    rki()
        .env("KICK_PIN_CODE", "12345")
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("pin_code must be 1-4 digits"));

    for secret in ["12345", "abcd"] {
        rki()
            .env("KICK_PIN_CODE", secret)
            .args(["--db", &db_path, "login", "--pin", secret])
            .assert()
            .failure()
            .stderr(contains("pin_code must be 1-4 digits").and(contains("Wrong PIN").not()));
    }
}
