use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use std::fs;
use std::path::PathBuf;
use mmboard::db::DbConnection;
use mmboard::models::{ClientRecord, Snapshot};
use mmboard::store::{KeyValueStore, SqliteKv, Store, BOARD_KEY};

/// Helper to create a temporary database and set it as the data location
fn setup_test_env() -> (TempDir, PathBuf, std::sync::MutexGuard<'static, ()>) {
    let guard = test_env::lock_test_env();
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");

    let config_dir = temp_dir.path().join(".mmboard");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("rc"), format!("data.location={}\n", db_path.display())).unwrap();

    (temp_dir, db_path, guard)
}

fn get_board_cmd(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("mmboard").unwrap();
    cmd.env("HOME", temp_dir.path());
    cmd.env("COLUMNS", "200");
    cmd
}

/// Read the stored snapshot straight from the database file
fn stored_snapshot(db_path: &PathBuf) -> Option<Snapshot> {
    let store = Store::new(SqliteKv::new(DbConnection::connect_at(db_path).unwrap()));
    store.load().unwrap()
}

#[test]
fn test_fresh_board_shows_first_stage() {
    let (temp_dir, db_path, _guard) = setup_test_env();

    get_board_cmd(&temp_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("March Madness Website Launch!"))
        .stdout(predicate::str::contains("#0"))
        .stdout(predicate::str::contains("#23"))
        .stdout(predicate::str::contains("#24").not())
        .stdout(predicate::str::contains("🚀 Round 1 → Enrollment & Kickoff"))
        .stdout(predicate::str::contains("(Client Name)"));

    // Viewing never writes
    assert!(stored_snapshot(&db_path).is_none());
}

#[test]
fn test_show_json_on_fresh_board() {
    let (temp_dir, _db_path, _guard) = setup_test_env();

    let output = get_board_cmd(&temp_dir).args(["show", "--json"]).assert().success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let snapshot: Snapshot = serde_json::from_str(&stdout).unwrap();
    assert_eq!(snapshot, Snapshot::with_defaults(24));
}

#[test]
fn test_set_name_persists_and_keeps_manager() {
    let (temp_dir, db_path, _guard) = setup_test_env();

    get_board_cmd(&temp_dir)
        .args(["name", "0", "Acme", "Co"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Name:    Acme Co"));

    let snapshot = stored_snapshot(&db_path).unwrap();
    assert_eq!(snapshot.clients[&0].name, "Acme Co");
    assert_eq!(snapshot.clients[&0].manager, "");
    assert_eq!(snapshot.clients.len(), 24);
}

#[test]
fn test_set_manager_and_clear_it() {
    let (temp_dir, db_path, _guard) = setup_test_env();

    get_board_cmd(&temp_dir).args(["manager", "4", "Riley"]).assert().success();
    assert_eq!(stored_snapshot(&db_path).unwrap().clients[&4].manager, "Riley");

    get_board_cmd(&temp_dir).args(["manager", "4"]).assert().success()
        .stdout(predicate::str::contains("(Project Manager)"));
    assert_eq!(stored_snapshot(&db_path).unwrap().clients[&4].manager, "");
}

#[test]
fn test_advance_four_times_then_saturate() {
    let (temp_dir, db_path, _guard) = setup_test_env();

    for _ in 0..4 {
        get_board_cmd(&temp_dir).args(["advance", "3"]).assert().success();
    }
    assert_eq!(stored_snapshot(&db_path).unwrap().progress[&3], 4);

    get_board_cmd(&temp_dir)
        .args(["advance", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Championship → Pre-Launch & Website Launch! 🎉"))
        .stdout(predicate::str::contains("Slot 3 is at the Championship."));
    assert_eq!(stored_snapshot(&db_path).unwrap().progress[&3], 4);
}

#[test]
fn test_saved_snapshot_is_rendered() {
    let (temp_dir, db_path, _guard) = setup_test_env();

    let mut snapshot = Snapshot::default();
    snapshot.progress.insert(0, 2);
    snapshot.clients.insert(0, ClientRecord { name: "X".into(), manager: "Y".into() });
    let mut store = Store::new(SqliteKv::new(DbConnection::connect_at(&db_path).unwrap()));
    store.save(&snapshot).unwrap();
    drop(store);

    get_board_cmd(&temp_dir)
        .args(["show", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("🛠️ Elite 8 → Populating & QA"))
        .stdout(predicate::str::contains("Name:    X"))
        .stdout(predicate::str::contains("Manager: Y"));

    // A one-slot board stays one slot
    get_board_cmd(&temp_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("#1").not());
}

#[test]
fn test_browser_document_is_read_verbatim() {
    let (temp_dir, db_path, _guard) = setup_test_env();

    let json = r#"{"progress":{"0":1,"1":3},"clients":{"0":{"name":"Acme","manager":"Pat"},"1":{"name":"Beta","manager":"Sam"}}}"#;
    let mut kv = SqliteKv::new(DbConnection::connect_at(&db_path).unwrap());
    kv.set_item(BOARD_KEY, json).unwrap();
    drop(kv);

    get_board_cmd(&temp_dir)
        .args(["show", "1", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"Beta\""))
        .stdout(predicate::str::contains("Final 4 → Client Approval"));
}

#[test]
fn test_null_field_keeps_saved_board() {
    let (temp_dir, db_path, _guard) = setup_test_env();

    let json = r#"{"progress":{"0":3,"1":2},"clients":{"0":{"name":"Acme","manager":null},"1":{"name":"Beta","manager":"Sam"}}}"#;
    let mut kv = SqliteKv::new(DbConnection::connect_at(&db_path).unwrap());
    kv.set_item(BOARD_KEY, json).unwrap();
    drop(kv);

    get_board_cmd(&temp_dir)
        .args(["advance", "1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("could not load saved board").not());

    let snapshot = stored_snapshot(&db_path).unwrap();
    assert_eq!(snapshot.clients.len(), 2);
    assert_eq!(snapshot.progress[&0], 3);
    assert_eq!(snapshot.clients[&0].name, "Acme");
    assert_eq!(snapshot.clients[&1].name, "Beta");
}

#[test]
fn test_malformed_snapshot_falls_back_to_defaults() {
    let (temp_dir, db_path, _guard) = setup_test_env();

    let mut kv = SqliteKv::new(DbConnection::connect_at(&db_path).unwrap());
    kv.set_item(BOARD_KEY, "{not json").unwrap();
    drop(kv);

    get_board_cmd(&temp_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("#23"))
        .stderr(predicate::str::contains("could not load saved board"))
        .stderr(predicate::str::contains("malformed board snapshot: "))
        .stderr(predicate::str::contains("line 1 column"));

    // The next mutation replaces the bad document with a full board
    get_board_cmd(&temp_dir).args(["advance", "0"]).assert().success();
    let snapshot = stored_snapshot(&db_path).unwrap();
    assert_eq!(snapshot.progress.len(), 24);
    assert_eq!(snapshot.progress[&0], 1);
}

#[test]
fn test_unknown_slot_is_user_error() {
    let (temp_dir, db_path, _guard) = setup_test_env();

    get_board_cmd(&temp_dir)
        .args(["advance", "24"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Slot 24 not found. The board has slots 0-23."));

    get_board_cmd(&temp_dir)
        .args(["name", "abc", "Acme"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid slot"));

    assert!(stored_snapshot(&db_path).is_none());
}

#[test]
fn test_reset_with_yes() {
    let (temp_dir, db_path, _guard) = setup_test_env();

    get_board_cmd(&temp_dir).args(["advance", "2"]).assert().success();
    get_board_cmd(&temp_dir).args(["name", "2", "Gamma"]).assert().success();

    get_board_cmd(&temp_dir)
        .args(["reset", "-y"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Board reset: 24 empty slots."));

    assert_eq!(stored_snapshot(&db_path).unwrap(), Snapshot::with_defaults(24));
}

#[test]
fn test_reset_declined() {
    let (temp_dir, db_path, _guard) = setup_test_env();

    get_board_cmd(&temp_dir).args(["advance", "2"]).assert().success();
    get_board_cmd(&temp_dir)
        .args(["reset"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cancelled."));

    assert_eq!(stored_snapshot(&db_path).unwrap().progress[&2], 1);
}

#[test]
fn test_status_counts() {
    let (temp_dir, _db_path, _guard) = setup_test_env();

    get_board_cmd(&temp_dir).args(["advance", "0"]).assert().success();
    for _ in 0..6 {
        get_board_cmd(&temp_dir).args(["advance", "1"]).assert().success();
    }

    let output = get_board_cmd(&temp_dir).args(["status", "--json"]).assert().success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["total"], 24);
    assert_eq!(json["launched"], 1);
    assert_eq!(json["stages"][0]["count"], 22);
    assert_eq!(json["stages"][1]["count"], 1);

    get_board_cmd(&temp_dir)
        .args(["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Launched: 1/24"));
}

#[test]
fn test_stages_table() {
    let (temp_dir, _db_path, _guard) = setup_test_env();

    get_board_cmd(&temp_dir)
        .args(["stages"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sweet 16 → Design & Development"))
        .stdout(predicate::str::contains("blue-200"));
}
