//! E2E tests for the social surface: friends, badge-gated messages, and
//! picture storage.

use assert_cmd::Command;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

/// Build a Command targeting the fm binary, with the store rooted in `dir`.
fn fm_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fm"));
    cmd.env("FOCUSMATE_DB", dir.join("focusmate.sqlite3"));
    cmd.env("FOCUSMATE_LOG", "error");
    cmd
}

/// Same, acting as `user`.
fn fm_as(dir: &Path, user: i64) -> Command {
    let mut cmd = fm_cmd(dir);
    cmd.arg("--user").arg(user.to_string());
    cmd
}

/// Create a user via CLI, return the assigned id.
fn create_user(dir: &Path, name: &str) -> i64 {
    let output = fm_cmd(dir)
        .args(["user", "create", "--name", name, "--json"])
        .output()
        .expect("user create should not crash");
    assert!(
        output.status.success(),
        "user create failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    json["user_id"].as_i64().expect("user_id field")
}

/// Earn one badge with an hour-long session at a fixed instant.
fn earn_badge(dir: &Path, user: i64, end: &str) {
    fm_as(dir, user)
        .args(["focus", "save", "--seconds", "3600", "--end", end])
        .assert()
        .success();
}

/// Poll `fm msg unread --json` for `user`.
fn poll_unread(dir: &Path, user: i64) -> Value {
    let output = fm_as(dir, user)
        .args(["msg", "unread", "--json"])
        .output()
        .expect("msg unread should not crash");
    assert!(
        output.status.success(),
        "msg unread failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("msg unread --json should produce valid JSON")
}

// ===========================================================================
// Test 1: Friends and Presence
// ===========================================================================

#[test]
fn friend_add_is_directed() {
    let dir = TempDir::new().unwrap();
    let mei = create_user(dir.path(), "mei");
    let kai = create_user(dir.path(), "kai");

    fm_as(dir.path(), mei)
        .args(["friend", "add"])
        .arg(kai.to_string())
        .assert()
        .success();

    let output = fm_as(dir.path(), mei)
        .args(["friend", "list", "--json"])
        .output()
        .unwrap();
    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["friend_ids"], serde_json::json!([kai]));

    // The edge does not point back.
    let output = fm_as(dir.path(), kai)
        .args(["friend", "list", "--json"])
        .output()
        .unwrap();
    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["friend_ids"], serde_json::json!([]));
}

#[test]
fn friend_status_reflects_studying() {
    let dir = TempDir::new().unwrap();
    let mei = create_user(dir.path(), "mei");
    let kai = create_user(dir.path(), "kai");

    fm_as(dir.path(), mei)
        .args(["friend", "add"])
        .arg(kai.to_string())
        .assert()
        .success();
    fm_as(dir.path(), kai)
        .args(["user", "status", "--on"])
        .assert()
        .success();

    let output = fm_as(dir.path(), mei)
        .args(["friend", "status", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let statuses: Vec<Value> = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0]["friend_id"], kai);
    assert_eq!(statuses[0]["name"], "kai");
    assert_eq!(statuses[0]["is_studying"], true);
    assert!(statuses[0]["current_timer_seconds"].is_number());
}

#[test]
fn self_friendship_fails() {
    let dir = TempDir::new().unwrap();
    let mei = create_user(dir.path(), "mei");

    fm_as(dir.path(), mei)
        .args(["friend", "add"])
        .arg(mei.to_string())
        .assert()
        .failure()
        .stderr(predicates::str::contains("befriend"));
}

#[test]
fn friend_remove_clears_the_edge() {
    let dir = TempDir::new().unwrap();
    let mei = create_user(dir.path(), "mei");
    let kai = create_user(dir.path(), "kai");

    fm_as(dir.path(), mei)
        .args(["friend", "add"])
        .arg(kai.to_string())
        .assert()
        .success();
    fm_as(dir.path(), mei)
        .args(["friend", "remove"])
        .arg(kai.to_string())
        .assert()
        .success();

    let output = fm_as(dir.path(), mei)
        .args(["friend", "list", "--json"])
        .output()
        .unwrap();
    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["friend_ids"], serde_json::json!([]));
}

// ===========================================================================
// Test 2: Badge-Gated Messages
// ===========================================================================

#[test]
fn send_without_badges_fails_closed() {
    let dir = TempDir::new().unwrap();
    let mei = create_user(dir.path(), "mei");
    let kai = create_user(dir.path(), "kai");

    fm_as(dir.path(), mei)
        .args(["msg", "send", "--to"])
        .arg(kai.to_string())
        .args(["--content", "free nudge?"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("no badges"));

    // Nothing was delivered.
    let unread = poll_unread(dir.path(), kai);
    assert_eq!(unread["has_unread"], false);
}

#[test]
fn earn_send_poll_read_flow() {
    let dir = TempDir::new().unwrap();
    let mei = create_user(dir.path(), "mei");
    let kai = create_user(dir.path(), "kai");

    earn_badge(dir.path(), mei, "2025-03-01T10:00:00");

    fm_as(dir.path(), mei)
        .args(["msg", "send", "--to"])
        .arg(kai.to_string())
        .args(["--content", "your turn to study!"])
        .assert()
        .success();

    // The badge was spent.
    let output = fm_as(dir.path(), mei)
        .args(["user", "show", "--json"])
        .output()
        .unwrap();
    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["badge"], 0);

    // Polling is non-consuming.
    let unread = poll_unread(dir.path(), kai);
    assert_eq!(unread["has_unread"], true);
    assert_eq!(unread["data"]["sender_name"], "mei");
    assert_eq!(unread["data"]["content"], "your turn to study!");
    let msg_id = unread["data"]["id"].as_i64().expect("message id");

    let again = poll_unread(dir.path(), kai);
    assert_eq!(again["data"]["id"], msg_id);

    // Marking read clears the poll.
    fm_as(dir.path(), kai)
        .args(["msg", "read"])
        .arg(msg_id.to_string())
        .assert()
        .success();
    let after = poll_unread(dir.path(), kai);
    assert_eq!(after["has_unread"], false);

    // The spent badge blocks a second send.
    fm_as(dir.path(), mei)
        .args(["msg", "send", "--to"])
        .arg(kai.to_string())
        .args(["--content", "again!"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("E3002"));
}

#[test]
fn poll_returns_newest_unread_first() {
    let dir = TempDir::new().unwrap();
    let mei = create_user(dir.path(), "mei");
    let kai = create_user(dir.path(), "kai");

    earn_badge(dir.path(), mei, "2025-03-01T10:00:00");
    earn_badge(dir.path(), mei, "2025-03-01T12:00:00");

    for content in ["first", "second"] {
        fm_as(dir.path(), mei)
            .args(["msg", "send", "--to"])
            .arg(kai.to_string())
            .args(["--content", content])
            .assert()
            .success();
    }

    let unread = poll_unread(dir.path(), kai);
    assert_eq!(unread["data"]["content"], "second");
}

// ===========================================================================
// Test 3: Pictures
// ===========================================================================

#[test]
fn picture_round_trips_bytes() {
    let dir = TempDir::new().unwrap();
    let mei = create_user(dir.path(), "mei");

    let src = dir.path().join("desk.jpg");
    let bytes = [0xFF_u8, 0xD8, 0xFF, 0xE0, 0x01, 0x02, 0x03];
    std::fs::write(&src, bytes).expect("write source image");

    let output = fm_as(dir.path(), mei)
        .args(["picture", "add", "--file"])
        .arg(&src)
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    let id = json["id"].as_i64().expect("picture id");
    assert_eq!(json["byte_len"], bytes.len());

    let output = fm_as(dir.path(), mei)
        .args(["picture", "list", "--json"])
        .output()
        .unwrap();
    let infos: Vec<Value> = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(infos.len(), 1);
    assert_eq!(infos[0]["id"], id);

    let out = dir.path().join("export.jpg");
    fm_as(dir.path(), mei)
        .args(["picture", "export"])
        .arg(id.to_string())
        .arg("--out")
        .arg(&out)
        .assert()
        .success();
    assert_eq!(std::fs::read(&out).expect("read export"), bytes);
}

#[test]
fn export_unknown_picture_fails() {
    let dir = TempDir::new().unwrap();
    let mei = create_user(dir.path(), "mei");

    fm_as(dir.path(), mei)
        .args(["picture", "export", "42", "--out"])
        .arg(dir.path().join("missing.jpg"))
        .assert()
        .failure()
        .stderr(predicates::str::contains("picture 42 not found"));
}
