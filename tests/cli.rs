//! End-to-end CLI tests
//!
//! Each test runs against its own temp repository via REP_DATABASE.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn rep(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("rep").unwrap();
    cmd.env("REP_DATABASE", dir.path().join(".rep").join("data.db"))
        .env("HOME", dir.path())
        .current_dir(dir.path());
    cmd
}

/// Initialize a repo and return the temp dir backing it
fn init_repo() -> TempDir {
    let dir = TempDir::new().unwrap();
    rep(&dir).args(["init"]).assert().success();
    dir
}

/// Extract the trailing ULID from a "registered: <ulid>" line
fn extract_registered_id(output: &[u8]) -> String {
    let text = String::from_utf8_lossy(output);
    text.lines()
        .find(|line| line.contains("registered:"))
        .and_then(|line| line.split_whitespace().last())
        .map(|s| s.to_string())
        .unwrap_or_else(|| panic!("no registered ID in output: {text}"))
}

#[test]
fn init_creates_repository() {
    let dir = TempDir::new().unwrap();
    rep(&dir)
        .args(["init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized rep repository"));
    assert!(dir.path().join(".rep/config.toml").exists());
    assert!(dir.path().join(".rep/data.db").exists());
}

#[test]
fn init_twice_requires_force() {
    let dir = TempDir::new().unwrap();
    rep(&dir).args(["init"]).assert().success();
    rep(&dir)
        .args(["init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already a rep repository"));
    rep(&dir).args(["init", "--force"]).assert().success();
}

#[test]
fn vote_flow_updates_karma() {
    let dir = init_repo();

    rep(&dir).args(["user", "add", "ada"]).assert().success();
    rep(&dir).args(["user", "add", "grace"]).assert().success();

    let post_out = rep(&dir).args(["post", "ada"]).assert().success();
    let post_id = extract_registered_id(&post_out.get_output().stdout);

    rep(&dir)
        .args(["vote", "grace", &post_id, "up"])
        .assert()
        .success()
        .stdout(predicate::str::contains("score 1"));

    rep(&dir)
        .args(["karma", "ada"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total karma:   1"));

    // Same vote again removes it
    rep(&dir)
        .args(["vote", "grace", &post_id, "up"])
        .assert()
        .success()
        .stdout(predicate::str::contains("removed"));

    rep(&dir)
        .args(["karma", "ada"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total karma:   0"));
}

#[test]
fn self_vote_is_rejected() {
    let dir = init_repo();

    rep(&dir).args(["user", "add", "ada"]).assert().success();
    let post_out = rep(&dir).args(["post", "ada"]).assert().success();
    let post_id = extract_registered_id(&post_out.get_output().stdout);

    rep(&dir)
        .args(["vote", "ada", &post_id, "up"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot vote on your own"));
}

#[test]
fn community_reputation_tracks_votes() {
    let dir = init_repo();

    rep(&dir).args(["user", "add", "ada"]).assert().success();
    rep(&dir).args(["user", "add", "grace"]).assert().success();
    rep(&dir)
        .args(["community", "add", "rustaceans"])
        .assert()
        .success();

    let post_out = rep(&dir)
        .args(["post", "ada", "--community", "rustaceans"])
        .assert()
        .success();
    let post_id = extract_registered_id(&post_out.get_output().stdout);

    rep(&dir)
        .args(["vote", "grace", &post_id, "up"])
        .assert()
        .success();

    rep(&dir)
        .args(["reputation", "ada", "rustaceans"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total karma:   1"))
        .stdout(predicate::str::contains("Posts:         1"));
}

#[test]
fn reconcile_matches_incremental_karma() {
    let dir = init_repo();

    rep(&dir).args(["user", "add", "ada"]).assert().success();
    rep(&dir).args(["user", "add", "grace"]).assert().success();

    let post_out = rep(&dir).args(["post", "ada"]).assert().success();
    let post_id = extract_registered_id(&post_out.get_output().stdout);

    rep(&dir)
        .args(["vote", "grace", &post_id, "down"])
        .assert()
        .success();

    rep(&dir)
        .args(["reconcile", "karma", "ada"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-1 total"));
}

#[test]
fn trust_breakdown_and_leaderboard() {
    let dir = init_repo();

    rep(&dir).args(["user", "add", "ada"]).assert().success();
    rep(&dir).args(["user", "add", "grace"]).assert().success();

    rep(&dir)
        .args(["trust", "recompute-all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed:  2"))
        .stdout(predicate::str::contains("Successful: 2"));

    // Fresh accounts get full report credit
    rep(&dir)
        .args(["trust", "breakdown", "ada"])
        .assert()
        .success()
        .stdout(predicate::str::contains("30 / 30"));

    rep(&dir)
        .args(["leaderboard"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ada"))
        .stdout(predicate::str::contains("grace"));

    rep(&dir)
        .args(["stats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Scored users: 2"));
}

#[test]
fn vote_json_output() {
    let dir = init_repo();

    rep(&dir).args(["user", "add", "ada"]).assert().success();
    rep(&dir).args(["user", "add", "grace"]).assert().success();
    let post_out = rep(&dir).args(["post", "ada"]).assert().success();
    let post_id = extract_registered_id(&post_out.get_output().stdout);

    let out = rep(&dir)
        .args(["vote", "grace", &post_id, "up", "--json"])
        .assert()
        .success();
    let json: serde_json::Value =
        serde_json::from_slice(&out.get_output().stdout).expect("valid JSON");
    assert_eq!(json["vote_score"], 1);
    assert_eq!(json["upvotes"], 1);
    assert_eq!(json["state"], "created");
}

#[test]
fn levels_rejects_out_of_range() {
    let dir = init_repo();
    rep(&dir)
        .args(["levels", "7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid trust level"));
}

#[test]
fn duplicate_username_is_rejected() {
    let dir = init_repo();

    rep(&dir).args(["user", "add", "ada"]).assert().success();
    rep(&dir).args(["user", "add", "ada"]).assert().failure();
}

#[test]
fn user_show_includes_trust() {
    let dir = init_repo();

    rep(&dir).args(["user", "add", "ada"]).assert().success();
    rep(&dir)
        .args(["user", "show", "ada"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Karma:"))
        .stdout(predicate::str::contains("Trust:"));
}
