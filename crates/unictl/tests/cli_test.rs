//! Integration tests for the `unictl` CLI binary.
//!
//! Argument parsing, help output and credential-file checks run without a
//! controller; the end-to-end cases point the binary at a wiremock server
//! through `UNICTL_CONTROLLER_URL`.
#![allow(clippy::unwrap_used)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `unictl` binary with env isolation.
///
/// Points `HOME` and the config directories into `home` and clears every
/// `UNICTL_*` variable so tests never touch the user's real files.
fn unictl_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("unictl");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("UNICTL_CONFIG", home.join("absent.toml"))
        .env_remove("UNICTL_AUTH_FILE")
        .env_remove("UNICTL_SITE")
        .env_remove("UNICTL_INSECURE")
        .env_remove("UNICTL_PORT")
        .env_remove("UNICTL_TIMEOUT_SECS")
        .env_remove("UNICTL_CONTROLLER_URL")
        .env_remove("RUST_LOG");
    cmd
}

/// Write an auth file with the given mode and optional stored cookie.
fn write_auth_file(dir: &Path, mode: u32, cookie: Option<&str>) -> PathBuf {
    let path = dir.join(".unifi-auth");
    let cookies = cookie.map_or_else(
        || json!([]),
        |value| {
            json!([{
                "raw_cookie": format!("unifises={value}; Path=/"),
                "path": ["/", true],
                "domain": { "HostOnly": "127.0.0.1" },
                "expires": "SessionEnd",
            }])
        },
    );
    let record = json!({
        "username": "admin",
        "password": "hunter2",
        "controller_host": "127.0.0.1",
        "cookies": cookies,
    });
    fs::write(&path, serde_json::to_vec(&record).unwrap()).unwrap();
    set_mode(&path, mode);
    path
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) {}

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "meta": { "rc": "ok" }, "data": data }))
}

/// Run the binary off the async runtime so the mock server keeps serving.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = unictl_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));
}

#[test]
fn test_help_lists_commands() {
    let home = tempfile::tempdir().unwrap();
    unictl_cmd(home.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("stations")
            .and(predicate::str::contains("wlans"))
            .and(predicate::str::contains("guest-wlan")),
    );
}

#[test]
fn test_completions_bash() {
    let home = tempfile::tempdir().unwrap();
    unictl_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("unictl"));
}

// ── Argument and credential errors ──────────────────────────────────

#[test]
fn test_guest_wlan_bad_state_is_usage_error() {
    let home = tempfile::tempdir().unwrap();
    unictl_cmd(home.path())
        .args(["guest-wlan", "maybe"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("maybe"));
}

#[test]
fn test_missing_auth_file_is_not_found() {
    let home = tempfile::tempdir().unwrap();
    unictl_cmd(home.path())
        .arg("stations")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Credential file not found"));
}

#[cfg(unix)]
#[test]
fn test_group_readable_auth_file_is_refused() {
    let home = tempfile::tempdir().unwrap();
    let auth = write_auth_file(home.path(), 0o644, None);

    // Unroutable controller: the check must fail before any request.
    unictl_cmd(home.path())
        .env("UNICTL_CONTROLLER_URL", "http://127.0.0.1:1")
        .arg("--auth-file")
        .arg(&auth)
        .arg("wlans")
        .assert()
        .code(5)
        .stderr(predicate::str::contains("chmod 600"));
}

#[test]
fn test_blank_site_flag_is_rejected() {
    let home = tempfile::tempdir().unwrap();
    unictl_cmd(home.path())
        .args(["--site", " ", "stations"])
        .assert()
        .code(2);
}

// ── Against a controller ────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_stations_logs_in_and_stores_cookie() {
    let server = MockServer::start().await;
    let home = tempfile::tempdir().unwrap();
    let auth = write_auth_file(home.path(), 0o600, None);

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(body_partial_json(json!({ "username": "admin", "password": "hunter2" })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "unifises=fresh; Path=/; HttpOnly")
                .set_body_json(json!({ "meta": { "rc": "ok" }, "data": [] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/s/default/stat/sta"))
        .and(header("cookie", "unifises=fresh"))
        .respond_with(ok(json!([
            { "_id": "a1", "name": "phone", "is_wired": false, "mac": "aa:bb", "ip": "10.0.0.5" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = unictl_cmd(home.path());
    cmd.env("UNICTL_CONTROLLER_URL", server.uri())
        .env("UNICTL_AUTH_FILE", &auth)
        .args(["-o", "plain", "stations"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "aa:bb");

    let stored: serde_json::Value = serde_json::from_slice(&fs::read(&auth).unwrap()).unwrap();
    let raw_cookie = stored["cookies"][0]["raw_cookie"].as_str().unwrap();
    assert!(raw_cookie.starts_with("unifises=fresh"), "stored: {raw_cookie}");
    assert_eq!(stored["password"], "hunter2");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_guest_wlan_continues_past_failures() {
    let server = MockServer::start().await;
    let home = tempfile::tempdir().unwrap();
    let auth = write_auth_file(home.path(), 0o600, Some("stored"));

    Mock::given(method("GET"))
        .and(path("/api/s/lab/list/wlanconf"))
        .and(header("cookie", "unifises=stored"))
        .respond_with(ok(json!([
            { "_id": "home", "name": "Home", "enabled": true },
            { "_id": "g1", "name": "Guest A", "enabled": true, "is_guest": true },
            { "_id": "g2", "name": "Guest B", "enabled": true, "is_guest": true }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/s/lab/upd/wlanconf/g1"))
        .and(body_partial_json(json!({ "_id": "g1", "enabled": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": { "rc": "error", "msg": "api.err.InvalidObject" },
            "data": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/s/lab/upd/wlanconf/g2"))
        .and(body_partial_json(json!({ "_id": "g2", "enabled": false })))
        .respond_with(ok(json!([{ "_id": "g2", "enabled": false }])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/s/lab/upd/wlanconf/home"))
        .respond_with(ok(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let mut cmd = unictl_cmd(home.path());
    cmd.env("UNICTL_CONTROLLER_URL", server.uri())
        .env("UNICTL_AUTH_FILE", &auth)
        .args(["--site", "lab", "-o", "plain", "guest-wlan", "off"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "g2");
    assert!(String::from_utf8_lossy(&output.stderr).contains("1 of 2 wireless networks"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_login_exits_with_auth_code() {
    let server = MockServer::start().await;
    let home = tempfile::tempdir().unwrap();
    let auth = write_auth_file(home.path(), 0o600, None);

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "meta": { "rc": "error", "msg": "api.err.Invalid" },
            "data": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = unictl_cmd(home.path());
    cmd.env("UNICTL_CONTROLLER_URL", server.uri())
        .env("UNICTL_AUTH_FILE", &auth)
        .arg("wlans");
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Authentication failed"));
}
