//! Integration tests for the `mobierp` CLI binary.
//!
//! Argument parsing, help, completions and the static catalogs run with no
//! backend at all; record commands run against a wiremock backend passed
//! with `--backend`.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `mobierp` binary with env isolation.
///
/// Clears all `MOBIERP_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn mobierp_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("mobierp");
    cmd.env("HOME", "/tmp/mobierp-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/mobierp-cli-test-nonexistent")
        .env_remove("MOBIERP_PROFILE")
        .env_remove("MOBIERP_BACKEND")
        .env_remove("MOBIERP_TOKEN")
        .env_remove("MOBIERP_OUTPUT")
        .env_remove("MOBIERP_INSECURE")
        .env_remove("MOBIERP_TIMEOUT");
    cmd
}

/// Run against `server` without blocking the async test's runtime.
async fn run_against(server: &MockServer, args: &[&str]) -> std::process::Output {
    let mut full = vec!["--backend".to_owned(), server.uri()];
    full.extend(args.iter().map(|a| (*a).to_owned()));
    tokio::task::spawn_blocking(move || mobierp_cmd().args(full).output().unwrap())
        .await
        .unwrap()
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

async fn mount_receives(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/purchase-receives"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "id": 3, "code": "PO-003", "status": "draft",
                  "supplier": { "id": 1, "name": "Zenith Ltd" } },
                { "id": 1, "code": "PO-001", "status": "approved",
                  "supplier": { "id": 2, "name": "Acme Corp" } },
                { "id": 2, "code": "PO-002", "status": "draft",
                  "supplier": { "id": 2, "name": "Acme Corp" } }
            ]
        })))
        .mount(server)
        .await;
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn no_args_shows_help() {
    let output = mobierp_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        stderr(&output)
    );
    assert!(text.contains("Usage"), "expected usage text:\n{text}");
}

#[test]
fn help_lists_record_verbs() {
    mobierp_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("list")
            .and(predicate::str::contains("transition"))
            .and(predicate::str::contains("routes")),
    );
}

#[test]
fn version_flag() {
    mobierp_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mobierp"));
}

#[test]
fn completions_zsh() {
    mobierp_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn invalid_output_format() {
    mobierp_cmd()
        .args(["--output", "xml", "routes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("possible values").or(predicate::str::contains("invalid")));
}

// ── Static catalogs ─────────────────────────────────────────────────

#[test]
fn routes_cover_every_screen() {
    let output = mobierp_cmd().args(["-o", "json", "routes"]).output().unwrap();
    assert!(output.status.success());

    let routes = stdout_json(&output);
    let names: Vec<&str> = routes
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names[0], "home");
    assert!(names.contains(&"purchase-receive/list"));
    assert!(names.contains(&"warranty/form"));
    assert_eq!(names.len(), 1 + 15 * 3);
}

#[test]
fn kinds_plain_lists_names() {
    mobierp_cmd()
        .args(["-o", "plain", "kinds"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("sales-delivery")
                .and(predicate::str::contains("material-request")),
        );
}

#[test]
fn config_show_without_file_succeeds() {
    mobierp_cmd().args(["config", "show"]).assert().success();
}

// ── Connection errors ───────────────────────────────────────────────

#[test]
fn list_without_backend_explains_setup() {
    mobierp_cmd()
        .args(["list", "products"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No backend configured"));
}

#[test]
fn unknown_profile_is_reported() {
    mobierp_cmd()
        .args(["--profile", "staging", "list", "products"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("staging"));
}

#[test]
fn unknown_kind_is_a_usage_error() {
    let output = mobierp_cmd()
        .args(["--backend", "http://127.0.0.1:9", "list", "invoices"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Unknown record kind"));
}

// ── Record commands against a backend ───────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn list_applies_search_and_sort() {
    let server = MockServer::start().await;
    mount_receives(&server).await;

    let output = run_against(
        &server,
        &["-o", "json", "list", "purchase-receives", "--search", "ACME", "--sort", "asc"],
    )
    .await;
    assert!(output.status.success(), "{}", stderr(&output));

    let codes: Vec<String> = stdout_json(&output)
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["code"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(codes, ["PO-001", "PO-002"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn list_facet_filters_by_status() {
    let server = MockServer::start().await;
    mount_receives(&server).await;

    let output = run_against(
        &server,
        &["-o", "plain", "list", "purchase-receive", "--facet", "draft"],
    )
    .await;
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "3\n2");
}

#[tokio::test(flavor = "multi_thread")]
async fn list_backend_failure_exits_nonzero() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/warranties"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "boom" })))
        .mount(&server)
        .await;

    let output = run_against(&server, &["list", "warranties"]).await;
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Could not load warranties"));
}

#[tokio::test(flavor = "multi_thread")]
async fn get_missing_record_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products/404"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let output = run_against(&server, &["get", "product", "404"]).await;
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Could not load product"));
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_requires_yes_when_not_interactive() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let output = run_against(&server, &["delete", "purchase-receive", "5"]).await;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("requires confirmation"));
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_with_yes_sends_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/purchase-receives/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "id": 5, "code": "PO-005", "status": "draft" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/purchase-receives/5"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_against(&server, &["--yes", "delete", "purchase-receive", "5"]).await;
    assert!(output.status.success(), "{}", stderr(&output));
}

#[tokio::test(flavor = "multi_thread")]
async fn illegal_transition_is_rejected_locally() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/sales-deliveries/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 9, "code": "SD-009", "status": "completed"
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let output = run_against(
        &server,
        &["--yes", "transition", "sales-delivery", "9", "cancelled"],
    )
    .await;
    assert_eq!(output.status.code(), Some(6));
    assert!(stderr(&output).contains("completed"));
}

#[tokio::test(flavor = "multi_thread")]
async fn create_posts_assignments() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/warehouses"))
        .and(body_json(json!({ "code": "WH-02", "name": "North" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": { "id": 12, "code": "WH-02", "name": "North" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_against(
        &server,
        &["-o", "json", "create", "warehouse", "--set", "code=WH-02", "--set", "name=North"],
    )
    .await;
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout_json(&output)["id"], json!(12));
}

#[tokio::test(flavor = "multi_thread")]
async fn create_with_missing_fields_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let output = run_against(&server, &["create", "warehouse", "--set", "code=WH-03"]).await;
    assert!(!output.status.success());
    assert!(stderr(&output).contains("name"));
}
