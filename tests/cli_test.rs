//! Binary-level checks for the one-shot subcommands.

use assert_cmd::Command;
use std::fs;
use tempfile::TempDir;

fn appseed(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("appseed").unwrap();
    cmd.current_dir(dir.path()).env_remove("RUST_LOG");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap()
}

#[test]
fn humanize_prints_durations_and_sizes() {
    let dir = TempDir::new().unwrap();
    assert_eq!(stdout_of(appseed(&dir).args(["humanize", "3900000"])), "1h 5m\n");
    assert_eq!(stdout_of(appseed(&dir).args(["humanize", "0"])), "0ms\n");
    assert_eq!(
        stdout_of(appseed(&dir).args(["humanize", "--bytes", "1000", "--si"])),
        "1 KB\n"
    );
}

#[test]
fn uuid_prints_requested_count() {
    let dir = TempDir::new().unwrap();
    let out = stdout_of(appseed(&dir).args(["uuid", "-n", "3"]));
    let ids: Vec<&str> = out.lines().collect();
    assert_eq!(ids.len(), 3);
    assert!(ids.iter().all(|id| id.len() == 36 && id.as_bytes()[14] == b'4'));
}

#[test]
fn launch_url_uses_discovered_config() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".appseed.toml"),
        "[launch]\norigin = \"http://seed.test:9070\"\ntest_name = \"smoke\"\n",
    )
    .unwrap();

    let out = stdout_of(appseed(&dir).args([
        "launch-url",
        "--function",
        "--code",
        "function () { done(); }",
        "--frame",
        "with-cors-iframe",
    ]));
    assert_eq!(
        out.trim_end(),
        "http://seed.test:9070/agents/JavaScript/app.html?&testName=smoke\
         &code=%20done()%3B%20&withCorsIframe=true"
    );
}

#[test]
fn launch_url_function_without_code_is_a_usage_error() {
    let dir = TempDir::new().unwrap();
    let output = appseed(&dir).args(["launch-url", "--function"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("E042"));
}

#[test]
fn launch_url_json_has_window_defaults() {
    let dir = TempDir::new().unwrap();
    let out = stdout_of(appseed(&dir).args(["launch-url", "--empty", "--json"]));
    let window: serde_json::Value = serde_json::from_str(&out).unwrap();

    assert_eq!(window["defaultTop"], 220);
    assert_eq!(window["autoShow"], true);
    assert_eq!(window["name"].as_str().map(str::len), Some(36));
    assert!(window["url"]
        .as_str()
        .unwrap()
        .starts_with("http://localhost:9070/agents/JavaScript/empty.html?&testName="));
}

#[test]
fn init_creates_config_once() {
    let dir = TempDir::new().unwrap();
    appseed(&dir).arg("init").assert().success();
    assert!(dir.path().join(".appseed.toml").exists());

    let output = appseed(&dir).arg("init").output().unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("--force"));

    appseed(&dir).args(["init", "--force"]).assert().success();
}

#[test]
fn explicit_broken_config_exits_with_config_code() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[server]\nport = \"eighty\"\n").unwrap();

    let output = appseed(&dir)
        .args(["--config", path.to_str().unwrap(), "uuid"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn serve_with_missing_root_fails_fast() {
    let dir = TempDir::new().unwrap();
    let output = appseed(&dir)
        .args(["serve", "--port", "0", "--host", "127.0.0.1", "--root", "missing"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(5));
    assert!(String::from_utf8_lossy(&output.stderr).contains("E061"));
}
