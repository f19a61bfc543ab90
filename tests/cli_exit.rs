// tests/cli_exit.rs - Exit code tests
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const TOOLS_OFF: &str = r#"
[tools]
lighthouse = ["siteforge-test-no-lighthouse"]
chrome = "siteforge-test-no-chrome"
settle_ms = 0
"#;

fn project(index: &str) -> TempDir {
    let d = tempfile::tempdir().unwrap();
    let dist = d.path().join("dist");
    fs::create_dir_all(dist.join("images")).unwrap();
    fs::write(dist.join("index.html"), index).unwrap();
    fs::write(dist.join("images/logo.png"), b"png").unwrap();
    fs::write(d.path().join("siteforge.toml"), TOOLS_OFF).unwrap();
    d
}

const VALID: &str = r#"<html><head><title>T</title>
<meta name="description" content="d"><meta property="og:title" content="T">
</head><body><img src="/images/logo.png"></body></html>"#;

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_siteforge"))
        .args(args)
        .current_dir(dir)
        .env_remove("OPENROUTER_API_KEY")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn report(dir: &Path) -> serde_json::Value {
    let text = fs::read_to_string(dir.join("forge-report.json")).unwrap();
    serde_json::from_str(&text).unwrap()
}

#[test]
fn test_exit_0_when_tools_absent() {
    let d = project(VALID);
    let out = run(d.path(), &[]);
    assert_eq!(out.status.code(), Some(0), "{}", String::from_utf8_lossy(&out.stdout));

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("[1/5] Running ASSETS check..."));
    assert!(stdout.contains("[5/5] Running VISION check..."));

    let r = report(d.path());
    assert_eq!(r["overall"], "PASS");
    assert_eq!(r["checks"]["lighthouse"]["status"], "SKIP");
    assert_eq!(r["checks"]["screenshots"]["status"], "SKIP");
    assert_eq!(r["checks"]["vision"]["details"], "no baseline provided");
    assert!(r["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[test]
fn test_exit_1_on_missing_asset() {
    let d = project(VALID);
    fs::remove_file(d.path().join("dist/images/logo.png")).unwrap();
    let out = run(d.path(), &[]);
    assert_eq!(out.status.code(), Some(1));

    let r = report(d.path());
    assert_eq!(r["overall"], "FAIL");
    assert_eq!(r["checks"]["assets"]["missing"][0], "/images/logo.png");
    assert_eq!(r["checks"]["build"]["details"], "not run");
}

#[test]
fn test_exit_1_on_missing_dir() {
    let d = project(VALID);
    let out = run(d.path(), &["--dir", "nowhere"]);
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(report(d.path())["checks"]["assets"]["status"], "FAIL");
}

#[test]
fn test_exit_2_on_bad_threshold() {
    let d = project(VALID);
    let out = run(d.path(), &["--threshold", "11"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(!d.path().join("forge-report.json").exists());
}

#[test]
fn test_exit_2_on_missing_config() {
    let d = project(VALID);
    let out = run(d.path(), &["--config", "missing.toml"]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn test_json_flag_prints_report() {
    let d = project(VALID);
    let out = run(d.path(), &["--json", "--report", "out/custom.json"]);
    assert_eq!(out.status.code(), Some(0));

    let printed: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(printed["overall"], "PASS");
    assert!(d.path().join("out/custom.json").is_file());
}
