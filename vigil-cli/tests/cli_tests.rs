//! End-to-end tests for the `vigil` binary.
//!
//! Each test writes an advisory DB and a config file into a temp dir and
//! checks exit codes and JSON output.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const ADVISORIES: &str = r#"[
    {
        "vulnerability_id": "CVE-2021-23337",
        "package": "lodash",
        "ecosystem": "npm",
        "source": "ghsa",
        "vulnerable_versions": ["<4.17.21"],
        "patched_versions": ["4.17.21"],
        "severity": "HIGH"
    },
    {
        "vulnerability_id": "RUSTSEC-2020-0071",
        "package": "time",
        "ecosystem": "cargo",
        "source": "rustsec",
        "patched_versions": [">= 0.2.23"]
    }
]"#;

/// Temp workspace with `db/advisories.json` and `vigil.toml`.
fn workspace() -> TempDir {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let db_dir = temp_dir.path().join("db");
    fs::create_dir(&db_dir).expect("should create db dir");
    fs::write(db_dir.join("advisories.json"), ADVISORIES).expect("should write advisories");

    let config = format!(
        "[general]\nlog_level = \"warn\"\n\n[detector]\nadvisory_db_path = \"{}\"\n",
        db_dir.display()
    );
    fs::write(temp_dir.path().join("vigil.toml"), config).expect("should write config");
    temp_dir
}

fn vigil(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_vigil"))
        .arg("--config")
        .arg(dir.join("vigil.toml"))
        .args(args)
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .output()
        .expect("should run vigil binary")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn test_detect_vulnerable_package_exits_4() {
    // Given: lodash below the patched version
    let dir = workspace();

    // When: Detecting with JSON output
    let output = vigil(
        dir.path(),
        &["detect", "--type", "npm", "lodash", "4.17.15", "--output", "json"],
    );

    // Then: Findings are printed and the exit code signals vulnerabilities
    assert_eq!(output.status.code(), Some(4));
    let report = stdout_json(&output);
    assert_eq!(report["ecosystem"].as_str(), Some("npm"));
    assert_eq!(
        report["findings"][0]["vulnerability_id"].as_str(),
        Some("CVE-2021-23337")
    );
    assert_eq!(report["findings"][0]["fixed_version"].as_str(), Some("4.17.21"));
}

#[test]
fn test_detect_clean_package_exits_0() {
    let dir = workspace();
    let output = vigil(
        dir.path(),
        &["detect", "--type", "yarn", "lodash", "4.17.21", "--output", "json"],
    );

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_json(&output)["summary"]["total"].as_u64(), Some(0));
}

#[test]
fn test_detect_unsupported_type_exits_3() {
    let dir = workspace();
    let output = vigil(dir.path(), &["detect", "--type", "pip", "django", "3.2.0"]);

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unsupported package type: pip"));
}

#[test]
fn test_detect_failure_exits_5() {
    // Given: rustsec rejects an empty version
    let dir = workspace();

    // When: Detecting a cargo package without a version
    let output = vigil(dir.path(), &["detect", "--type", "cargo", "time", ""]);

    // Then: Detection failure, not an unsupported type
    assert_eq!(output.status.code(), Some(5));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("'rustsec' failed"));
}

#[test]
fn test_detect_cargo_via_rustsec() {
    let dir = workspace();
    let output = vigil(
        dir.path(),
        &["detect", "--type", "cargo", "time", "0.1.45", "--output", "json"],
    );

    assert_eq!(output.status.code(), Some(4));
    let report = stdout_json(&output);
    assert_eq!(report["findings"][0]["data_source"].as_str(), Some("rustsec"));
}

#[test]
fn test_scan_skips_unsupported_applications() {
    // Given: One npm application and one pip application
    let dir = workspace();
    let apps = r#"[
        {"type": "npm", "file_path": "web/package-lock.json", "packages": [{"name": "lodash", "version": "4.17.15"}]},
        {"type": "pip", "file_path": "api/requirements.txt", "packages": [{"name": "django", "version": "3.2.0"}]}
    ]"#;
    let apps_path = dir.path().join("apps.json");
    fs::write(&apps_path, apps).expect("should write applications");

    // When: Scanning
    let apps_arg = apps_path.display().to_string();
    let output = vigil(dir.path(), &["scan", &apps_arg, "--output", "json"]);

    // Then: The pip application is skipped and the npm finding reported
    assert_eq!(output.status.code(), Some(4));
    let report = stdout_json(&output);
    assert_eq!(report["applications"].as_array().map(Vec::len), Some(1));
    assert_eq!(report["skipped"][0]["package_type"].as_str(), Some("pip"));
    assert_eq!(
        report["applications"][0]["findings"][0]["pkg_path"].as_str(),
        Some("web/package-lock.json")
    );
}

#[test]
fn test_scan_missing_file_exits_10() {
    let dir = workspace();
    let missing = dir.path().join("missing.json").display().to_string();
    let output = vigil(dir.path(), &["scan", &missing]);

    assert_eq!(output.status.code(), Some(10));
}

#[test]
fn test_scan_malformed_file_exits_1() {
    let dir = workspace();
    let apps_path = dir.path().join("apps.json");
    fs::write(&apps_path, "{ not json").expect("should write file");

    let apps_arg = apps_path.display().to_string();
    let output = vigil(dir.path(), &["scan", &apps_arg]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid application file"));
}

#[test]
fn test_types_lists_supported_types() {
    let dir = workspace();
    let output = vigil(dir.path(), &["types", "--output", "json"]);

    assert_eq!(output.status.code(), Some(0));
    let report = stdout_json(&output);
    assert_eq!(report["types"].as_array().map(Vec::len), Some(10));
}

#[test]
fn test_config_validate_valid_file() {
    let dir = workspace();
    let output = vigil(dir.path(), &["config", "validate", "--output", "json"]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_json(&output)["valid"].as_bool(), Some(true));
}

#[test]
fn test_config_validate_invalid_value_exits_2() {
    // Given: A config with an unknown log level
    let dir = TempDir::new().expect("should create temp dir");
    fs::write(
        dir.path().join("vigil.toml"),
        "[general]\nlog_level = \"verbose\"\n",
    )
    .expect("should write config");

    // When: Validating
    let output = vigil(dir.path(), &["config", "validate", "--output", "json"]);

    // Then: Reported invalid with a config exit code
    assert_eq!(output.status.code(), Some(2));
    let report = stdout_json(&output);
    assert_eq!(report["valid"].as_bool(), Some(false));
    assert!(
        report["errors"][0]
            .as_str()
            .is_some_and(|e| e.contains("general.log_level"))
    );
}

#[test]
fn test_invalid_config_blocks_detect() {
    let dir = TempDir::new().expect("should create temp dir");
    fs::write(dir.path().join("vigil.toml"), "[general\n").expect("should write config");

    let output = vigil(dir.path(), &["detect", "--type", "npm", "lodash", "4.17.15"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_config_show_detector_section() {
    let dir = workspace();
    let output = vigil(dir.path(), &["config", "show", "--section", "detector"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[detector]"));
    assert!(stdout.contains("advisory_db_path"));
}
