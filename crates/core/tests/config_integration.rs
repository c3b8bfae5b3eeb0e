//! vigil.toml 통합 설정 테스트
//!
//! - vigil.toml.example 파싱 테스트
//! - 환경변수 우선순위 테스트
//! - 파일 로딩 에러 테스트

use vigil_core::config::VigilConfig;
use vigil_core::error::{ConfigError, VigilError};

// =============================================================================
// vigil.toml.example 파싱 테스트
// =============================================================================

#[test]
fn example_config_parses_successfully() {
    let content = include_str!("../../../vigil.toml.example");
    let config = VigilConfig::parse(content).expect("example config should parse");

    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.general.log_format, "pretty");
    assert_eq!(
        config.detector.advisory_db_path,
        "/var/lib/vigil/advisory-db"
    );
}

#[test]
fn example_config_passes_validation() {
    let content = include_str!("../../../vigil.toml.example");
    let config = VigilConfig::parse(content).expect("should parse");
    config
        .validate()
        .expect("example config should pass validation");
}

#[test]
fn example_config_matches_code_defaults() {
    let content = include_str!("../../../vigil.toml.example");
    let from_file = VigilConfig::parse(content).expect("should parse");
    let from_code = VigilConfig::default();

    assert_eq!(from_file.general.log_level, from_code.general.log_level);
    assert_eq!(from_file.general.log_format, from_code.general.log_format);
    assert_eq!(
        from_file.detector.advisory_db_path,
        from_code.detector.advisory_db_path
    );
    assert_eq!(
        from_file.detector.max_db_file_size,
        from_code.detector.max_db_file_size
    );
    assert_eq!(
        from_file.detector.max_db_entries,
        from_code.detector.max_db_entries
    );
}

// =============================================================================
// 환경변수 우선순위 테스트
// =============================================================================

#[test]
#[serial_test::serial]
fn env_override_takes_precedence_over_toml() {
    let toml = r#"
[general]
log_level = "info"
"#;

    let original = std::env::var("VIGIL_GENERAL_LOG_LEVEL").ok();
    // SAFETY: serial_test로 직렬화되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var("VIGIL_GENERAL_LOG_LEVEL", "error");
    }

    let mut config = VigilConfig::parse(toml).expect("should parse");
    config.apply_env_overrides();
    let result = config.general.log_level.clone();

    // SAFETY: 테스트 정리
    unsafe {
        match original {
            Some(val) => std::env::set_var("VIGIL_GENERAL_LOG_LEVEL", val),
            None => std::env::remove_var("VIGIL_GENERAL_LOG_LEVEL"),
        }
    }

    assert_eq!(result, "error");
}

#[test]
#[serial_test::serial]
fn env_override_db_path_and_limits() {
    let original_path = std::env::var("VIGIL_DETECTOR_ADVISORY_DB_PATH").ok();
    let original_entries = std::env::var("VIGIL_DETECTOR_MAX_DB_ENTRIES").ok();
    // SAFETY: serial_test로 직렬화되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var("VIGIL_DETECTOR_ADVISORY_DB_PATH", "/srv/advisories");
        std::env::set_var("VIGIL_DETECTOR_MAX_DB_ENTRIES", "500");
    }

    let mut config = VigilConfig::default();
    config.apply_env_overrides();

    // SAFETY: 테스트 정리
    unsafe {
        match original_path {
            Some(val) => std::env::set_var("VIGIL_DETECTOR_ADVISORY_DB_PATH", val),
            None => std::env::remove_var("VIGIL_DETECTOR_ADVISORY_DB_PATH"),
        }
        match original_entries {
            Some(val) => std::env::set_var("VIGIL_DETECTOR_MAX_DB_ENTRIES", val),
            None => std::env::remove_var("VIGIL_DETECTOR_MAX_DB_ENTRIES"),
        }
    }

    assert_eq!(config.detector.advisory_db_path, "/srv/advisories");
    assert_eq!(config.detector.max_db_entries, 500);
}

// =============================================================================
// 파일 로딩 테스트
// =============================================================================

#[tokio::test]
#[serial_test::serial]
async fn load_from_file_applies_validation() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("vigil.toml");
    std::fs::write(&path, "[general]\nlog_format = \"xml\"\n").expect("should write");

    let err = VigilConfig::load(&path).await.unwrap_err();
    assert!(matches!(
        err,
        VigilError::Config(ConfigError::InvalidValue { .. })
    ));
}

#[tokio::test]
#[serial_test::serial]
async fn load_valid_file() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("vigil.toml");
    std::fs::write(
        &path,
        "[detector]\nadvisory_db_path = \"/opt/vigil/db\"\nmax_db_entries = 42\n",
    )
    .expect("should write");

    let config = VigilConfig::load(&path).await.expect("should load");
    assert_eq!(config.detector.advisory_db_path, "/opt/vigil/db");
    assert_eq!(config.detector.max_db_entries, 42);
}

#[tokio::test]
async fn load_malformed_file_fails_with_parse_error() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[general\nlog_level = \"info\"\n").expect("should write");

    let err = VigilConfig::from_file(&path).await.unwrap_err();
    assert!(matches!(
        err,
        VigilError::Config(ConfigError::ParseFailed { .. })
    ));
}
