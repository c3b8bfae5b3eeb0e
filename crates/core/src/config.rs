//! 설정 관리 — vigil.toml 파싱 및 런타임 설정
//!
//! [`VigilConfig`]는 모든 섹션의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`VIGIL_DETECTOR_ADVISORY_DB_PATH=/opt/db` 형식)
//! 3. 설정 파일 (`vigil.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), vigil_core::error::VigilError> {
//! use vigil_core::config::VigilConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = VigilConfig::load("vigil.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = VigilConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, VigilError};

/// 어드바이저리 DB 파일 하나의 최대 허용 크기 상한 (500 MB)
const MAX_DB_FILE_SIZE_LIMIT: u64 = 500 * 1024 * 1024;

/// 어드바이저리 DB 전체 엔트리 수 상한
const MAX_DB_ENTRIES_LIMIT: usize = 10_000_000;

/// 경로 문자열 최대 길이
const MAX_PATH_LEN: usize = 4096;

/// Vigil 통합 설정
///
/// `vigil.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VigilConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 라이브러리 탐지기 설정
    #[serde(default)]
    pub detector: DetectorConfig,
}

impl VigilConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, VigilError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, VigilError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                VigilError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                VigilError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, VigilError> {
        toml::from_str(toml_str).map_err(|e| {
            VigilError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `VIGIL_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "VIGIL_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "VIGIL_GENERAL_LOG_FORMAT");

        // Detector
        override_string(
            &mut self.detector.advisory_db_path,
            "VIGIL_DETECTOR_ADVISORY_DB_PATH",
        );
        override_u64(
            &mut self.detector.max_db_file_size,
            "VIGIL_DETECTOR_MAX_DB_FILE_SIZE",
        );
        override_usize(
            &mut self.detector.max_db_entries,
            "VIGIL_DETECTOR_MAX_DB_ENTRIES",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), VigilError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        self.detector.validate()
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 라이브러리 탐지기 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// 어드바이저리 DB 디렉토리 (`*.json` 파일 모음)
    pub advisory_db_path: String,
    /// DB 파일 하나의 최대 크기 (바이트)
    pub max_db_file_size: u64,
    /// 로드할 전체 엔트리 최대 개수
    pub max_db_entries: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            advisory_db_path: "/var/lib/vigil/advisory-db".to_owned(),
            max_db_file_size: 50 * 1024 * 1024, // 50 MB
            max_db_entries: 1_000_000,
        }
    }
}

impl DetectorConfig {
    /// 탐지기 설정을 검증합니다.
    ///
    /// # 검증 규칙
    ///
    /// - `advisory_db_path`: 비어있지 않고 `..` 컴포넌트를 포함하지 않음
    /// - `max_db_file_size`: 1-524288000 (500MB)
    /// - `max_db_entries`: 1-10000000
    pub fn validate(&self) -> Result<(), VigilError> {
        if self.advisory_db_path.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "detector.advisory_db_path".to_owned(),
                reason: "must not be empty".to_owned(),
            }
            .into());
        }

        if Path::new(&self.advisory_db_path)
            .components()
            .any(|c| c == std::path::Component::ParentDir)
        {
            return Err(ConfigError::InvalidValue {
                field: "detector.advisory_db_path".to_owned(),
                reason: "contains path traversal pattern '..'".to_owned(),
            }
            .into());
        }

        if self.advisory_db_path.len() > MAX_PATH_LEN {
            return Err(ConfigError::InvalidValue {
                field: "detector.advisory_db_path".to_owned(),
                reason: format!("exceeds maximum length {MAX_PATH_LEN}"),
            }
            .into());
        }

        if self.max_db_file_size == 0 || self.max_db_file_size > MAX_DB_FILE_SIZE_LIMIT {
            return Err(ConfigError::InvalidValue {
                field: "detector.max_db_file_size".to_owned(),
                reason: format!("must be 1-{MAX_DB_FILE_SIZE_LIMIT}"),
            }
            .into());
        }

        if self.max_db_entries == 0 || self.max_db_entries > MAX_DB_ENTRIES_LIMIT {
            return Err(ConfigError::InvalidValue {
                field: "detector.max_db_entries".to_owned(),
                reason: format!("must be 1-{MAX_DB_ENTRIES_LIMIT}"),
            }
            .into());
        }

        Ok(())
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}
