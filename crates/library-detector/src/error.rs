//! 라이브러리 탐지기 에러 타입
//!
//! 호출자에게 노출되는 두 에러는 의미가 다르므로 별도 타입으로 둡니다.
//!
//! - [`UnsupportedTypeError`]: 해당 패키지 유형을 처리할 드라이버가 없음
//! - [`DetectionError`]: 드라이버의 어드바이저리 소스 중 하나가 실패하여 탐지를 끝내지 못함
//!
//! [`DetectorError`]는 두 에러와 DB 로딩 에러를 묶는 상위 타입이며,
//! `From<DetectorError> for VigilError` 구현으로 `?` 전파가 가능합니다.

use vigil_core::error::VigilError;

use crate::types::Ecosystem;

/// 팩토리에 매핑이 없는 패키지 유형
///
/// 일시적 오류가 아니므로 재시도하지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported package type: {package_type}")]
pub struct UnsupportedTypeError {
    /// 요청된 패키지 유형 문자열 (원문 그대로)
    pub package_type: String,
}

impl UnsupportedTypeError {
    /// 새 에러를 생성합니다.
    pub fn new(package_type: impl Into<String>) -> Self {
        Self {
            package_type: package_type.into(),
        }
    }
}

/// 드라이버 탐지 실패
///
/// 어드바이저리 소스 하나의 실패를 어느 에코시스템, 어느 소스, 어느 패키지에서
/// 발생했는지와 함께 감쌉니다. 이 에러가 반환되면 부분 결과는 없습니다.
#[derive(Debug, thiserror::Error)]
#[error(
    "failed to detect {ecosystem} vulnerabilities for {package}@{version}: \
     aggregating {source_count} advisory sources, '{source_name}' failed: {source}"
)]
pub struct DetectionError {
    /// 드라이버 에코시스템
    pub ecosystem: Ecosystem,
    /// 실패한 어드바이저리 소스 이름
    pub source_name: String,
    /// 드라이버에 구성된 전체 소스 수
    pub source_count: usize,
    /// 조회한 패키지 이름
    pub package: String,
    /// 조회한 패키지 버전
    pub version: String,
    /// 원본 소스 에러
    #[source]
    pub source: AdvisoryError,
}

/// 어드바이저리 소스 에러
#[derive(Debug, thiserror::Error)]
pub enum AdvisoryError {
    /// 소스가 해석할 수 없는 버전 문자열
    #[error("invalid version '{version}': {reason}")]
    InvalidVersion {
        /// 입력 버전 문자열
        version: String,
        /// 실패 사유
        reason: String,
    },

    /// 데이터 저장소 조회 실패
    #[error("advisory store error: {0}")]
    Store(String),
}

/// 버전 비교기 에러
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComparerError {
    /// 버전 문자열 파싱 실패
    #[error("invalid version '{version}': {reason}")]
    InvalidVersion {
        /// 입력 버전 문자열
        version: String,
        /// 실패 사유
        reason: String,
    },

    /// 제약 조건 문자열 파싱 실패
    #[error("invalid constraint '{constraint}': {reason}")]
    InvalidConstraint {
        /// 입력 제약 조건
        constraint: String,
        /// 실패 사유
        reason: String,
    },
}

/// 어드바이저리 DB 에러
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// DB 파일/디렉토리 로딩 실패
    #[error("advisory db load error: {path}: {reason}")]
    Load {
        /// 파일 경로
        path: String,
        /// 실패 사유
        reason: String,
    },

    /// DB JSON 파싱 실패
    #[error("advisory db parse error: {0}")]
    Parse(String),
}

/// 라이브러리 탐지기 상위 에러
#[derive(Debug, thiserror::Error)]
pub enum DetectorError {
    /// 지원하지 않는 패키지 유형
    #[error(transparent)]
    UnsupportedType(#[from] UnsupportedTypeError),

    /// 탐지 실패
    #[error(transparent)]
    Detection(#[from] DetectionError),

    /// DB 로딩 실패
    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<DetectorError> for VigilError {
    fn from(err: DetectorError) -> Self {
        match err {
            DetectorError::UnsupportedType(e) => VigilError::UnsupportedType(e.package_type),
            DetectorError::Detection(e) => VigilError::Detection(e.to_string()),
            DetectorError::Db(e) => VigilError::AdvisoryDb(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_detection_error() -> DetectionError {
        DetectionError {
            ecosystem: Ecosystem::Npm,
            source_name: "ghsa".to_owned(),
            source_count: 3,
            package: "lodash".to_owned(),
            version: "4.17.15".to_owned(),
            source: AdvisoryError::Store("bucket missing".to_owned()),
        }
    }

    #[test]
    fn unsupported_type_error_display() {
        let err = UnsupportedTypeError::new("unknown-type");
        assert_eq!(err.to_string(), "unsupported package type: unknown-type");
        assert_eq!(err.package_type, "unknown-type");
    }

    #[test]
    fn detection_error_display_has_context() {
        let msg = sample_detection_error().to_string();
        assert!(msg.contains("npm"));
        assert!(msg.contains("lodash@4.17.15"));
        assert!(msg.contains("ghsa"));
        assert!(msg.contains("3 advisory sources"));
        assert!(msg.contains("bucket missing"));
    }

    #[test]
    fn detection_error_exposes_source() {
        use std::error::Error;
        let err = sample_detection_error();
        let source = err.source().expect("should have a source");
        assert!(source.to_string().contains("bucket missing"));
    }

    #[test]
    fn advisory_error_invalid_version_display() {
        let err = AdvisoryError::InvalidVersion {
            version: "not.a.version".to_owned(),
            reason: "unexpected character".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("not.a.version"));
        assert!(msg.contains("unexpected character"));
    }

    #[test]
    fn comparer_error_display() {
        let err = ComparerError::InvalidConstraint {
            constraint: ">>1.0".to_owned(),
            reason: "unknown operator".to_owned(),
        };
        assert!(err.to_string().contains(">>1.0"));
    }

    #[test]
    fn db_error_display() {
        let err = DbError::Load {
            path: "/var/lib/vigil/advisory-db/npm.json".to_owned(),
            reason: "file not found".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("npm.json"));
        assert!(msg.contains("file not found"));
    }

    #[test]
    fn detector_error_kinds_stay_distinct_in_vigil_error() {
        let unsupported: VigilError =
            DetectorError::from(UnsupportedTypeError::new("pip")).into();
        assert!(matches!(unsupported, VigilError::UnsupportedType(ref t) if t == "pip"));

        let detection: VigilError = DetectorError::from(sample_detection_error()).into();
        assert!(matches!(detection, VigilError::Detection(_)));

        let db: VigilError = DetectorError::from(DbError::Parse("bad".to_owned())).into();
        assert!(matches!(db, VigilError::AdvisoryDb(_)));
    }
}
