//! 에러 타입 — 워크스페이스 공통 에러 정의

/// Vigil 최상위 에러 타입
///
/// 도메인 크레이트의 에러는 `From` 구현을 통해 이 타입으로 변환됩니다.
#[derive(Debug, thiserror::Error)]
pub enum VigilError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 지원하지 않는 패키지 유형
    #[error("unsupported package type: {0}")]
    UnsupportedType(String),

    /// 취약점 탐지 실패
    #[error("detection error: {0}")]
    Detection(String),

    /// 어드바이저리 DB 로딩/파싱 실패
    #[error("advisory db error: {0}")]
    AdvisoryDb(String),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
