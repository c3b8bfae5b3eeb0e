//! 도메인 타입 — 워크스페이스 전역에서 사용되는 공통 타입
//!
//! 어드바이저리 소스가 생성하고 CLI 등 소비자가 읽는 데이터 구조를 정의합니다.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 심각도 레벨
///
/// 어드바이저리에 기록된 취약점의 심각도입니다.
/// `Ord` 구현으로 비교가 가능합니다 (`Unknown < Low < Medium < High < Critical`).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Severity {
    /// 심각도 정보 없음
    #[default]
    #[serde(alias = "UNKNOWN", alias = "unknown")]
    Unknown,
    /// 낮은 심각도
    #[serde(alias = "LOW", alias = "low")]
    Low,
    /// 중간 심각도
    #[serde(alias = "MEDIUM", alias = "MODERATE", alias = "medium", alias = "moderate")]
    Medium,
    /// 높은 심각도
    #[serde(alias = "HIGH", alias = "high")]
    High,
    /// 치명적 — 즉시 대응 필요
    #[serde(alias = "CRITICAL", alias = "critical")]
    Critical,
}

impl Severity {
    /// 문자열에서 심각도를 파싱합니다.
    ///
    /// 대소문자를 구분하지 않습니다.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "unknown" | "none" | "info" => Some(Self::Unknown),
            "low" => Some(Self::Low),
            "medium" | "med" | "moderate" => Some(Self::Medium),
            "high" => Some(Self::High),
            "critical" | "crit" => Some(Self::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "Unknown"),
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
            Self::Critical => write!(f, "Critical"),
        }
    }
}

/// 탐지된 취약점
///
/// 어드바이저리 소스 하나가 패키지 하나에 대해 생성한 결과 레코드입니다.
/// 하나의 탐지 결과 안에서 `vulnerability_id`는 유일합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedVulnerability {
    /// 취약점 ID (예: CVE-2021-23337, GHSA-xxxx, RUSTSEC-2021-0001)
    pub vulnerability_id: String,
    /// 패키지 이름
    pub pkg_name: String,
    /// 패키지가 발견된 경로 (lockfile, 바이너리 등)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pkg_path: Option<String>,
    /// 설치된 버전
    pub installed_version: String,
    /// 수정된 버전 (여러 개면 `", "`로 연결)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_version: Option<String>,
    /// 심각도
    #[serde(default)]
    pub severity: Severity,
    /// 제목
    #[serde(default)]
    pub title: String,
    /// 상세 설명
    #[serde(default)]
    pub description: String,
    /// 참고 URL 목록
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,
    /// 이 레코드를 생성한 데이터 소스 이름
    pub data_source: String,
}

impl fmt::Display for DetectedVulnerability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {}@{} (fixed: {}, source: {})",
            self.vulnerability_id,
            self.severity,
            self.pkg_name,
            self.installed_version,
            self.fixed_version.as_deref().unwrap_or("N/A"),
            self.data_source,
        )
    }
}
