//! 도메인 타입 -- 에코시스템, 패키지 유형, 데이터 소스, 스캔 대상
//!
//! 패키지 유형(`PackageType`)은 lockfile/바이너리 종류 단위의 분류이고,
//! 에코시스템(`Ecosystem`)은 어드바이저리 데이터가 기록되는 단위입니다.
//! 여러 패키지 유형이 하나의 에코시스템을 공유할 수 있습니다 (예: `yarn` -> `npm`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnsupportedTypeError;

/// 패키지 에코시스템
///
/// 어드바이저리 DB의 키, 메트릭 레이블, 출력에 쓰이는 문자열 형식은
/// 소문자로 고정되어 있습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ecosystem {
    /// Rust (crates.io)
    Cargo,
    /// PHP (Packagist)
    Composer,
    /// JavaScript (npm registry)
    Npm,
    /// .NET
    #[serde(rename = "nuget")]
    NuGet,
    /// Java (Maven Central)
    Maven,
    /// Go modules
    Go,
}

impl Ecosystem {
    /// 모든 에코시스템 (표시 순서)
    pub const ALL: [Ecosystem; 6] = [
        Self::Cargo,
        Self::Composer,
        Self::Npm,
        Self::NuGet,
        Self::Maven,
        Self::Go,
    ];

    /// 고정 문자열 형식을 반환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cargo => "cargo",
            Self::Composer => "composer",
            Self::Npm => "npm",
            Self::NuGet => "nuget",
            Self::Maven => "maven",
            Self::Go => "go",
        }
    }

    /// 패키지 이름 비교 시 대소문자를 무시하는 에코시스템인지 여부
    ///
    /// Packagist, NuGet, Maven 좌표는 대소문자를 구분하지 않습니다.
    pub fn case_insensitive_names(&self) -> bool {
        matches!(self, Self::Composer | Self::NuGet | Self::Maven)
    }

    /// 어드바이저리 DB 인덱스 키로 쓸 패키지 이름을 정규화합니다.
    pub fn normalize_name(&self, name: &str) -> String {
        if self.case_insensitive_names() {
            name.to_lowercase()
        } else {
            name.to_owned()
        }
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 패키지 유형 (lockfile, 바이너리, 매니페스트 종류)
///
/// 알려져 있지만 라이브러리 탐지기가 다루지 않는 유형(`pip` 등)도 열거해 두며,
/// 이들은 팩토리에서 [`UnsupportedTypeError`]가 됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageType {
    /// `Cargo.lock`
    Cargo,
    /// `composer.lock`
    Composer,
    /// `package-lock.json`
    Npm,
    /// `yarn.lock`
    Yarn,
    /// 설치된 node 패키지 (`node_modules/*/package.json`)
    NodePkg,
    /// 번들된 JavaScript 파일
    JavaScript,
    /// `packages.lock.json`
    NuGet,
    /// Java 아카이브 (jar, war, ear)
    Jar,
    /// Go 빌드 바이너리
    GoBinary,
    /// `go.mod`
    GoMod,
    /// `requirements.txt`
    Pip,
    /// `Pipfile.lock`
    Pipenv,
    /// `poetry.lock`
    Poetry,
    /// `Gemfile.lock`
    Bundler,
    /// `*.gemspec`
    GemSpec,
    /// `conan.lock`
    Conan,
}

impl PackageType {
    /// 알려진 모든 패키지 유형
    pub const ALL: [PackageType; 16] = [
        Self::Cargo,
        Self::Composer,
        Self::Npm,
        Self::Yarn,
        Self::NodePkg,
        Self::JavaScript,
        Self::NuGet,
        Self::Jar,
        Self::GoBinary,
        Self::GoMod,
        Self::Pip,
        Self::Pipenv,
        Self::Poetry,
        Self::Bundler,
        Self::GemSpec,
        Self::Conan,
    ];

    /// 식별자 문자열을 반환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cargo => "cargo",
            Self::Composer => "composer",
            Self::Npm => "npm",
            Self::Yarn => "yarn",
            Self::NodePkg => "node-pkg",
            Self::JavaScript => "javascript",
            Self::NuGet => "nuget",
            Self::Jar => "jar",
            Self::GoBinary => "gobinary",
            Self::GoMod => "gomod",
            Self::Pip => "pip",
            Self::Pipenv => "pipenv",
            Self::Poetry => "poetry",
            Self::Bundler => "bundler",
            Self::GemSpec => "gemspec",
            Self::Conan => "conan",
        }
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageType {
    type Err = UnsupportedTypeError;

    /// 식별자는 정확히 일치해야 합니다 (대소문자 구분).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnsupportedTypeError::new(s))
    }
}

/// 어드바이저리 데이터 소스
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DataSource {
    /// 에코시스템별 기본 어드바이저리 (언어 생태계 공식 DB)
    #[serde(rename = "primary")]
    Primary,
    /// GitHub Security Advisory
    #[serde(rename = "ghsa")]
    Ghsa,
    /// RustSec Advisory Database
    #[serde(rename = "rustsec")]
    RustSec,
    /// FriendsOfPHP security-advisories
    #[serde(rename = "php-security-advisories")]
    PhpSecurityAdvisories,
    /// Node.js Security Working Group
    #[serde(rename = "nodejs-security-wg")]
    NodejsSecurityWg,
}

impl DataSource {
    /// 소스 이름을 반환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Ghsa => "ghsa",
            Self::RustSec => "rustsec",
            Self::PhpSecurityAdvisories => "php-security-advisories",
            Self::NodejsSecurityWg => "nodejs-security-wg",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 스캔 대상 패키지
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// 패키지 이름
    pub name: String,
    /// 설치된 버전
    pub version: String,
    /// 패키지가 발견된 파일 경로 (없으면 애플리케이션 경로 사용)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

impl Package {
    /// 새 패키지를 생성합니다.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            file_path: None,
        }
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

/// 스캔된 애플리케이션 -- 한 lockfile/바이너리에서 나온 패키지 묶음
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    /// 패키지 유형 식별자 (예: `npm`, `jar`)
    #[serde(rename = "type", alias = "package_type")]
    pub package_type: String,
    /// lockfile 또는 바이너리 경로
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    /// 패키지 목록
    #[serde(default)]
    pub packages: Vec<Package>,
}

impl fmt::Display for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Application({}, {}, {} packages)",
            self.package_type,
            self.file_path.as_deref().unwrap_or("-"),
            self.packages.len(),
        )
    }
}
