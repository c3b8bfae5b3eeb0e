//! 어드바이저리 DB -- 로컬 JSON DB 로딩 및 조회
//!
//! [`AdvisoryDb`]는 로컬 파일시스템의 JSON 파일에서 어드바이저리를 로드하여
//! `(데이터 소스, 에코시스템, 패키지)` 키로 인덱싱합니다. 로드 후에는 불변이며
//! `Arc`로 여러 드라이버가 공유합니다.
//!
//! # DB 디렉토리 구조
//!
//! 디렉토리의 모든 `*.json` 파일을 파일 이름 순서로 읽습니다.
//!
//! ```text
//! /var/lib/vigil/advisory-db/
//!   ghsa.json
//!   npm.json
//!   rustsec.json
//! ```
//!
//! # JSON 형식
//!
//! ```json
//! [
//!   {
//!     "vulnerability_id": "CVE-2021-23337",
//!     "package": "lodash",
//!     "ecosystem": "npm",
//!     "source": "ghsa",
//!     "vulnerable_versions": ["< 4.17.21"],
//!     "patched_versions": ["4.17.21"],
//!     "severity": "HIGH",
//!     "title": "Command Injection in lodash"
//!   }
//! ]
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use vigil_core::types::Severity;

use crate::error::DbError;
use crate::types::{DataSource, Ecosystem};

/// 어드바이저리 DB 파일 최대 크기 (50 MB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// 전체 어드바이저리 엔트리 최대 개수 (1,000,000개)
pub const DEFAULT_MAX_ENTRIES: usize = 1_000_000;

/// 어드바이저리 DB 엔트리
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryEntry {
    /// 취약점 ID (CVE, GHSA, RUSTSEC 등)
    pub vulnerability_id: String,
    /// 영향받는 패키지명
    pub package: String,
    /// 패키지 에코시스템
    pub ecosystem: Ecosystem,
    /// 이 엔트리를 제공한 데이터 소스
    pub source: DataSource,
    /// 취약한 버전 제약 조건 목록
    #[serde(default)]
    pub vulnerable_versions: Vec<String>,
    /// 수정된 버전 제약 조건 목록
    #[serde(default)]
    pub patched_versions: Vec<String>,
    /// 영향받지 않는 버전 제약 조건 목록
    #[serde(default)]
    pub unaffected_versions: Vec<String>,
    /// 심각도
    #[serde(default)]
    pub severity: Severity,
    /// 제목
    #[serde(default)]
    pub title: String,
    /// 설명
    #[serde(default)]
    pub description: String,
    /// 참고 URL
    #[serde(default)]
    pub references: Vec<String>,
}

impl AdvisoryEntry {
    /// 버전 제약과 메타데이터가 비어 있는 엔트리를 생성합니다.
    pub fn new(
        source: DataSource,
        ecosystem: Ecosystem,
        package: impl Into<String>,
        vulnerability_id: impl Into<String>,
    ) -> Self {
        Self {
            vulnerability_id: vulnerability_id.into(),
            package: package.into(),
            ecosystem,
            source,
            vulnerable_versions: Vec::new(),
            patched_versions: Vec::new(),
            unaffected_versions: Vec::new(),
            severity: Severity::Unknown,
            title: String::new(),
            description: String::new(),
            references: Vec::new(),
        }
    }
}

type IndexKey = (DataSource, Ecosystem, String);

/// 어드바이저리 데이터베이스
///
/// # 인덱싱
///
/// O(1) 조회를 위해 `(source, ecosystem, 정규화된 패키지명)` 키의 HashMap을 사용합니다.
/// 같은 키의 엔트리는 로드 순서를 유지합니다.
#[derive(Debug, Default)]
pub struct AdvisoryDb {
    entries: Vec<AdvisoryEntry>,
    index: HashMap<IndexKey, Vec<usize>>,
}

impl AdvisoryDb {
    /// 빈 데이터베이스를 생성합니다.
    pub fn empty() -> Self {
        Self::default()
    }

    fn build_index(entries: &[AdvisoryEntry]) -> HashMap<IndexKey, Vec<usize>> {
        let mut index: HashMap<IndexKey, Vec<usize>> = HashMap::new();
        for (idx, entry) in entries.iter().enumerate() {
            let key = (
                entry.source,
                entry.ecosystem,
                entry.ecosystem.normalize_name(&entry.package),
            );
            index.entry(key).or_default().push(idx);
        }
        index
    }

    /// 엔트리 목록으로 데이터베이스를 생성합니다.
    pub fn from_entries(entries: Vec<AdvisoryEntry>) -> Self {
        let index = Self::build_index(&entries);
        Self { entries, index }
    }

    /// JSON 문자열에서 데이터베이스를 파싱합니다.
    ///
    /// JSON 형식: `AdvisoryEntry` 배열
    pub fn from_json(json: &str) -> Result<Self, DbError> {
        let entries: Vec<AdvisoryEntry> = serde_json::from_str(json)
            .map_err(|e| DbError::Parse(format!("failed to parse advisory db JSON: {e}")))?;
        Ok(Self::from_entries(entries))
    }

    /// 디렉토리의 모든 `*.json` 파일을 기본 제한으로 로드합니다.
    pub fn load_from_dir(dir_path: &Path) -> Result<Self, DbError> {
        Self::load_from_dir_with_limits(dir_path, DEFAULT_MAX_FILE_SIZE, DEFAULT_MAX_ENTRIES)
    }

    /// 디렉토리의 모든 `*.json` 파일을 로드합니다.
    ///
    /// 파일은 이름 순으로 정렬하여 읽으므로 같은 디렉토리에서는 항상 같은
    /// 엔트리 순서를 얻습니다.
    ///
    /// # 보안 제한
    ///
    /// - 파일당 최대 `max_file_size` 바이트 (초과 시 에러)
    /// - 전체 엔트리 최대 `max_entries`개 (초과 시 에러, 일부만 로드한 DB는 반환하지 않음)
    ///
    /// # Note
    ///
    /// 이 함수는 동기 I/O를 수행합니다. async 컨텍스트에서 호출할 때는
    /// `tokio::task::spawn_blocking`으로 감싸세요.
    pub fn load_from_dir_with_limits(
        dir_path: &Path,
        max_file_size: u64,
        max_entries: usize,
    ) -> Result<Self, DbError> {
        let load_err = |path: &Path, reason: String| DbError::Load {
            path: path.display().to_string(),
            reason,
        };

        let read_dir = std::fs::read_dir(dir_path).map_err(|e| load_err(dir_path, e.to_string()))?;

        let mut files = Vec::new();
        for dir_entry in read_dir {
            let path = dir_entry.map_err(|e| load_err(dir_path, e.to_string()))?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        files.sort();

        if files.is_empty() {
            tracing::warn!(path = %dir_path.display(), "advisory db directory has no JSON files");
        }

        let mut all_entries = Vec::new();

        for file_path in &files {
            let metadata =
                std::fs::metadata(file_path).map_err(|e| load_err(file_path, e.to_string()))?;

            let file_size = metadata.len();
            if file_size > max_file_size {
                return Err(load_err(
                    file_path,
                    format!("file size {file_size} bytes exceeds maximum {max_file_size} bytes"),
                ));
            }

            let content =
                std::fs::read_to_string(file_path).map_err(|e| load_err(file_path, e.to_string()))?;

            let entries: Vec<AdvisoryEntry> = serde_json::from_str(&content).map_err(|e| {
                DbError::Parse(format!("failed to parse {}: {e}", file_path.display()))
            })?;

            // 전체 엔트리 수 제한 체크
            if all_entries.len() + entries.len() > max_entries {
                return Err(load_err(
                    file_path,
                    format!("entry limit {max_entries} exceeded"),
                ));
            }

            tracing::info!(
                path = %file_path.display(),
                entries = entries.len(),
                "loaded advisory db file"
            );

            all_entries.extend(entries);
        }

        metrics::gauge!(vigil_core::metrics::ADVISORY_DB_ENTRIES).set(all_entries.len() as f64);

        Ok(Self::from_entries(all_entries))
    }

    /// 데이터베이스 내 전체 엔트리 수를 반환합니다.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// 데이터 소스, 에코시스템, 패키지 이름으로 엔트리를 조회합니다.
    ///
    /// 패키지 이름은 에코시스템 규칙으로 정규화하여 비교합니다.
    pub fn lookup(&self, source: DataSource, ecosystem: Ecosystem, package: &str) -> Vec<&AdvisoryEntry> {
        let key = (source, ecosystem, ecosystem.normalize_name(package));
        match self.index.get(&key) {
            Some(indices) => indices.iter().filter_map(|&idx| self.entries.get(idx)).collect(),
            None => Vec::new(),
        }
    }

    /// 전체 엔트리에 대한 참조를 반환합니다.
    pub fn entries(&self) -> &[AdvisoryEntry] {
        &self.entries
    }
}
