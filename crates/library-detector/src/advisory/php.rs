//! PHP Security Advisories (`php-security-advisories`)
//!
//! FriendsOfPHP 피드는 브랜치별 범위를 `|` 하나로 구분합니다
//! (`>=1.0.0,<1.2.5|>=2.0.0,<2.1.1`). 비교 전에 `||` 대안으로 바꿉니다.

use std::sync::Arc;

use vigil_core::types::DetectedVulnerability;

use super::{Advisory, detect_in_bucket};
use crate::comparer::{Comparer, GenericComparer};
use crate::db::AdvisoryDb;
use crate::error::{AdvisoryError, ComparerError};
use crate::types::{DataSource, Ecosystem};

/// PHP 어드바이저리 소스 (Composer 전용)
pub struct PhpAdvisory {
    db: Arc<AdvisoryDb>,
}

impl PhpAdvisory {
    /// 새 소스를 생성합니다.
    pub fn new(db: Arc<AdvisoryDb>) -> Self {
        Self { db }
    }
}

/// `|` 브랜치 구분자를 `||`로 정규화합니다.
fn normalize_branches(constraint: &str) -> String {
    constraint
        .split('|')
        .map(str::trim)
        .filter(|branch| !branch.is_empty())
        .collect::<Vec<_>>()
        .join(" || ")
}

/// 제약 조건마다 `|` 브랜치를 정규화한 뒤 [`GenericComparer`]에 위임합니다.
///
/// 엔트리는 복사하지 않고 기본 `is_vulnerable` 로직이 그대로 쓰입니다.
struct BranchComparer;

impl Comparer for BranchComparer {
    fn name(&self) -> &str {
        "php-branches"
    }

    fn matches(&self, version: &str, constraint: &str) -> Result<bool, ComparerError> {
        GenericComparer.matches(version, &normalize_branches(constraint))
    }
}

impl Advisory for PhpAdvisory {
    fn name(&self) -> &str {
        DataSource::PhpSecurityAdvisories.as_str()
    }

    fn detect_vulnerabilities(
        &self,
        pkg_name: &str,
        pkg_ver: &str,
    ) -> Result<Vec<DetectedVulnerability>, AdvisoryError> {
        Ok(detect_in_bucket(
            &self.db,
            DataSource::PhpSecurityAdvisories,
            Ecosystem::Composer,
            pkg_name,
            pkg_ver,
            |entry| BranchComparer.is_vulnerable(pkg_ver, entry),
        ))
    }
}
