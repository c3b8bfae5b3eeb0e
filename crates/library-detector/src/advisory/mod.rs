//! 어드바이저리 소스 -- 하나의 데이터 소스에 대한 패키지 취약점 조회
//!
//! [`Advisory`] 트레이트는 드라이버가 조합하는 단위입니다. 각 구현체는
//! 공유 [`AdvisoryDb`]에서 자기 소스/에코시스템 버킷을 조회하고, 바인딩된
//! [`Comparer`]로 설치 버전이 영향받는지 판정합니다.
//!
//! | 구현체 | 데이터 소스 | 비교기 |
//! |---|---|---|
//! | [`EcosystemAdvisory`] | `primary` | 주입 |
//! | [`GhsaAdvisory`] | `ghsa` | 주입 |
//! | [`RustSecAdvisory`] | `rustsec` | [`CargoComparer`](crate::comparer::CargoComparer) |
//! | [`PhpAdvisory`] | `php-security-advisories` | [`GenericComparer`](crate::comparer::GenericComparer) |
//! | [`NodeAdvisory`] | `nodejs-security-wg` | [`NpmComparer`](crate::comparer::NpmComparer) |

pub mod ecosystem;
pub mod ghsa;
pub mod node;
pub mod php;
pub mod rustsec;

pub use ecosystem::EcosystemAdvisory;
pub use ghsa::GhsaAdvisory;
pub use node::NodeAdvisory;
pub use php::PhpAdvisory;
pub use rustsec::RustSecAdvisory;

use vigil_core::types::DetectedVulnerability;

use crate::comparer::Comparer;
use crate::db::{AdvisoryDb, AdvisoryEntry};
use crate::error::AdvisoryError;
use crate::types::{DataSource, Ecosystem};

/// 어드바이저리 소스
///
/// 구현체는 `Send + Sync`여야 하며, 하나의 드라이버를 여러 스레드에서
/// 동시에 사용할 수 있어야 합니다.
pub trait Advisory: Send + Sync {
    /// 소스 이름 (에러 메시지, 로그, CLI 출력용)
    fn name(&self) -> &str;

    /// 패키지 이름/버전에 해당하는 취약점을 조회합니다.
    ///
    /// 결과가 없으면 빈 벡터를 반환합니다. 에러는 소스 자체가 질의를
    /// 처리할 수 없을 때만 반환합니다.
    fn detect_vulnerabilities(
        &self,
        pkg_name: &str,
        pkg_ver: &str,
    ) -> Result<Vec<DetectedVulnerability>, AdvisoryError>;
}

/// 어드바이저리 엔트리를 탐지 결과 레코드로 변환합니다.
pub(crate) fn to_detected(
    entry: &AdvisoryEntry,
    pkg_name: &str,
    pkg_ver: &str,
) -> DetectedVulnerability {
    let fixed_version = if entry.patched_versions.is_empty() {
        None
    } else {
        Some(entry.patched_versions.join(", "))
    };

    DetectedVulnerability {
        vulnerability_id: entry.vulnerability_id.clone(),
        pkg_name: pkg_name.to_owned(),
        pkg_path: None,
        installed_version: pkg_ver.to_owned(),
        fixed_version,
        severity: entry.severity,
        title: entry.title.clone(),
        description: entry.description.clone(),
        references: entry.references.clone(),
        data_source: entry.source.to_string(),
    }
}

/// DB 버킷 하나를 조회하여 영향받는 엔트리만 저장 순서대로 반환합니다.
pub(crate) fn detect_in_bucket<F>(
    db: &AdvisoryDb,
    source: DataSource,
    ecosystem: Ecosystem,
    pkg_name: &str,
    pkg_ver: &str,
    is_vulnerable: F,
) -> Vec<DetectedVulnerability>
where
    F: Fn(&AdvisoryEntry) -> bool,
{
    let candidates = db.lookup(source, ecosystem, pkg_name);
    let candidate_count = candidates.len();
    let detected: Vec<_> = candidates
        .into_iter()
        .filter(|entry| is_vulnerable(*entry))
        .map(|entry| to_detected(entry, pkg_name, pkg_ver))
        .collect();

    tracing::debug!(
        source = %source,
        ecosystem = %ecosystem,
        package = pkg_name,
        version = pkg_ver,
        candidates = candidate_count,
        detected = detected.len(),
        "advisory bucket queried"
    );

    detected
}

/// 바인딩된 비교기로 버킷을 조회합니다.
pub(crate) fn detect_with_comparer(
    db: &AdvisoryDb,
    source: DataSource,
    ecosystem: Ecosystem,
    comparer: &dyn Comparer,
    pkg_name: &str,
    pkg_ver: &str,
) -> Vec<DetectedVulnerability> {
    detect_in_bucket(db, source, ecosystem, pkg_name, pkg_ver, |entry| {
        comparer.is_vulnerable(pkg_ver, entry)
    })
}

/// 설치 버전이 비어 있으면 `InvalidVersion` 에러를 반환합니다.
pub(crate) fn require_version(pkg_ver: &str) -> Result<(), AdvisoryError> {
    if pkg_ver.trim().is_empty() {
        return Err(AdvisoryError::InvalidVersion {
            version: pkg_ver.to_owned(),
            reason: "empty version".to_owned(),
        });
    }
    Ok(())
}
