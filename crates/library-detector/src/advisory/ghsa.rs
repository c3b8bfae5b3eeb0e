//! GitHub Security Advisory (`ghsa`)

use std::sync::Arc;

use vigil_core::types::DetectedVulnerability;

use super::{Advisory, detect_with_comparer};
use crate::comparer::Comparer;
use crate::db::AdvisoryDb;
use crate::error::AdvisoryError;
use crate::types::{DataSource, Ecosystem};

/// GHSA 어드바이저리 소스
///
/// 에코시스템 공통 피드이므로 비교기는 드라이버의 기본 소스와 같은 것을 주입받습니다.
pub struct GhsaAdvisory {
    db: Arc<AdvisoryDb>,
    ecosystem: Ecosystem,
    comparer: Arc<dyn Comparer>,
}

impl GhsaAdvisory {
    /// 새 소스를 생성합니다.
    pub fn new(db: Arc<AdvisoryDb>, ecosystem: Ecosystem, comparer: Arc<dyn Comparer>) -> Self {
        Self {
            db,
            ecosystem,
            comparer,
        }
    }
}

impl Advisory for GhsaAdvisory {
    fn name(&self) -> &str {
        DataSource::Ghsa.as_str()
    }

    fn detect_vulnerabilities(
        &self,
        pkg_name: &str,
        pkg_ver: &str,
    ) -> Result<Vec<DetectedVulnerability>, AdvisoryError> {
        Ok(detect_with_comparer(
            &self.db,
            DataSource::Ghsa,
            self.ecosystem,
            self.comparer.as_ref(),
            pkg_name,
            pkg_ver,
        ))
    }
}
