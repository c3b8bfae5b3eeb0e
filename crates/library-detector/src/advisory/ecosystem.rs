//! 에코시스템 기본 어드바이저리 (`primary`)

use std::sync::Arc;

use vigil_core::types::DetectedVulnerability;

use super::{Advisory, detect_with_comparer};
use crate::comparer::Comparer;
use crate::db::AdvisoryDb;
use crate::error::AdvisoryError;
use crate::types::{DataSource, Ecosystem};

/// 에코시스템별 기본 어드바이저리 소스
///
/// 모든 드라이버의 첫 번째 소스입니다. 비교기는 에코시스템에 맞게 주입됩니다.
pub struct EcosystemAdvisory {
    db: Arc<AdvisoryDb>,
    ecosystem: Ecosystem,
    comparer: Arc<dyn Comparer>,
}

impl EcosystemAdvisory {
    /// 새 소스를 생성합니다.
    pub fn new(db: Arc<AdvisoryDb>, ecosystem: Ecosystem, comparer: Arc<dyn Comparer>) -> Self {
        Self {
            db,
            ecosystem,
            comparer,
        }
    }
}

impl Advisory for EcosystemAdvisory {
    fn name(&self) -> &str {
        DataSource::Primary.as_str()
    }

    fn detect_vulnerabilities(
        &self,
        pkg_name: &str,
        pkg_ver: &str,
    ) -> Result<Vec<DetectedVulnerability>, AdvisoryError> {
        Ok(detect_with_comparer(
            &self.db,
            DataSource::Primary,
            self.ecosystem,
            self.comparer.as_ref(),
            pkg_name,
            pkg_ver,
        ))
    }
}
