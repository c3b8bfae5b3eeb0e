//! Node.js Security Working Group (`nodejs-security-wg`)

use std::sync::Arc;

use vigil_core::types::DetectedVulnerability;

use super::{Advisory, detect_with_comparer, require_version};
use crate::comparer::NpmComparer;
use crate::db::AdvisoryDb;
use crate::error::AdvisoryError;
use crate::types::{DataSource, Ecosystem};

/// Node.js 보안 WG 어드바이저리 소스 (npm 전용)
///
/// 항상 [`NpmComparer`]를 사용합니다.
pub struct NodeAdvisory {
    db: Arc<AdvisoryDb>,
}

impl NodeAdvisory {
    /// 새 소스를 생성합니다.
    pub fn new(db: Arc<AdvisoryDb>) -> Self {
        Self { db }
    }
}

impl Advisory for NodeAdvisory {
    fn name(&self) -> &str {
        DataSource::NodejsSecurityWg.as_str()
    }

    fn detect_vulnerabilities(
        &self,
        pkg_name: &str,
        pkg_ver: &str,
    ) -> Result<Vec<DetectedVulnerability>, AdvisoryError> {
        require_version(pkg_ver)?;
        Ok(detect_with_comparer(
            &self.db,
            DataSource::NodejsSecurityWg,
            Ecosystem::Npm,
            &NpmComparer,
            pkg_name,
            pkg_ver,
        ))
    }
}
