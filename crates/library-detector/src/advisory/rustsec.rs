//! RustSec Advisory Database (`rustsec`)

use std::sync::Arc;

use vigil_core::types::DetectedVulnerability;

use super::{Advisory, detect_with_comparer, require_version};
use crate::comparer::CargoComparer;
use crate::db::AdvisoryDb;
use crate::error::AdvisoryError;
use crate::types::{DataSource, Ecosystem};

/// RustSec 어드바이저리 소스 (Cargo 전용)
///
/// 항상 [`CargoComparer`]를 사용합니다.
pub struct RustSecAdvisory {
    db: Arc<AdvisoryDb>,
}

impl RustSecAdvisory {
    /// 새 소스를 생성합니다.
    pub fn new(db: Arc<AdvisoryDb>) -> Self {
        Self { db }
    }
}

impl Advisory for RustSecAdvisory {
    fn name(&self) -> &str {
        DataSource::RustSec.as_str()
    }

    fn detect_vulnerabilities(
        &self,
        pkg_name: &str,
        pkg_ver: &str,
    ) -> Result<Vec<DetectedVulnerability>, AdvisoryError> {
        require_version(pkg_ver)?;
        Ok(detect_with_comparer(
            &self.db,
            DataSource::RustSec,
            Ecosystem::Cargo,
            &CargoComparer,
            pkg_name,
            pkg_ver,
        ))
    }
}
