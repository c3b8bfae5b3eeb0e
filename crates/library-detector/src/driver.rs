//! 드라이버 -- 에코시스템 하나의 어드바이저리 소스 묶음
//!
//! [`Driver`]는 에코시스템과 순서가 정해진 어드바이저리 소스 목록을 소유합니다.
//! [`Driver::detect`]는 모든 소스를 생성 순서대로 조회하고 결과를 합치며,
//! 같은 `vulnerability_id`는 먼저 보고한 소스의 레코드만 남깁니다.
//!
//! # 실패 처리
//!
//! 소스 하나라도 실패하면 즉시 [`DetectionError`]를 반환하고, 그때까지 모은
//! 결과는 버립니다. 부분 결과를 돌려주지 않습니다.

use std::collections::HashSet;
use std::fmt;
use std::time::Instant;

use vigil_core::metrics as m;
use vigil_core::types::DetectedVulnerability;

use crate::advisory::Advisory;
use crate::error::DetectionError;
use crate::types::Ecosystem;

/// 에코시스템 드라이버
///
/// 생성 후 불변이며, 여러 스레드에서 동시에 `detect`를 호출해도 안전합니다.
pub struct Driver {
    ecosystem: Ecosystem,
    advisories: Vec<Box<dyn Advisory>>,
}

impl Driver {
    /// 에코시스템과 소스 목록으로 드라이버를 구성합니다.
    ///
    /// 목록은 검증하지 않습니다. 빈 목록이면 `detect`는 항상 빈 결과를 반환합니다.
    pub fn aggregate(ecosystem: Ecosystem, advisories: Vec<Box<dyn Advisory>>) -> Self {
        Self {
            ecosystem,
            advisories,
        }
    }

    /// 드라이버의 에코시스템을 반환합니다.
    pub fn ecosystem(&self) -> Ecosystem {
        self.ecosystem
    }

    /// 소스 이름을 생성 순서대로 반환합니다.
    pub fn advisory_names(&self) -> Vec<&str> {
        self.advisories.iter().map(|a| a.name()).collect()
    }

    /// 패키지 하나에 대해 모든 소스를 조회하고 중복을 제거한 결과를 반환합니다.
    ///
    /// 결과 순서는 소스 순서, 그다음 각 소스가 돌려준 순서입니다.
    pub fn detect(
        &self,
        pkg_name: &str,
        pkg_ver: &str,
    ) -> Result<Vec<DetectedVulnerability>, DetectionError> {
        let start = Instant::now();
        let ecosystem = self.ecosystem.as_str();

        let mut vulns = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut duplicates = 0u64;

        for advisory in &self.advisories {
            let found = match advisory.detect_vulnerabilities(pkg_name, pkg_ver) {
                Ok(found) => found,
                Err(source) => {
                    tracing::debug!(
                        ecosystem,
                        source = advisory.name(),
                        package = pkg_name,
                        version = pkg_ver,
                        error = %source,
                        "advisory source failed, aborting detection"
                    );
                    metrics::counter!(
                        m::DETECTOR_SOURCE_ERRORS_TOTAL,
                        m::LABEL_ECOSYSTEM => ecosystem,
                        m::LABEL_SOURCE => advisory.name().to_owned()
                    )
                    .increment(1);
                    metrics::counter!(
                        m::DETECTOR_DETECT_TOTAL,
                        m::LABEL_ECOSYSTEM => ecosystem,
                        m::LABEL_RESULT => "failure"
                    )
                    .increment(1);

                    return Err(DetectionError {
                        ecosystem: self.ecosystem,
                        source_name: advisory.name().to_owned(),
                        source_count: self.advisories.len(),
                        package: pkg_name.to_owned(),
                        version: pkg_ver.to_owned(),
                        source,
                    });
                }
            };

            for vuln in found {
                if seen.insert(vuln.vulnerability_id.clone()) {
                    vulns.push(vuln);
                } else {
                    duplicates += 1;
                }
            }
        }

        tracing::debug!(
            ecosystem,
            package = pkg_name,
            version = pkg_ver,
            sources = self.advisories.len(),
            findings = vulns.len(),
            duplicates,
            "detection completed"
        );

        metrics::counter!(
            m::DETECTOR_DETECT_TOTAL,
            m::LABEL_ECOSYSTEM => ecosystem,
            m::LABEL_RESULT => "success"
        )
        .increment(1);
        metrics::counter!(m::DETECTOR_FINDINGS_TOTAL, m::LABEL_ECOSYSTEM => ecosystem)
            .increment(vulns.len() as u64);
        if duplicates > 0 {
            metrics::counter!(m::DETECTOR_DUPLICATES_SKIPPED_TOTAL, m::LABEL_ECOSYSTEM => ecosystem)
                .increment(duplicates);
        }
        metrics::histogram!(m::DETECTOR_DETECT_DURATION_SECONDS, m::LABEL_ECOSYSTEM => ecosystem)
            .record(start.elapsed().as_secs_f64());

        Ok(vulns)
    }
}

impl fmt::Debug for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Driver")
            .field("ecosystem", &self.ecosystem)
            .field("advisories", &self.advisory_names())
            .finish()
    }
}
