//! 애플리케이션 단위 탐지
//!
//! 한 lockfile/바이너리에서 나온 [`Application`]의 모든 패키지를 하나의
//! 드라이버로 검사하고 결과에 패키지 경로를 붙입니다.

use vigil_core::types::DetectedVulnerability;

use crate::error::DetectorError;
use crate::factory::DriverFactory;
use crate::types::Application;

/// 애플리케이션의 모든 패키지에 대해 취약점을 탐지합니다.
///
/// # 동작
///
/// 1. `package_type`으로 드라이버 생성 (지원하지 않으면 `DetectorError::UnsupportedType`)
/// 2. 패키지 순서대로 `Driver::detect` 호출, 첫 실패에서 `DetectorError::Detection` 반환
/// 3. 각 결과의 `pkg_path`를 패키지 경로, 없으면 애플리케이션 경로로 설정
///
/// 결과는 패키지 순서대로 이어 붙인 목록입니다. 서로 다른 패키지의 같은
/// 취약점 ID는 각각 남습니다.
pub fn detect_application(
    factory: &DriverFactory,
    app: &Application,
) -> Result<Vec<DetectedVulnerability>, DetectorError> {
    let driver = factory.create(&app.package_type)?;

    let mut results = Vec::new();
    for package in &app.packages {
        let vulns = driver.detect(&package.name, &package.version)?;
        let pkg_path = package.file_path.as_ref().or(app.file_path.as_ref());

        results.extend(vulns.into_iter().map(|mut vuln| {
            vuln.pkg_path = pkg_path.cloned();
            vuln
        }));
    }

    tracing::debug!(
        package_type = %app.package_type,
        file_path = app.file_path.as_deref().unwrap_or("-"),
        packages = app.packages.len(),
        findings = results.len(),
        "application scanned"
    );

    Ok(results)
}
