//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 탐지기는 이 상수를 사용하여 `metrics::counter!()`, `metrics::histogram!()`
//! 매크로를 호출합니다. 레코더가 설치되지 않으면 호출은 아무 일도 하지 않습니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `vigil_`
//! - 모듈명: `detector_`, `advisory_db_`
//! - 접미어: `_total` (counter), `_seconds` (histogram), 없음 (gauge)

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 에코시스템 레이블 키 (cargo, npm, ...)
pub const LABEL_ECOSYSTEM: &str = "ecosystem";

/// 어드바이저리 소스 레이블 키 (primary, ghsa, rustsec, ...)
pub const LABEL_SOURCE: &str = "source";

/// 결과 레이블 키 (success, failure)
pub const LABEL_RESULT: &str = "result";

// ─── Detector 메트릭 ────────────────────────────────────────────────

/// Detector: `detect` 호출 수 (counter, labels: ecosystem, result)
pub const DETECTOR_DETECT_TOTAL: &str = "vigil_detector_detect_total";

/// Detector: 반환된 취약점 수 (counter, label: ecosystem)
pub const DETECTOR_FINDINGS_TOTAL: &str = "vigil_detector_findings_total";

/// Detector: 중복으로 제외된 취약점 수 (counter, label: ecosystem)
pub const DETECTOR_DUPLICATES_SKIPPED_TOTAL: &str = "vigil_detector_duplicates_skipped_total";

/// Detector: 어드바이저리 소스 실패 수 (counter, labels: ecosystem, source)
pub const DETECTOR_SOURCE_ERRORS_TOTAL: &str = "vigil_detector_source_errors_total";

/// Detector: `detect` 소요 시간 (histogram, 초)
pub const DETECTOR_DETECT_DURATION_SECONDS: &str = "vigil_detector_detect_duration_seconds";

// ─── Advisory DB 메트릭 ─────────────────────────────────────────────

/// Advisory DB: 로드된 엔트리 수 (gauge)
pub const ADVISORY_DB_ENTRIES: &str = "vigil_advisory_db_entries";

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 레코더를 설치하는 쪽(예: 익스포터를 붙인 상위 애플리케이션)에서 한 번 호출합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_gauge, describe_histogram};

    describe_counter!(
        DETECTOR_DETECT_TOTAL,
        "Total number of driver detect calls by ecosystem and result"
    );
    describe_counter!(
        DETECTOR_FINDINGS_TOTAL,
        "Total number of vulnerabilities returned by driver detect calls"
    );
    describe_counter!(
        DETECTOR_DUPLICATES_SKIPPED_TOTAL,
        "Total number of duplicate vulnerability records dropped during merge"
    );
    describe_counter!(
        DETECTOR_SOURCE_ERRORS_TOTAL,
        "Total number of advisory source failures that aborted a detect call"
    );
    describe_histogram!(
        DETECTOR_DETECT_DURATION_SECONDS,
        "Time to query all advisory sources of a driver for one package in seconds"
    );
    describe_gauge!(
        ADVISORY_DB_ENTRIES,
        "Number of advisory entries loaded into the in-memory store"
    );
}
