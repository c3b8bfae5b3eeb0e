//! 버전 비교기 -- 에코시스템별 버전 제약 조건 매칭
//!
//! [`Comparer`]는 하나의 버전 문자열이 제약 조건 문자열을 만족하는지 판정합니다.
//! 어드바이저리 소스는 생성 시 비교기를 주입받아, 어드바이저리 엔트리의
//! vulnerable / patched / unaffected 목록과 설치 버전을 대조합니다.
//!
//! # 구현체
//!
//! | 비교기 | 버전 체계 | 사용처 |
//! |---|---|---|
//! | [`GenericComparer`] | 느슨한 SemVer (`v` 접두어, N개 숫자 세그먼트) | Cargo, Composer, NuGet, Go |
//! | [`NpmComparer`] | node-semver 범위 (`^`, `~`, `x`, 하이픈 범위) | Npm |
//! | [`MavenComparer`] | Maven `ComparableVersion` 순서 + 구간 표기 | Maven |
//! | [`CargoComparer`] | Cargo `VersionReq` | RustSec |

pub mod cargo;
pub mod generic;
pub mod maven;
pub mod npm;

pub use cargo::CargoComparer;
pub use generic::GenericComparer;
pub use maven::MavenComparer;
pub use npm::NpmComparer;

use crate::db::AdvisoryEntry;
use crate::error::ComparerError;

/// 버전 제약 조건 비교기
///
/// 구현체는 상태가 없거나 불변이어야 하며, 여러 어드바이저리 소스가
/// `Arc<dyn Comparer>`로 공유합니다.
pub trait Comparer: Send + Sync {
    /// 비교기 이름 (로그용)
    fn name(&self) -> &str;

    /// `version`이 `constraint`를 만족하는지 확인합니다.
    ///
    /// `constraint`는 `||`로 구분된 대안을 포함할 수 있습니다.
    fn matches(&self, version: &str, constraint: &str) -> Result<bool, ComparerError>;

    /// 설치 버전이 어드바이저리 엔트리에 해당하는지 판정합니다.
    ///
    /// # 판정 규칙
    ///
    /// 1. 설치 버전이 비어 있으면 해당하지 않음
    /// 2. `vulnerable_versions`가 있고 그중 어느 것도 매칭되지 않으면 해당하지 않음
    /// 3. `patched_versions` + `unaffected_versions`가 비어 있으면 해당함
    /// 4. 그 외에는 patched/unaffected 중 어느 것도 매칭되지 않을 때 해당함
    ///
    /// 설치 버전을 파싱할 수 없으면 해당하지 않는 것으로 봅니다.
    /// 파싱할 수 없는 제약 조건 하나는 매칭되지 않는 것으로 취급합니다.
    fn is_vulnerable(&self, version: &str, entry: &AdvisoryEntry) -> bool {
        if version.trim().is_empty() {
            return false;
        }

        if !entry.vulnerable_versions.is_empty() {
            match matches_any(self, version, &entry.vulnerable_versions, entry) {
                Ok(true) => {}
                Ok(false) | Err(_) => return false,
            }
        }

        let secure: Vec<&String> = entry
            .patched_versions
            .iter()
            .chain(entry.unaffected_versions.iter())
            .collect();
        if secure.is_empty() {
            return true;
        }

        match matches_any(self, version, secure, entry) {
            Ok(matched) => !matched,
            Err(_) => false,
        }
    }
}

/// 제약 조건 목록 중 하나라도 매칭되는지 확인합니다.
///
/// 설치 버전 파싱 에러는 즉시 반환하고, 제약 조건 파싱 에러는 경고 후 건너뜁니다.
fn matches_any<'a, C, I>(
    comparer: &C,
    version: &str,
    constraints: I,
    entry: &AdvisoryEntry,
) -> Result<bool, ComparerError>
where
    C: Comparer + ?Sized,
    I: IntoIterator<Item = &'a String>,
{
    for constraint in constraints {
        match comparer.matches(version, constraint) {
            Ok(true) => return Ok(true),
            Ok(false) => {}
            Err(err @ ComparerError::InvalidVersion { .. }) => {
                tracing::warn!(
                    comparer = comparer.name(),
                    version,
                    vulnerability_id = %entry.vulnerability_id,
                    error = %err,
                    "installed version cannot be compared, treating as not vulnerable"
                );
                return Err(err);
            }
            Err(err @ ComparerError::InvalidConstraint { .. }) => {
                tracing::warn!(
                    comparer = comparer.name(),
                    constraint = %constraint,
                    vulnerability_id = %entry.vulnerability_id,
                    error = %err,
                    "skipping unparseable advisory constraint"
                );
            }
        }
    }
    Ok(false)
}

/// 제약 조건 문자열을 `||` 대안으로 분리합니다.
///
/// 빈 대안이 있으면 에러를 반환합니다.
pub(crate) fn split_alternatives(constraint: &str) -> Result<Vec<&str>, ComparerError> {
    let trimmed = constraint.trim();
    if trimmed.is_empty() {
        return Err(invalid_constraint(constraint, "empty constraint"));
    }
    let mut alternatives = Vec::new();
    for alt in trimmed.split("||") {
        let alt = alt.trim();
        if alt.is_empty() {
            return Err(invalid_constraint(constraint, "empty alternative"));
        }
        alternatives.push(alt);
    }
    Ok(alternatives)
}

pub(crate) fn invalid_constraint(constraint: &str, reason: impl Into<String>) -> ComparerError {
    ComparerError::InvalidConstraint {
        constraint: constraint.to_owned(),
        reason: reason.into(),
    }
}

pub(crate) fn invalid_version(version: &str, reason: impl Into<String>) -> ComparerError {
    ComparerError::InvalidVersion {
        version: version.to_owned(),
        reason: reason.into(),
    }
}

/// 비교 연산자
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    /// `~>` (pessimistic)
    Pessimistic,
}

impl Op {
    /// 토큰 앞부분에서 연산자를 떼어냅니다. 연산자가 없으면 `Op::Eq`입니다.
    pub(crate) fn split_prefix(token: &str) -> (Op, &str) {
        // 긴 연산자부터 검사
        const OPS: [(&str, Op); 8] = [
            ("~>", Op::Pessimistic),
            ("==", Op::Eq),
            ("!=", Op::Ne),
            (">=", Op::Ge),
            ("<=", Op::Le),
            ("=", Op::Eq),
            (">", Op::Gt),
            ("<", Op::Lt),
        ];
        for (prefix, op) in OPS {
            if let Some(rest) = token.strip_prefix(prefix) {
                return (op, rest.trim_start());
            }
        }
        (Op::Eq, token)
    }

    /// `Ordering` 결과에 연산자를 적용합니다. `Pessimistic`은 호출자가 처리합니다.
    pub(crate) fn holds(self, ord: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::{Equal, Greater, Less};
        match self {
            Op::Eq => ord == Equal,
            Op::Ne => ord != Equal,
            Op::Gt => ord == Greater,
            Op::Ge => ord != Less,
            Op::Lt => ord == Less,
            Op::Le => ord != Greater,
            Op::Pessimistic => ord != Less,
        }
    }
}

/// 콤마/공백으로 구분된 비교식 목록을 `(연산자, 버전)` 쌍으로 토큰화합니다.
///
/// `>= 1.0`처럼 연산자와 버전 사이에 공백이 있어도 하나의 비교식으로 묶습니다.
pub(crate) fn tokenize_comparators<'a>(
    alternative: &'a str,
    constraint: &str,
) -> Result<Vec<(Op, &'a str)>, ComparerError> {
    let mut out = Vec::new();
    let mut pending: Option<Op> = None;

    for token in alternative
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        let (op, rest) = Op::split_prefix(token);
        match (pending.take(), rest.is_empty()) {
            (None, true) => pending = Some(op),
            (None, false) => out.push((op, rest)),
            (Some(prev), false) if token == rest => out.push((prev, rest)),
            (Some(_), _) => {
                return Err(invalid_constraint(constraint, format!("unexpected token '{token}'")));
            }
        }
    }

    if pending.is_some() {
        return Err(invalid_constraint(constraint, "operator without version"));
    }
    if out.is_empty() {
        return Err(invalid_constraint(constraint, "no comparators"));
    }
    Ok(out)
}
