//! npm 비교기 -- node-semver 범위 문법
//!
//! node-semver 범위를 `semver::VersionReq`가 이해하는 형식으로 변환한 뒤 매칭합니다.
//!
//! | node-semver | 변환 결과 |
//! |---|---|
//! | `1.2.3` | `=1.2.3` |
//! | `1.2` | `=1.2` (1.2.x) |
//! | `>= 1.0.0 <2.0.0` | `>=1.0.0, <2.0.0` |
//! | `1.2.3 - 2.3` | `>=1.2.3, <2.4.0` |
//! | `^1.2`, `~1.2.3`, `1.x`, `*` | 그대로 |
//!
//! 파싱은 `VersionReq`에 맡기지만 매칭은 비교식마다 `Version`의 전체 순서로
//! 직접 판정합니다. `VersionReq::matches`는 pre-release 설치 버전을 범위에서
//! 제외하므로 `5.0.0-beta.1`이 `<6.0.0`에 걸리지 않습니다. 부분 버전, `^`, `~`에서
//! 나온 경계는 node-semver include-prerelease 모드처럼 `-0`을 붙입니다.

use semver::{BuildMetadata, Comparator, Op, Prerelease, Version, VersionReq};

use super::{Comparer, invalid_constraint, invalid_version, split_alternatives};
use crate::error::ComparerError;

const OPERATORS: [&str; 7] = [">=", "<=", ">", "<", "=", "~", "^"];

/// npm 비교기
#[derive(Debug, Clone, Copy, Default)]
pub struct NpmComparer;

impl Comparer for NpmComparer {
    fn name(&self) -> &str {
        "npm"
    }

    fn matches(&self, version: &str, constraint: &str) -> Result<bool, ComparerError> {
        let installed = parse_version(version)?;

        for alternative in split_alternatives(constraint)? {
            let req = to_version_req(alternative, constraint)?;
            if req.comparators.iter().all(|c| comparator_matches(c, &installed)) {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

fn strip_v(s: &str) -> &str {
    s.strip_prefix(['v', 'V']).unwrap_or(s)
}

fn parse_version(version: &str) -> Result<Version, ComparerError> {
    let mut parsed =
        Version::parse(strip_v(version.trim())).map_err(|e| invalid_version(version, e.to_string()))?;
    parsed.build = BuildMetadata::EMPTY;
    Ok(parsed)
}

/// 가장 낮은 pre-release (`-0`)
fn lowest_pre() -> Prerelease {
    Prerelease::new("0").unwrap_or(Prerelease::EMPTY)
}

fn version(major: u64, minor: u64, patch: u64, pre: Prerelease) -> Version {
    Version {
        major,
        minor,
        patch,
        pre,
        build: BuildMetadata::EMPTY,
    }
}

/// 비교식이 가리키는 버전. 부분 버전이면 `-0`에서 시작합니다.
fn floor(c: &Comparator) -> Version {
    match (c.minor, c.patch) {
        (Some(minor), Some(patch)) => version(c.major, minor, patch, c.pre.clone()),
        (minor, _) => version(c.major, minor.unwrap_or(0), 0, lowest_pre()),
    }
}

/// 부분 버전의 다음 자리 (`1` -> `2.0.0-0`, `1.2` -> `1.3.0-0`)
fn next_partial(c: &Comparator) -> Version {
    match (c.minor, c.patch) {
        (None, _) => version(c.major.saturating_add(1), 0, 0, lowest_pre()),
        (Some(minor), None) => version(c.major, minor.saturating_add(1), 0, lowest_pre()),
        (Some(minor), Some(patch)) => version(c.major, minor, patch.saturating_add(1), lowest_pre()),
    }
}

fn tilde_upper(c: &Comparator) -> Version {
    match c.minor {
        None => version(c.major.saturating_add(1), 0, 0, lowest_pre()),
        Some(minor) => version(c.major, minor.saturating_add(1), 0, lowest_pre()),
    }
}

fn caret_upper(c: &Comparator) -> Version {
    match (c.major, c.minor, c.patch) {
        (0, Some(0), Some(patch)) => version(0, 0, patch.saturating_add(1), lowest_pre()),
        (0, Some(minor), _) => version(0, minor.saturating_add(1), 0, lowest_pre()),
        (major, _, _) => version(major.saturating_add(1), 0, 0, lowest_pre()),
    }
}

/// 비교식 하나를 전체 순서로 판정합니다.
fn comparator_matches(c: &Comparator, v: &Version) -> bool {
    let exact = c.minor.is_some() && c.patch.is_some();
    match c.op {
        Op::Exact | Op::Wildcard if exact => *v == floor(c),
        Op::Exact | Op::Wildcard => floor(c) <= *v && *v < next_partial(c),
        Op::Greater if exact => *v > floor(c),
        Op::Greater => *v >= next_partial(c),
        Op::GreaterEq => *v >= floor(c),
        Op::Less => *v < floor(c),
        Op::LessEq if exact => *v <= floor(c),
        Op::LessEq => *v < next_partial(c),
        Op::Tilde => floor(c) <= *v && *v < tilde_upper(c),
        Op::Caret => floor(c) <= *v && *v < caret_upper(c),
        _ => c.matches(v),
    }
}

fn is_wildcard(ver: &str) -> bool {
    ver.split('.').any(|seg| matches!(seg, "x" | "X" | "*"))
}

fn comparator(op: &str, ver: &str) -> String {
    let ver = strip_v(ver);
    if op.is_empty() && !is_wildcard(ver) {
        format!("={ver}")
    } else {
        format!("{op}{ver}")
    }
}

fn split_op(token: &str) -> (&str, &str) {
    for op in OPERATORS {
        if let Some(rest) = token.strip_prefix(op) {
            return (op, rest);
        }
    }
    ("", token)
}

/// 하이픈 범위 상한: 부분 버전이면 다음 자리까지 제외 상한으로 바꿉니다.
fn hyphen_upper(upper: &str, constraint: &str) -> Result<String, ComparerError> {
    let upper = strip_v(upper);
    if upper.contains('-') || is_wildcard(upper) {
        return Ok(format!("<={upper}"));
    }
    let segments = upper
        .split('.')
        .map(|s| s.parse::<u64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| invalid_constraint(constraint, format!("invalid range bound '{upper}'")))?;
    match segments.as_slice() {
        [major] => Ok(format!("<{}.0.0", major.saturating_add(1))),
        [major, minor] => Ok(format!("<{major}.{}.0", minor.saturating_add(1))),
        _ => Ok(format!("<={upper}")),
    }
}

/// node-semver 대안 하나를 `VersionReq`로 변환합니다.
fn to_version_req(alternative: &str, constraint: &str) -> Result<VersionReq, ComparerError> {
    let tokens: Vec<&str> = alternative
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect();

    let mut parts = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i];

        if tokens.get(i + 1) == Some(&"-") {
            let upper = tokens
                .get(i + 2)
                .ok_or_else(|| invalid_constraint(constraint, "hyphen range without upper bound"))?;
            parts.push(format!(">={}", strip_v(token)));
            parts.push(hyphen_upper(upper, constraint)?);
            i += 3;
            continue;
        }

        if OPERATORS.contains(&token) {
            let ver = tokens
                .get(i + 1)
                .ok_or_else(|| invalid_constraint(constraint, "operator without version"))?;
            parts.push(comparator(token, ver));
            i += 2;
            continue;
        }

        let (op, ver) = split_op(token);
        parts.push(comparator(op, ver));
        i += 1;
    }

    if parts.is_empty() {
        return Err(invalid_constraint(constraint, "no comparators"));
    }

    VersionReq::parse(&parts.join(", ")).map_err(|e| invalid_constraint(constraint, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(version: &str, constraint: &str) -> bool {
        NpmComparer.matches(version, constraint).unwrap()
    }

    #[test]
    fn bare_version_is_exact() {
        assert!(m("1.2.3", "1.2.3"));
        assert!(!m("1.2.4", "1.2.3"));
        assert!(m("1.2.9", "1.2"));
        assert!(!m("1.3.0", "1.2"));
    }

    #[test]
    fn space_separated_and() {
        assert!(m("4.17.15", ">=4.0.0 <4.17.21"));
        assert!(!m("4.17.21", ">=4.0.0 <4.17.21"));
        assert!(m("4.17.15", ">= 4.0.0, < 4.17.21"));
    }

    #[test]
    fn caret_and_tilde() {
        assert!(m("1.9.0", "^1.2.3"));
        assert!(!m("2.0.0", "^1.2.3"));
        assert!(m("1.2.9", "~1.2.3"));
        assert!(!m("1.3.0", "~1.2.3"));
    }

    #[test]
    fn wildcards() {
        assert!(m("1.5.0", "1.x"));
        assert!(!m("2.0.0", "1.x"));
        assert!(m("0.0.1", "*"));
    }

    #[test]
    fn hyphen_ranges() {
        assert!(m("1.2.3", "1.2.3 - 2.3.4"));
        assert!(m("2.3.4", "1.2.3 - 2.3.4"));
        assert!(!m("2.3.5", "1.2.3 - 2.3.4"));
        assert!(m("2.3.9", "1.2.3 - 2.3"));
        assert!(!m("2.4.0", "1.2.3 - 2.3"));
        assert!(m("2.9.9", "1.2.3 - 2"));
        assert!(!m("3.0.0", "1.2.3 - 2"));
    }

    #[test]
    fn or_alternatives() {
        let c = "<1.0.5 || >=2.0.0 <2.0.3";
        assert!(m("1.0.4", c));
        assert!(m("2.0.2", c));
        assert!(!m("1.9.9", c));
    }

    #[test]
    fn v_prefix_is_accepted() {
        assert!(m("v1.2.3", ">=v1.0.0"));
    }

    #[test]
    fn prerelease_inside_range_matches() {
        assert!(m("5.0.0-beta.1", "<6.0.0"));
        assert!(m("4.17.21-rc.1", ">=4.0.0 <4.17.21"));
        assert!(m("1.2.5-beta", "~1.2.3"));
        assert!(m("1.5.0-alpha.2", "^1.2.3"));
        assert!(m("1.5.0-alpha.2", "1.x"));
        assert!(m("2.0.0-beta", "1.0.0 - 2.0.0"));
        assert!(m("1.0.0-beta", "=1.0.0-beta"));
    }

    #[test]
    fn prerelease_outside_range_does_not_match() {
        assert!(!m("1.0.0-beta", ">=1.0.0"));
        assert!(!m("2.0.0-beta", "^1.2.3"));
        assert!(!m("1.3.0-alpha", "~1.2.3"));
        assert!(!m("2.0.0-rc.1", "1.x"));
        assert!(!m("1.0.0-beta", "=1.0.0-alpha"));
    }

    #[test]
    fn agrees_with_generic_on_prerelease_ranges() {
        use crate::comparer::GenericComparer;

        for (version, constraint) in [("5.0.0-beta.1", "<6.0.0"), ("3.1.0-rc.1", ">=3.0.0, <3.2.0")] {
            assert_eq!(
                NpmComparer.matches(version, constraint).unwrap(),
                GenericComparer.matches(version, constraint).unwrap(),
                "{version} against {constraint}"
            );
        }
    }

    #[test]
    fn build_metadata_is_ignored() {
        assert!(m("1.2.3+build.5", "1.2.3"));
        assert!(m("1.2.3+build.5", "<=1.2.3"));
    }

    #[test]
    fn errors() {
        assert!(matches!(
            NpmComparer.matches("latest", "<1.0.0"),
            Err(ComparerError::InvalidVersion { .. })
        ));
        assert!(matches!(
            NpmComparer.matches("1.0.0", ">= banana"),
            Err(ComparerError::InvalidConstraint { .. })
        ));
        assert!(matches!(
            NpmComparer.matches("1.0.0", "1.0.0 -"),
            Err(ComparerError::InvalidConstraint { .. })
        ));
    }
}
