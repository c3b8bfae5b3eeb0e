//! 범용 비교기 -- 느슨한 SemVer 버전과 연산자 제약 조건
//!
//! 버전 형식은 `v1.2.3-rc.1+build`처럼 SemVer를 따르되 다음을 허용합니다.
//!
//! - `v`/`V` 접두어
//! - 세그먼트 개수 제한 없음 (`1`, `1.2`, `4.0.0.1`), 부족한 세그먼트는 0으로 간주
//! - 빌드 메타데이터(`+...`)는 비교에서 무시
//!
//! 제약 조건 문법:
//!
//! ```text
//! constraint  := alternative ("||" alternative)*
//! alternative := comparator ([,\s]+ comparator)*
//! comparator  := op? version
//! op          := "=" | "==" | "!=" | ">" | ">=" | "<" | "<=" | "~>"
//! ```

use std::cmp::Ordering;

use super::{Comparer, Op, invalid_constraint, invalid_version, split_alternatives, tokenize_comparators};
use crate::error::ComparerError;

/// 범용 비교기 (Cargo, Composer, NuGet, Go 기본 어드바이저리용)
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericComparer;

impl Comparer for GenericComparer {
    fn name(&self) -> &str {
        "generic"
    }

    fn matches(&self, version: &str, constraint: &str) -> Result<bool, ComparerError> {
        let installed = GenericVersion::parse(version)?;

        for alternative in split_alternatives(constraint)? {
            let mut all = true;
            for (op, raw) in tokenize_comparators(alternative, constraint)? {
                let target = GenericVersion::parse(raw)
                    .map_err(|e| invalid_constraint(constraint, e.to_string()))?;
                if !compare_with(&installed, op, &target) {
                    all = false;
                    break;
                }
            }
            if all {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

fn compare_with(installed: &GenericVersion, op: Op, target: &GenericVersion) -> bool {
    match op {
        Op::Pessimistic => {
            installed.cmp(target) != Ordering::Less && installed < &target.pessimistic_upper()
        }
        other => other.holds(installed.cmp(target)),
    }
}

/// 느슨하게 파싱된 버전
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericVersion {
    segments: Vec<u64>,
    pre: Vec<PreIdent>,
}

/// pre-release 식별자 (SemVer 규칙: 숫자 < 문자열)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum PreIdent {
    Numeric(u64),
    Alpha(String),
}

impl GenericVersion {
    /// 버전 문자열을 파싱합니다.
    pub fn parse(input: &str) -> Result<Self, ComparerError> {
        let s = input.trim();
        let s = s.strip_prefix(['v', 'V']).unwrap_or(s);
        let s = s.split_once('+').map_or(s, |(head, _)| head);
        let (release, pre) = match s.split_once('-') {
            Some((release, pre)) => (release, Some(pre)),
            None => (s, None),
        };

        if release.is_empty() {
            return Err(invalid_version(input, "empty version"));
        }

        let segments = release
            .split('.')
            .map(|seg| {
                seg.parse::<u64>()
                    .map_err(|_| invalid_version(input, format!("non-numeric segment '{seg}'")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let pre = match pre {
            None => Vec::new(),
            Some("") => return Err(invalid_version(input, "empty pre-release")),
            Some(pre) => pre
                .split('.')
                .map(|id| {
                    if id.is_empty() {
                        Err(invalid_version(input, "empty pre-release identifier"))
                    } else if let Ok(n) = id.parse::<u64>() {
                        Ok(PreIdent::Numeric(n))
                    } else {
                        Ok(PreIdent::Alpha(id.to_owned()))
                    }
                })
                .collect::<Result<Vec<_>, _>>()?,
        };

        Ok(Self { segments, pre })
    }

    /// `~>` 상한: 마지막 세그먼트를 버리고 그 앞 세그먼트를 1 올립니다.
    ///
    /// `~> 1.2.3` -> `< 1.3`, `~> 1.2` -> `< 2`, `~> 1` -> `< 2`
    fn pessimistic_upper(&self) -> Self {
        let mut segments = self.segments.clone();
        if segments.len() > 1 {
            segments.pop();
        }
        if let Some(last) = segments.last_mut() {
            *last = last.saturating_add(1);
        }
        Self {
            segments,
            pre: Vec::new(),
        }
    }
}

impl Ord for GenericVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        for i in 0..len {
            let a = self.segments.get(i).copied().unwrap_or(0);
            let b = other.segments.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }

        // pre-release가 없는 쪽이 더 큼
        match (self.pre.is_empty(), other.pre.is_empty()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => self.pre.cmp(&other.pre),
        }
    }
}

impl PartialOrd for GenericVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> GenericVersion {
        GenericVersion::parse(s).unwrap()
    }

    #[test]
    fn parse_lenient_forms() {
        assert_eq!(v("v1.2.3"), v("1.2.3"));
        assert_eq!(v("1.2").cmp(&v("1.2.0")), Ordering::Equal);
        assert_eq!(v("1.2.3+build.5").cmp(&v("1.2.3")), Ordering::Equal);
        assert!(v("4.0.0.1") > v("4.0.0"));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(GenericVersion::parse("").is_err());
        assert!(GenericVersion::parse("abc").is_err());
        assert!(GenericVersion::parse("1..2").is_err());
        assert!(GenericVersion::parse("1.2.3-").is_err());
    }

    #[test]
    fn prerelease_ordering() {
        assert!(v("1.0.0-alpha") < v("1.0.0"));
        assert!(v("1.0.0-alpha") < v("1.0.0-alpha.1"));
        assert!(v("1.0.0-alpha.1") < v("1.0.0-beta"));
        assert!(v("1.0.0-2") < v("1.0.0-11"));
        assert!(v("1.0.0-11") < v("1.0.0-rc"));
    }

    #[test]
    fn go_pseudo_version() {
        assert!(v("v0.0.0-20210101000000-abcdef123456") < v("v0.0.1"));
        assert!(GenericComparer.matches("v0.0.0-20210101000000-abcdef123456", "< 0.1.0").unwrap());
    }

    #[test]
    fn operators() {
        let c = GenericComparer;
        assert!(c.matches("1.2.3", "= 1.2.3").unwrap());
        assert!(c.matches("1.2.3", "==1.2.3").unwrap());
        assert!(c.matches("1.2.3", "1.2.3").unwrap());
        assert!(c.matches("1.2.3", "!= 1.2.4").unwrap());
        assert!(c.matches("1.2.3", "> 1.2.2").unwrap());
        assert!(c.matches("1.2.3", ">= 1.2.3").unwrap());
        assert!(c.matches("1.2.3", "< 1.3").unwrap());
        assert!(c.matches("1.2.3", "<= 1.2.3").unwrap());
        assert!(!c.matches("1.2.3", "< 1.2.3").unwrap());
    }

    #[test]
    fn and_with_comma_or_space() {
        let c = GenericComparer;
        assert!(c.matches("1.5.0", ">= 1.0.0, < 2.0.0").unwrap());
        assert!(c.matches("1.5.0", ">=1.0.0 <2.0.0").unwrap());
        assert!(!c.matches("2.0.0", ">= 1.0.0, < 2.0.0").unwrap());
    }

    #[test]
    fn or_alternatives() {
        let c = GenericComparer;
        let constraint = "< 1.0.5 || >= 2.0.0, < 2.0.3";
        assert!(c.matches("1.0.4", constraint).unwrap());
        assert!(c.matches("2.0.1", constraint).unwrap());
        assert!(!c.matches("1.5.0", constraint).unwrap());
    }

    #[test]
    fn pessimistic_operator() {
        let c = GenericComparer;
        assert!(c.matches("1.2.9", "~> 1.2.3").unwrap());
        assert!(!c.matches("1.3.0", "~> 1.2.3").unwrap());
        assert!(!c.matches("1.2.2", "~> 1.2.3").unwrap());
        assert!(c.matches("1.9.0", "~> 1.2").unwrap());
        assert!(!c.matches("2.0.0", "~> 1.2").unwrap());
    }

    #[test]
    fn error_kinds() {
        let c = GenericComparer;
        assert!(matches!(
            c.matches("garbage", ">= 1.0"),
            Err(ComparerError::InvalidVersion { .. })
        ));
        assert!(matches!(
            c.matches("1.0.0", ">= x.y"),
            Err(ComparerError::InvalidConstraint { .. })
        ));
        assert!(matches!(
            c.matches("1.0.0", ""),
            Err(ComparerError::InvalidConstraint { .. })
        ));
    }
}
