//! Maven 비교기 -- `ComparableVersion` 순서와 구간 표기
//!
//! # 버전 순서
//!
//! 버전은 숫자/문자 전환 지점과 `.`, `-`에서 나뉘어 항목 목록이 됩니다.
//! 잘 알려진 qualifier는 다음 순서를 가집니다.
//!
//! ```text
//! alpha(a) < beta(b) < milestone(m) < rc(cr) < snapshot < ""(ga, final, release) < sp < 기타
//! ```
//!
//! 숫자 항목은 qualifier보다 크고, 끝의 `0`과 release qualifier는 무시합니다
//! (`2.0.0.RELEASE` == `2`).
//!
//! # 제약 조건
//!
//! - 연산자: `>= 1.0, < 2.0` (범용 비교기와 같은 토큰 규칙)
//! - 구간: `[1.0,2.0)`, `(,1.5]`, `[1.2]`, 여러 구간 나열은 합집합

use std::cmp::Ordering;

use super::{Comparer, Op, invalid_constraint, invalid_version, split_alternatives, tokenize_comparators};
use crate::error::ComparerError;

/// Maven 비교기
#[derive(Debug, Clone, Copy, Default)]
pub struct MavenComparer;

impl Comparer for MavenComparer {
    fn name(&self) -> &str {
        "maven"
    }

    fn matches(&self, version: &str, constraint: &str) -> Result<bool, ComparerError> {
        let installed =
            MavenVersion::parse(version).ok_or_else(|| invalid_version(version, "empty version"))?;

        for alternative in split_alternatives(constraint)? {
            let matched = if alternative.starts_with(['[', '(']) {
                matches_ranges(&installed, alternative, constraint)?
            } else {
                matches_operators(&installed, alternative, constraint)?
            };
            if matched {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

fn parse_bound(raw: &str, constraint: &str) -> Result<MavenVersion, ComparerError> {
    MavenVersion::parse(raw).ok_or_else(|| invalid_constraint(constraint, "empty version bound"))
}

fn matches_operators(
    installed: &MavenVersion,
    alternative: &str,
    constraint: &str,
) -> Result<bool, ComparerError> {
    for (op, raw) in tokenize_comparators(alternative, constraint)? {
        if op == Op::Pessimistic {
            return Err(invalid_constraint(constraint, "'~>' is not a maven operator"));
        }
        let target = parse_bound(raw, constraint)?;
        if !op.holds(installed.cmp(&target)) {
            return Ok(false);
        }
    }
    Ok(true)
}

/// 구간 목록 중 하나라도 포함되면 `true`
fn matches_ranges(
    installed: &MavenVersion,
    alternative: &str,
    constraint: &str,
) -> Result<bool, ComparerError> {
    let mut rest = alternative.trim();
    let mut any = false;

    while !rest.is_empty() {
        let lower_inclusive = match rest.chars().next() {
            Some('[') => true,
            Some('(') => false,
            _ => return Err(invalid_constraint(constraint, format!("expected range at '{rest}'"))),
        };
        let close = rest
            .find([']', ')'])
            .ok_or_else(|| invalid_constraint(constraint, "unterminated range"))?;
        let upper_inclusive = rest[close..].starts_with(']');
        let body = &rest[1..close];
        rest = rest[close + 1..].trim_start_matches([',', ' ']);

        if in_range(installed, body, lower_inclusive, upper_inclusive, constraint)? {
            any = true;
        }
    }
    Ok(any)
}

fn in_range(
    installed: &MavenVersion,
    body: &str,
    lower_inclusive: bool,
    upper_inclusive: bool,
    constraint: &str,
) -> Result<bool, ComparerError> {
    let Some((lower, upper)) = body.split_once(',') else {
        // [1.2] 정확히 일치
        if !(lower_inclusive && upper_inclusive) {
            return Err(invalid_constraint(constraint, "single version range must use brackets"));
        }
        let exact = parse_bound(body, constraint)?;
        return Ok(installed.cmp(&exact) == Ordering::Equal);
    };

    let (lower, upper) = (lower.trim(), upper.trim());
    if !lower.is_empty() {
        let bound = parse_bound(lower, constraint)?;
        let ord = installed.cmp(&bound);
        if ord == Ordering::Less || (ord == Ordering::Equal && !lower_inclusive) {
            return Ok(false);
        }
    }
    if !upper.is_empty() {
        let bound = parse_bound(upper, constraint)?;
        let ord = installed.cmp(&bound);
        if ord == Ordering::Greater || (ord == Ordering::Equal && !upper_inclusive) {
            return Ok(false);
        }
    }
    Ok(true)
}

/// 버전 항목
#[derive(Debug, Clone, PartialEq, Eq)]
enum Item {
    Int(u64),
    Qualifier(String),
}

/// Maven 버전
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MavenVersion {
    items: Vec<Item>,
}

impl MavenVersion {
    /// 버전 문자열을 파싱합니다. 빈 문자열이면 `None`입니다.
    pub fn parse(input: &str) -> Option<Self> {
        let s = input.trim().to_lowercase();
        if s.is_empty() {
            return None;
        }

        let mut items = Vec::new();
        let mut chars = s.chars().peekable();
        while let Some(&c) = chars.peek() {
            if c == '.' || c == '-' || c == '_' || c == '+' {
                chars.next();
                continue;
            }
            let mut token = String::new();
            let digit = c.is_ascii_digit();
            while let Some(&n) = chars.peek() {
                if n.is_ascii_digit() != digit || matches!(n, '.' | '-' | '_' | '+') {
                    break;
                }
                token.push(n);
                chars.next();
            }

            if digit {
                items.push(Item::Int(token.parse().unwrap_or(u64::MAX)));
            } else {
                // 1.0-alpha == 1-alpha
                while items.last() == Some(&Item::Int(0)) {
                    items.pop();
                }
                let followed_by_digit = chars.peek().is_some_and(char::is_ascii_digit);
                items.push(Item::Qualifier(canonical_qualifier(&token, followed_by_digit)));
            }
        }

        while let Some(last) = items.last() {
            match last {
                Item::Int(0) => {}
                Item::Qualifier(q) if q.is_empty() => {}
                _ => break,
            }
            items.pop();
        }

        Some(Self { items })
    }
}

fn canonical_qualifier(token: &str, followed_by_digit: bool) -> String {
    match token {
        "a" if followed_by_digit => "alpha".to_owned(),
        "b" if followed_by_digit => "beta".to_owned(),
        "m" if followed_by_digit => "milestone".to_owned(),
        "cr" => "rc".to_owned(),
        "ga" | "final" | "release" => String::new(),
        other => other.to_owned(),
    }
}

fn qualifier_rank(q: &str) -> u8 {
    match q {
        "alpha" => 0,
        "beta" => 1,
        "milestone" => 2,
        "rc" => 3,
        "snapshot" => 4,
        "" => 5,
        "sp" => 6,
        _ => 7,
    }
}

fn compare_qualifiers(a: &str, b: &str) -> Ordering {
    qualifier_rank(a)
        .cmp(&qualifier_rank(b))
        .then_with(|| a.cmp(b))
}

fn compare_items(a: Option<&Item>, b: Option<&Item>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (Some(Item::Int(x)), Some(Item::Int(y))) => x.cmp(y),
        (Some(Item::Int(x)), None) => x.cmp(&0),
        (None, Some(Item::Int(y))) => 0u64.cmp(y),
        (Some(Item::Qualifier(x)), Some(Item::Qualifier(y))) => compare_qualifiers(x, y),
        (Some(Item::Qualifier(x)), None) => compare_qualifiers(x, ""),
        (None, Some(Item::Qualifier(y))) => compare_qualifiers("", y),
        (Some(Item::Int(_)), Some(Item::Qualifier(_))) => Ordering::Greater,
        (Some(Item::Qualifier(_)), Some(Item::Int(_))) => Ordering::Less,
    }
}

impl Ord for MavenVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.items.len().max(other.items.len());
        (0..len)
            .map(|i| compare_items(self.items.get(i), other.items.get(i)))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for MavenVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
