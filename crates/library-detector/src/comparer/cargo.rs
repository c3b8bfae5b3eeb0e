//! Cargo 비교기 -- `semver::VersionReq` (Cargo 문법)
//!
//! RustSec 어드바이저리의 `patched`/`unaffected` 항목은 Cargo 요구사항 문법
//! (`>= 1.2.3, < 2.0.0`, `^0.4.1`)으로 기록되어 있습니다.

use semver::{Version, VersionReq};

use super::{Comparer, invalid_constraint, invalid_version, split_alternatives};
use crate::error::ComparerError;

/// Cargo 비교기
#[derive(Debug, Clone, Copy, Default)]
pub struct CargoComparer;

impl Comparer for CargoComparer {
    fn name(&self) -> &str {
        "cargo"
    }

    fn matches(&self, version: &str, constraint: &str) -> Result<bool, ComparerError> {
        let installed =
            Version::parse(version.trim()).map_err(|e| invalid_version(version, e.to_string()))?;

        for alternative in split_alternatives(constraint)? {
            let req = VersionReq::parse(alternative)
                .map_err(|e| invalid_constraint(constraint, e.to_string()))?;
            if req.matches(&installed) {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caret_is_default() {
        // Cargo에서 bare 버전은 ^ 요구사항
        assert!(CargoComparer.matches("0.4.9", "0.4.1").unwrap());
        assert!(!CargoComparer.matches("0.5.0", "0.4.1").unwrap());
    }

    #[test]
    fn comma_separated_and() {
        assert!(CargoComparer.matches("1.5.0", ">= 1.2.3, < 2.0.0").unwrap());
        assert!(!CargoComparer.matches("2.0.0", ">= 1.2.3, < 2.0.0").unwrap());
    }

    #[test]
    fn alternatives() {
        let c = "^0.9.5 || >= 1.0.1";
        assert!(CargoComparer.matches("0.9.7", c).unwrap());
        assert!(CargoComparer.matches("1.2.0", c).unwrap());
        assert!(!CargoComparer.matches("1.0.0", c).unwrap());
    }

    #[test]
    fn strict_version_parsing() {
        assert!(matches!(
            CargoComparer.matches("1.0", ">= 1.0.0"),
            Err(ComparerError::InvalidVersion { .. })
        ));
        assert!(matches!(
            CargoComparer.matches("1.0.0", ">== 1.0.0"),
            Err(ComparerError::InvalidConstraint { .. })
        ));
    }
}
