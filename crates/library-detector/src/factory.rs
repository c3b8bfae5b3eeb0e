//! 드라이버 팩토리 -- 패키지 유형을 드라이버로 매핑
//!
//! # 지원 표
//!
//! | 패키지 유형 | 에코시스템 | 소스 (순서대로) |
//! |---|---|---|
//! | `cargo` | cargo | primary, rustsec |
//! | `composer` | composer | primary, php-security-advisories, ghsa |
//! | `npm`, `yarn`, `node-pkg`, `javascript` | npm | primary, nodejs-security-wg, ghsa |
//! | `nuget` | nuget | primary, ghsa |
//! | `jar` | maven | primary, ghsa |
//! | `gobinary`, `gomod` | go | primary |
//!
//! 그 밖의 유형은 [`UnsupportedTypeError`]입니다.
//!
//! 새 에코시스템을 추가할 때는 [`PackageType`]에 variant를 추가하고
//! [`DriverFactory::create_for`]의 `match`에 행을 추가합니다.

use std::sync::Arc;

use crate::advisory::{
    Advisory, EcosystemAdvisory, GhsaAdvisory, NodeAdvisory, PhpAdvisory, RustSecAdvisory,
};
use crate::comparer::{Comparer, GenericComparer, MavenComparer, NpmComparer};
use crate::db::AdvisoryDb;
use crate::driver::Driver;
use crate::error::UnsupportedTypeError;
use crate::types::{Ecosystem, PackageType};

/// 드라이버 팩토리
///
/// 어드바이저리 DB를 명시적으로 보유하며, 드라이버 생성은 I/O 없이
/// `Arc` 복제만 수행합니다.
#[derive(Debug, Clone)]
pub struct DriverFactory {
    db: Arc<AdvisoryDb>,
}

impl DriverFactory {
    /// 새 팩토리를 생성합니다.
    pub fn new(db: Arc<AdvisoryDb>) -> Self {
        Self { db }
    }

    /// 공유 중인 DB 참조를 반환합니다.
    pub fn db(&self) -> &AdvisoryDb {
        &self.db
    }

    /// 패키지 유형 식별자로 드라이버를 생성합니다.
    pub fn create(&self, package_type: &str) -> Result<Driver, UnsupportedTypeError> {
        let parsed: PackageType = package_type.parse()?;
        self.create_for(parsed)
    }

    /// 파싱된 패키지 유형으로 드라이버를 생성합니다.
    pub fn create_for(&self, package_type: PackageType) -> Result<Driver, UnsupportedTypeError> {
        let driver = match package_type {
            PackageType::Cargo => Driver::aggregate(
                Ecosystem::Cargo,
                vec![
                    self.primary(Ecosystem::Cargo, Arc::new(GenericComparer)),
                    Box::new(RustSecAdvisory::new(Arc::clone(&self.db))),
                ],
            ),
            PackageType::Composer => {
                let comparer: Arc<dyn Comparer> = Arc::new(GenericComparer);
                Driver::aggregate(
                    Ecosystem::Composer,
                    vec![
                        self.primary(Ecosystem::Composer, Arc::clone(&comparer)),
                        Box::new(PhpAdvisory::new(Arc::clone(&self.db))),
                        self.ghsa(Ecosystem::Composer, comparer),
                    ],
                )
            }
            PackageType::Npm | PackageType::Yarn | PackageType::NodePkg | PackageType::JavaScript => {
                let comparer: Arc<dyn Comparer> = Arc::new(NpmComparer);
                Driver::aggregate(
                    Ecosystem::Npm,
                    vec![
                        self.primary(Ecosystem::Npm, Arc::clone(&comparer)),
                        Box::new(NodeAdvisory::new(Arc::clone(&self.db))),
                        self.ghsa(Ecosystem::Npm, comparer),
                    ],
                )
            }
            PackageType::NuGet => {
                let comparer: Arc<dyn Comparer> = Arc::new(GenericComparer);
                Driver::aggregate(
                    Ecosystem::NuGet,
                    vec![
                        self.primary(Ecosystem::NuGet, Arc::clone(&comparer)),
                        self.ghsa(Ecosystem::NuGet, comparer),
                    ],
                )
            }
            PackageType::Jar => {
                let comparer: Arc<dyn Comparer> = Arc::new(MavenComparer);
                Driver::aggregate(
                    Ecosystem::Maven,
                    vec![
                        self.primary(Ecosystem::Maven, Arc::clone(&comparer)),
                        self.ghsa(Ecosystem::Maven, comparer),
                    ],
                )
            }
            PackageType::GoBinary | PackageType::GoMod => Driver::aggregate(
                Ecosystem::Go,
                vec![self.primary(Ecosystem::Go, Arc::new(GenericComparer))],
            ),
            PackageType::Pip
            | PackageType::Pipenv
            | PackageType::Poetry
            | PackageType::Bundler
            | PackageType::GemSpec
            | PackageType::Conan => {
                return Err(UnsupportedTypeError::new(package_type.as_str()));
            }
        };

        tracing::debug!(
            package_type = %package_type,
            ecosystem = %driver.ecosystem(),
            sources = ?driver.advisory_names(),
            "driver created"
        );

        Ok(driver)
    }

    /// 드라이버를 만들 수 있는 패키지 유형 목록
    pub fn supported_types() -> Vec<PackageType> {
        PackageType::ALL
            .into_iter()
            .filter(|t| {
                !matches!(
                    t,
                    PackageType::Pip
                        | PackageType::Pipenv
                        | PackageType::Poetry
                        | PackageType::Bundler
                        | PackageType::GemSpec
                        | PackageType::Conan
                )
            })
            .collect()
    }

    fn primary(&self, ecosystem: Ecosystem, comparer: Arc<dyn Comparer>) -> Box<dyn Advisory> {
        Box::new(EcosystemAdvisory::new(Arc::clone(&self.db), ecosystem, comparer))
    }

    fn ghsa(&self, ecosystem: Ecosystem, comparer: Arc<dyn Comparer>) -> Box<dyn Advisory> {
        Box::new(GhsaAdvisory::new(Arc::clone(&self.db), ecosystem, comparer))
    }
}
