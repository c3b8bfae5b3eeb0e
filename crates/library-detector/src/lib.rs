#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`error`]: Error types (`UnsupportedTypeError`, `DetectionError`, `DetectorError`, ...)
//! - [`types`]: Domain types (`Ecosystem`, `PackageType`, `DataSource`, `Package`, `Application`)
//! - [`comparer`]: Version comparers (`Comparer` trait, generic / npm / maven / cargo)
//! - [`db`]: In-memory advisory store (`AdvisoryDb`, `AdvisoryEntry`)
//! - [`advisory`]: Advisory sources (`Advisory` trait, primary / ghsa / rustsec / php / node)
//! - [`driver`]: Per-ecosystem driver (`Driver`)
//! - [`factory`]: Package type to driver mapping (`DriverFactory`)
//! - [`detect`]: Application-level helper (`detect_application`)
//!
//! # Architecture
//!
//! ```text
//! package type --> DriverFactory --> Driver { ecosystem, [Advisory...] }
//!                       |                  |
//!                 Arc<AdvisoryDb>          | detect(name, version)
//!                                          v
//!                          primary --> native feed --> ghsa
//!                                          |
//!                            merge + dedup by vulnerability_id
//!                                          |
//!                               Vec<DetectedVulnerability>
//! ```

pub mod advisory;
pub mod comparer;
pub mod db;
pub mod detect;
pub mod driver;
pub mod error;
pub mod factory;
pub mod types;

// --- Public API Re-exports ---

// Driver
pub use driver::Driver;
pub use factory::DriverFactory;

// Application detection
pub use detect::detect_application;

// Error
pub use error::{AdvisoryError, ComparerError, DbError, DetectionError, DetectorError, UnsupportedTypeError};

// Types
pub use types::{Application, DataSource, Ecosystem, Package, PackageType};

// Advisory store
pub use db::{AdvisoryDb, AdvisoryEntry};

// Advisory sources
pub use advisory::{
    Advisory, EcosystemAdvisory, GhsaAdvisory, NodeAdvisory, PhpAdvisory, RustSecAdvisory,
};

// Comparers
pub use comparer::{CargoComparer, Comparer, GenericComparer, MavenComparer, NpmComparer};
