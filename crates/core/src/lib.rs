#![doc = include_str!("../README.md")]

pub mod config;
pub mod error;
pub mod metrics;
pub mod types;

// --- 주요 타입 re-export ---

// 에러
pub use error::{ConfigError, VigilError};

// 설정
pub use config::VigilConfig;

// 도메인 타입
pub use types::{DetectedVulnerability, Severity};
