//! CLI-specific error types and exit code mapping

use vigil_core::error::VigilError;
use vigil_library_detector::{DbError, DetectionError, DetectorError, UnsupportedTypeError};

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// The package type has no driver.
    #[error("{0}")]
    UnsupportedType(String),

    /// Detection finished and reported at least one vulnerability.
    #[error("{0}")]
    VulnerabilitiesFound(String),

    /// An advisory source failed while detecting.
    #[error("detection error: {0}")]
    Detection(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from vigil-core.
    #[error("{0}")]
    Core(VigilError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                                |
    /// |------|----------------------------------------|
    /// | 0    | Success                                |
    /// | 1    | General / command error                |
    /// | 2    | Configuration error                    |
    /// | 3    | Unsupported package type               |
    /// | 4    | Vulnerabilities found (`detect`/`scan`) |
    /// | 5    | Detection failure                      |
    /// | 10   | IO error                               |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::UnsupportedType(_) => 3,
            Self::VulnerabilitiesFound(_) => 4,
            Self::Detection(_) => 5,
            Self::Io(_) => 10,
            Self::Core(e) => match e {
                VigilError::Config(_) => 2,
                VigilError::UnsupportedType(_) => 3,
                VigilError::Detection(_) => 5,
                VigilError::Io(_) => 10,
                VigilError::AdvisoryDb(_) => 1,
            },
            Self::JsonSerialize(_) | Self::Command(_) => 1,
        }
    }
}

impl From<VigilError> for CliError {
    fn from(e: VigilError) -> Self {
        match e {
            VigilError::Config(config_err) => Self::Config(config_err.to_string()),
            other => Self::Core(other),
        }
    }
}

impl From<DetectorError> for CliError {
    fn from(e: DetectorError) -> Self {
        match e {
            DetectorError::UnsupportedType(e) => Self::UnsupportedType(e.to_string()),
            DetectorError::Detection(e) => Self::Detection(e.to_string()),
            DetectorError::Db(e) => Self::Command(format!("advisory database error: {}", e)),
        }
    }
}

impl From<UnsupportedTypeError> for CliError {
    fn from(e: UnsupportedTypeError) -> Self {
        DetectorError::from(e).into()
    }
}

impl From<DetectionError> for CliError {
    fn from(e: DetectionError) -> Self {
        DetectorError::from(e).into()
    }
}

impl From<DbError> for CliError {
    fn from(e: DbError) -> Self {
        DetectorError::from(e).into()
    }
}
