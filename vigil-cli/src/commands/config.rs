//! `vigil config` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use vigil_core::config::VigilConfig;

use crate::cli::{ConfigAction, ConfigArgs};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Sections accepted by `config show --section`.
const SECTIONS: [&str; 2] = ["general", "detector"];

/// Execute the `config` command.
pub async fn execute(
    args: ConfigArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        ConfigAction::Validate => execute_validate(config_path, writer).await,
        ConfigAction::Show { section } => execute_show(config_path, section, writer).await,
    }
}

/// Execute the config validate subcommand.
///
/// Unlike the other commands, a missing file is reported as invalid
/// instead of falling back to defaults.
///
/// # Errors
///
/// Returns `CliError::Config` if validation fails (missing file, invalid values, parse errors).
async fn execute_validate(config_path: &Path, writer: &OutputWriter) -> Result<(), CliError> {
    info!(path = %config_path.display(), "validating configuration");

    let report = validation_report(config_path, VigilConfig::load(config_path).await);
    writer.render(&report)?;

    if !report.valid {
        return Err(CliError::Config("configuration is invalid".to_owned()));
    }

    Ok(())
}

fn validation_report<T, E: std::fmt::Display>(
    config_path: &Path,
    result: Result<T, E>,
) -> ConfigValidationReport {
    match result {
        Ok(_) => ConfigValidationReport {
            source: config_path.display().to_string(),
            valid: true,
            errors: Vec::new(),
        },
        Err(e) => ConfigValidationReport {
            source: config_path.display().to_string(),
            valid: false,
            errors: vec![e.to_string()],
        },
    }
}

/// Execute the config show subcommand.
///
/// Loads and displays the effective configuration (file + env overrides + defaults).
///
/// # Errors
///
/// Returns `CliError::Config` if loading fails or `CliError::Command` if section name is invalid.
async fn execute_show(
    config_path: &Path,
    section: Option<String>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    info!(path = %config_path.display(), "loading configuration");

    let config = VigilConfig::load(config_path).await?;
    let report = show_report(&config, config_path, section)?;
    writer.render(&report)?;

    Ok(())
}

fn show_report(
    config: &VigilConfig,
    config_path: &Path,
    section: Option<String>,
) -> Result<ConfigReport, CliError> {
    let config_toml = match section.as_deref() {
        None => toml::to_string_pretty(config),
        Some("general") => toml::to_string_pretty(&config.general),
        Some("detector") => toml::to_string_pretty(&config.detector),
        Some(other) => {
            return Err(CliError::Command(format!(
                "unknown section: {} (expected: {})",
                other,
                SECTIONS.join(", ")
            )));
        }
    }
    .unwrap_or_else(|e| format!("(serialization error: {})", e));

    Ok(ConfigReport {
        source: config_path.display().to_string(),
        section,
        config_toml,
    })
}

/// Configuration display report.
///
/// The `config_toml` field is skipped during JSON serialization (only used for text rendering).
#[derive(Serialize)]
pub struct ConfigReport {
    /// Configuration file path
    pub source: String,
    /// Optional section name (None = full config)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Serialized TOML configuration
    #[serde(skip)]
    pub config_toml: String,
}

impl Render for ConfigReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        if let Some(ref section) = self.section {
            let section_label = format!("[{}]", section);
            writeln!(
                w,
                "Configuration {} (source: {})",
                section_label.bold(),
                self.source
            )?;
        } else {
            writeln!(w, "Configuration (source: {})", self.source.bold())?;
        }

        writeln!(w)?;
        write!(w, "{}", self.config_toml)?;

        Ok(())
    }
}

/// Configuration validation report.
#[derive(Serialize)]
pub struct ConfigValidationReport {
    /// Configuration file path
    pub source: String,
    /// Whether the configuration is valid
    pub valid: bool,
    /// Validation error messages (empty if valid)
    pub errors: Vec<String>,
}

impl Render for ConfigValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Config Validation: {}", self.source.bold())?;

        if self.valid {
            writeln!(w, "  Result: {}", "VALID".green().bold())?;
        } else {
            writeln!(w, "  Result: {}", "INVALID".red().bold())?;
            for err in &self.errors {
                writeln!(w, "  Error: {}", err.red())?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_report_full_config() {
        let config = VigilConfig::default();
        let report = show_report(&config, Path::new("vigil.toml"), None)
            .expect("full config should render");
        assert!(report.section.is_none());
        assert!(report.config_toml.contains("[general]"));
        assert!(report.config_toml.contains("[detector]"));
        assert!(report.config_toml.contains("advisory_db_path"));
    }

    #[test]
    fn test_show_report_detector_section() {
        let config = VigilConfig::default();
        let report = show_report(&config, Path::new("vigil.toml"), Some("detector".to_owned()))
            .expect("detector section should render");
        assert_eq!(report.section.as_deref(), Some("detector"));
        assert!(report.config_toml.contains("max_db_entries"));
        assert!(!report.config_toml.contains("log_level"));
    }

    #[test]
    fn test_show_report_unknown_section() {
        let config = VigilConfig::default();
        let err = show_report(&config, Path::new("vigil.toml"), Some("sbom".to_owned()))
            .err()
            .expect("unknown section should fail");
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("expected: general, detector"));
    }

    #[test]
    fn test_config_report_render_text_specific_section() {
        let report = ConfigReport {
            source: "/etc/vigil/vigil.toml".to_owned(),
            section: Some("detector".to_owned()),
            config_toml: "max_db_entries = 1000000".to_owned(),
        };

        let mut buffer = Vec::new();
        report
            .render_text(&mut buffer)
            .expect("text rendering should succeed");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("[detector]"), "should show section name");
        assert!(output.contains("max_db_entries"), "should show config content");
    }

    #[test]
    fn test_config_report_json_serialization() {
        let report = ConfigReport {
            source: "test.toml".to_owned(),
            section: Some("general".to_owned()),
            config_toml: "log_level = \"info\"".to_owned(),
        };

        let json = serde_json::to_string(&report).expect("JSON serialization should succeed");
        let parsed: serde_json::Value = serde_json::from_str(&json).expect("should parse JSON");

        assert_eq!(parsed["source"].as_str(), Some("test.toml"));
        assert_eq!(parsed["section"].as_str(), Some("general"));
        assert!(
            parsed.get("config_toml").is_none(),
            "config_toml should be skipped"
        );
    }

    #[test]
    fn test_validation_report_invalid() {
        let report = validation_report::<(), _>(Path::new("bad.toml"), Err("parse failed"));
        assert!(!report.valid);
        assert_eq!(report.errors, vec!["parse failed"]);

        let mut buffer = Vec::new();
        report
            .render_text(&mut buffer)
            .expect("text rendering should succeed");
        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("INVALID"));
        assert!(output.contains("parse failed"));
    }

    #[test]
    fn test_validation_report_valid() {
        let report = validation_report::<(), &str>(Path::new("vigil.toml"), Ok(()));
        assert!(report.valid);
        assert!(report.errors.is_empty());
    }

    #[tokio::test]
    async fn test_validate_missing_file_is_config_error() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let writer = OutputWriter::new(crate::cli::OutputFormat::Json);
        let err = execute_validate(&dir.path().join("missing.toml"), &writer)
            .await
            .expect_err("missing file should be invalid");
        assert_eq!(err.exit_code(), 2);
    }
}
