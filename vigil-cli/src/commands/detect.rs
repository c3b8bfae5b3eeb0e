//! `vigil detect` command handler

use std::io::Write;

use serde::Serialize;
use tracing::info;

use vigil_core::config::VigilConfig;
use vigil_core::types::DetectedVulnerability;
use vigil_library_detector::DriverFactory;

use crate::cli::DetectArgs;
use crate::commands::{VulnSummary, load_factory, render_findings};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `detect` command.
///
/// # Errors
///
/// - `CliError::UnsupportedType` when no driver exists for `--type` (exit 3)
/// - `CliError::Detection` when an advisory source fails (exit 5)
/// - `CliError::VulnerabilitiesFound` when the report is non-empty (exit 4)
pub async fn execute(
    args: DetectArgs,
    config: &VigilConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let factory = load_factory(&config.detector).await?;

    info!(
        package_type = %args.package_type,
        package = %args.name,
        version = %args.version,
        "detecting vulnerabilities"
    );

    let report = run_detect(&factory, &args)?;
    writer.render(&report)?;

    if report.summary.total > 0 {
        return Err(CliError::VulnerabilitiesFound(format!(
            "found {} vulnerabilities",
            report.summary.total
        )));
    }

    Ok(())
}

fn run_detect(factory: &DriverFactory, args: &DetectArgs) -> Result<DetectReport, CliError> {
    let driver = factory.create(&args.package_type)?;
    let findings = driver.detect(&args.name, &args.version)?;

    Ok(DetectReport {
        package_type: args.package_type.clone(),
        ecosystem: driver.ecosystem().to_string(),
        package: args.name.clone(),
        version: args.version.clone(),
        sources: driver
            .advisory_names()
            .into_iter()
            .map(str::to_owned)
            .collect(),
        summary: VulnSummary::from_findings(&findings),
        findings,
    })
}

/// Single package detection report.
#[derive(Serialize)]
pub struct DetectReport {
    pub package_type: String,
    pub ecosystem: String,
    pub package: String,
    pub version: String,
    /// Advisory sources queried, in order
    pub sources: Vec<String>,
    pub summary: VulnSummary,
    pub findings: Vec<DetectedVulnerability>,
}

impl Render for DetectReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        let target = format!("{}@{}", self.package, self.version);
        writeln!(w, "Package: {} ({})", target.bold(), self.package_type)?;
        writeln!(w, "Ecosystem: {}", self.ecosystem)?;
        writeln!(w, "Sources: {}", self.sources.join(", "))?;
        writeln!(w)?;
        self.summary.render_line(w)?;
        writeln!(w)?;
        render_findings(w, &self.findings)
    }
}
