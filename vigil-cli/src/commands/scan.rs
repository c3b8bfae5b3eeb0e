//! `vigil scan` command handler
//!
//! Reads a JSON file holding one application object or an array of them:
//!
//! ```json
//! [
//!   {
//!     "type": "npm",
//!     "file_path": "web/package-lock.json",
//!     "packages": [{ "name": "lodash", "version": "4.17.15" }]
//!   }
//! ]
//! ```

use std::io::Write;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use vigil_core::config::VigilConfig;
use vigil_core::types::DetectedVulnerability;
use vigil_library_detector::{Application, DetectorError, DriverFactory, detect_application};

use crate::cli::ScanArgs;
use crate::commands::{VulnSummary, load_factory, render_findings};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `scan` command.
///
/// Applications with an unsupported package type are reported and skipped.
/// A detection failure aborts the whole scan.
pub async fn execute(
    args: ScanArgs,
    config: &VigilConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let content = tokio::fs::read_to_string(&args.path).await?;
    let applications = parse_applications(&content).map_err(|e| {
        CliError::Command(format!(
            "invalid application file {}: {}",
            args.path.display(),
            e
        ))
    })?;

    let factory = load_factory(&config.detector).await?;

    info!(
        path = %args.path.display(),
        applications = applications.len(),
        "starting application scan"
    );

    let report = run_scan(&factory, args.path.display().to_string(), &applications)?;
    writer.render(&report)?;

    if report.summary.total > 0 {
        return Err(CliError::VulnerabilitiesFound(format!(
            "found {} vulnerabilities",
            report.summary.total
        )));
    }

    Ok(())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ScanInput {
    Many(Vec<Application>),
    One(Application),
}

fn parse_applications(content: &str) -> Result<Vec<Application>, serde_json::Error> {
    Ok(match serde_json::from_str(content)? {
        ScanInput::Many(apps) => apps,
        ScanInput::One(app) => vec![app],
    })
}

fn run_scan(
    factory: &DriverFactory,
    source: String,
    applications: &[Application],
) -> Result<ScanReport, CliError> {
    let mut report = ScanReport {
        source,
        total_packages: 0,
        summary: VulnSummary::default(),
        applications: Vec::new(),
        skipped: Vec::new(),
    };

    for app in applications {
        match detect_application(factory, app) {
            Ok(findings) => {
                let summary = VulnSummary::from_findings(&findings);
                report.summary.add(&summary);
                report.total_packages += app.packages.len();
                report.applications.push(ApplicationResult {
                    package_type: app.package_type.clone(),
                    file_path: app.file_path.clone(),
                    packages: app.packages.len(),
                    summary,
                    findings,
                });
            }
            Err(DetectorError::UnsupportedType(e)) => {
                warn!(
                    package_type = %app.package_type,
                    file_path = app.file_path.as_deref().unwrap_or("-"),
                    "skipping application with unsupported package type"
                );
                report.skipped.push(SkippedApplication {
                    package_type: app.package_type.clone(),
                    file_path: app.file_path.clone(),
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(report)
}

/// Multi-application scan report.
#[derive(Serialize)]
pub struct ScanReport {
    pub source: String,
    pub total_packages: usize,
    pub summary: VulnSummary,
    pub applications: Vec<ApplicationResult>,
    pub skipped: Vec<SkippedApplication>,
}

#[derive(Serialize)]
pub struct ApplicationResult {
    pub package_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    pub packages: usize,
    pub summary: VulnSummary,
    pub findings: Vec<DetectedVulnerability>,
}

#[derive(Serialize)]
pub struct SkippedApplication {
    pub package_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    pub reason: String,
}

impl Render for ScanReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Scan: {}", self.source.bold())?;
        writeln!(w, "Applications scanned: {}", self.applications.len())?;
        writeln!(w, "Total packages: {}", self.total_packages)?;
        self.summary.render_line(w)?;

        for app in &self.applications {
            writeln!(w)?;
            writeln!(
                w,
                "{} ({}, {} packages)",
                app.file_path.as_deref().unwrap_or("-").bold(),
                app.package_type,
                app.packages
            )?;
            render_findings(w, &app.findings)?;
        }

        if !self.skipped.is_empty() {
            writeln!(w)?;
            writeln!(w, "{}", "Skipped:".yellow().bold())?;
            for skipped in &self.skipped {
                writeln!(
                    w,
                    "  {} ({}): {}",
                    skipped.file_path.as_deref().unwrap_or("-"),
                    skipped.package_type,
                    skipped.reason.yellow()
                )?;
            }
        }

        Ok(())
    }
}
