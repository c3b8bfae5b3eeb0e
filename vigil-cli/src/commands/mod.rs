//! Command handlers -- one module per subcommand

pub mod config;
pub mod detect;
pub mod scan;
pub mod types;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use vigil_core::config::DetectorConfig;
use vigil_core::types::{DetectedVulnerability, Severity};
use vigil_library_detector::{AdvisoryDb, DriverFactory};

use crate::error::CliError;

/// Load the advisory database from `[detector]` settings and wrap it in a factory.
///
/// The directory walk is blocking file I/O, so it runs on the blocking pool.
pub(crate) async fn load_factory(config: &DetectorConfig) -> Result<DriverFactory, CliError> {
    let path = PathBuf::from(&config.advisory_db_path);
    let max_file_size = config.max_db_file_size;
    let max_entries = config.max_db_entries;

    info!(path = %path.display(), "loading advisory database");

    let db = tokio::task::spawn_blocking(move || {
        AdvisoryDb::load_from_dir_with_limits(&path, max_file_size, max_entries)
    })
    .await
    .map_err(|e| CliError::Command(format!("advisory database loader panicked: {}", e)))??;

    Ok(DriverFactory::new(Arc::new(db)))
}

/// Per-severity finding counts.
#[derive(Serialize, Default, Debug, PartialEq, Eq)]
pub struct VulnSummary {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub unknown: usize,
    pub total: usize,
}

impl VulnSummary {
    pub fn from_findings(findings: &[DetectedVulnerability]) -> Self {
        let mut summary = Self::default();
        for finding in findings {
            match finding.severity {
                Severity::Critical => summary.critical += 1,
                Severity::High => summary.high += 1,
                Severity::Medium => summary.medium += 1,
                Severity::Low => summary.low += 1,
                Severity::Unknown => summary.unknown += 1,
            }
        }
        summary.total = findings.len();
        summary
    }

    pub fn add(&mut self, other: &Self) {
        self.critical += other.critical;
        self.high += other.high;
        self.medium += other.medium;
        self.low += other.low;
        self.unknown += other.unknown;
        self.total += other.total;
    }

    fn render_line(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        let vuln_str = format!(
            "{} total (C:{} H:{} M:{} L:{} U:{})",
            self.total, self.critical, self.high, self.medium, self.low, self.unknown
        );

        if self.total > 0 {
            writeln!(w, "Vulnerabilities: {}", vuln_str.red().bold())
        } else {
            writeln!(w, "Vulnerabilities: {}", vuln_str.green().bold())
        }
    }
}

/// Render findings as a fixed-width table.
pub(crate) fn render_findings(
    w: &mut dyn Write,
    findings: &[DetectedVulnerability],
) -> std::io::Result<()> {
    use colored::Colorize;

    if findings.is_empty() {
        return writeln!(w, "{}", "No vulnerabilities found.".green());
    }

    writeln!(
        w,
        "{:<22} {:<10} {:<30} {:<12} {:<20} Fixed",
        "ID", "Severity", "Package", "Version", "Source"
    )?;
    writeln!(w, "{}", "-".repeat(104))?;

    for f in findings {
        let severity = f.severity.to_string();
        let severity_colored = match f.severity {
            Severity::Critical => severity.red().bold(),
            Severity::High => severity.red(),
            Severity::Medium => severity.yellow(),
            Severity::Low => severity.normal(),
            Severity::Unknown => severity.dimmed(),
        };

        writeln!(
            w,
            "{:<22} {:<10} {:<30} {:<12} {:<20} {}",
            f.vulnerability_id,
            severity_colored,
            f.pkg_name,
            f.installed_version,
            f.data_source,
            f.fixed_version.as_deref().unwrap_or("N/A")
        )?;
    }

    Ok(())
}

#[cfg(test)]
pub(crate) fn sample_finding(id: &str, severity: Severity) -> DetectedVulnerability {
    DetectedVulnerability {
        vulnerability_id: id.to_owned(),
        pkg_name: "lodash".to_owned(),
        pkg_path: None,
        installed_version: "4.17.15".to_owned(),
        fixed_version: Some("4.17.21".to_owned()),
        severity,
        title: "Prototype pollution".to_owned(),
        description: String::new(),
        references: Vec::new(),
        data_source: "ghsa".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vuln_summary_counts_by_severity() {
        let findings = vec![
            sample_finding("CVE-1", Severity::Critical),
            sample_finding("CVE-2", Severity::High),
            sample_finding("CVE-3", Severity::High),
            sample_finding("CVE-4", Severity::Unknown),
        ];
        let summary = VulnSummary::from_findings(&findings);
        assert_eq!(summary.critical, 1);
        assert_eq!(summary.high, 2);
        assert_eq!(summary.unknown, 1);
        assert_eq!(summary.total, 4);
    }

    #[test]
    fn test_vuln_summary_add() {
        let mut total = VulnSummary::from_findings(&[sample_finding("CVE-1", Severity::Low)]);
        total.add(&VulnSummary::from_findings(&[sample_finding("CVE-2", Severity::Medium)]));
        assert_eq!(total.low, 1);
        assert_eq!(total.medium, 1);
        assert_eq!(total.total, 2);
    }

    #[test]
    fn test_render_findings_empty() {
        let mut buffer = Vec::new();
        render_findings(&mut buffer, &[]).expect("rendering should succeed");
        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("No vulnerabilities found."));
    }

    #[test]
    fn test_render_findings_table() {
        let mut buffer = Vec::new();
        render_findings(&mut buffer, &[sample_finding("CVE-2021-23337", Severity::High)])
            .expect("rendering should succeed");
        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("CVE-2021-23337"));
        assert!(output.contains("4.17.21"), "should show fixed version");
        assert!(output.contains("ghsa"), "should show data source");
    }

    #[tokio::test]
    async fn test_load_factory_missing_directory_fails() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let config = DetectorConfig {
            advisory_db_path: dir.path().join("missing").display().to_string(),
            ..DetectorConfig::default()
        };
        let err = load_factory(&config).await.expect_err("missing dir should fail");
        assert_eq!(err.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_load_factory_empty_directory() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let config = DetectorConfig {
            advisory_db_path: dir.path().display().to_string(),
            ..DetectorConfig::default()
        };
        let factory = load_factory(&config).await.expect("empty dir should load");
        assert_eq!(factory.db().entry_count(), 0);
    }
}
