//! `vigil types` command handler

use std::io::Write;
use std::sync::Arc;

use serde::Serialize;

use vigil_library_detector::{AdvisoryDb, DriverFactory, PackageType};

use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `types` command.
///
/// Needs no advisory data; drivers are built over an empty database
/// only to read their ecosystem and source list.
pub fn execute(writer: &OutputWriter) -> Result<(), CliError> {
    let report = build_types_report()?;
    writer.render(&report)?;
    Ok(())
}

fn build_types_report() -> Result<TypesReport, CliError> {
    let factory = DriverFactory::new(Arc::new(AdvisoryDb::empty()));
    let supported = DriverFactory::supported_types();

    let mut types = Vec::with_capacity(supported.len());
    for package_type in &supported {
        let driver = factory.create_for(*package_type)?;
        types.push(TypeEntry {
            package_type: package_type.to_string(),
            ecosystem: driver.ecosystem().to_string(),
            sources: driver
                .advisory_names()
                .into_iter()
                .map(str::to_owned)
                .collect(),
        });
    }

    let unsupported = PackageType::ALL
        .into_iter()
        .filter(|t| !supported.contains(t))
        .map(|t| t.to_string())
        .collect();

    Ok(TypesReport { types, unsupported })
}

/// Supported package type listing.
#[derive(Serialize)]
pub struct TypesReport {
    pub types: Vec<TypeEntry>,
    /// Known package types without a driver
    pub unsupported: Vec<String>,
}

#[derive(Serialize)]
pub struct TypeEntry {
    pub package_type: String,
    pub ecosystem: String,
    pub sources: Vec<String>,
}

impl Render for TypesReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "{:<12} {:<10} Sources", "Type", "Ecosystem")?;
        writeln!(w, "{}", "-".repeat(64))?;
        for entry in &self.types {
            writeln!(
                w,
                "{:<12} {:<10} {}",
                entry.package_type.bold(),
                entry.ecosystem,
                entry.sources.join(" -> ")
            )?;
        }

        if !self.unsupported.is_empty() {
            writeln!(w)?;
            writeln!(w, "Unsupported: {}", self.unsupported.join(", ").dimmed())?;
        }

        Ok(())
    }
}
