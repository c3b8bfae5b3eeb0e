//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Vigil -- library vulnerability detection.
///
/// Use `vigil <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "vigil", version, about, long_about = None)]
pub struct Cli {
    /// Path to the vigil.toml configuration file.
    #[arg(short, long, global = true, default_value = "vigil.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detect vulnerabilities of a single package.
    Detect(DetectArgs),

    /// Detect vulnerabilities of every application in a JSON file.
    Scan(ScanArgs),

    /// List supported package types with their ecosystem and advisory sources.
    Types,

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- detect ----

/// Detect vulnerabilities of one package version.
#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Package type identifier (cargo, npm, yarn, jar, gomod, ...).
    #[arg(short = 't', long = "type")]
    pub package_type: String,

    /// Package name as it appears in the lockfile.
    pub name: String,

    /// Installed version.
    pub version: String,
}

// ---- scan ----

/// Scan applications described in a JSON file.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// JSON file with one application object or an array of them.
    pub path: PathBuf,
}

// ---- config ----

/// Manage vigil configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, detector).
        #[arg(long)]
        section: Option<String>,
    },
}
