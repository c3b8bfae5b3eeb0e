//! Vigil CLI -- library vulnerability detection from the command line

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use std::path::Path;

use clap::Parser;

use vigil_core::config::VigilConfig;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("error: {}", e);
            e.exit_code()
        }
    };

    std::process::exit(code);
}

async fn run(cli: Cli) -> Result<(), CliError> {
    // config 명령은 설정 파일 자체를 검사하므로 로드 실패 시 기본값으로 로깅만 초기화
    let loaded = load_config(&cli.config).await;
    let (config, from_file) = match loaded {
        Ok(loaded) => loaded,
        Err(_) if matches!(cli.command, Commands::Config(_)) => (VigilConfig::default(), false),
        Err(e) => return Err(e),
    };

    let mut general = config.general.clone();
    if let Some(level) = &cli.log_level {
        general.log_level = level.clone();
    }
    logging::init_tracing(&general).map_err(|e| CliError::Config(e.to_string()))?;
    vigil_core::metrics::describe_all();

    if !from_file {
        tracing::debug!(
            path = %cli.config.display(),
            "config file not loaded, using defaults"
        );
    }

    let writer = OutputWriter::new(cli.output);

    match cli.command {
        Commands::Detect(args) => commands::detect::execute(args, &config, &writer).await,
        Commands::Scan(args) => commands::scan::execute(args, &config, &writer).await,
        Commands::Types => commands::types::execute(&writer),
        Commands::Config(args) => commands::config::execute(args, &cli.config, &writer).await,
    }
}

/// 설정 파일을 로드합니다. 파일이 없으면 기본값에 환경변수 오버라이드를 적용합니다.
///
/// 두 번째 값은 파일에서 읽었는지 여부입니다.
async fn load_config(path: &Path) -> Result<(VigilConfig, bool), CliError> {
    if tokio::fs::try_exists(path).await? {
        return Ok((VigilConfig::load(path).await?, true));
    }

    let mut config = VigilConfig::default();
    config.apply_env_overrides();
    config.validate()?;
    Ok((config, false))
}
