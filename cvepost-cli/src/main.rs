//! cvepost 바이너리 진입점
//!
//! 설정 로드 → 로깅 초기화 → 서브커맨드 분기. 모든 실패는
//! [`CliError::exit_code`]의 문서화된 종료 코드로 매핑됩니다.

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use clap::Parser;

use cvepost_core::config::CvepostConfig;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!("cvepost: {err}");
        std::process::exit(err.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    // 설정 부재는 어떤 처리도 시작하기 전의 치명적 에러입니다 (종료 코드 2).
    let config = CvepostConfig::load(&cli.config).await?;

    logging::init_tracing(&config.general, cli.log_level.as_deref())
        .map_err(|e| CliError::Command(e.to_string()))?;
    cvepost_core::metrics::describe_all();

    tracing::info!(config = %cli.config.display(), "cvepost starting");

    let writer = OutputWriter::new(cli.output);

    match cli.command {
        Commands::Run(args) => commands::run::execute(args, &config, &writer).await,
        Commands::Config(args) => {
            commands::config::execute(args, &cli.config, &config, &writer).await
        }
        Commands::Cache(args) => commands::cache::execute(args, &config, &writer).await,
    }
}
