mod cli;
mod config;
mod context;
mod ddl;
mod error;
mod format;
mod java;
mod meta;
mod naming;
mod output;
mod pipeline;
mod schema;
#[cfg(test)]
mod testutil;
mod transform;
mod typemap;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::Config;
use crate::format::JavaFormatter;
use crate::pipeline::RunOptions;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.default_log_level())),
        )
        .init();

    let config_path = config::resolve_path(cli.config.as_deref());

    if cli.write_config {
        let path = config_path.context("Cannot determine a config path; pass --config")?;
        Config::write_defaults(&path)?;
        tracing::info!("Default config written to {}", path.display());
        return Ok(ExitCode::SUCCESS);
    }

    let config = config::load_global(config_path.as_deref())?;

    let script = tokio::fs::read_to_string(&cli.input)
        .await
        .with_context(|| format!("Failed to read {}", cli.input.display()))?;

    let formatter = Arc::new(JavaFormatter::from_options(&config.format)?);
    let options = RunOptions {
        output: cli.output.clone(),
        clean: cli.clean,
        tables: cli.table_list(),
    };

    tracing::debug!("Generating into {}", options.output.display());
    let summary = pipeline::run(&script, &options, config, formatter).await?;

    Ok(if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
