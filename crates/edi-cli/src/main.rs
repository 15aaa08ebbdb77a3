//! # edi-cli
//!
//! Command-line interface for creating, importing and editing X12
//! implementation specifications.

mod cli;
mod commands;
mod config;
mod errors;

use clap::Parser;

use crate::cli::Cli;
use crate::config::Config;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()).await {
        Ok(config) => config,
        Err(e) => errors::exit_with(&e.into()),
    };

    tracing_subscriber::fmt()
        .with_env_filter(config.env_filter())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = commands::run(cli.command, &config).await {
        errors::exit_with(&e);
    }
}
