//! CLI errors that carry their own exit code

use std::path::PathBuf;
use thiserror::Error;

pub mod exit_codes {
    pub const FAILURE: i32 = 1;
    pub const INVALID_CONFIG: i32 = 3;
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid configuration {path}: {message}")]
    InvalidConfig { path: PathBuf, message: String },
}

impl CliError {
    pub fn invalid_config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        CliError::InvalidConfig {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidConfig { .. } => exit_codes::INVALID_CONFIG,
        }
    }
}

/// Print an error chain to stderr and exit with the matching code
pub fn exit_with(error: &anyhow::Error) -> ! {
    eprintln!("ERROR: {error:#}");
    let code = error
        .downcast_ref::<CliError>()
        .map_or(exit_codes::FAILURE, CliError::exit_code);
    std::process::exit(code)
}
