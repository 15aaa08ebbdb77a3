//! YAML configuration file

use crate::errors::CliError;
use edi_spec::templates::DEFAULT_EDI_VERSION;
use serde::Deserialize;
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Release used by `new` when none is given
    pub default_edi_version: String,

    /// Pretty-print written documents
    pub pretty: bool,

    /// Log filter used when `RUST_LOG` is unset
    pub log_level: Option<String>,

    /// Partner stamped on newly created documents
    pub partner: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_edi_version: DEFAULT_EDI_VERSION.to_string(),
            pretty: true,
            log_level: None,
            partner: None,
        }
    }
}

impl Config {
    /// Load from `path`, or defaults when no file is given
    pub async fn load(path: Option<&Path>) -> Result<Self, CliError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| CliError::invalid_config(path, e.to_string()))?;
        Self::parse(&content).map_err(|message| CliError::invalid_config(path, message))
    }

    fn parse(content: &str) -> Result<Self, String> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content).map_err(|e| e.to_string())?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        if self.default_edi_version.trim().is_empty() {
            return Err("default_edi_version must not be empty".to_string());
        }
        if let Some(level) = &self.log_level {
            EnvFilter::try_new(level).map_err(|e| format!("log_level '{level}': {e}"))?;
        }
        Ok(())
    }

    /// Filter from `RUST_LOG`, then `log_level`, then `warn`
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::try_new(self.log_level.as_deref().unwrap_or("warn"))
                .unwrap_or_else(|_| EnvFilter::new("warn"))
        })
    }
}
