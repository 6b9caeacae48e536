//! Command handlers -- one module per subcommand

use std::path::Path;

use logwarden_core::config::LogwardenConfig;
use logwarden_core::error::{ConfigError, LogwardenError};

use crate::error::CliError;

pub mod analyze;
pub mod config;
pub mod message;
pub mod patterns;

/// Load the configuration, falling back to defaults when the file is absent.
///
/// A missing configuration file is not an error for analysis commands:
/// defaults plus environment overrides apply. Any other load failure
/// (parse error, invalid value) is reported as a configuration error.
pub(crate) async fn load_or_default(path: &Path) -> Result<LogwardenConfig, CliError> {
    match LogwardenConfig::load(path).await {
        Ok(config) => Ok(config),
        Err(LogwardenError::Config(ConfigError::FileNotFound { .. })) => {
            tracing::warn!(path = %path.display(), "config file not found, using defaults");
            let mut config = LogwardenConfig::default();
            config.apply_env_overrides();
            config
                .validate()
                .map_err(|e| CliError::Config(e.to_string()))?;
            Ok(config)
        }
        Err(e) => Err(CliError::Config(e.to_string())),
    }
}
