use crate::config::toml_config::{SourceConfig, TomlConfig};
use crate::core::adapter::SourceFormat;
use crate::utils::error::{Result, ResultsError};
use std::env;

/// Builds the Lambda configuration from environment variables.
///
/// `RESULTS_CONFIG_PATH` points at a TOML file (defaults otherwise);
/// `SOURCE_URL`, `SOURCE_FORMAT`, `RESULTS_TIME_ZONE` and
/// `FETCH_TIMEOUT_SECONDS` override single values on top of it.
pub fn config_from_env() -> Result<TomlConfig> {
    config_from_lookup(|key| env::var(key).ok())
}

pub fn config_from_lookup<F>(lookup: F) -> Result<TomlConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match lookup("RESULTS_CONFIG_PATH") {
        Some(path) => TomlConfig::from_file(path)?,
        None => TomlConfig::default(),
    };

    if let Some(url) = lookup("SOURCE_URL") {
        let format = match lookup("SOURCE_FORMAT") {
            Some(format) => format.parse()?,
            None => SourceFormat::EmbeddedJson,
        };
        config.sources = vec![SourceConfig::new(&url, format)];
    }

    if let Some(zone) = lookup("RESULTS_TIME_ZONE") {
        config.service.time_zone = zone;
    }

    if let Some(timeout) = lookup("FETCH_TIMEOUT_SECONDS") {
        config.service.timeout_seconds =
            timeout
                .parse()
                .map_err(|_| ResultsError::InvalidConfigValueError {
                    field: "FETCH_TIMEOUT_SECONDS".to_string(),
                    value: timeout.clone(),
                    reason: "Expected a whole number of seconds".to_string(),
                })?;
    }

    Ok(config)
}
