//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `contract.address`.
pub const CONTRACT_ADDRESS_ENV_VAR: &str = "CRIME_ALERT_CONTRACT_ADDRESS";
/// Environment variable overriding `admin.address`.
pub const ADMIN_ADDRESS_ENV_VAR: &str = "CRIME_ALERT_ADMIN_ADDRESS";
/// Environment variable overriding `wallet.endpoint`.
pub const WALLET_ENDPOINT_ENV_VAR: &str = "CRIME_ALERT_WALLET_ENDPOINT";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file, apply environment
/// overrides, then validate.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    load_config_with(path, |key| std::env::var(key).ok())
}

/// Same as [`load_config`] with an explicit environment lookup.
pub fn load_config_with<F>(path: Option<&Path>, env: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => AppConfig::default(),
    };

    apply_env_overrides(&mut config, env);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn apply_env_overrides<F>(config: &mut AppConfig, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = env(CONTRACT_ADDRESS_ENV_VAR) {
        config.contract.address = v;
    }
    if let Some(v) = env(ADMIN_ADDRESS_ENV_VAR) {
        config.admin.address = v;
    }
    if let Some(v) = env(WALLET_ENDPOINT_ENV_VAR) {
        config.wallet.endpoint = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    const CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
    const ADMIN: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_only() {
        let config = load_config_with(
            None,
            env_from(&[(CONTRACT_ADDRESS_ENV_VAR, CONTRACT), (ADMIN_ADDRESS_ENV_VAR, ADMIN)]),
        )
        .unwrap();
        assert_eq!(config.contract.address, CONTRACT);
        assert_eq!(config.admin.address, ADMIN);
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[contract]\naddress = \"{CONTRACT}\"\n[admin]\naddress = \"0x0000000000000000000000000000000000000001\"\n[wallet]\nrequest_timeout_secs = 30"
        )
        .unwrap();

        let config =
            load_config_with(Some(file.path()), env_from(&[(ADMIN_ADDRESS_ENV_VAR, ADMIN)])).unwrap();
        assert_eq!(config.admin.address, ADMIN);
        assert_eq!(config.wallet.request_timeout_secs, 30);
    }

    #[test]
    fn test_validation_error_lists_fields() {
        let err = load_config_with(None, env_from(&[])).unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("Validation failed"));
        assert!(msg.contains("contract.address"));
        assert!(msg.contains("admin.address"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config_with(Some(Path::new("/nonexistent/crime-alert.toml")), env_from(&[]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[network\nchain_id = ").unwrap();
        let err = load_config_with(Some(file.path()), env_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
