//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;

/// Load and validate configuration from a TOML file.
///
/// # Arguments
/// * `path` - Path to the config.toml file
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config: AppConfig = toml::from_str(&content)
    .with_context(|| "Failed to parse config.toml")?;

  validate_config(&config)?;

  info!(
    name = %config.app.name,
    commission = config.calculator.default_commission_percent,
    remote = config.remote.enabled,
    cache_ttl = config.cache.ttl_seconds,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - Commission within the calculator's accepted range
/// - Positive cache TTL and a usable data directory
/// - Complete remote credentials when the remote tier is enabled
fn validate_config(config: &AppConfig) -> Result<()> {
  anyhow::ensure!(
    !config.app.name.is_empty(),
    "Service name must not be empty"
  );

  // Calculator validation
  anyhow::ensure!(
    config.calculator.default_commission_percent >= 0.0
      && config.calculator.default_commission_percent < 100.0,
    "default_commission_percent must be in [0, 100), got {}",
    config.calculator.default_commission_percent
  );

  // Cache validation
  anyhow::ensure!(
    config.cache.ttl_seconds > 0,
    "cache ttl_seconds must be positive, got {}",
    config.cache.ttl_seconds
  );

  // Persistence validation
  anyhow::ensure!(
    !config.persistence.data_dir.is_empty(),
    "persistence data_dir must not be empty"
  );

  // Remote tier validation
  if config.remote.enabled {
    anyhow::ensure!(
      !config.remote.base_url.is_empty(),
      "remote base_url must not be empty when the remote tier is enabled"
    );
    anyhow::ensure!(
      !config.remote.api_key.is_empty(),
      "remote api_key must not be empty when the remote tier is enabled"
    );
    anyhow::ensure!(
      !config.remote.user_id.is_empty(),
      "remote user_id must not be empty when the remote tier is enabled"
    );
    anyhow::ensure!(
      config.remote.timeout_ms > 0,
      "remote timeout_ms must be positive"
    );
  }

  // Server validation
  anyhow::ensure!(
    !config.server.bind_address.is_empty(),
    "server bind_address must not be empty"
  );

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parse(toml_str: &str) -> AppConfig {
    toml::from_str(toml_str).unwrap()
  }

  const MINIMAL: &str = r#"
    [app]
    name = "freebet-tracker"

    [calculator]
    default_commission_percent = 2.0
  "#;

  #[test]
  fn test_load_nonexistent_file() {
    let result = load_config("nonexistent.toml");
    assert!(result.is_err());
  }

  #[test]
  fn test_minimal_config_valid_with_defaults() {
    let config = parse(MINIMAL);
    assert!(validate_config(&config).is_ok());
    assert_eq!(config.cache.ttl_seconds, 180);
    assert_eq!(config.persistence.data_dir, "data");
    assert!(!config.remote.enabled);
    assert_eq!(config.server.health_port, 8081);
  }

  #[test]
  fn test_commission_out_of_range_rejected() {
    let mut config = parse(MINIMAL);
    config.calculator.default_commission_percent = 100.0;
    assert!(validate_config(&config).is_err());

    config.calculator.default_commission_percent = -1.0;
    assert!(validate_config(&config).is_err());
  }

  #[test]
  fn test_enabled_remote_requires_credentials() {
    let mut config = parse(MINIMAL);
    config.remote.enabled = true;
    assert!(validate_config(&config).is_err());

    config.remote.base_url = "https://example.supabase.co".to_string();
    config.remote.api_key = "service-key".to_string();
    config.remote.user_id = "user-1".to_string();
    assert!(validate_config(&config).is_ok());
  }

  #[test]
  fn test_zero_cache_ttl_rejected() {
    let mut config = parse(MINIMAL);
    config.cache.ttl_seconds = 0;
    assert!(validate_config(&config).is_err());
  }
}
