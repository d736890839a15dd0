//! Configuration Module - TOML-based Service Configuration
//!
//! Loads and validates configuration from `config.toml`. Remote store
//! credentials, cache TTL and the default exchange commission are all
//! externalized here - nothing is hardcoded in the domain layer.

pub mod loader;

use serde::Deserialize;

/// Top-level service configuration.
///
/// Loaded from `config.toml` at startup. All fields are validated
/// before the service begins serving.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  /// Service identity and metadata.
  pub app: ServiceConfig,
  /// Hedge calculator defaults.
  pub calculator: CalculatorConfig,
  /// Ledger read cache.
  #[serde(default)]
  pub cache: CacheConfig,
  /// Local persistence tier.
  #[serde(default)]
  pub persistence: PersistenceConfig,
  /// Remote persistence tier (optional).
  #[serde(default)]
  pub remote: RemoteConfig,
  /// HTTP server endpoints.
  #[serde(default)]
  pub server: ServerConfig,
}

/// Service identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
  /// Human-readable service name.
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
}

/// Hedge calculator configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CalculatorConfig {
  /// Exchange commission percent applied when a quote request omits one.
  #[serde(default = "default_commission")]
  pub default_commission_percent: f64,
}

/// Ledger read-cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
  /// How long a cached ledger listing stays fresh.
  #[serde(default = "default_cache_ttl")]
  pub ttl_seconds: u64,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      ttl_seconds: default_cache_ttl(),
    }
  }
}

/// Local file-store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PersistenceConfig {
  /// Directory for the ledger JSON file and the stats JSONL log.
  #[serde(default = "default_data_dir")]
  pub data_dir: String,
}

impl Default for PersistenceConfig {
  fn default() -> Self {
    Self {
      data_dir: default_data_dir(),
    }
  }
}

/// Remote store configuration.
///
/// Points at a PostgREST-style endpoint; the API key is sent both as the
/// `apikey` header and as a bearer token.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
  /// Whether the remote tier is wired in at all.
  #[serde(default)]
  pub enabled: bool,
  /// Base URL, e.g. `https://xyzcompany.supabase.co`.
  #[serde(default)]
  pub base_url: String,
  /// Service API key.
  #[serde(default)]
  pub api_key: String,
  /// Row-owner ID every request is filtered by.
  #[serde(default)]
  pub user_id: String,
  /// Request timeout in milliseconds.
  #[serde(default = "default_remote_timeout")]
  pub timeout_ms: u64,
  /// Maximum retries on transient errors.
  #[serde(default = "default_max_retries")]
  pub max_retries: u32,
}

impl Default for RemoteConfig {
  fn default() -> Self {
    Self {
      enabled: false,
      base_url: String::new(),
      api_key: String::new(),
      user_id: String::new(),
      timeout_ms: default_remote_timeout(),
      max_retries: default_max_retries(),
    }
  }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  /// JSON API bind address.
  #[serde(default = "default_api_addr")]
  pub bind_address: String,
  /// Health probe port (/live, /ready).
  #[serde(default = "default_health_port")]
  pub health_port: u16,
  /// Enable Prometheus metrics export.
  #[serde(default = "default_true")]
  pub metrics_enabled: bool,
  /// Metrics server bind address.
  #[serde(default = "default_metrics_addr")]
  pub metrics_bind_address: String,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      bind_address: default_api_addr(),
      health_port: default_health_port(),
      metrics_enabled: default_true(),
      metrics_bind_address: default_metrics_addr(),
    }
  }
}

// Default value functions for serde

fn default_log_level() -> String {
  "info".to_string()
}

fn default_commission() -> f64 {
  2.0
}

fn default_cache_ttl() -> u64 {
  180
}

fn default_data_dir() -> String {
  "data".to_string()
}

fn default_remote_timeout() -> u64 {
  10_000
}

fn default_max_retries() -> u32 {
  3
}

fn default_api_addr() -> String {
  "0.0.0.0:8080".to_string()
}

fn default_health_port() -> u16 {
  8081
}

fn default_true() -> bool {
  true
}

fn default_metrics_addr() -> String {
  "0.0.0.0:9090".to_string()
}
