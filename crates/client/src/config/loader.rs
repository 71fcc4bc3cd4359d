//! Configuration loader
//!
//! Loads API client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `WAREFLOW_API_BASE_URL`: Base URL of the Wareflow API (required)
//! - `WAREFLOW_API_TIMEOUT_SECONDS`: Per-request timeout in seconds
//! - `WAREFLOW_API_USER_AGENT`: User-Agent header for outgoing requests
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./wareflow.json` or `./wareflow.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. `../../config.json` or `../../config.toml` (grandparent directory)
//! 5. Relative to executable location

use std::path::{Path, PathBuf};

use url::Url;
use wareflow_domain::constants::{DEFAULT_API_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use wareflow_domain::{ApiConfig, Result, WareflowError};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `WareflowError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - The base URL is malformed
pub fn load() -> Result<ApiConfig> {
    // Try loading from environment first
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            // Fall back to file
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Only the base URL is required; timeout and user agent fall back to
/// their defaults when unset.
///
/// # Environment Variables
/// See module documentation for the complete list.
///
/// # Errors
/// Returns `WareflowError::Config` if the base URL is missing or any
/// variable has an invalid value.
pub fn load_from_env() -> Result<ApiConfig> {
    let base_url = env_var("WAREFLOW_API_BASE_URL")?;

    let timeout_seconds = match std::env::var("WAREFLOW_API_TIMEOUT_SECONDS") {
        Ok(raw) => raw
            .parse::<u64>()
            .map_err(|e| WareflowError::Config(format!("Invalid timeout: {}", e)))?,
        Err(_) => DEFAULT_API_TIMEOUT_SECS,
    };

    let user_agent = std::env::var("WAREFLOW_API_USER_AGENT")
        .unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string());

    validate(ApiConfig { base_url, timeout_seconds, user_agent })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Arguments
/// * `path` - Optional path to config file. If `None`, uses
///   [`probe_config_paths`].
///
/// # Errors
/// Returns `WareflowError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - The base URL is malformed
pub fn load_from_file(path: Option<PathBuf>) -> Result<ApiConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(WareflowError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            WareflowError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| WareflowError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path).and_then(validate)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `WareflowError::Config` if format is invalid or parsing fails.
fn parse_config(contents: &str, path: &Path) -> Result<ApiConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| WareflowError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| WareflowError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(WareflowError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Validate and normalize a loaded configuration
///
/// # Errors
/// Returns `WareflowError::Config` if the base URL cannot be parsed or
/// uses a scheme other than http/https.
fn validate(mut config: ApiConfig) -> Result<ApiConfig> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| WareflowError::Config(format!("Invalid base URL: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(WareflowError::Config(format!(
            "Unsupported base URL scheme: {}",
            url.scheme()
        )));
    }

    // Request paths are appended verbatim, so the base must not end in '/'
    while config.base_url.ends_with('/') {
        config.base_url.pop();
    }

    Ok(config)
}

/// Probe multiple paths for configuration files
///
/// Searches for config files in the following locations (in order):
/// 1. Current working directory (`./config.{json,toml}`,
///    `./wareflow.{json,toml}`)
/// 2. Parent directories (up to 2 levels)
/// 3. Relative to executable location
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    // Try current working directory
    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(vec![
            cwd.join("config.json"),
            cwd.join("config.toml"),
            cwd.join("wareflow.json"),
            cwd.join("wareflow.toml"),
            cwd.join("../config.json"),
            cwd.join("../config.toml"),
            cwd.join("../../config.json"),
            cwd.join("../../config.toml"),
        ]);
    }

    // Try relative to executable
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(vec![
                exe_dir.join("config.json"),
                exe_dir.join("config.toml"),
                exe_dir.join("wareflow.json"),
                exe_dir.join("wareflow.toml"),
                exe_dir.join("../config.json"),
                exe_dir.join("../config.toml"),
                exe_dir.join("../../config.json"),
                exe_dir.join("../../config.toml"),
            ]);
        }
    }

    // Return first existing candidate
    candidates.into_iter().find(|path| path.exists())
}

/// Get required environment variable
///
/// # Errors
/// Returns `WareflowError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        WareflowError::Config(format!("Missing required environment variable: {}", key))
    })
}
