//! Configuration loader
//!
//! Loads client configuration from environment variables and files.
//!
//! ## Loading Strategy
//! 1. Loads `.env` from the working directory (if present)
//! 2. Starts from the file named by `TOPCOIN_CONFIG`, or defaults
//! 3. Applies environment variable overrides on top
//! 4. Normalizes and validates the result
//!
//! ## Environment Variables
//! - `TOPCOIN_API_URL`: Base HTTP origin
//! - `TOPCOIN_WS_URL`: Base real-time channel origin
//! - `TOPCOIN_HTTP_TIMEOUT_SECS`: Transport timeout in seconds
//! - `TOPCOIN_USER_AGENT`: `User-Agent` header value
//! - `TOPCOIN_CONFIG`: Path to a TOML or JSON config file

use std::path::Path;

use topcoin_domain::{ClientConfig, Result, TopcoinError};
use url::Url;

pub const ENV_API_URL: &str = "TOPCOIN_API_URL";
pub const ENV_REALTIME_URL: &str = "TOPCOIN_WS_URL";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "TOPCOIN_HTTP_TIMEOUT_SECS";
pub const ENV_USER_AGENT: &str = "TOPCOIN_USER_AGENT";
pub const ENV_CONFIG_PATH: &str = "TOPCOIN_CONFIG";

/// Load configuration using the full strategy above
///
/// # Errors
/// Returns `TopcoinError::Config` if:
/// - `TOPCOIN_CONFIG` names a missing or malformed file
/// - A variable has an invalid value
/// - An origin fails validation
pub fn load() -> Result<ClientConfig> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "Failed to load .env file"),
    }

    let base = match std::env::var(ENV_CONFIG_PATH) {
        Ok(path) => load_from_file(Path::new(&path))?,
        Err(_) => ClientConfig::default(),
    };

    let config = apply_overrides(base, |key| std::env::var(key).ok())?;
    validate(&config)?;

    tracing::info!(
        api = %config.api_base_url,
        realtime = %config.realtime_base_url,
        "Client configuration loaded"
    );
    Ok(config)
}

/// Load configuration from environment variables only
///
/// Unset variables keep their local-development defaults.
///
/// # Errors
/// Returns `TopcoinError::Config` if a variable has an invalid value or an
/// origin fails validation
pub fn load_from_env() -> Result<ClientConfig> {
    let config = apply_overrides(ClientConfig::default(), |key| std::env::var(key).ok())?;
    validate(&config)?;
    Ok(config)
}

/// Load configuration from a file
///
/// Format is detected by extension (`.toml` or `.json`). Missing fields
/// take their defaults.
///
/// # Errors
/// Returns `TopcoinError::Config` if the file is missing, unreadable, in an
/// unsupported format, or fails validation
pub fn load_from_file(path: &Path) -> Result<ClientConfig> {
    if !path.exists() {
        return Err(TopcoinError::Config(format!("Config file not found: {}", path.display())));
    }

    tracing::info!(path = %path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(path)
        .map_err(|e| TopcoinError::Config(format!("Failed to read config file: {}", e)))?;

    let config = parse_config(&contents, path)?.normalized();
    validate(&config)?;
    Ok(config)
}

/// Apply variable overrides from `lookup` on top of `config`
///
/// `lookup` stands in for `std::env::var` so overrides can be tested
/// without touching the process environment. Empty values are ignored.
///
/// # Errors
/// Returns `TopcoinError::Config` if the timeout is not a positive integer
pub fn apply_overrides<F>(mut config: ClientConfig, lookup: F) -> Result<ClientConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(api) = var(ENV_API_URL) {
        config.api_base_url = api;
    }
    if let Some(realtime) = var(ENV_REALTIME_URL) {
        config.realtime_base_url = realtime;
    }
    if let Some(timeout) = var(ENV_HTTP_TIMEOUT_SECS) {
        config.timeout_secs = timeout
            .trim()
            .parse::<u64>()
            .map_err(|e| TopcoinError::Config(format!("Invalid HTTP timeout: {}", e)))?;
    }
    if let Some(agent) = var(ENV_USER_AGENT) {
        config.user_agent = Some(agent);
    }

    Ok(config.normalized())
}

/// Validate origins and transport settings
///
/// # Errors
/// Returns `TopcoinError::Config` if an origin does not parse, has the
/// wrong scheme (`http`/`https` for the API, `ws`/`wss` for real-time), or
/// the timeout is zero
pub fn validate(config: &ClientConfig) -> Result<()> {
    check_origin("API", &config.api_base_url, &["http", "https"])?;
    check_origin("real-time", &config.realtime_base_url, &["ws", "wss"])?;

    if config.timeout_secs == 0 {
        return Err(TopcoinError::Config("HTTP timeout must be greater than zero".to_string()));
    }

    Ok(())
}

fn check_origin(label: &str, value: &str, schemes: &[&str]) -> Result<()> {
    let url = Url::parse(value)
        .map_err(|e| TopcoinError::Config(format!("Invalid {} URL '{}': {}", label, value, e)))?;

    if !schemes.contains(&url.scheme()) {
        return Err(TopcoinError::Config(format!(
            "Invalid {} URL '{}': scheme must be one of {}",
            label,
            value,
            schemes.join(", ")
        )));
    }

    Ok(())
}

/// Parse configuration from string content
///
/// # Errors
/// Returns `TopcoinError::Config` if format is invalid or parsing fails.
fn parse_config(contents: &str, path: &Path) -> Result<ClientConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| TopcoinError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| TopcoinError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(TopcoinError::Config(format!("Unsupported config format: {}", extension))),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> =
            pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_overrides_apply_on_top_of_defaults() {
        let config = apply_overrides(
            ClientConfig::default(),
            lookup_from(&[
                (ENV_API_URL, "https://api.topcoin.io/"),
                (ENV_REALTIME_URL, "wss://api.topcoin.io"),
                (ENV_HTTP_TIMEOUT_SECS, "5"),
                (ENV_USER_AGENT, "topcoin-cli/0.1"),
            ]),
        )
        .unwrap();

        assert_eq!(config.api_base_url, "https://api.topcoin.io");
        assert_eq!(config.realtime_base_url, "wss://api.topcoin.io");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.user_agent.as_deref(), Some("topcoin-cli/0.1"));
    }

    #[test]
    fn test_missing_and_empty_vars_keep_defaults() {
        let config =
            apply_overrides(ClientConfig::default(), lookup_from(&[(ENV_API_URL, "  ")])).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_invalid_timeout_is_config_error() {
        let result = apply_overrides(
            ClientConfig::default(),
            lookup_from(&[(ENV_HTTP_TIMEOUT_SECS, "soon")]),
        );
        assert!(matches!(result, Err(TopcoinError::Config(_))));
    }

    #[test]
    fn test_validate_checks_schemes() {
        assert!(validate(&ClientConfig::default()).is_ok());

        let swapped = ClientConfig::new("ws://localhost:8000", "http://localhost:8000");
        assert!(matches!(validate(&swapped), Err(TopcoinError::Config(msg)) if msg.contains("API")));

        let garbage = ClientConfig::new("not a url", "ws://localhost:8000");
        assert!(validate(&garbage).is_err());

        let zero_timeout = ClientConfig { timeout_secs: 0, ..ClientConfig::default() };
        assert!(validate(&zero_timeout).is_err());
    }

    #[test]
    fn test_unsupported_extension() {
        let result = parse_config("api_base_url: x", Path::new("client.yaml"));
        assert!(matches!(result, Err(TopcoinError::Config(msg)) if msg.contains("yaml")));
    }
}
