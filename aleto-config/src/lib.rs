use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Pre-compiled regex for hostname validation (compiled once at first use)
static HOSTNAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9][-a-zA-Z0-9\.]*[a-zA-Z0-9]$").unwrap());

/// Default upstream inference API.
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://api.replicate.com/v1";

#[derive(Debug, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub server: Option<ServerSection>,
    #[serde(default)]
    pub logging: Option<LoggingSection>,
    #[serde(default)]
    pub cors: Option<CorsSection>,
    #[serde(default)]
    pub upstream: Option<UpstreamSection>,
}

#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub json: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ServerSection {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
}

#[derive(Debug, Deserialize)]
pub struct CorsSection {
    #[serde(default)]
    pub allowed_origins: Option<Vec<String>>,
    #[serde(default)]
    pub allow_all_origins: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpstreamSection {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub api_token: Option<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Load a RawConfigFile from a path. The format is inferred from the extension: .toml, .yaml/.yml, .json
pub fn load_raw_from_file<P: AsRef<Path>>(path: P) -> Result<RawConfigFile, ConfigError> {
    let path = path.as_ref();
    let s = fs::read_to_string(path)?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase());
    parse_config_str(&s, ext.as_deref())
}

#[inline]
fn parse_config_str(s: &str, ext: Option<&str>) -> Result<RawConfigFile, ConfigError> {
    match ext {
        #[cfg(feature = "toml")]
        Some("toml") => toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string())),
        #[cfg(feature = "yaml")]
        Some("yaml" | "yml") => {
            serde_yaml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
        }
        #[cfg(feature = "json")]
        Some("json") => serde_json::from_str(s).map_err(|e| ConfigError::Parse(e.to_string())),
        _ => parse_config_auto(s),
    }
}

/// Try each enabled format in turn.
#[inline]
fn parse_config_auto(s: &str) -> Result<RawConfigFile, ConfigError> {
    #[cfg(feature = "yaml")]
    if let Ok(cfg) = serde_yaml::from_str(s) {
        return Ok(cfg);
    }

    #[cfg(feature = "toml")]
    if let Ok(cfg) = toml::from_str(s) {
        return Ok(cfg);
    }

    #[cfg(feature = "json")]
    if let Ok(cfg) = serde_json::from_str(s) {
        return Ok(cfg);
    }

    #[cfg(any(feature = "yaml", feature = "toml", feature = "json"))]
    {
        Err(ConfigError::Parse(
            "failed to parse config as any supported format".into(),
        ))
    }

    #[cfg(not(any(feature = "yaml", feature = "toml", feature = "json")))]
    {
        let _ = s;
        Err(ConfigError::Parse("no config format enabled".into()))
    }
}

/// Concrete application configuration with defaults.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub cors: CorsConfig,
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_all_origins: bool,
}

/// Where predictions are relayed to, and the credential injected into every call.
#[derive(Clone, PartialEq, Serialize)]
pub struct UpstreamConfig {
    pub base_url: String,
    #[serde(skip_serializing)]
    pub api_token: Option<String>,
}

impl UpstreamConfig {
    /// Returns the credential if one is set and non-empty.
    pub fn api_token(&self) -> Option<&str> {
        self.api_token.as_deref().filter(|t| !t.trim().is_empty())
    }
}

impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                json: false,
            },
            cors: CorsConfig {
                allowed_origins: Vec::new(),
                allow_all_origins: true,
            },
            upstream: UpstreamConfig {
                base_url: DEFAULT_UPSTREAM_BASE_URL.to_string(),
                api_token: None,
            },
        }
    }
}

fn parse_bool(s: &str) -> Result<bool, ()> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "no" | "n" | "off" => Ok(false),
        _ => Err(()),
    }
}

#[inline]
fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .filter_map(|p| {
            let trimmed = p.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}

/// Helper macro to apply optional value if present
macro_rules! apply_opt {
    ($target:expr, $source:expr) => {
        if let Some(v) = $source {
            $target = v;
        }
    };
}

/// Load concrete `Config` from optional file and environment variables.
/// Environment variables take precedence over file values and defaults.
pub fn load_config<P: AsRef<Path>>(path: Option<P>) -> Result<Config, ConfigError> {
    let mut cfg = Config::default();

    if let Some(p) = path {
        let raw = load_raw_from_file(p)?;
        if let Some(server) = raw.server {
            apply_opt!(cfg.server.host, server.host);
            apply_opt!(cfg.server.port, server.port);
        }
        if let Some(logging) = raw.logging {
            apply_opt!(cfg.logging.level, logging.level);
            apply_opt!(cfg.logging.json, logging.json);
        }
        if let Some(cors) = raw.cors {
            apply_opt!(cfg.cors.allowed_origins, cors.allowed_origins);
            apply_opt!(cfg.cors.allow_all_origins, cors.allow_all_origins);
        }
        if let Some(upstream) = raw.upstream {
            apply_opt!(cfg.upstream.base_url, upstream.base_url);
            if upstream.api_token.is_some() {
                cfg.upstream.api_token = upstream.api_token;
            }
        }
    }

    apply_env_overrides(&mut cfg)?;

    Ok(cfg)
}

#[inline]
fn env_parse<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(v) => v
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::Parse(format!("invalid {}: {}", key, e))),
        Err(_) => Ok(None),
    }
}

#[inline]
fn env_bool(key: &str) -> Result<Option<bool>, ConfigError> {
    match env::var(key) {
        Ok(v) => parse_bool(&v)
            .map(Some)
            .map_err(|_| ConfigError::Parse(format!("invalid {}", key))),
        Err(_) => Ok(None),
    }
}

#[inline]
fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

/// Apply all environment variable overrides to config
fn apply_env_overrides(cfg: &mut Config) -> Result<(), ConfigError> {
    // Server. Bare PORT is what most hosting platforms inject.
    if let Some(v) = env_str("ALETO_SERVER_HOST") {
        cfg.server.host = v;
    }
    if let Some(v) = env_parse::<u16>("PORT")? {
        cfg.server.port = v;
    }
    if let Some(v) = env_parse::<u16>("ALETO_SERVER_PORT")? {
        cfg.server.port = v;
    }

    // Logging
    if let Some(v) = env_str("ALETO_LOG_LEVEL") {
        cfg.logging.level = v;
    }
    if let Some(v) = env_bool("ALETO_LOG_JSON")? {
        cfg.logging.json = v;
    }

    // CORS
    if let Some(v) = env_str("ALETO_CORS_ALLOWED_ORIGINS") {
        cfg.cors.allowed_origins = split_csv(&v);
    }
    if let Some(v) = env_bool("ALETO_CORS_ALLOW_ALL_ORIGINS")? {
        cfg.cors.allow_all_origins = v;
    }

    // Upstream
    if let Some(v) = env_str("ALETO_UPSTREAM_BASE_URL") {
        cfg.upstream.base_url = v;
    }
    if let Some(v) = env_str("REPLICATE_API_TOKEN") {
        cfg.upstream.api_token = Some(v);
    }
    if let Some(v) = env_str("ALETO_UPSTREAM_API_TOKEN") {
        cfg.upstream.api_token = Some(v);
    }

    Ok(())
}

/// Validate higher-level constraints on the resolved configuration.
///
/// A missing upstream credential is not an error here; relay requests
/// report it when they are made.
pub fn validate_config(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.server.port == 0 {
        return Err(ConfigError::Validation("server.port must be > 0".into()));
    }
    let host_ok = cfg.server.host.parse::<std::net::IpAddr>().is_ok()
        || HOSTNAME_REGEX.is_match(&cfg.server.host);
    if !host_ok {
        return Err(ConfigError::Validation(format!(
            "invalid server.host: {}",
            cfg.server.host
        )));
    }

    match url::Url::parse(&cfg.upstream.base_url) {
        Ok(u) if matches!(u.scheme(), "http" | "https") && !u.cannot_be_a_base() => {}
        Ok(_) => {
            return Err(ConfigError::Validation(format!(
                "upstream.base_url must be an http or https URL: {}",
                cfg.upstream.base_url
            )))
        }
        Err(e) => {
            return Err(ConfigError::Validation(format!(
                "invalid upstream.base_url {}: {}",
                cfg.upstream.base_url, e
            )))
        }
    }

    for origin in &cfg.cors.allowed_origins {
        // Sandboxed plugin iframes send the literal `null` origin.
        if origin == "*" || origin == "null" {
            continue;
        }
        match url::Url::parse(origin) {
            Ok(u) => {
                let scheme = u.scheme();
                if scheme != "http" && scheme != "https" {
                    return Err(ConfigError::Validation(format!(
                        "CORS origin must be http or https: {}",
                        origin
                    )));
                }
            }
            Err(_) => {
                return Err(ConfigError::Validation(format!(
                    "invalid CORS origin: {}",
                    origin
                )))
            }
        }
    }
    Ok(())
}
