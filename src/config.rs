//! Configuration loading and constants.
//!
//! Settings come from environment variables, optionally seeded from a local
//! dotenv file. Process environment always wins over the file, and the file
//! wins over the built-in defaults. `Settings` is validated once at startup
//! and is immutable afterwards.

use std::collections::HashMap;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use std::str::FromStr;

use const_format::formatcp;
use secrecy::{ExposeSecret, SecretString};

// =============================================================================
// Application Metadata
// =============================================================================

/// Human-readable service title, logged at startup
pub const APP_TITLE: &str = "Labor Law Assistant API";

/// Short description of the service
pub const APP_DESCRIPTION: &str = "Taiwan Labor Law Query Assistant";

/// Crate name as it appears in tracing targets
const CRATE_TARGET: &str = "labor_law_assistant";

// =============================================================================
// Environment Variable Names
// =============================================================================

pub const ENV_APP_ENV: &str = "APP_ENV";
pub const ENV_APP_DEBUG: &str = "APP_DEBUG";
pub const ENV_APP_PORT: &str = "APP_PORT";
pub const ENV_APP_HOST: &str = "APP_HOST";
pub const ENV_APP_LOG_FORMAT: &str = "APP_LOG_FORMAT";
pub const ENV_ANTHROPIC_API_KEY: &str = "ANTHROPIC_API_KEY";

// =============================================================================
// Defaults
// =============================================================================

/// Environment name that enables strict validation
pub const PRODUCTION_ENV: &str = "production";

pub const DEFAULT_APP_ENV: &str = "development";
pub const DEFAULT_APP_DEBUG: bool = true;
pub const DEFAULT_APP_PORT: u16 = 8000;
pub const DEFAULT_APP_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Default dotenv file, relative to the working directory
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = formatcp!("{}=info,tower_http=info", CRATE_TARGET);

/// Log filter used when the debug flag is on
pub const DEBUG_LOG_FILTER: &str = formatcp!("{}=debug,tower_http=debug", CRATE_TARGET);

/// Health responses must never be served from a cache
pub const CACHE_CONTROL_HEALTH: &str = "no-store";

/// Seconds to wait for in-flight requests on shutdown
pub const SHUTDOWN_GRACE_SECS: u64 = 30;

const TRUE_VALUES: [&str; 6] = ["1", "true", "t", "yes", "y", "on"];
const FALSE_VALUES: [&str; 6] = ["0", "false", "f", "no", "n", "off"];

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("expected \"text\" or \"json\", got \"{}\"", other)),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

/// A snapshot of configuration variables with case-insensitive lookup.
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
    vars: HashMap<String, String>,
}

impl EnvSource {
    /// Build a source from explicit key/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut source = Self::default();
        for (key, value) in pairs {
            source.set(key, value);
        }
        source
    }

    /// Read a dotenv file, then overlay the current process environment.
    ///
    /// A missing file is not an error; the process environment is used alone.
    pub fn from_env_file(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut source = Self::default();

        if let Some(path) = path {
            source.merge_env_file(path)?;
        }

        // Variables that are not valid UTF-8 can never match a setting name
        for (key, value) in std::env::vars_os() {
            match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => source.set(key, value),
                (key, _) => {
                    tracing::debug!(key = ?key, "Skipping non UTF-8 environment variable");
                }
            }
        }

        Ok(source)
    }

    fn merge_env_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let entries = match dotenvy::from_path_iter(path) {
            Ok(entries) => entries,
            Err(e) if e.not_found() => {
                tracing::debug!(path = %path.display(), "No env file found, using environment only");
                return Ok(());
            }
            Err(e) => return Err(ConfigError::env_file(path, e)),
        };

        for entry in entries {
            let (key, value) = entry.map_err(|e| ConfigError::env_file(path, e))?;
            self.set(key, value);
        }

        tracing::debug!(path = %path.display(), "Loaded env file");
        Ok(())
    }

    /// Insert or replace a variable.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars
            .insert(key.into().to_ascii_uppercase(), value.into());
    }

    /// Look up a variable by name, ignoring case.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(&key.to_ascii_uppercase())
            .map(String::as_str)
    }

    fn string_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_string()
    }

    fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        match self.get(key) {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|e: T::Err| ConfigError::parse(key, value, e.to_string())),
            None => Ok(default),
        }
    }

    fn bool_or(&self, key: &str, default: bool) -> Result<bool, ConfigError> {
        match self.get(key) {
            Some(value) => parse_bool(value)
                .ok_or_else(|| ConfigError::parse(key, value, "expected a boolean")),
            None => Ok(default),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    if TRUE_VALUES.contains(&normalized.as_str()) {
        Some(true)
    } else if FALSE_VALUES.contains(&normalized.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// Application settings, loaded once at startup.
///
/// The credential is wrapped in [`SecretString`] so `Debug` output never
/// contains it.
#[derive(Debug)]
pub struct Settings {
    /// Deployment environment name (development / staging / production)
    pub app_env: String,
    /// Debug mode. Always false in production.
    pub app_debug: bool,
    /// HTTP listen port
    pub app_port: u16,
    /// HTTP listen address (IPv4 or IPv6 literal)
    pub app_host: IpAddr,
    /// Log output format
    pub log_format: LogFormat,
    /// Anthropic API key. Required in production, optional elsewhere.
    pub anthropic_api_key: SecretString,
}

impl Settings {
    /// Load settings from the process environment and an optional dotenv file.
    pub fn load(env_file: Option<&Path>) -> Result<Self, ConfigError> {
        let source = EnvSource::from_env_file(env_file)?;
        Self::from_source(&source)
    }

    /// Parse and validate settings from an explicit variable set.
    pub fn from_source(source: &EnvSource) -> Result<Self, ConfigError> {
        let settings = Self {
            app_env: source.string_or(ENV_APP_ENV, DEFAULT_APP_ENV),
            app_debug: source.bool_or(ENV_APP_DEBUG, DEFAULT_APP_DEBUG)?,
            app_port: source.parse_or(ENV_APP_PORT, DEFAULT_APP_PORT)?,
            app_host: source.parse_or(ENV_APP_HOST, DEFAULT_APP_HOST)?,
            log_format: source.parse_or(ENV_APP_LOG_FORMAT, LogFormat::default())?,
            anthropic_api_key: SecretString::from(source.string_or(ENV_ANTHROPIC_API_KEY, "")),
        };

        settings.validate()
    }

    fn validate(mut self) -> Result<Self, ConfigError> {
        if self.is_production() {
            if !self.has_api_key() {
                return Err(ConfigError::MissingCredential {
                    key: ENV_ANTHROPIC_API_KEY.to_string(),
                });
            }
            self.app_debug = false;
        }
        Ok(self)
    }

    pub fn is_production(&self) -> bool {
        self.app_env == PRODUCTION_ENV
    }

    /// Whether a non-empty API key is configured
    pub fn has_api_key(&self) -> bool {
        !self.anthropic_api_key.expose_secret().is_empty()
    }

    /// Socket address the HTTP server binds to.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.app_host, self.app_port)
    }

    /// Log filter implied by the debug flag.
    pub fn default_log_filter(&self) -> &'static str {
        if self.app_debug {
            DEBUG_LOG_FILTER
        } else {
            DEFAULT_LOG_FILTER
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read env file {path}: {source}")]
    EnvFile {
        path: String,
        #[source]
        source: dotenvy::Error,
    },
    #[error("Invalid value for {key}: '{value}' - {reason}")]
    Parse {
        key: String,
        value: String,
        reason: String,
    },
    #[error("{key} must be set in production environment")]
    MissingCredential { key: String },
}

impl ConfigError {
    fn env_file(path: &Path, source: dotenvy::Error) -> Self {
        ConfigError::EnvFile {
            path: path.display().to_string(),
            source,
        }
    }

    fn parse(key: &str, value: &str, reason: impl Into<String>) -> Self {
        ConfigError::Parse {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
