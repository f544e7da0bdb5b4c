//! Server configuration.
//!
//! Values come from environment variables, optionally loaded from a `.env`
//! file by the binary before this module reads them.
//!
//! # Environment Variables
//!
//! - `HOST`: bind address (default: `0.0.0.0`)
//! - `PORT`: bind port (default: `8080`)
//! - `API_BASE_PATH`: prefix for the task routes (default: `/api`)
//! - `ALLOWED_ORIGINS`: comma-separated exact origins (default: `http://localhost:5173`)
//! - `FRONTEND_URL`: one more exact origin, appended to `ALLOWED_ORIGINS`
//! - `ALLOWED_ORIGIN_PATTERNS`: comma-separated glob patterns (default: `https://*.vercel.app`)

use std::env;
use std::net::SocketAddr;

use glob::Pattern;
use thiserror::Error;

/// Default exact origin: the local front-end dev server.
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";

/// Default origin pattern: preview deployments of the front end.
pub const DEFAULT_ORIGIN_PATTERN: &str = "https://*.vercel.app";

/// Errors in server configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServerConfigError {
    /// `PORT` is not a valid port number.
    #[error("Invalid PORT value: '{0}'")]
    InvalidPort(String),

    /// `HOST`/`PORT` do not form a socket address.
    #[error("Invalid server address: {0}")]
    InvalidAddress(String),

    /// `API_BASE_PATH` is malformed.
    #[error("Invalid API_BASE_PATH: '{0}'. Expected a path such as '/api'")]
    InvalidBasePath(String),

    /// An `ALLOWED_ORIGIN_PATTERNS` entry is not a valid glob.
    #[error("Invalid origin pattern '{pattern}': {message}")]
    InvalidOriginPattern {
        /// The rejected pattern.
        pattern: String,
        /// Why the pattern was rejected.
        message: String,
    },
}

// =============================================================================
// CORS Configuration
// =============================================================================

/// Origins allowed to call the API cross-origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    /// Exact origins, e.g. `http://localhost:5173`.
    pub allowed_origins: Vec<String>,
    /// Glob patterns, e.g. `https://*.vercel.app`.
    pub allowed_origin_patterns: Vec<Pattern>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![DEFAULT_ALLOWED_ORIGIN.to_string()],
            allowed_origin_patterns: Pattern::new(DEFAULT_ORIGIN_PATTERN).into_iter().collect(),
        }
    }
}

impl CorsConfig {
    /// Returns `true` if the origin is listed or matches a pattern.
    #[must_use]
    pub fn is_allowed(&self, origin: &str) -> bool {
        self.allowed_origins.iter().any(|allowed| allowed == origin)
            || self
                .allowed_origin_patterns
                .iter()
                .any(|pattern| pattern.matches(origin))
    }

    /// Returns the pattern sources, for logging.
    #[must_use]
    pub fn pattern_sources(&self) -> Vec<&str> {
        self.allowed_origin_patterns
            .iter()
            .map(Pattern::as_str)
            .collect()
    }
}

/// Compiles each origin pattern, rejecting the first invalid one.
fn compile_origin_patterns(patterns: &[String]) -> Result<Vec<Pattern>, ServerConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|error| ServerConfigError::InvalidOriginPattern {
                pattern: pattern.clone(),
                message: error.msg.to_string(),
            })
        })
        .collect()
}

// =============================================================================
// Server Configuration
// =============================================================================

/// Configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Prefix under which the task routes are mounted.
    pub base_path: String,
    /// Cross-origin policy.
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            base_path: "/api".to_string(),
            cors: CorsConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Creates a configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ServerConfigError` if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, ServerConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Creates a configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`ServerConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ServerConfigError> {
        let defaults = Self::default();
        let non_empty = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let host = non_empty("HOST").unwrap_or(defaults.host);

        let port = match non_empty("PORT") {
            Some(value) => value
                .parse()
                .map_err(|_| ServerConfigError::InvalidPort(value))?,
            None => defaults.port,
        };

        let base_path = match non_empty("API_BASE_PATH") {
            Some(value) => normalize_base_path(&value)?,
            None => defaults.base_path,
        };

        let mut allowed_origins =
            non_empty("ALLOWED_ORIGINS").map_or(defaults.cors.allowed_origins, |value| {
                split_list(&value)
            });
        if let Some(frontend_url) = non_empty("FRONTEND_URL") {
            let frontend_url = frontend_url.trim_end_matches('/').to_string();
            if !allowed_origins.contains(&frontend_url) {
                allowed_origins.push(frontend_url);
            }
        }

        let allowed_origin_patterns = match non_empty("ALLOWED_ORIGIN_PATTERNS") {
            Some(value) => compile_origin_patterns(&split_list(&value))?,
            None => defaults.cors.allowed_origin_patterns,
        };

        Ok(Self {
            host,
            port,
            base_path,
            cors: CorsConfig {
                allowed_origins,
                allowed_origin_patterns,
            },
        })
    }

    /// Returns the socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns `ServerConfigError::InvalidAddress` if `host:port` does not parse.
    pub fn socket_address(&self) -> Result<SocketAddr, ServerConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ServerConfigError::InvalidAddress(format!("{}:{}", self.host, self.port)))
    }
}

/// Splits a comma-separated list, dropping blanks and trailing slashes.
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| item.trim().trim_end_matches('/'))
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Normalizes a base path to `/segment[/segment...]` without a trailing slash.
///
/// `/` (or an all-slash value) means "mount at the root" and yields `""`.
fn normalize_base_path(value: &str) -> Result<String, ServerConfigError> {
    let trimmed = value.trim().trim_matches('/');
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    if trimmed.contains(['{', '}', '*', '?', '#', ' ']) {
        return Err(ServerConfigError::InvalidBasePath(value.to_string()));
    }
    Ok(format!("/{trimmed}"))
}

// =============================================================================
// Tests
// =============================================================================
