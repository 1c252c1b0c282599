//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `AXIOM_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `AXIOM_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Directory for the trial history, user directory, session, and inquiry
    /// ledger files. Default: `./.data`.
    pub storage_path: PathBuf,

    /// Oracle model identifier passed to the provider. Default:
    /// `gemini-flash-latest`.
    pub oracle_model: String,

    /// Per-call oracle timeout. Default: `60s`.
    pub oracle_timeout: Duration,

    /// Base URL of the mail-relay backend (`POST {url}/api/contact`).
    /// `None` disables the relay; inquiries are kept in the local ledger only.
    pub relay_url: Option<String>,
}

use crate::oracle::DEFAULT_ORACLE_MODEL;

/// Default per-call oracle timeout in seconds.
pub const DEFAULT_ORACLE_TIMEOUT_SECS: u64 = 60;

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            storage_path: PathBuf::from("./.data"),
            oracle_model: DEFAULT_ORACLE_MODEL.to_string(),
            oracle_timeout: Duration::from_secs(DEFAULT_ORACLE_TIMEOUT_SECS),
            relay_url: None,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "AXIOM_PORT";
    const ENV_BIND_ADDR: &'static str = "AXIOM_BIND_ADDR";
    const ENV_STORAGE_PATH: &'static str = "AXIOM_STORAGE_PATH";
    const ENV_ORACLE_MODEL: &'static str = "AXIOM_ORACLE_MODEL";
    const ENV_ORACLE_TIMEOUT_SECS: &'static str = "AXIOM_ORACLE_TIMEOUT_SECS";
    const ENV_RELAY_URL: &'static str = "AXIOM_RELAY_URL";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let storage_path = Self::parse_path_from_env(Self::ENV_STORAGE_PATH, defaults.storage_path);
        let oracle_model =
            Self::parse_string_from_env(Self::ENV_ORACLE_MODEL, defaults.oracle_model);
        let oracle_timeout = Self::parse_timeout_from_env(defaults.oracle_timeout)?;
        let relay_url = Self::parse_relay_url_from_env()?;

        Ok(Self {
            port,
            bind_addr,
            storage_path,
            oracle_model,
            oracle_timeout,
            relay_url,
        })
    }

    /// Validates paths and basic invariants (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_path.exists() && !self.storage_path.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.storage_path.clone(),
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_timeout_from_env(default: Duration) -> Result<Duration, ConfigError> {
        match env::var(Self::ENV_ORACLE_TIMEOUT_SECS) {
            Ok(value) => match value.parse::<u64>() {
                Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
                _ => Err(ConfigError::InvalidTimeout { value }),
            },
            Err(_) => Ok(default),
        }
    }

    fn parse_relay_url_from_env() -> Result<Option<String>, ConfigError> {
        match env::var(Self::ENV_RELAY_URL) {
            Ok(value) => {
                let trimmed = value.trim().trim_end_matches('/').to_string();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
                    return Err(ConfigError::InvalidRelayUrl { value });
                }
                Ok(Some(trimmed))
            }
            Err(_) => Ok(None),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }
}
