//! Configuration loading and representation.
//!
//! Everything is read from environment variables:
//!
//! | variable                       | default         |
//! |--------------------------------|-----------------|
//! | `STOCKROOM_BIND`               | `0.0.0.0:8080`  |
//! | `STOCKROOM_TABLE_URL`          | unset (in-memory table) |
//! | `STOCKROOM_TABLE_KEY`          | empty           |
//! | `STOCKROOM_TABLE`              | `inventory`     |
//! | `STOCKROOM_TABLE_TIMEOUT_SECS` | `10`            |
//! | `STOCKROOM_SESSION_IDLE_SECS`  | `86400`         |
//!
//! Durations must be whole, positive seconds.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_BIND: &str = "0.0.0.0:8080";
pub const DEFAULT_TABLE: &str = "inventory";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SESSION_IDLE_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Connection settings for the hosted stock table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub url: String,
    pub api_key: String,
    pub table: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// `None` runs the store pages against an in-memory table.
    pub store: Option<StoreConfig>,
    /// Sessions untouched for this long are dropped.
    pub session_idle: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            store: None,
            session_idle: Duration::from_secs(DEFAULT_SESSION_IDLE_SECS),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable lookup (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind = lookup("STOCKROOM_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr = bind.parse().map_err(|e| ConfigError::Invalid {
            var: "STOCKROOM_BIND",
            reason: format!("{bind:?}: {e}"),
        })?;

        let store = match lookup("STOCKROOM_TABLE_URL").filter(|u| !u.trim().is_empty()) {
            None => None,
            Some(url) => {
                let url = url.trim().to_string();
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(ConfigError::Invalid {
                        var: "STOCKROOM_TABLE_URL",
                        reason: format!("{url:?} is not an http(s) URL"),
                    });
                }

                let table = lookup("STOCKROOM_TABLE")
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_TABLE.to_string());

                Some(StoreConfig {
                    url,
                    api_key: lookup("STOCKROOM_TABLE_KEY").unwrap_or_default(),
                    table,
                    timeout: seconds(
                        &lookup,
                        "STOCKROOM_TABLE_TIMEOUT_SECS",
                        DEFAULT_TIMEOUT_SECS,
                    )?,
                })
            }
        };

        let session_idle = seconds(
            &lookup,
            "STOCKROOM_SESSION_IDLE_SECS",
            DEFAULT_SESSION_IDLE_SECS,
        )?;

        Ok(Self {
            bind_addr,
            store,
            session_idle,
        })
    }
}

fn seconds(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: u64,
) -> Result<Duration, ConfigError> {
    let Some(raw) = lookup(var) else {
        return Ok(Duration::from_secs(default));
    };
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::Invalid {
            var,
            reason: "must be greater than zero".to_string(),
        }),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(e) => Err(ConfigError::Invalid {
            var,
            reason: format!("{raw:?}: {e}"),
        }),
    }
}
