//! Configuration loading and representation.
//!
//! Everything comes from `CASEWORK_*` environment variables; every variable
//! is optional and malformed values are reported by name.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use casework_aid::TransitionPolicy;
use casework_observability::{LogConfig, LogFormat};

use crate::retry::RetryPolicy;

pub const BIND_ADDR: &str = "CASEWORK_BIND_ADDR";
pub const SESSION_TTL_MINUTES: &str = "CASEWORK_SESSION_TTL_MINUTES";
pub const STORE_RETRY_ATTEMPTS: &str = "CASEWORK_STORE_RETRY_ATTEMPTS";
pub const STORE_RETRY_DELAY_MS: &str = "CASEWORK_STORE_RETRY_DELAY_MS";
pub const AID_STATUS_POLICY: &str = "CASEWORK_AID_STATUS_POLICY";
pub const SEED_AID_TYPES: &str = "CASEWORK_SEED_AID_TYPES";
pub const LOG_FORMAT: &str = "CASEWORK_LOG_FORMAT";
pub const BOOTSTRAP_USERNAME: &str = "CASEWORK_BOOTSTRAP_USERNAME";
pub const BOOTSTRAP_EMAIL: &str = "CASEWORK_BOOTSTRAP_EMAIL";
pub const BOOTSTRAP_CEDULA: &str = "CASEWORK_BOOTSTRAP_CEDULA";
pub const BOOTSTRAP_PASSWORD: &str = "CASEWORK_BOOTSTRAP_PASSWORD";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid value for {variable}: {reason}")]
pub struct ConfigError {
    pub variable: &'static str,
    pub reason: String,
}

impl ConfigError {
    fn new(variable: &'static str, reason: impl Into<String>) -> Self {
        Self {
            variable,
            reason: reason.into(),
        }
    }
}

/// Initial `superAdmin` account created at startup when absent.
#[derive(Clone, PartialEq, Eq)]
pub struct BootstrapAccount {
    pub username: String,
    pub email: String,
    pub cedula: String,
    pub password: String,
}

impl core::fmt::Debug for BootstrapAccount {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BootstrapAccount")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("cedula", &self.cedula)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub session_ttl: chrono::Duration,
    pub retry: RetryPolicy,
    pub aid_status_policy: TransitionPolicy,
    pub seed_aid_types: bool,
    pub log: LogConfig,
    pub bootstrap: Option<BootstrapAccount>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            session_ttl: chrono::Duration::minutes(720),
            retry: RetryPolicy::default(),
            aid_status_policy: TransitionPolicy::Unrestricted,
            seed_aid_types: true,
            log: LogConfig::default(),
            bootstrap: None,
        }
    }
}

impl AppConfig {
    /// Read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from any variable source (used by tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let bind_addr = match get(BIND_ADDR) {
            Some(v) => v.parse::<SocketAddr>().map_err(|e| ConfigError::new(BIND_ADDR, format!("{e}")))?,
            None => defaults.bind_addr,
        };

        let session_ttl = match get(SESSION_TTL_MINUTES) {
            Some(v) => {
                let minutes = v.parse::<i64>().map_err(|e| ConfigError::new(SESSION_TTL_MINUTES, format!("{e}")))?;
                if minutes <= 0 {
                    return Err(ConfigError::new(SESSION_TTL_MINUTES, "must be positive"));
                }
                chrono::Duration::minutes(minutes)
            }
            None => defaults.session_ttl,
        };

        let max_attempts = match get(STORE_RETRY_ATTEMPTS) {
            Some(v) => {
                let n = v.parse::<u32>().map_err(|e| ConfigError::new(STORE_RETRY_ATTEMPTS, format!("{e}")))?;
                if n == 0 {
                    return Err(ConfigError::new(STORE_RETRY_ATTEMPTS, "must be at least 1"));
                }
                n
            }
            None => defaults.retry.max_attempts,
        };

        let base_delay = match get(STORE_RETRY_DELAY_MS) {
            Some(v) => Duration::from_millis(
                v.parse::<u64>().map_err(|e| ConfigError::new(STORE_RETRY_DELAY_MS, format!("{e}")))?,
            ),
            None => defaults.retry.base_delay,
        };

        let aid_status_policy = match get(AID_STATUS_POLICY) {
            Some(v) => v.parse::<TransitionPolicy>().map_err(|e| ConfigError::new(AID_STATUS_POLICY, format!("{e}")))?,
            None => defaults.aid_status_policy,
        };

        let seed_aid_types = match get(SEED_AID_TYPES) {
            Some(v) => parse_bool(&v).ok_or_else(|| ConfigError::new(SEED_AID_TYPES, "expected true or false"))?,
            None => defaults.seed_aid_types,
        };

        let format = match get(LOG_FORMAT) {
            Some(v) => v.parse::<LogFormat>().map_err(|e| ConfigError::new(LOG_FORMAT, format!("{e}")))?,
            None => defaults.log.format,
        };

        let bootstrap = match (
            get(BOOTSTRAP_USERNAME),
            get(BOOTSTRAP_EMAIL),
            get(BOOTSTRAP_CEDULA),
            get(BOOTSTRAP_PASSWORD),
        ) {
            (Some(username), Some(email), Some(cedula), Some(password)) => Some(BootstrapAccount {
                username,
                email,
                cedula,
                password,
            }),
            (None, None, None, None) => None,
            _ => {
                return Err(ConfigError::new(
                    BOOTSTRAP_USERNAME,
                    "bootstrap account needs username, email, cedula and password together",
                ));
            }
        };

        Ok(Self {
            bind_addr,
            session_ttl,
            retry: RetryPolicy {
                max_attempts,
                base_delay,
            },
            aid_status_policy,
            seed_aid_types,
            log: LogConfig {
                format,
                ..defaults.log
            },
            bootstrap,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        assert_eq!(load(&[]).unwrap(), AppConfig::default());
    }

    #[test]
    fn values_are_parsed() {
        let config = load(&[
            (BIND_ADDR, "127.0.0.1:9000"),
            (SESSION_TTL_MINUTES, "15"),
            (STORE_RETRY_ATTEMPTS, "5"),
            (STORE_RETRY_DELAY_MS, "20"),
            (AID_STATUS_POLICY, "lifecycle"),
            (SEED_AID_TYPES, "false"),
            (LOG_FORMAT, "pretty"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.session_ttl, chrono::Duration::minutes(15));
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.base_delay, Duration::from_millis(20));
        assert_eq!(config.aid_status_policy, TransitionPolicy::Lifecycle);
        assert!(!config.seed_aid_types);
        assert_eq!(config.log.format, LogFormat::Pretty);
    }

    #[test]
    fn malformed_values_name_the_variable() {
        assert_eq!(load(&[(STORE_RETRY_ATTEMPTS, "many")]).unwrap_err().variable, STORE_RETRY_ATTEMPTS);
        assert_eq!(load(&[(SESSION_TTL_MINUTES, "0")]).unwrap_err().variable, SESSION_TTL_MINUTES);
        assert_eq!(load(&[(AID_STATUS_POLICY, "strict")]).unwrap_err().variable, AID_STATUS_POLICY);
    }

    #[test]
    fn bootstrap_account_needs_every_field() {
        let partial = load(&[(BOOTSTRAP_USERNAME, "root")]);
        assert!(partial.is_err());

        let full = load(&[
            (BOOTSTRAP_USERNAME, "root"),
            (BOOTSTRAP_EMAIL, "root@example.org"),
            (BOOTSTRAP_CEDULA, "10000000"),
            (BOOTSTRAP_PASSWORD, "change-me"),
        ])
        .unwrap();
        let account = full.bootstrap.unwrap();
        assert_eq!(account.username, "root");
        assert!(!format!("{account:?}").contains("change-me"));
    }
}
