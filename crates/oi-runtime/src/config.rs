//! # Runtime Configuration
//!
//! Environment-driven configuration for the inscriber runtime.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `OI_NETWORK` | `signet` |
//! | `OI_INSCRIPTION_API_URL` | `https://signet.ordinalsbot.com` |
//! | `OI_INSCRIPTION_API_KEY` | unset |
//! | `OI_FEE_API_URL` | `https://mempool.space` |
//! | `OI_LOW_POSTAGE` | `true` |
//! | `OI_FAST_POLL_SECS` / `OI_SLOW_POLL_SECS` | `5` / `20` |
//! | `OI_DEFAULT_FEE_RATE` | `1` |
//! | `OI_ACCEPT_LEGACY_SIGNATURES` | `true` |
//! | `OI_IDENTITY_URL` / `OI_IDENTITY_API_KEY` | unset |
//! | `OI_LOG_LEVEL` (or `RUST_LOG`) / `OI_JSON_LOGS` | `info` / `false` |

use std::env;

use oi_01_wallet_auth::AuthConfig;
use oi_02_inscription_orders::{FeeRate, OrdersConfig};
use shared_types::Network;
use thiserror::Error;

/// Default inscription service base URL.
pub const DEFAULT_INSCRIPTION_API_URL: &str = "https://signet.ordinalsbot.com";

/// Default fee estimate service base URL.
pub const DEFAULT_FEE_API_URL: &str = "https://mempool.space";

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set to a value that cannot be parsed.
    #[error("{var}={value:?} is invalid: {reason}")]
    Invalid {
        /// Variable name.
        var: &'static str,
        /// Raw value.
        value: String,
        /// What was expected.
        reason: String,
    },

    /// A variable required by the requested operation is not set.
    #[error("{0} must be set")]
    Missing(&'static str),
}

/// Inscription service endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InscriptionApiConfig {
    /// Base URL, without trailing slash.
    pub base_url: String,
    /// Sent as `x-api-key` when present.
    pub api_key: Option<String>,
}

/// Identity provider endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdentityConfig {
    /// Token issuing URL.
    pub url: String,
    /// Sent as a bearer token when present.
    pub api_key: Option<String>,
}

/// Logging configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogConfig {
    /// `EnvFilter` directive.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Complete runtime configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Network every address must belong to.
    pub network: Network,
    /// Inscription service.
    pub inscription: InscriptionApiConfig,
    /// Fee estimate service base URL.
    pub fee_api_url: String,
    /// Identity provider, required only for sign-in.
    pub identity: Option<IdentityConfig>,
    /// Session gate settings.
    pub auth: AuthConfig,
    /// Order subsystem settings.
    pub orders: OrdersConfig,
    /// Logging settings.
    pub logging: LogConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            network: Network::default(),
            inscription: InscriptionApiConfig {
                base_url: DEFAULT_INSCRIPTION_API_URL.to_string(),
                api_key: None,
            },
            fee_api_url: DEFAULT_FEE_API_URL.to_string(),
            identity: None,
            auth: AuthConfig::default(),
            orders: OrdersConfig::default(),
            logging: LogConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Load from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary variable source.
    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(raw) = var("OI_NETWORK") {
            config.network = raw.parse().map_err(|e| ConfigError::Invalid {
                var: "OI_NETWORK",
                value: raw.clone(),
                reason: format!("{e}"),
            })?;
        }
        config.auth.expected_network = Some(config.network);

        if let Some(url) = var("OI_INSCRIPTION_API_URL") {
            config.inscription.base_url = trim_url(&url);
        }
        config.inscription.api_key = var("OI_INSCRIPTION_API_KEY");

        if let Some(url) = var("OI_FEE_API_URL") {
            config.fee_api_url = trim_url(&url);
        }

        if let Some(url) = var("OI_IDENTITY_URL") {
            config.identity = Some(IdentityConfig {
                url,
                api_key: var("OI_IDENTITY_API_KEY"),
            });
        }

        if let Some(raw) = var("OI_LOW_POSTAGE") {
            config.orders.low_postage = parse_bool("OI_LOW_POSTAGE", &raw)?;
        }
        if let Some(raw) = var("OI_ACCEPT_LEGACY_SIGNATURES") {
            config.auth.accept_legacy_segwit_signatures =
                parse_bool("OI_ACCEPT_LEGACY_SIGNATURES", &raw)?;
        }
        if let Some(raw) = var("OI_FAST_POLL_SECS") {
            config.orders.fast_poll_secs = parse_secs("OI_FAST_POLL_SECS", &raw)?;
        }
        if let Some(raw) = var("OI_SLOW_POLL_SECS") {
            config.orders.slow_poll_secs = parse_secs("OI_SLOW_POLL_SECS", &raw)?;
        }
        if let Some(raw) = var("OI_DEFAULT_FEE_RATE") {
            let rate: i64 = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "OI_DEFAULT_FEE_RATE",
                value: raw.clone(),
                reason: "expected an integer".to_string(),
            })?;
            config.orders.default_fee_rate = FeeRate::clamped(rate);
        }

        if let Some(level) = var("OI_LOG_LEVEL").or_else(|| var("RUST_LOG")) {
            config.logging.level = level;
        }
        if let Some(raw) = var("OI_JSON_LOGS") {
            config.logging.json = parse_bool("OI_JSON_LOGS", &raw)?;
        }

        Ok(config)
    }

    /// Identity provider settings, required for sign-in.
    pub fn require_identity(&self) -> Result<&IdentityConfig, ConfigError> {
        self.identity
            .as_ref()
            .ok_or(ConfigError::Missing("OI_IDENTITY_URL"))
    }
}

fn trim_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn parse_bool(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            value: raw.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}

fn parse_secs(var: &'static str, raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ConfigError::Invalid {
            var,
            value: raw.to_string(),
            reason: "expected a positive number of seconds".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<RuntimeConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RuntimeConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.network, Network::Signet);
        assert_eq!(config.auth.expected_network, Some(Network::Signet));
        assert_eq!(config.inscription.base_url, DEFAULT_INSCRIPTION_API_URL);
        assert_eq!(config.orders.fast_poll_secs, 5);
        assert_eq!(config.orders.slow_poll_secs, 20);
        assert!(config.orders.low_postage);
        assert!(config.identity.is_none());
        assert_eq!(config.logging, LogConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("OI_NETWORK", "mainnet"),
            ("OI_INSCRIPTION_API_URL", "https://api.example.com/"),
            ("OI_INSCRIPTION_API_KEY", "k"),
            ("OI_LOW_POSTAGE", "false"),
            ("OI_FAST_POLL_SECS", "2"),
            ("OI_DEFAULT_FEE_RATE", "500000"),
            ("OI_IDENTITY_URL", "https://id.example.com/token"),
            ("RUST_LOG", "debug"),
            ("OI_JSON_LOGS", "1"),
        ])
        .unwrap();

        assert_eq!(config.network, Network::Mainnet);
        assert_eq!(config.auth.expected_network, Some(Network::Mainnet));
        assert_eq!(config.inscription.base_url, "https://api.example.com");
        assert_eq!(config.inscription.api_key.as_deref(), Some("k"));
        assert!(!config.orders.low_postage);
        assert_eq!(config.orders.fast_poll_secs, 2);
        assert_eq!(config.orders.default_fee_rate.get(), 100_000);
        assert_eq!(config.require_identity().unwrap().url, "https://id.example.com/token");
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn test_oi_log_level_wins_over_rust_log() {
        let config = load(&[("OI_LOG_LEVEL", "warn"), ("RUST_LOG", "trace")]).unwrap();
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[("OI_NETWORK", "litecoin")]),
            Err(ConfigError::Invalid { var: "OI_NETWORK", .. })
        ));
        assert!(matches!(
            load(&[("OI_SLOW_POLL_SECS", "0")]),
            Err(ConfigError::Invalid { var: "OI_SLOW_POLL_SECS", .. })
        ));
        assert!(matches!(
            load(&[("OI_LOW_POSTAGE", "maybe")]),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_identity_required_for_sign_in() {
        let config = load(&[]).unwrap();
        assert_eq!(
            config.require_identity(),
            Err(ConfigError::Missing("OI_IDENTITY_URL"))
        );
    }
}
