//! Startup configuration, loaded once from the process environment.

use anyhow::{bail, Context, Result};

pub const ENV_API_KEY: &str = "TELE_API_KEY";
pub const ENV_SESSION: &str = "TELE_SESSION_TEXT";
pub const ENV_APP_ID: &str = "TELE_APP_ID";
pub const ENV_APP_HASH: &str = "TELE_APP_HASH";

/// Credentials for the API gate and the Telegram session.
///
/// Immutable for the process lifetime; loaded exactly once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Secret compared against the `x-api-key` request header.
    pub api_key: String,
    /// Base64-encoded serialized Telegram session.
    pub session: String,
    /// Telegram application id.
    pub app_id: i32,
    /// Telegram application hash.
    pub app_hash: String,
}

impl Config {
    /// Load from the process environment. Every missing variable is
    /// reported in a single error so the operator sees the full list.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut missing = Vec::new();
        let mut require = |key: &'static str| match lookup(key) {
            Some(value) if !value.is_empty() => Some(value),
            _ => {
                missing.push(key);
                None
            }
        };

        let api_key = require(ENV_API_KEY);
        let session = require(ENV_SESSION);
        let app_id = require(ENV_APP_ID);
        let app_hash = require(ENV_APP_HASH);

        match (api_key, session, app_id, app_hash) {
            (Some(api_key), Some(session), Some(app_id), Some(app_hash)) => {
                let app_id = app_id
                    .parse::<i32>()
                    .with_context(|| format!("{ENV_APP_ID} must be a number"))?;
                Ok(Self {
                    api_key,
                    session,
                    app_id,
                    app_hash,
                })
            }
            _ => bail!(
                "Missing required environment variables: {}",
                missing.join(", ")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn loads_complete_environment() {
        let env = vars(&[
            (ENV_API_KEY, "secret"),
            (ENV_SESSION, "c2Vzc2lvbg=="),
            (ENV_APP_ID, "12345"),
            (ENV_APP_HASH, "abcdef"),
        ]);
        let config = Config::from_lookup(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.app_id, 12345);
        assert_eq!(config.app_hash, "abcdef");
    }

    #[test]
    fn reports_every_missing_variable() {
        let env = vars(&[(ENV_API_KEY, "secret")]);
        let err = Config::from_lookup(|k| env.get(k).cloned()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains(ENV_SESSION));
        assert!(msg.contains(ENV_APP_ID));
        assert!(msg.contains(ENV_APP_HASH));
        assert!(!msg.contains(ENV_API_KEY));
    }

    #[test]
    fn empty_value_counts_as_missing() {
        let env = vars(&[
            (ENV_API_KEY, ""),
            (ENV_SESSION, "s"),
            (ENV_APP_ID, "1"),
            (ENV_APP_HASH, "h"),
        ]);
        let err = Config::from_lookup(|k| env.get(k).cloned()).unwrap_err();
        assert!(err.to_string().contains(ENV_API_KEY));
    }

    #[test]
    fn non_numeric_app_id_is_rejected() {
        let env = vars(&[
            (ENV_API_KEY, "secret"),
            (ENV_SESSION, "s"),
            (ENV_APP_ID, "not-a-number"),
            (ENV_APP_HASH, "h"),
        ]);
        let err = Config::from_lookup(|k| env.get(k).cloned()).unwrap_err();
        assert!(err.to_string().contains(ENV_APP_ID));
    }
}
