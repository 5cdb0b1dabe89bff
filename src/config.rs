//! Configuration loaded from environment variables (and `.env`).
//!
//! Everything has a default, so the service starts with no configuration.

use std::net::SocketAddr;
use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Address the JSON API listens on.
    /// Env: `CAMPUSPOOL_ADDR`
    /// Default: `127.0.0.1:3000`
    pub http_addr: SocketAddr,

    /// Whether to start with the demo community loaded.
    /// Env: `CAMPUSPOOL_SEED` (true/false)
    /// Default: `true`
    pub seed_fixtures: bool,

    /// Email suffix a login must end with, compared case-insensitively.
    /// Env: `CAMPUSPOOL_EMAIL_SUFFIX`
    /// Default: `.edu`
    pub email_suffix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_addr: ([127, 0, 0, 1], 3000).into(),
            seed_fixtures: true,
            email_suffix: ".edu".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(addr) = lookup("CAMPUSPOOL_ADDR") {
            match addr.parse::<SocketAddr>() {
                Ok(parsed) => config.http_addr = parsed,
                Err(_) => warn!(
                    value = %addr,
                    default = %config.http_addr,
                    "Invalid CAMPUSPOOL_ADDR, using default"
                ),
            }
        }

        if let Some(seed) = lookup("CAMPUSPOOL_SEED") {
            match seed.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" => config.seed_fixtures = true,
                "false" | "0" | "no" => config.seed_fixtures = false,
                _ => warn!(value = %seed, "Invalid CAMPUSPOOL_SEED, using default"),
            }
        }

        if let Some(suffix) = lookup("CAMPUSPOOL_EMAIL_SUFFIX") {
            let suffix = suffix.trim();
            if suffix.is_empty() {
                warn!("Empty CAMPUSPOOL_EMAIL_SUFFIX, using default");
            } else {
                config.email_suffix = suffix.to_string();
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(load(&[]), Config::default());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("CAMPUSPOOL_ADDR", "0.0.0.0:8080"),
            ("CAMPUSPOOL_SEED", "false"),
            ("CAMPUSPOOL_EMAIL_SUFFIX", ".ac.uk"),
        ]);
        assert_eq!(config.http_addr, "0.0.0.0:8080".parse().unwrap());
        assert!(!config.seed_fixtures);
        assert_eq!(config.email_suffix, ".ac.uk");
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = load(&[
            ("CAMPUSPOOL_ADDR", "not-an-address"),
            ("CAMPUSPOOL_SEED", "maybe"),
            ("CAMPUSPOOL_EMAIL_SUFFIX", "  "),
        ]);
        assert_eq!(config, Config::default());
    }
}
