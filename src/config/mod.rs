use std::env;

use lazy_static::lazy_static;
use log::{info, warn};

use crate::constants::DEFAULT_DATABASE_NAME;
use crate::utils::log_sanitizer::mask_uri;

const LOG_TARGET: &str = "synapse_sprint::config";

pub const DEFAULT_SERVER_PORT: &str = "8080";
pub const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017";

lazy_static! {
    pub static ref CONFIG: Config = Config::from_env();
}

/// Process configuration. Built once at startup and never reloaded.
///
/// Every field always holds a usable value: a malformed or missing variable
/// falls back to its default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub server_port: String,
    pub mongodb_uri: String,
    pub database_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: DEFAULT_SERVER_PORT.to_string(),
            mongodb_uri: DEFAULT_MONGODB_URI.to_string(),
            database_name: DEFAULT_DATABASE_NAME.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the process environment (and `.env`, if present).
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        info!(target: LOG_TARGET, "Loading configuration...");
        let mut config = Self::default();

        if let Some(port) = lookup("SERVER_PORT") {
            if is_port_literal(&port) {
                config.server_port = port;
            } else {
                warn!(
                    target: LOG_TARGET,
                    "SERVER_PORT ('{}') is not a valid number. Using default '{}'.",
                    port, config.server_port
                );
            }
        }

        if let Some(uri) = lookup("MONGODB_URI") {
            if uri.trim().is_empty() {
                warn!(
                    target: LOG_TARGET,
                    "MONGODB_URI is empty. Using default '{}'.", config.mongodb_uri
                );
            } else {
                config.mongodb_uri = uri;
            }
        }

        if let Some(name) = lookup("DATABASE_NAME") {
            if name.trim().is_empty() {
                warn!(
                    target: LOG_TARGET,
                    "DATABASE_NAME is empty. Using default '{}'.", config.database_name
                );
            } else {
                config.database_name = name;
            }
        }

        info!(target: LOG_TARGET, "Configuration loaded successfully.");
        info!(target: LOG_TARGET, "Server port: {}", config.server_port);
        info!(target: LOG_TARGET, "MongoDB URI: {}", mask_uri(&config.mongodb_uri));
        info!(target: LOG_TARGET, "Database: {}", config.database_name);

        config
    }
}

/// Non-negative integer literal, with an optional leading `+`.
fn is_port_literal(value: &str) -> bool {
    value.parse::<u64>().is_ok()
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
    fn test_defaults_when_unset() {
        let config = load(&[]);
        assert_eq!(config.server_port, "8080");
        assert_eq!(config.mongodb_uri, "mongodb://localhost:27017");
        assert_eq!(config.database_name, "synapse_sprint_db");
    }

    #[test]
    fn test_values_from_environment() {
        let config = load(&[
            ("SERVER_PORT", "9090"),
            ("MONGODB_URI", "mongodb://db.internal:27018"),
            ("DATABASE_NAME", "sprint_test"),
        ]);
        assert_eq!(config.server_port, "9090");
        assert_eq!(config.mongodb_uri, "mongodb://db.internal:27018");
        assert_eq!(config.database_name, "sprint_test");
    }

    #[test]
    fn test_invalid_port_keeps_default() {
        for bad in ["abc", "", "80a", "-1", "8080 ", "1.5"] {
            let config = load(&[("SERVER_PORT", bad)]);
            assert_eq!(config.server_port, "8080", "adopted {:?}", bad);
        }
    }

    #[test]
    fn test_port_is_kept_verbatim() {
        assert_eq!(load(&[("SERVER_PORT", "0")]).server_port, "0");
        assert_eq!(load(&[("SERVER_PORT", "+3000")]).server_port, "+3000");
    }

    #[test]
    fn test_blank_database_name_keeps_default() {
        let config = load(&[("DATABASE_NAME", "  ")]);
        assert_eq!(config.database_name, "synapse_sprint_db");
    }

    #[test]
    fn test_fields_never_empty() {
        let config = load(&[("SERVER_PORT", "nope"), ("MONGODB_URI", "")]);
        assert!(!config.server_port.is_empty());
        assert_eq!(config.mongodb_uri, DEFAULT_MONGODB_URI);
    }
}
