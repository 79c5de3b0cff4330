//! Host configuration, read from environment variables.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var}={value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Prefix the items router is mounted under. `/` mounts it at the root.
    pub base_path: String,
    /// User attached to every request in the absence of real authentication.
    pub dev_user: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3000,
            base_path: "/items".into(),
            dev_user: "dev".into(),
        }
    }
}

impl ServerConfig {
    /// `ITEMS_HOST`, `PORT`, `ITEMS_BASE_PATH`, `ITEMS_DEV_USER`; unset
    /// variables fall back to the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(host) = lookup("ITEMS_HOST") {
            cfg.host = host;
        }
        if let Some(port) = lookup("PORT") {
            cfg.port = port.parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
                var: "PORT",
                value: port.clone(),
                reason: e.to_string(),
            })?;
        }
        if let Some(base_path) = lookup("ITEMS_BASE_PATH") {
            cfg.base_path = normalize_base_path(&base_path)?;
        }
        if let Some(user) = lookup("ITEMS_DEV_USER") {
            if user.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    var: "ITEMS_DEV_USER",
                    value: user,
                    reason: "must not be empty".into(),
                });
            }
            cfg.dev_user = user;
        }
        Ok(cfg)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn normalize_base_path(raw: &str) -> Result<String, ConfigError> {
    if !raw.starts_with('/') {
        return Err(ConfigError::Invalid {
            var: "ITEMS_BASE_PATH",
            value: raw.to_string(),
            reason: "must start with '/'".into(),
        });
    }
    let trimmed = raw.trim_end_matches('/');
    Ok(if trimmed.is_empty() { "/".to_string() } else { trimmed.to_string() })
}
