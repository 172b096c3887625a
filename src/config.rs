use thiserror::Error;

use crate::constants::{DEFAULT_STATIC_PROXY, DEFAULT_STICKER_HOST};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
}

/// Extractor configuration loaded from environment variables.
///
/// Both values are plain string-rewrite targets. They are resolved once at
/// startup and handed to [`crate::telegram::PostExtractor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Host prefixed onto `/file/...` paths, e.g. `https://cdn5.telesco.pe`.
    pub static_proxy: String,
    /// Host for `/img/...` sticker and emoji assets. May be bare
    /// (`telegram.org`), protocol-relative or absolute.
    pub sticker_proxy: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            static_proxy: DEFAULT_STATIC_PROXY.to_string(),
            sticker_proxy: DEFAULT_STICKER_HOST.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Reads `STATIC_PROXY` and `STICKER_PROXY`, falling back to the
    /// built-in defaults when unset or empty.
    ///
    /// # Errors
    ///
    /// Currently infallible; kept fallible so new variables can be parsed
    /// without changing callers.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            static_proxy: trim_host(&env_or_default("STATIC_PROXY", DEFAULT_STATIC_PROXY)),
            sticker_proxy: trim_host(&env_or_default("STICKER_PROXY", DEFAULT_STICKER_HOST)),
        })
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if a proxy host is empty or the static proxy lacks an
    /// http(s) scheme.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.static_proxy.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "STATIC_PROXY".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        let lower = self.static_proxy.to_lowercase();
        if !lower.starts_with("https://") && !lower.starts_with("http://") {
            return Err(ConfigError::InvalidValue {
                name: "STATIC_PROXY".to_string(),
                message: format!("must start with http:// or https://, got '{}'", self.static_proxy),
            });
        }
        if self.sticker_proxy.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "STICKER_PROXY".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Configuration with recognizable hosts for tests.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            static_proxy: "https://static.test".to_string(),
            sticker_proxy: "stickers.test".to_string(),
        }
    }
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn trim_host(value: &str) -> String {
    value.trim().trim_end_matches('/').to_string()
}
