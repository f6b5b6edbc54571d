//! Configuration management for RAX Auth
//!
//! Loads the authentication configuration (driver selection, session binding
//! and keyed hashing options) from a config file with environment overrides.
//! Keys this module does not recognize are kept as driver options.

use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::Path;

use crate::error::AuthError;
use crate::hash::HashMethod;

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "AUTH_CONFIG_PATH";

/// Prefix for environment overrides, e.g. `RAX_AUTH_HASH_KEY`
const ENV_PREFIX: &str = "RAX_AUTH";

const DEFAULT_DRIVER: &str = "file";
const DEFAULT_HASH_METHOD: &str = "sha256";
const DEFAULT_SESSION_TYPE: &str = "native";
const DEFAULT_SESSION_KEY: &str = "auth_user";

/// Complete authentication configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Identifier of the credential store driver
    pub driver: String,

    /// Identifier of the session backend
    pub session_type: String,

    /// Session key holding the logged-in identity
    pub session_key: String,

    /// Secret for keyed hashing; required before `hash()` is used
    #[serde(default)]
    pub hash_key: Option<String>,

    /// HMAC algorithm identifier (sha224, sha256, sha384, sha512)
    pub hash_method: String,

    /// Driver specific keys (e.g. `users` for the file driver)
    #[serde(flatten)]
    pub options: HashMap<String, serde_json::Value>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            driver: DEFAULT_DRIVER.to_string(),
            session_type: DEFAULT_SESSION_TYPE.to_string(),
            session_key: DEFAULT_SESSION_KEY.to_string(),
            hash_key: None,
            hash_method: DEFAULT_HASH_METHOD.to_string(),
            options: HashMap::new(),
        }
    }
}

impl AuthConfig {
    /// Load the named configuration with environment overrides.
    ///
    /// `AUTH_CONFIG_PATH` takes precedence; otherwise `config/<name>` and
    /// `<name>` are tried in that order.
    pub fn load(name: &str) -> Result<Self, AuthError> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Self::load_from_path(Path::new(&path));
        }

        let config_paths = [format!("config/{name}"), name.to_string()];
        let mut last_error = None;

        for config_path in &config_paths {
            match Self::builder()?
                .add_source(File::with_name(config_path))
                .add_source(Self::environment())
                .build()
            {
                Ok(settings) => return Self::finish(settings),
                Err(e) => {
                    last_error = Some(e);
                    continue;
                }
            }
        }

        Err(AuthError::Config(format!(
            "Failed to load '{name}' from any location. Tried: {config_paths:?}. Last error: {}",
            last_error.map(|e| e.to_string()).unwrap_or_default()
        )))
    }

    /// Load configuration from an explicit file path with environment overrides
    pub fn load_from_path(path: &Path) -> Result<Self, AuthError> {
        let settings = Self::builder()?
            .add_source(File::from(path))
            .add_source(Self::environment())
            .build()?;
        Self::finish(settings)
    }

    /// Build configuration from an in-memory TOML document (no environment overrides)
    pub fn from_toml(source: &str) -> Result<Self, AuthError> {
        let settings = Self::builder()?
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?;
        Self::finish(settings)
    }

    /// Deserialize a driver option, `Ok(None)` when the key is absent
    pub fn option<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, AuthError> {
        match self.options.get(key) {
            None => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| AuthError::Config(format!("Invalid option '{key}': {e}"))),
        }
    }

    /// Builder with the recognized keys' defaults applied
    fn builder() -> Result<ConfigBuilder<DefaultState>, AuthError> {
        Ok(Config::builder()
            .set_default("driver", DEFAULT_DRIVER)?
            .set_default("session_type", DEFAULT_SESSION_TYPE)?
            .set_default("session_key", DEFAULT_SESSION_KEY)?
            .set_default("hash_method", DEFAULT_HASH_METHOD)?)
    }

    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
    }

    fn finish(settings: Config) -> Result<Self, AuthError> {
        let config: AuthConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all recognized keys.
    ///
    /// An empty `hash_key` is accepted here; it only fails once hashing is used.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.driver.trim().is_empty() {
            return Err(AuthError::Config("driver cannot be empty".into()));
        }

        if self.session_type.trim().is_empty() {
            return Err(AuthError::Config("session_type cannot be empty".into()));
        }

        if self.session_key.is_empty() {
            return Err(AuthError::Config("session_key cannot be empty".into()));
        }

        self.hash_method.parse::<HashMethod>()?;

        Ok(())
    }
}
