//! Driver registry
//!
//! Maps `driver` identifiers from configuration to driver constructors.

use std::collections::HashMap;

use super::{CredentialStore, FileStore};
use crate::config::AuthConfig;
use crate::error::AuthError;

/// Constructor receiving the full configuration
pub type DriverFactory =
    Box<dyn Fn(&AuthConfig) -> Result<Box<dyn CredentialStore>, AuthError> + Send + Sync>;

/// Registry of available credential store drivers
#[derive(Default)]
pub struct DriverRegistry {
    factories: HashMap<String, DriverFactory>,
}

impl DriverRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the `file` driver
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(FileStore::NAME, |config| {
            Ok(Box::new(FileStore::from_config(config)?) as Box<dyn CredentialStore>)
        });
        registry
    }

    pub fn register<F>(&mut self, driver: &str, factory: F)
    where
        F: Fn(&AuthConfig) -> Result<Box<dyn CredentialStore>, AuthError> + Send + Sync + 'static,
    {
        self.factories.insert(driver.to_string(), Box::new(factory));
    }

    pub fn contains(&self, driver: &str) -> bool {
        self.factories.contains_key(driver)
    }

    /// Construct the driver named by `config.driver`
    pub fn build(&self, config: &AuthConfig) -> Result<Box<dyn CredentialStore>, AuthError> {
        let factory = self
            .factories
            .get(&config.driver)
            .ok_or_else(|| AuthError::Config(format!("Unknown auth driver: {}", config.driver)))?;
        factory(config)
    }
}
