//! Error types
//!
//! Defines the failure taxonomy for the authentication layer. Wrong
//! credentials are not errors; they surface as `Ok(false)`.

use std::fmt;

/// Authentication layer errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Configuration missing, unloadable, or missing a required key.
    Config(String),
    /// Session backend cannot be acquired or used.
    Session(String),
    /// A driver was asked for a capability it does not implement.
    UnsupportedFeature(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AuthError::Session(msg) => write!(f, "Session error: {}", msg),
            AuthError::UnsupportedFeature(msg) => write!(f, "Unsupported feature: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<config::ConfigError> for AuthError {
    fn from(error: config::ConfigError) -> Self {
        AuthError::Config(error.to_string())
    }
}

impl AuthError {
    pub fn is_config(&self) -> bool {
        matches!(self, AuthError::Config(_))
    }

    pub fn is_session(&self) -> bool {
        matches!(self, AuthError::Session(_))
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, AuthError::UnsupportedFeature(_))
    }
}
