//! File driver
//!
//! Verifies passwords against a static user table (username to pre-hashed
//! password) taken from the `users` option of the auth configuration.

use log::{debug, info};
use serde_json::Value;
use std::collections::HashMap;

use super::CredentialStore;
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::service::AuthSession;

/// Static credential store loaded once from configuration
#[derive(Debug, Clone, Default)]
pub struct FileStore {
    users: HashMap<String, String>,
}

impl FileStore {
    pub const NAME: &'static str = "file";

    pub fn new(users: HashMap<String, String>) -> Self {
        Self { users }
    }

    /// Read the `users` table; a missing table means no users
    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        let users: HashMap<String, String> = config.option("users")?.unwrap_or_default();
        debug!("File driver loaded {} user(s)", users.len());
        Ok(Self::new(users))
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

impl CredentialStore for FileStore {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn login(
        &self,
        auth: &mut AuthSession<'_>,
        username: &str,
        password: &str,
        remember: bool,
    ) -> Result<bool, AuthError> {
        if remember {
            return Err(AuthError::UnsupportedFeature(
                "File Auth driver does not support remember me".into(),
            ));
        }

        // Unknown users still hash, so a missing hash_key fails for everyone.
        let verified = match self.users.get(username) {
            Some(stored) => auth.verify_hash(password, stored)?,
            None => {
                auth.hash(password)?;
                false
            }
        };

        if verified {
            auth.complete_login(Value::from(username))
        } else {
            info!("Login rejected for user: {}", username);
            Ok(false)
        }
    }

    fn password(&self, username: &str) -> Option<String> {
        self.users.get(username).cloned()
    }

    // Compares against the stored hash as-is; callers pass a pre-hashed value.
    fn check_password(&self, auth: &AuthSession<'_>, password: &str) -> bool {
        match auth.get_user() {
            Some(Value::String(username)) => self.password(&username).as_deref() == Some(password),
            _ => false,
        }
    }

    fn force_login(&self, auth: &mut AuthSession<'_>, username: &str) -> Result<bool, AuthError> {
        info!("Forcing login for user: {}", username);
        auth.complete_login(Value::from(username))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_lookup() {
        let store = FileStore::new(HashMap::from([("alice".to_string(), "h1".to_string())]));
        assert_eq!(store.password("alice").as_deref(), Some("h1"));
        assert!(store.password("mallory").is_none());
    }

    #[test]
    fn test_from_config_without_users() {
        let store = FileStore::from_config(&AuthConfig::default()).unwrap();
        assert_eq!(store.user_count(), 0);
    }

    #[test]
    fn test_from_config_with_users() {
        let config = AuthConfig::from_toml(
            r#"
            [users]
            alice = "aaaa"
            bob = "bbbb"
            "#,
        )
        .unwrap();
        let store = FileStore::from_config(&config).unwrap();
        assert_eq!(store.user_count(), 2);
        assert_eq!(store.password("bob").as_deref(), Some("bbbb"));
    }

    #[test]
    fn test_usernames_keep_their_case() {
        let config = AuthConfig::from_toml(
            r#"
            [users]
            Alice = "upper"
            alice = "lower"
            "#,
        )
        .unwrap();
        let store = FileStore::from_config(&config).unwrap();
        assert_eq!(store.user_count(), 2);
        assert_eq!(store.password("Alice").as_deref(), Some("upper"));
        assert_eq!(store.password("alice").as_deref(), Some("lower"));
    }

    #[test]
    fn test_from_config_rejects_malformed_users() {
        let config = AuthConfig::from_toml("users = [\"alice\"]").unwrap();
        assert!(FileStore::from_config(&config).unwrap_err().is_config());
    }
}
