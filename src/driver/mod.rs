//! Credential store drivers
//!
//! A driver supplies credential verification for the authentication service.
//! Session binding stays in `AuthSession`; drivers finish a successful login
//! by calling `AuthSession::complete_login` instead of touching the session.

pub mod file;
pub mod registry;

pub use file::FileStore;
pub use registry::{DriverFactory, DriverRegistry};

use serde_json::Value;

use crate::error::AuthError;
use crate::service::AuthSession;

/// Driver contract implemented by every credential store.
pub trait CredentialStore: Send + Sync {
    /// Identifier the driver is registered under
    fn name(&self) -> &str;

    /// Verify `username`/`password` and complete the login on success.
    ///
    /// `password` is never empty here; `AuthSession::login` rejects that first.
    fn login(
        &self,
        auth: &mut AuthSession<'_>,
        username: &str,
        password: &str,
        remember: bool,
    ) -> Result<bool, AuthError>;

    /// Stored credential for `username`, `None` if unknown
    fn password(&self, username: &str) -> Option<String>;

    /// Compare `password` with the stored credential of the logged-in user
    fn check_password(&self, auth: &AuthSession<'_>, password: &str) -> bool;

    /// Log `username` in without verifying credentials
    fn force_login(&self, _auth: &mut AuthSession<'_>, username: &str) -> Result<bool, AuthError> {
        Err(AuthError::UnsupportedFeature(format!(
            "driver '{}' cannot force a login for '{}'",
            self.name(),
            username
        )))
    }

    /// Role check for `identity`. Drivers without roles accept every role.
    fn has_role(&self, _identity: &Value, _role: &str) -> bool {
        true
    }
}
