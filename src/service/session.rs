//! Request scoped authentication state
//!
//! A session is ANONYMOUS while no identity is stored under `session_key` and
//! AUTHENTICATED once one is. Only a driver-verified `login` (or a forced
//! login) moves it to AUTHENTICATED, only `logout` moves it back.

use log::{debug, info, warn};
use serde_json::Value;

use super::AuthService;
use crate::error::AuthError;
use crate::session::Session;

/// Authentication service bound to one session
pub struct AuthSession<'a> {
    service: &'a AuthService,
    session: Box<dyn Session>,
}

impl<'a> AuthSession<'a> {
    pub(crate) fn new(service: &'a AuthService, session: Box<dyn Session>) -> Self {
        Self { service, session }
    }

    pub fn service(&self) -> &'a AuthService {
        self.service
    }

    /// Underlying session, for data stored outside authentication
    pub fn session(&self) -> &dyn Session {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> &mut dyn Session {
        self.session.as_mut()
    }

    /// Release the session handle
    pub fn into_session(self) -> Box<dyn Session> {
        self.session
    }

    /// Identity of the logged-in user, if any
    pub fn get_user(&self) -> Option<Value> {
        self.session.get(&self.service.config().session_key)
    }

    /// Identity of the logged-in user, or `default`
    pub fn get_user_or(&self, default: Value) -> Value {
        self.get_user().unwrap_or(default)
    }

    /// Attempt to log in. An empty password is rejected without asking the driver.
    pub fn login(&mut self, username: &str, password: &str, remember: bool) -> Result<bool, AuthError> {
        if password.is_empty() {
            debug!("Empty password rejected for user: {}", username);
            return Ok(false);
        }

        let service = self.service;
        service.driver().login(self, username, password, remember)
    }

    /// Log out.
    ///
    /// With `destroy` the whole session is invalidated; otherwise only the
    /// identity is removed and the session id is rotated. `logout_all` is
    /// accepted for drivers with persistent tokens; session-only drivers have
    /// nothing more to revoke. Returns whether the session is anonymous
    /// afterwards; `false` means logout did not take effect.
    pub fn logout(&mut self, destroy: bool, logout_all: bool) -> Result<bool, AuthError> {
        let user = self.get_user();

        if destroy {
            self.session.destroy()?;
        } else {
            self.session.delete(&self.service.config().session_key)?;
            self.session.regenerate()?;
        }

        let logged_out = !self.logged_in(None);
        match user {
            Some(user) if logged_out => info!("User logged out: {} (all: {})", user, logout_all),
            Some(user) => warn!("Logout did not clear identity for: {}", user),
            None => debug!("Logout with no user logged in"),
        }
        Ok(logged_out)
    }

    /// Whether an identity is bound, optionally checking `role` with the driver
    pub fn logged_in(&self, role: Option<&str>) -> bool {
        match (self.get_user(), role) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(user), Some(role)) => self.service.driver().has_role(&user, role),
        }
    }

    /// Keyed hash using the service configuration
    pub fn hash(&self, input: &str) -> Result<String, AuthError> {
        self.service.hash(input)
    }

    pub fn verify_hash(&self, input: &str, expected: &str) -> Result<bool, AuthError> {
        self.service.verify_hash(input, expected)
    }

    /// Bind `identity` after a driver has verified it. Rotates the session id
    /// first, then stores the identity under `session_key`.
    pub fn complete_login(&mut self, identity: Value) -> Result<bool, AuthError> {
        self.session.regenerate()?;
        info!("User logged in: {}", identity);
        self.session.set(&self.service.config().session_key, identity)?;
        Ok(true)
    }

    /// Log `username` in without credential checks. Callers authorize this themselves.
    pub fn force_login(&mut self, username: &str) -> Result<bool, AuthError> {
        let service = self.service;
        service.driver().force_login(self, username)
    }

    /// Stored credential for `username`, `None` if unknown
    pub fn password(&self, username: &str) -> Option<String> {
        self.service.password(username)
    }

    /// Compare `password` with the logged-in user's stored credential
    pub fn check_password(&self, password: &str) -> bool {
        self.service.driver().check_password(self, password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use crate::driver::{CredentialStore, DriverRegistry};
    use crate::session::SessionRegistry;
    use serde_json::json;

    /// Driver granting only the `admin` role to `root`
    struct RoleStore;

    impl CredentialStore for RoleStore {
        fn name(&self) -> &str {
            "roles"
        }

        fn login(
            &self,
            auth: &mut AuthSession<'_>,
            username: &str,
            _password: &str,
            _remember: bool,
        ) -> Result<bool, AuthError> {
            auth.complete_login(json!({ "username": username }))
        }

        fn password(&self, _username: &str) -> Option<String> {
            None
        }

        fn check_password(&self, _auth: &AuthSession<'_>, _password: &str) -> bool {
            false
        }

        fn has_role(&self, identity: &Value, role: &str) -> bool {
            role == "admin" && identity["username"] == "root"
        }
    }

    fn role_service() -> AuthService {
        let mut drivers = DriverRegistry::new();
        drivers.register("roles", |_| Ok(Box::new(RoleStore) as Box<dyn CredentialStore>));
        let config = AuthConfig {
            driver: "roles".into(),
            ..AuthConfig::default()
        };
        AuthService::with_registries(config, &drivers, &SessionRegistry::with_defaults()).unwrap()
    }

    #[test]
    fn test_anonymous_by_default() {
        let service = role_service();
        let auth = service.session().unwrap();
        assert!(auth.get_user().is_none());
        assert_eq!(auth.get_user_or(json!(false)), json!(false));
        assert!(!auth.logged_in(None));
        assert!(!auth.logged_in(Some("admin")));
    }

    #[test]
    fn test_rich_identity_and_roles() {
        let service = role_service();
        let mut auth = service.session().unwrap();

        assert!(auth.login("root", "pw", false).unwrap());
        assert_eq!(auth.get_user(), Some(json!({ "username": "root" })));
        assert!(auth.logged_in(None));
        assert!(auth.logged_in(Some("admin")));
        assert!(!auth.logged_in(Some("auditor")));
    }

    #[test]
    fn test_complete_login_rotates_session_id() {
        let service = role_service();
        let mut auth = service.session().unwrap();
        let before = auth.session().id().to_string();

        assert!(auth.complete_login(json!("carol")).unwrap());
        assert_ne!(auth.session().id(), before);
        assert_eq!(auth.get_user(), Some(json!("carol")));
    }

    #[test]
    fn test_force_login_unsupported_by_default() {
        let service = role_service();
        let mut auth = service.session().unwrap();
        assert!(auth.force_login("root").unwrap_err().is_unsupported());
        assert!(!auth.logged_in(None));
    }

    #[test]
    fn test_custom_session_key() {
        let service = AuthService::new(AuthConfig {
            session_key: "who".into(),
            ..AuthConfig::default()
        })
        .unwrap();
        let mut auth = service.session().unwrap();
        auth.force_login("dave").unwrap();
        assert_eq!(auth.session().get("who"), Some(json!("dave")));
        assert!(auth.session().get("auth_user").is_none());
    }
}
