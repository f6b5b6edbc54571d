//! Authentication service
//!
//! `AuthService` is the process-wide part: configuration, keyed hasher, the
//! selected credential store driver and the session backend. It holds no
//! per-request state. `AuthSession` binds the service to one session and
//! carries the login/logout state machine.

pub mod session;

pub use session::AuthSession;

use log::info;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use crate::config::AuthConfig;
use crate::driver::{CredentialStore, DriverRegistry};
use crate::error::AuthError;
use crate::hash::Hasher;
use crate::session::{Session, SessionBackend, SessionRegistry};

/// Name of the configuration loaded by `AuthService::instance`
pub const CONFIG_NAME: &str = "auth";

static INSTANCE: OnceLock<AuthService> = OnceLock::new();
static INSTANCE_INIT: Mutex<()> = Mutex::new(());

/// Shared authentication service
pub struct AuthService {
    config: AuthConfig,
    hasher: Hasher,
    store: Box<dyn CredentialStore>,
    sessions: Arc<dyn SessionBackend>,
}

impl AuthService {
    /// Process-wide service, built from the `auth` configuration on first use.
    ///
    /// Construction runs at most once; a failed attempt is returned to the
    /// caller and the next call tries again.
    pub fn instance() -> Result<&'static AuthService, AuthError> {
        if let Some(service) = INSTANCE.get() {
            return Ok(service);
        }

        let _guard = INSTANCE_INIT.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(service) = INSTANCE.get() {
            return Ok(service);
        }

        let service = AuthService::new(AuthConfig::load(CONFIG_NAME)?)?;
        Ok(INSTANCE.get_or_init(|| service))
    }

    /// Build a service using the default driver and session registries
    pub fn new(config: AuthConfig) -> Result<Self, AuthError> {
        Self::with_registries(
            config,
            &DriverRegistry::with_defaults(),
            &SessionRegistry::with_defaults(),
        )
    }

    /// Build a service resolving the driver and session backend from the given registries
    pub fn with_registries(
        config: AuthConfig,
        drivers: &DriverRegistry,
        sessions: &SessionRegistry,
    ) -> Result<Self, AuthError> {
        config.validate()?;
        let hasher = Hasher::from_config(&config)?;
        let sessions = sessions.resolve(&config.session_type)?;
        let store = drivers.build(&config)?;

        info!(
            "Auth service ready (driver: {}, session: {})",
            store.name(),
            config.session_type
        );

        Ok(Self {
            config,
            hasher,
            store,
            sessions,
        })
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub fn driver(&self) -> &dyn CredentialStore {
        self.store.as_ref()
    }

    /// Keyed hash of `input` using `hash_method` and `hash_key`
    pub fn hash(&self, input: &str) -> Result<String, AuthError> {
        self.hasher.hash(input)
    }

    /// Constant-time check that `expected` is the keyed hash of `input`
    pub fn verify_hash(&self, input: &str, expected: &str) -> Result<bool, AuthError> {
        self.hasher.verify(input, expected)
    }

    /// Stored credential for `username`, `None` if unknown
    pub fn password(&self, username: &str) -> Option<String> {
        self.store.password(username)
    }

    /// Open a new session and bind it
    pub fn session(&self) -> Result<AuthSession<'_>, AuthError> {
        Ok(self.bind(self.sessions.open()?))
    }

    /// Reattach to an existing session by id, `Ok(None)` if it does not exist
    pub fn resume(&self, id: &str) -> Result<Option<AuthSession<'_>>, AuthError> {
        Ok(self.sessions.resume(id)?.map(|session| self.bind(session)))
    }

    /// Bind an already acquired session handle
    pub fn bind(&self, session: Box<dyn Session>) -> AuthSession<'_> {
        AuthSession::new(self, session)
    }
}
