//! RAX Auth
//!
//! Authentication layer: verifies credentials through a pluggable credential
//! store driver, binds the authenticated identity into a session and exposes
//! login, logout and login-state checks.

pub mod config;
pub mod driver;
pub mod error;
pub mod hash;
pub mod service;
pub mod session;

pub use config::AuthConfig;
pub use driver::{CredentialStore, DriverRegistry, FileStore};
pub use error::AuthError;
pub use hash::{HashMethod, Hasher};
pub use service::{AuthService, AuthSession};
pub use session::{MemoryBackend, Session, SessionBackend, SessionRegistry};
