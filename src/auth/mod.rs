//! Session state, credential storage, and the session lifecycle service.

pub mod error;
pub mod service;
pub mod session;
pub mod store;
pub mod token;

pub use error::AuthError;
pub use service::{AuthService, AuthSession, LoginOutcome, RegisterRequest, SessionStatus};
pub use session::{Credentials, SessionState};
pub use store::{
    FileSessionStore, MemorySessionStore, SessionStore, SessionStoreConfig, StorageKey,
};
pub use token::{BearerToken, TokenClaims};
