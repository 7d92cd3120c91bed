//! Convenience re-exports for common use.

pub use crate::auth::{AuthService, BearerToken, LoginOutcome, SessionStore};
pub use crate::client::{ApiClient, ApiRequest, ApiResponse};
pub use crate::config::ClientConfig;
pub use crate::error::{Result, UrutiError};
pub use crate::resources::{ReportKind, ReportQuery};
pub use crate::types::{Envelope, Page, Payload};
