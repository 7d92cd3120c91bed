//! Uruti: client for the UrutiIQ accounting API
//!
//! Wraps the backend's REST endpoints with tenant/company header injection,
//! bearer-token handling, one-shot 401 recovery (refresh token, then demo
//! token), and `{data}` envelope unwrapping.
//!
//! # Quick Start
//!
//! ```no_run
//! use uruti::prelude::*;
//!
//! # async fn example() -> uruti::error::Result<()> {
//! let client = ApiClient::from_env()?;
//! let invoices: Page<Vec<serde_json::Value>> =
//!     client.invoices().list(&[("status", "overdue")]).await?;
//! println!("{} overdue invoices", invoices.items.len());
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod prelude;
pub mod resources;
pub mod types;

#[cfg(feature = "cli")]
pub mod cli;
