//! Client configuration (layered: code > env > defaults).

use std::path::PathBuf;
use std::time::Duration;

use crate::auth::store::SessionStoreConfig;
use crate::error::UrutiError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:4000/api/v1";
pub const DEFAULT_TENANT_ID: &str = "demo-tenant";
pub const DEFAULT_COMPANY_ID: &str = "demo-company";
pub const DEFAULT_DEMO_SUBJECT: &str = "demo-user";
pub const DEFAULT_DEMO_ROLE: &str = "admin";

/// Identity presented to `/auth/demo-token` when no session can be recovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoIdentity {
    pub sub: String,
    pub roles: Vec<String>,
}

impl Default for DemoIdentity {
    fn default() -> Self {
        Self {
            sub: DEFAULT_DEMO_SUBJECT.to_string(),
            roles: vec![DEFAULT_DEMO_ROLE.to_string()],
        }
    }
}

/// Settings for an [`ApiClient`](crate::client::ApiClient).
///
/// # Example
/// ```
/// use uruti::config::ClientConfig;
///
/// let config = ClientConfig::new("https://api.example.com/v1")
///     .with_default_tenant_id("acme")
///     .with_default_company_id("acme-ltd");
/// assert_eq!(config.base_url, "https://api.example.com/v1");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub default_tenant_id: String,
    pub default_company_id: String,
    pub demo_identity: DemoIdentity,
    /// Whole-request timeout. Unset leaves the transport default in place.
    pub timeout: Option<Duration>,
    pub session_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            default_tenant_id: DEFAULT_TENANT_ID.to_string(),
            default_company_id: DEFAULT_COMPANY_ID.to_string(),
            demo_identity: DemoIdentity::default(),
            timeout: None,
            session_dir: SessionStoreConfig::default_dir(),
        }
    }

    /// Load from environment variables, after reading `.env` if present.
    ///
    /// Recognised variables: `URUTI_API_URL`, `URUTI_TENANT_ID`,
    /// `URUTI_COMPANY_ID`, `URUTI_DEMO_SUB`, `URUTI_DEMO_ROLES`
    /// (comma-separated), `URUTI_TIMEOUT_SECS`, `URUTI_SESSION_DIR`.
    pub fn from_env() -> Result<Self, UrutiError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, UrutiError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = var("URUTI_API_URL") {
            config.base_url = url;
        }
        if let Some(tenant) = var("URUTI_TENANT_ID") {
            config.default_tenant_id = tenant;
        }
        if let Some(company) = var("URUTI_COMPANY_ID") {
            config.default_company_id = company;
        }
        if let Some(sub) = var("URUTI_DEMO_SUB") {
            config.demo_identity.sub = sub;
        }
        if let Some(roles) = var("URUTI_DEMO_ROLES") {
            config.demo_identity.roles = roles
                .split(',')
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
                .collect();
        }
        if let Some(secs) = var("URUTI_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                UrutiError::Configuration(format!("URUTI_TIMEOUT_SECS is not a number: {secs}"))
            })?;
            config.timeout = Some(Duration::from_secs(secs));
        }
        if let Some(dir) = var("URUTI_SESSION_DIR") {
            config.session_dir = PathBuf::from(dir);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_default_tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.default_tenant_id = tenant_id.into();
        self
    }

    pub fn with_default_company_id(mut self, company_id: impl Into<String>) -> Self {
        self.default_company_id = company_id.into();
        self
    }

    pub fn with_demo_identity(mut self, identity: DemoIdentity) -> Self {
        self.demo_identity = identity;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_session_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.session_dir = dir.into();
        self
    }

    /// Reject base URLs the client cannot join paths onto.
    pub fn validate(&self) -> Result<(), UrutiError> {
        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(UrutiError::Configuration(format!(
                "base URL must start with http:// or https://, got {url:?}"
            )));
        }
        Ok(())
    }

    /// Absolute URL for an endpoint path. Query strings are kept as-is.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.default_tenant_id, DEFAULT_TENANT_ID);
        assert_eq!(config.default_company_id, DEFAULT_COMPANY_ID);
        assert_eq!(config.demo_identity, DemoIdentity::default());
        assert!(config.timeout.is_none());
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("URUTI_API_URL", "https://api.uruti.test/v2"),
            ("URUTI_TENANT_ID", "tenant-7"),
            ("URUTI_COMPANY_ID", "company-3"),
            ("URUTI_DEMO_SUB", "kiosk"),
            ("URUTI_DEMO_ROLES", "viewer, accountant,"),
            ("URUTI_TIMEOUT_SECS", "15"),
            ("URUTI_SESSION_DIR", "/tmp/uruti-test"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "https://api.uruti.test/v2");
        assert_eq!(config.default_tenant_id, "tenant-7");
        assert_eq!(config.default_company_id, "company-3");
        assert_eq!(config.demo_identity.sub, "kiosk");
        assert_eq!(config.demo_identity.roles, vec!["viewer", "accountant"]);
        assert_eq!(config.timeout, Some(Duration::from_secs(15)));
        assert_eq!(config.session_dir, PathBuf::from("/tmp/uruti-test"));
    }

    #[test]
    fn blank_values_are_ignored() {
        let config = ClientConfig::from_lookup(lookup(&[("URUTI_TENANT_ID", "  ")])).unwrap();
        assert_eq!(config.default_tenant_id, DEFAULT_TENANT_ID);
    }

    #[test]
    fn bad_timeout_is_a_configuration_error() {
        let err = ClientConfig::from_lookup(lookup(&[("URUTI_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, UrutiError::Configuration(_)));
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        let err = ClientConfig::from_lookup(lookup(&[("URUTI_API_URL", "ftp://x")]))
            .unwrap_err();
        assert!(matches!(err, UrutiError::Configuration(_)));
    }

    #[test]
    fn endpoint_url_joins_without_double_slashes() {
        let config = ClientConfig::new("https://api.uruti.test/v1/");
        assert_eq!(
            config.endpoint_url("/invoices?companyId=c1"),
            "https://api.uruti.test/v1/invoices?companyId=c1"
        );
        assert_eq!(
            config.endpoint_url("auth/refresh"),
            "https://api.uruti.test/v1/auth/refresh"
        );
    }
}
