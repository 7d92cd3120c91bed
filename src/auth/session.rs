//! In-memory session fields and per-request credential snapshots.

use std::sync::{Arc, RwLock};

use super::error::AuthError;
use super::store::{SessionStore, StorageKey};
use super::token::BearerToken;

/// Immutable credentials for a single request attempt.
///
/// Built once when a call starts; the 401 recovery path produces a fresh
/// snapshot instead of mutating the one in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: Option<BearerToken>,
    pub tenant_id: String,
    pub company_id: String,
}

impl Credentials {
    /// Same tenant/company, different bearer token.
    pub fn with_token(&self, token: BearerToken) -> Self {
        Self {
            token: Some(token),
            ..self.clone()
        }
    }
}

#[derive(Default)]
struct SessionFields {
    token: Option<BearerToken>,
    tenant_id: Option<String>,
    refresh_token: Option<String>,
}

/// Mutable session state shared by every clone of a client.
///
/// Memory wins over the persisted store; the store fills whatever memory does
/// not hold. `company_id` is never cached and is read from the store on every
/// snapshot.
pub struct SessionState {
    fields: RwLock<SessionFields>,
    store: Arc<dyn SessionStore>,
    default_tenant_id: String,
    default_company_id: String,
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionState")
            .field("default_tenant_id", &self.default_tenant_id)
            .field("default_company_id", &self.default_company_id)
            .finish_non_exhaustive()
    }
}

impl SessionState {
    pub fn new(
        store: Arc<dyn SessionStore>,
        default_tenant_id: impl Into<String>,
        default_company_id: impl Into<String>,
    ) -> Self {
        Self {
            fields: RwLock::new(SessionFields::default()),
            store,
            default_tenant_id: default_tenant_id.into(),
            default_company_id: default_company_id.into(),
        }
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Current bearer token from memory, else the persisted `auth_token`.
    pub fn token(&self) -> Option<BearerToken> {
        if let Some(token) = self.read_fields(|fields| fields.token.clone()) {
            return Some(token);
        }
        let raw = self.load(StorageKey::AuthToken)?;
        match BearerToken::new(raw) {
            Ok(token) => Some(token),
            Err(err) => {
                tracing::warn!(error = %err, "Ignoring malformed persisted auth_token");
                None
            }
        }
    }

    pub fn tenant_id(&self) -> String {
        self.read_fields(|fields| fields.tenant_id.clone())
            .or_else(|| self.load(StorageKey::TenantId))
            .unwrap_or_else(|| self.default_tenant_id.clone())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read_fields(|fields| fields.refresh_token.clone())
            .or_else(|| self.load(StorageKey::RefreshToken))
    }

    /// Active company: `company_id`, then the legacy aliases, then the default.
    pub fn company_id(&self) -> String {
        StorageKey::COMPANY_KEYS
            .iter()
            .find_map(|key| self.load(*key))
            .unwrap_or_else(|| self.default_company_id.clone())
    }

    /// Snapshot of everything a request needs.
    pub fn credentials(&self) -> Credentials {
        Credentials {
            token: self.token(),
            tenant_id: self.tenant_id(),
            company_id: self.company_id(),
        }
    }

    /// Adopt an access token (and optionally a tenant) in memory only.
    pub fn set_auth(&self, token: BearerToken, tenant_id: Option<String>) {
        let mut fields = self.write_fields();
        fields.token = Some(token);
        if tenant_id.is_some() {
            fields.tenant_id = tenant_id;
        }
    }

    pub fn set_refresh_token(&self, refresh_token: Option<String>) {
        self.write_fields().refresh_token = refresh_token;
    }

    /// Adopt and persist a newly issued access token.
    pub fn adopt_token(&self, token: BearerToken) -> Result<(), AuthError> {
        self.store.set_key(StorageKey::AuthToken, token.as_str())?;
        self.write_fields().token = Some(token);
        Ok(())
    }

    /// Persist a refresh token and keep it in memory.
    pub fn adopt_refresh_token(&self, refresh_token: &str) -> Result<(), AuthError> {
        self.store.set_key(StorageKey::RefreshToken, refresh_token)?;
        self.write_fields().refresh_token = Some(refresh_token.to_string());
        Ok(())
    }

    /// Drop the refresh token from memory and the store.
    pub fn forget_refresh_token(&self) -> Result<(), AuthError> {
        self.write_fields().refresh_token = None;
        self.store.remove_key(StorageKey::RefreshToken)
    }

    /// Persist the tenant and keep it in memory.
    pub fn adopt_tenant(&self, tenant_id: &str) -> Result<(), AuthError> {
        self.store.set_key(StorageKey::TenantId, tenant_id)?;
        self.write_fields().tenant_id = Some(tenant_id.to_string());
        Ok(())
    }

    /// Persist the active company.
    pub fn set_company(&self, company_id: &str) -> Result<(), AuthError> {
        self.store.set_key(StorageKey::CompanyId, company_id)
    }

    /// Forget tokens in memory and in the store. Tenant and company survive.
    pub fn clear_auth(&self) -> Result<(), AuthError> {
        {
            let mut fields = self.write_fields();
            fields.token = None;
            fields.refresh_token = None;
        }
        self.store.remove_key(StorageKey::AuthToken)?;
        self.store.remove_key(StorageKey::RefreshToken)
    }

    fn load(&self, key: StorageKey) -> Option<String> {
        match self.store.get_key(key) {
            Ok(value) => value.filter(|v| !v.trim().is_empty()),
            Err(err) => {
                tracing::warn!(key = key.as_str(), error = %err, "Session store read failed");
                None
            }
        }
    }

    fn read_fields<T>(&self, f: impl FnOnce(&SessionFields) -> Option<T>) -> Option<T> {
        let fields = self
            .fields
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&fields)
    }

    fn write_fields(&self) -> std::sync::RwLockWriteGuard<'_, SessionFields> {
        self.fields
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
