use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::error::AuthError;
use super::token::BearerToken;
use crate::client::{ApiClient, ApiRequest};
use crate::error::Result;

const LOGIN_PATH: &str = "/auth/login";
const MFA_VERIFY_PATH: &str = "/auth/mfa/login/verify";
const LOGOUT_PATH: &str = "/auth/logout";
const REGISTER_PATH: &str = "/auth/register";
const DEMO_TOKEN_PATH: &str = "/auth/demo-token";

/// A freshly issued session.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: BearerToken,
    pub refresh_token: Option<String>,
    pub tenant_id: Option<String>,
    pub user: Option<Value>,
}

/// Result of a password login.
#[derive(Debug, Clone)]
pub enum LoginOutcome {
    Authenticated(AuthSession),
    /// A second factor is needed; pass `mfa_token` to [`AuthService::verify_mfa`].
    MfaRequired { mfa_token: String },
}

/// Account registration payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
}

/// Point-in-time view of the local session.
#[derive(Debug, Clone)]
pub struct SessionStatus {
    pub logged_in: bool,
    pub subject: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub tenant_id: String,
    pub company_id: String,
    pub has_refresh_token: bool,
}

impl SessionStatus {
    pub fn is_expired(&self) -> bool {
        self.expires_at.map(|exp| exp <= Utc::now()).unwrap_or(false)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenGrant {
    access_token: Option<String>,
    token: Option<String>,
    refresh_token: Option<String>,
    tenant_id: Option<String>,
    #[serde(default)]
    mfa_required: bool,
    mfa_token: Option<String>,
    user: Option<Value>,
}

/// Session lifecycle against the `/auth/*` endpoints.
///
/// Session endpoints bypass the client's 401 recovery: a rejected password
/// surfaces as an error rather than silently becoming a demo session.
///
/// # Example
/// ```no_run
/// use uruti::auth::{AuthService, LoginOutcome};
/// use uruti::client::ApiClient;
///
/// # async fn example() -> uruti::error::Result<()> {
/// let auth = AuthService::new(ApiClient::from_env()?);
/// match auth.login("ops@example.com", "secret").await? {
///     LoginOutcome::Authenticated(session) => println!("tenant {:?}", session.tenant_id),
///     LoginOutcome::MfaRequired { mfa_token } => {
///         auth.verify_mfa(&mfa_token, "123456").await?;
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome> {
        let body = json!({ "email": email, "password": password });
        let grant = self.post_grant(LOGIN_PATH, body).await?;
        if grant.mfa_required {
            let mfa_token = grant.mfa_token.ok_or_else(|| {
                AuthError::InvalidResponse("MFA required but no mfaToken returned".to_string())
            })?;
            tracing::info!("Login requires a second factor");
            return Ok(LoginOutcome::MfaRequired { mfa_token });
        }
        Ok(LoginOutcome::Authenticated(self.establish(grant)?))
    }

    pub async fn verify_mfa(&self, mfa_token: &str, code: &str) -> Result<AuthSession> {
        let body = json!({ "mfaToken": mfa_token, "code": code });
        let grant = self.post_grant(MFA_VERIFY_PATH, body).await?;
        self.establish(grant)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<LoginOutcome> {
        let grant = self
            .post_grant(REGISTER_PATH, serde_json::to_value(request)?)
            .await?;
        if grant.mfa_required {
            if let Some(mfa_token) = grant.mfa_token {
                return Ok(LoginOutcome::MfaRequired { mfa_token });
            }
        }
        Ok(LoginOutcome::Authenticated(self.establish(grant)?))
    }

    /// Request a demo session for the configured demo identity.
    pub async fn demo(&self) -> Result<AuthSession> {
        let identity = &self.client.config().demo_identity;
        let body = json!({ "sub": identity.sub, "roles": identity.roles });
        let grant = self.post_grant(DEMO_TOKEN_PATH, body).await?;
        self.establish(grant)
    }

    /// Tell the backend, then forget local tokens whatever it answered.
    pub async fn logout(&self) -> Result<()> {
        let request = ApiRequest::post(LOGOUT_PATH).without_recovery();
        if let Err(err) = self.client.request(request).await {
            tracing::warn!(error = %err, "Logout request failed; clearing local session anyway");
        }
        self.client.session().clear_auth()?;
        Ok(())
    }

    pub fn status(&self) -> SessionStatus {
        let session = self.client.session();
        let token = session.token();
        let claims = token.as_ref().and_then(BearerToken::claims);
        SessionStatus {
            logged_in: token.is_some(),
            subject: claims.and_then(|c| c.sub),
            expires_at: token.as_ref().and_then(BearerToken::expires_at),
            tenant_id: session.tenant_id(),
            company_id: session.company_id(),
            has_refresh_token: session.refresh_token().is_some(),
        }
    }

    async fn post_grant(&self, path: &str, body: Value) -> Result<TokenGrant> {
        let request = ApiRequest::post(path).with_body(body).without_recovery();
        self.client.send(request).await
    }

    fn establish(&self, grant: TokenGrant) -> Result<AuthSession> {
        let raw = grant
            .access_token
            .or(grant.token)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::InvalidResponse("response carried no token".to_string()))?;
        let token = BearerToken::new(raw)?;

        // A refresh token left over from an earlier session must never be
        // exchanged on behalf of this one.
        let session = self.client.session();
        match grant.refresh_token.as_deref().filter(|t| !t.is_empty()) {
            Some(refresh_token) => session.adopt_refresh_token(refresh_token)?,
            None => session.forget_refresh_token()?,
        }
        session.adopt_token(token.clone())?;
        if let Some(tenant_id) = grant.tenant_id.as_deref() {
            session.adopt_tenant(tenant_id)?;
        }
        tracing::info!(tenant_id = grant.tenant_id.as_deref(), "Session established");

        Ok(AuthSession {
            token,
            refresh_token: grant.refresh_token,
            tenant_id: grant.tenant_id,
            user: grant.user,
        })
    }
}
