//! Authenticated client for the UrutiIQ REST API.

pub mod http;
mod recovery;
pub mod request;

pub use request::{ApiRequest, ApiResponse};

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::auth::session::{Credentials, SessionState};
use crate::auth::store::{FileSessionStore, SessionStore, SessionStoreConfig};
use crate::auth::BearerToken;
use crate::config::ClientConfig;
use crate::error::{Result, UrutiError};
use crate::types::{Envelope, Payload};

use request::RawResponse;

/// Authenticated API client.
///
/// Cheap to clone; clones share the HTTP connection pool, the session state,
/// and the 401 recovery guard.
///
/// # Example
/// ```no_run
/// use uruti::client::ApiClient;
/// use uruti::config::ClientConfig;
///
/// # async fn example() -> uruti::error::Result<()> {
/// let client = ApiClient::new(ClientConfig::from_env()?)?;
/// let invoices: serde_json::Value = client.get("/invoices?companyId=c1").await?;
/// println!("{invoices}");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    config: ClientConfig,
    session: SessionState,
    recovery: tokio::sync::Mutex<()>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.config.base_url)
            .field("session", &self.inner.session)
            .finish()
    }
}

impl ApiClient {
    /// Client persisting its session under `config.session_dir`.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let store = FileSessionStore::new(SessionStoreConfig::new(config.session_dir.clone()));
        Self::with_store(config, Arc::new(store))
    }

    /// Client backed by an explicit session store.
    pub fn with_store(config: ClientConfig, store: Arc<dyn SessionStore>) -> Result<Self> {
        config.validate()?;
        let http = http::build_http_client(&config)?;
        let session = SessionState::new(
            store,
            config.default_tenant_id.clone(),
            config.default_company_id.clone(),
        );
        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                config,
                session,
                recovery: tokio::sync::Mutex::new(()),
            }),
        })
    }

    /// Client configured from `URUTI_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn session(&self) -> &SessionState {
        &self.inner.session
    }

    /// Use `token` (and optionally `tenant_id`) for subsequent requests.
    pub fn set_auth(&self, token: &str, tenant_id: Option<&str>) -> Result<()> {
        let token = BearerToken::new(token)?;
        self.inner
            .session
            .set_auth(token, tenant_id.map(str::to_string));
        Ok(())
    }

    pub fn set_refresh_token(&self, refresh_token: Option<String>) {
        self.inner.session.set_refresh_token(refresh_token);
    }

    /// Issue a request and return the decoded 2xx response.
    ///
    /// A 401 triggers at most one refresh-token exchange and at most one
    /// demo-token exchange, each followed by a single retry. Any other non-2xx
    /// status, or a 401 left after recovery, becomes [`UrutiError::Api`].
    pub async fn request(&self, request: ApiRequest) -> Result<ApiResponse> {
        let credentials = self.inner.session.credentials();
        let mut response = self.execute(&request, &credentials).await?;
        if response.is_unauthorized() && request.recover_unauthorized {
            response = self.recover(&request, &credentials, response).await?;
        }

        if !response.status.is_success() {
            return Err(http::error_from_body(
                response.status.as_u16(),
                &response.text,
            ));
        }

        Ok(ApiResponse {
            status: response.status,
            headers: response.headers,
            payload: Payload::from_text(response.text),
        })
    }

    /// Issue a request and deserialize the unwrapped `data` member.
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        self.request(request).await?.data()
    }

    /// Issue a request and keep the full envelope (pagination, error object).
    pub async fn send_envelope<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<Envelope<T>> {
        self.request(request).await?.envelope()
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(ApiRequest::get(path)).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.send(ApiRequest::post(path).with_json(body)?).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.send(ApiRequest::put(path).with_json(body)?).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.send(ApiRequest::patch(path).with_json(body)?).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(ApiRequest::delete(path)).await
    }

    /// One network round trip, no status handling.
    async fn execute(
        &self,
        request: &ApiRequest,
        credentials: &Credentials,
    ) -> Result<RawResponse> {
        let url = self.inner.config.endpoint_url(&request.path);
        let headers = http::request_headers(credentials, &request.headers)?;

        let mut builder = self
            .inner
            .http
            .request(request.method.clone(), &url)
            .headers(headers);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        debug!(
            method = %request.method,
            path = request.path.as_str(),
            authenticated = credentials.token.is_some(),
            "Sending request"
        );
        let response = builder.send().await.map_err(UrutiError::Network)?;
        let status = response.status();
        let headers = response.headers().clone();
        let text = response.text().await?;
        debug!(status = status.as_u16(), path = request.path.as_str(), "Received response");

        Ok(RawResponse {
            status,
            headers,
            text,
        })
    }
}
