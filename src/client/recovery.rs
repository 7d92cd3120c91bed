//! One-shot 401 recovery: refresh-token exchange, then demo-token fallback.
//!
//! Token acquisition is single-flight. Callers serialize on the client's
//! recovery guard, and a caller that finds the session already holding a
//! different token than the one its request was rejected with reuses that
//! token instead of running another exchange.

use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::auth::session::Credentials;
use crate::auth::BearerToken;
use crate::error::Result;
use crate::types::Payload;

use super::request::{ApiRequest, RawResponse};
use super::ApiClient;

pub(crate) const REFRESH_PATH: &str = "/auth/refresh";
pub(crate) const DEMO_TOKEN_PATH: &str = "/auth/demo-token";

impl ApiClient {
    /// Run the recovery protocol for a request that came back 401.
    ///
    /// Returns the first non-401 retry, or the latest 401 when every path is
    /// exhausted or unavailable.
    pub(super) async fn recover(
        &self,
        request: &ApiRequest,
        credentials: &Credentials,
        rejected: RawResponse,
    ) -> Result<RawResponse> {
        let mut latest = rejected;
        let mut rejected_token = credentials.token.clone();

        if let Some(token) = self.refreshed_token(rejected_token.as_ref()).await {
            let retried = self
                .execute(request, &credentials.with_token(token.clone()))
                .await?;
            if !retried.is_unauthorized() {
                return Ok(retried);
            }
            debug!(path = request.path.as_str(), "Still unauthorized after refresh");
            rejected_token = Some(token);
            latest = retried;
        }

        if let Some(token) = self.demo_token(rejected_token.as_ref()).await {
            return self.execute(request, &credentials.with_token(token)).await;
        }

        Ok(latest)
    }

    async fn refreshed_token(&self, rejected: Option<&BearerToken>) -> Option<BearerToken> {
        let _guard = self.inner.recovery.lock().await;
        if let Some(current) = self.token_replaced_since(rejected) {
            debug!("Reusing token issued by a concurrent recovery");
            return Some(current);
        }

        let refresh_token = self.inner.session.refresh_token()?;
        let body = json!({ "refreshToken": refresh_token });
        let payload = self.exchange(REFRESH_PATH, body).await?;

        let Some(token) = find_token(&payload, &["accessToken", "token"]) else {
            warn!("Refresh response carried no access token");
            return None;
        };
        if let Some(rotated) = find_string(&payload, "refreshToken") {
            if let Err(err) = self.inner.session.adopt_refresh_token(&rotated) {
                warn!(error = %err, "Failed to persist rotated refresh token");
            }
        }
        self.adopt(token, "refresh")
    }

    async fn demo_token(&self, rejected: Option<&BearerToken>) -> Option<BearerToken> {
        let _guard = self.inner.recovery.lock().await;
        if let Some(current) = self.token_replaced_since(rejected) {
            debug!("Reusing token issued by a concurrent recovery");
            return Some(current);
        }

        let identity = &self.inner.config.demo_identity;
        let body = json!({ "sub": identity.sub, "roles": identity.roles });
        let payload = self.exchange(DEMO_TOKEN_PATH, body).await?;

        let Some(token) = find_token(&payload, &["token", "accessToken"]) else {
            warn!("Demo-token response carried no token");
            return None;
        };
        self.adopt(token, "demo")
    }

    /// POST an unauthenticated token exchange. `None` on any failure.
    async fn exchange(&self, path: &str, body: Value) -> Option<Value> {
        let credentials = Credentials {
            token: None,
            ..self.inner.session.credentials()
        };
        let request = ApiRequest::post(path).with_body(body);
        match self.execute(&request, &credentials).await {
            Ok(response) if response.status.is_success() => {
                Some(Payload::from_text(response.text).into_value())
            }
            Ok(response) => {
                warn!(path, status = response.status.as_u16(), "Token exchange rejected");
                None
            }
            Err(err) => {
                warn!(path, error = %err, "Token exchange failed");
                None
            }
        }
    }

    fn token_replaced_since(&self, rejected: Option<&BearerToken>) -> Option<BearerToken> {
        self.inner
            .session
            .token()
            .filter(|current| Some(current) != rejected)
    }

    fn adopt(&self, raw: String, source: &'static str) -> Option<BearerToken> {
        let token = match BearerToken::new(raw) {
            Ok(token) => token,
            Err(err) => {
                warn!(source, error = %err, "Issued token is not a valid bearer token");
                return None;
            }
        };
        if let Err(err) = self.inner.session.adopt_token(token.clone()) {
            warn!(source, error = %err, "Failed to persist issued token");
        }
        info!(source, "Adopted new access token");
        Some(token)
    }
}

/// First non-empty string under `keys`, at the top level or inside `data`.
fn find_token(payload: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| find_string(payload, key))
}

fn find_string(payload: &Value, key: &str) -> Option<String> {
    [payload.get("data"), Some(payload)]
        .into_iter()
        .flatten()
        .find_map(|scope| {
            scope
                .get(key)
                .and_then(Value::as_str)
                .filter(|value| !value.is_empty())
        })
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_found_in_data_envelope() {
        let payload = json!({"data": {"accessToken": "a1"}});
        assert_eq!(find_token(&payload, &["accessToken"]).as_deref(), Some("a1"));
    }

    #[test]
    fn token_found_at_top_level() {
        let payload = json!({"token": "demo-1"});
        assert_eq!(
            find_token(&payload, &["token", "accessToken"]).as_deref(),
            Some("demo-1")
        );
    }

    #[test]
    fn empty_token_is_ignored() {
        let payload = json!({"accessToken": ""});
        assert!(find_token(&payload, &["accessToken"]).is_none());
    }

    #[test]
    fn non_object_payload_has_no_token() {
        assert!(find_token(&json!("plain text"), &["token"]).is_none());
    }
}
