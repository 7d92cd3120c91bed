//! HTTP transport construction, header injection, and error normalization.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;

use crate::auth::session::Credentials;
use crate::config::ClientConfig;
use crate::error::UrutiError;

pub const TENANT_HEADER: &str = "x-tenant-id";
pub const COMPANY_HEADER: &str = "x-company-id";

/// Build the reqwest client for a configuration.
pub fn build_http_client(config: &ClientConfig) -> Result<reqwest::Client, UrutiError> {
    let mut builder = reqwest::Client::builder().pool_max_idle_per_host(10);
    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Headers sent on every request.
///
/// Caller-supplied `extra` headers override the JSON/tenant/company defaults;
/// `Authorization` is always derived from the credentials and is omitted when
/// there is no token.
pub fn request_headers(
    credentials: &Credentials,
    extra: &HeaderMap,
) -> Result<HeaderMap, UrutiError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
        HeaderName::from_static(TENANT_HEADER),
        header_value(TENANT_HEADER, &credentials.tenant_id)?,
    );
    headers.insert(
        HeaderName::from_static(COMPANY_HEADER),
        header_value(COMPANY_HEADER, &credentials.company_id)?,
    );
    for (name, value) in extra {
        headers.insert(name.clone(), value.clone());
    }
    headers.remove(AUTHORIZATION);
    if let Some(token) = &credentials.token {
        headers.insert(AUTHORIZATION, token.header_value());
    }
    Ok(headers)
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, UrutiError> {
    HeaderValue::from_str(value)
        .map_err(|_| UrutiError::InvalidArgument(format!("invalid value for {name}: {value:?}")))
}

/// Translate a non-2xx body into an [`UrutiError::Api`].
///
/// Message priority: `error.message`, then top-level `message`, then a string
/// `error`, then the raw body text. An empty body yields a generic message.
pub fn error_from_body(status: u16, body: &str) -> UrutiError {
    let text = body.trim();
    if text.is_empty() {
        return UrutiError::api(status, format!("Request failed with status {status}"));
    }

    let Ok(value) = serde_json::from_str::<Value>(text) else {
        return UrutiError::api(status, text);
    };

    let nested = value.get("error");
    if let Some(message) = nested.and_then(|e| e.get("message")).and_then(Value::as_str) {
        return api_error(status, message, nested.and_then(|e| e.get("details")));
    }
    if let Some(message) = value.get("message").and_then(Value::as_str) {
        return api_error(status, message, value.get("details"));
    }
    if let Some(message) = nested.and_then(Value::as_str) {
        return api_error(status, message, value.get("details"));
    }
    UrutiError::api_with_details(status, text, value)
}

fn api_error(status: u16, message: &str, details: Option<&Value>) -> UrutiError {
    match details.filter(|d| !d.is_null()) {
        Some(details) => UrutiError::api_with_details(status, message, details.clone()),
        None => UrutiError::api(status, message),
    }
}
