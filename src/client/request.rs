//! Request and response values passed through the client.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::UrutiError;
use crate::types::{Envelope, Payload};

/// An outbound call relative to the configured base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Endpoint path, optionally with a query string (`/invoices?companyId=c1`).
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub headers: HeaderMap,
    /// Run the 401 recovery protocol. Off for the session endpoints.
    pub recover_unauthorized: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            headers: HeaderMap::new(),
            recover_unauthorized: true,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serialize any body into the request.
    pub fn with_json<B: Serialize + ?Sized>(self, body: &B) -> Result<Self, UrutiError> {
        Ok(self.with_body(serde_json::to_value(body)?))
    }

    /// Surface a 401 directly instead of refreshing or falling back to demo.
    pub fn without_recovery(mut self) -> Self {
        self.recover_unauthorized = false;
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, UrutiError> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| UrutiError::InvalidArgument(format!("invalid header name {name:?}")))?;
        let value = HeaderValue::from_str(value).map_err(|_| {
            UrutiError::InvalidArgument(format!("invalid value for header {name}"))
        })?;
        self.headers.insert(name, value);
        Ok(self)
    }
}

/// A 2xx response with its decoded body.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub payload: Payload,
}

impl ApiResponse {
    /// `data` member, else the whole body, else `{}`.
    pub fn into_data(self) -> Value {
        self.payload.into_data()
    }

    /// Deserialize the unwrapped `data` member.
    pub fn data<T: DeserializeOwned>(self) -> Result<T, UrutiError> {
        Ok(serde_json::from_value(self.into_data())?)
    }

    /// Deserialize the whole body as an [`Envelope`].
    pub fn envelope<T: DeserializeOwned>(self) -> Result<Envelope<T>, UrutiError> {
        Ok(serde_json::from_value(self.payload.into_value())?)
    }
}

/// Response exactly as received, before status handling.
#[derive(Debug)]
pub(crate) struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub text: String,
}

impl RawResponse {
    pub fn is_unauthorized(&self) -> bool {
        self.status == StatusCode::UNAUTHORIZED
    }
}
