use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use reqwest::header::HeaderValue;
use serde::Deserialize;

use super::error::AuthError;

/// Validated bearer access token.
///
/// Holds the raw token without the `Bearer ` prefix. Only visible ASCII is
/// accepted so the token always converts into a header value. `Debug` output
/// is redacted.
///
/// # Example
/// ```
/// use uruti::auth::BearerToken;
///
/// let token = BearerToken::new("eyJhbGciOiJIUzI1NiJ9.e30.sig")?;
/// assert_eq!(format!("{token:?}"), "BearerToken([REDACTED])");
/// # Ok::<(), uruti::auth::AuthError>(())
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(value: impl Into<String>) -> Result<Self, AuthError> {
        let value = value.into();
        validate_token(&value)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `Authorization` header value, marked sensitive.
    pub fn header_value(&self) -> HeaderValue {
        // Validated at construction to visible ASCII only.
        let mut value: HeaderValue = format!("Bearer {}", self.0)
            .parse()
            .expect("validated token should convert to HeaderValue");
        value.set_sensitive(true);
        value
    }

    /// Best-effort decode of the JWT payload. No signature verification.
    pub fn claims(&self) -> Option<TokenClaims> {
        let payload = self.0.split('.').nth(1)?;
        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    /// Expiry from the JWT `exp` claim, when the token is a JWT.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.claims()?
            .exp
            .and_then(|exp| DateTime::<Utc>::from_timestamp(exp, 0))
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("BearerToken").field(&"[REDACTED]").finish()
    }
}

impl TryFrom<String> for BearerToken {
    type Error = AuthError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for BearerToken {
    type Error = AuthError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Subset of JWT claims the client reports on.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenClaims {
    pub sub: Option<String>,
    pub exp: Option<i64>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(rename = "tenantId")]
    pub tenant_id: Option<String>,
}

fn validate_token(token: &str) -> Result<(), AuthError> {
    if token.is_empty() {
        return Err(AuthError::InvalidToken("token cannot be empty".to_string()));
    }
    if let Some((idx, ch)) = token
        .chars()
        .enumerate()
        .find(|(_, ch)| !(32..=126).contains(&(*ch as u32)))
    {
        return Err(AuthError::InvalidToken(format!(
            "invalid character U+{:04X} at position {idx}",
            ch as u32
        )));
    }
    Ok(())
}
