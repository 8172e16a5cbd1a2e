//! JWT token cache entry
//!
//! AgileTest cloud tokens are JWTs. Only the `exp` claim is read, without
//! signature verification: the expiry decides when to refresh, while the
//! server stays the only party that accepts or rejects the token.

use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// JWT Claims read from an AgileTest token
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    #[serde(
        default,
        deserialize_with = "numeric_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub exp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
}

/// NumericDate may carry a fraction; whole seconds are enough here
fn numeric_date<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.map(|secs| secs.trunc() as i64))
}

/// Read the `exp` claim of a token without verifying its signature.
///
/// Returns `None` for empty or undecodable tokens and tokens without `exp`.
pub fn decode_expiration(token: &str) -> Option<i64> {
    if token.is_empty() {
        return None;
    }

    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .ok()?
        .claims
        .exp
}

/// A cached bearer token and its decoded expiry
#[derive(Debug, Clone)]
pub struct CachedToken {
    value: String,
    expires_at: Option<i64>,
}

impl CachedToken {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let expires_at = decode_expiration(&value);
        Self { value, expires_at }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Expiry as a unix timestamp, if the token could be decoded
    pub fn expires_at(&self) -> Option<i64> {
        self.expires_at
    }

    /// Valid only while `now` is strictly before the expiry
    pub fn is_valid_at(&self, now: i64) -> bool {
        matches!(self.expires_at, Some(exp) if now < exp)
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(chrono::Utc::now().timestamp())
    }
}
