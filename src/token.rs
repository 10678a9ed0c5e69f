//! HS256 JSON Web Tokens.
//!
//! Format: `base64url(header).base64url(claims).base64url(hmac_sha256(header.claims))`.

use crate::error::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

const HEADER: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

pub struct TokenSigner {
    secret: Vec<u8>,
    lifetime: Duration,
}

impl TokenSigner {
    /// # Errors
    ///
    /// Returns `Error::Configuration` for an empty secret or a non-positive lifetime.
    pub fn new(secret: impl Into<Vec<u8>>, lifetime: Duration) -> Result<Self> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(Error::Configuration("token secret is empty".to_string()));
        }
        if lifetime <= Duration::zero() {
            return Err(Error::Configuration("token lifetime must be positive".to_string()));
        }
        Ok(Self { secret, lifetime })
    }

    fn mac(&self) -> Result<HmacSha256> {
        HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| Error::Configuration(format!("token secret rejected: {e}")))
    }

    pub fn issue(&self, user_id: Uuid, username: &str, now: DateTime<Utc>) -> Result<String> {
        let claims = Claims {
            sub: user_id,
            username: username.to_string(),
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
        };
        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(HEADER),
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?)
        );
        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        Ok(format!("{signing_input}.{signature}"))
    }

    /// # Errors
    ///
    /// Returns `Error::Unauthorized` for malformed, forged, or expired tokens.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims> {
        let mut parts = token.trim().split('.');
        let (Some(header), Some(payload), Some(signature), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(unauthorized("malformed token"));
        };

        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| unauthorized("malformed signature"))?;
        let mut mac = self.mac()?;
        mac.update(header.as_bytes());
        mac.update(b".");
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| unauthorized("bad signature"))?;

        let header = URL_SAFE_NO_PAD
            .decode(header)
            .map_err(|_| unauthorized("malformed header"))?;
        let header: serde_json::Value =
            serde_json::from_slice(&header).map_err(|_| unauthorized("malformed header"))?;
        if header.get("alg").and_then(|v| v.as_str()) != Some("HS256") {
            return Err(unauthorized("unsupported algorithm"));
        }

        let payload = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| unauthorized("malformed claims"))?;
        let claims: Claims =
            serde_json::from_slice(&payload).map_err(|_| unauthorized("malformed claims"))?;
        if claims.exp <= now.timestamp() {
            return Err(unauthorized("token expired"));
        }
        Ok(claims)
    }
}

fn unauthorized(reason: &str) -> Error {
    Error::Unauthorized(reason.to_string())
}
