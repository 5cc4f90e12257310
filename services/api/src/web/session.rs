//! services/api/src/web/session.rs
//!
//! Stateless owner sessions: a signed JWT carried in the `owner_session`
//! cookie. There is no server-side session table, no refresh and no
//! revocation; a token stays valid until its fixed seven-day expiry.

use axum::http::{header, HeaderMap};
use chrono::Utc;
use coloc_core::domain::OwnerId;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{Config, ConfigError};

pub const OWNER_SESSION_COOKIE: &str = "owner_session";

/// One week, used for both the token expiry and the cookie `Max-Age`.
pub const SESSION_TTL_SECS: i64 = 60 * 60 * 24 * 7;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Failed to sign session token: {0}")]
    Signing(String),
}

/// Claims embedded in every owner session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    #[serde(rename = "ownerId")]
    pub owner_id: String,
    pub iat: i64,
    pub exp: i64,
}

/// Outcome of reading the session from a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionResolution {
    Authenticated(OwnerId),
    /// No `owner_session` cookie at all.
    Missing,
    /// A cookie was sent but failed verification (bad signature, expired,
    /// malformed). The caller should clear it.
    Invalid,
}

/// Issues and verifies owner session cookies.
///
/// Only constructible with a signing secret, so a misconfigured deployment
/// fails at startup instead of silently treating everyone as logged out.
#[derive(Clone)]
pub struct SessionAuthenticator {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    secure: bool,
}

impl SessionAuthenticator {
    pub fn new(secret: &str, secure: bool) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            secure,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let secret = config
            .owner_jwt_secret
            .as_deref()
            .ok_or_else(|| ConfigError::MissingVar("OWNER_JWT_SECRET".to_string()))?;
        Ok(Self::new(secret, config.production))
    }

    //=====================================================================================
    // Tokens
    //=====================================================================================

    pub fn issue_token(&self, owner_id: OwnerId) -> Result<String, SessionError> {
        self.issue_token_at(owner_id, Utc::now().timestamp())
    }

    pub(crate) fn issue_token_at(
        &self,
        owner_id: OwnerId,
        issued_at: i64,
    ) -> Result<String, SessionError> {
        let claims = SessionClaims {
            owner_id: owner_id.to_string(),
            iat: issued_at,
            exp: issued_at + SESSION_TTL_SECS,
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| SessionError::Signing(e.to_string()))
    }

    /// Checks signature and expiry. Any failure yields `None`.
    pub fn verify(&self, token: &str) -> Option<OwnerId> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        match jsonwebtoken::decode::<SessionClaims>(token, &self.decoding_key, &validation) {
            Ok(data) => data.claims.owner_id.parse().ok(),
            Err(e) => {
                debug!("Rejected owner session token: {}", e);
                None
            }
        }
    }

    //=====================================================================================
    // Cookies
    //=====================================================================================

    /// Signs a token for `owner_id` and returns the matching `Set-Cookie` value.
    pub fn issue_session(&self, owner_id: OwnerId) -> Result<String, SessionError> {
        let token = self.issue_token(owner_id)?;
        Ok(self.cookie(&token, SESSION_TTL_SECS))
    }

    /// The `Set-Cookie` value that deletes the session cookie.
    pub fn clear_session(&self) -> String {
        self.cookie("", 0)
    }

    fn cookie(&self, value: &str, max_age: i64) -> String {
        let secure = if self.secure { "; Secure" } else { "" };
        format!(
            "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}{}",
            OWNER_SESSION_COOKIE, value, max_age, secure
        )
    }

    /// Resolves the owner from a raw `Cookie` header value. No side effects.
    pub fn resolve_cookie_header(&self, cookie_header: Option<&str>) -> Option<OwnerId> {
        let token = find_cookie(cookie_header?, OWNER_SESSION_COOKIE)?;
        self.verify(token)
    }

    /// Resolves the owner from request headers, telling a missing cookie
    /// apart from a broken one.
    pub fn resolve(&self, headers: &HeaderMap) -> SessionResolution {
        let token = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(|h| find_cookie(h, OWNER_SESSION_COOKIE));

        match token {
            None => SessionResolution::Missing,
            Some(token) => match self.verify(token) {
                Some(owner_id) => SessionResolution::Authenticated(owner_id),
                None => SessionResolution::Invalid,
            },
        }
    }
}

/// Finds a non-empty cookie value by name in a `Cookie` header.
pub fn find_cookie<'a>(cookie_header: &'a str, name: &str) -> Option<&'a str> {
    cookie_header
        .split(';')
        .map(str::trim)
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}
