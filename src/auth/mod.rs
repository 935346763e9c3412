use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::access::{Role, SessionContext};
use crate::config::SecurityConfig;

/// Signed form of a [`SessionContext`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Database account identity
    pub sub: String,
    /// Session id keying the server-side pool
    pub sid: Uuid,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(ctx: &SessionContext, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub: ctx.identity.clone(),
            sid: ctx.session_id,
            role: ctx.role,
            exp,
            iat: now.timestamp(),
        }
    }
}

impl From<Claims> for SessionContext {
    fn from(claims: Claims) -> Self {
        SessionContext {
            session_id: claims.sid,
            identity: claims.sub,
            role: claims.role,
        }
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("JWT secret not configured")]
    MissingSecret,

    #[error("JWT generation error: {0}")]
    Generation(String),

    #[error("Invalid JWT token: {0}")]
    Invalid(String),
}

pub fn issue_token(ctx: &SessionContext, security: &SecurityConfig) -> Result<String, TokenError> {
    if security.jwt_secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let claims = Claims::new(ctx, security.jwt_expiry_hours);
    let key = EncodingKey::from_secret(security.jwt_secret.as_bytes());
    encode(&Header::default(), &claims, &key).map_err(|e| TokenError::Generation(e.to_string()))
}

pub fn verify_token(token: &str, security: &SecurityConfig) -> Result<SessionContext, TokenError> {
    if security.jwt_secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let key = DecodingKey::from_secret(security.jwt_secret.as_bytes());
    let data = decode::<Claims>(token, &key, &Validation::default())
        .map_err(|e| TokenError::Invalid(e.to_string()))?;
    Ok(data.claims.into())
}
