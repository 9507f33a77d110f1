pub mod cookies;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::MAX_SESSION_HOURS;
use crate::database::models::user::{Role, User};

/// Session token payload, also returned verbatim by `/api/auth/me`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// User id as a decimal string
    pub sub: String,
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// Lifetimes outside `1..=MAX_SESSION_HOURS` are refused rather than wrapped
    pub fn for_user(user: &User, session_hours: u64) -> Result<Self, JwtError> {
        if !(1..=MAX_SESSION_HOURS).contains(&session_hours) {
            return Err(JwtError::TokenGeneration(format!(
                "session lifetime of {} hours is out of range",
                session_hours
            )));
        }

        let now = Utc::now().timestamp();
        let ttl = i64::try_from(session_hours * 3600)
            .map_err(|e| JwtError::TokenGeneration(e.to_string()))?;

        Ok(Self {
            sub: user.id.to_string(),
            email: user.email.clone(),
            name: user.name.clone(),
            picture: user.picture.clone(),
            role: Role::from_db(&user.role),
            iat: now,
            exp: now.saturating_add(ttl),
        })
    }

    /// Seconds between issue and expiry, used as the cookie max-age
    pub fn lifetime_secs(&self) -> i64 {
        self.exp.saturating_sub(self.iat).max(0)
    }

    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT secret")]
    InvalidSecret,

    #[error("Invalid JWT token: {0}")]
    Invalid(String),
}

pub fn generate_jwt(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::new(Algorithm::HS256);

    encode(&header, claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// Verify signature and expiry, returning the claims
pub fn validate_jwt(token: &str, secret: &str) -> Result<Claims, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::new(Algorithm::HS256);

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| JwtError::Invalid(e.to_string()))?;

    Ok(token_data.claims)
}
