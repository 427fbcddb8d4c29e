use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AuthError};

/// Lifetime of every issued token. Not configurable.
pub const TOKEN_TTL_MINUTES: i64 = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub authorized: bool,
    pub sub: String, // identifier
    pub exp: i64,    // Expiration time
    pub iat: i64,    // Issued at
}

/// Signs short-lived bearer tokens with a symmetric HS256 secret.
#[derive(Clone)]
pub struct TokenIssuer {
    secret: String,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer").finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(secret: impl Into<String>) -> Self {
        Self { secret: secret.into() }
    }

    pub fn issue(&self, identifier: &str) -> Result<String, AppError> {
        self.issue_at(identifier, Utc::now())
    }

    pub fn issue_at(&self, identifier: &str, now: DateTime<Utc>) -> Result<String, AppError> {
        if self.secret.is_empty() {
            return Err(AppError::InternalError("token signing secret is not configured".into()));
        }

        let claims = Claims {
            authorized: true,
            sub: identifier.to_string(),
            exp: (now + Duration::minutes(TOKEN_TTL_MINUTES)).timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;

        Ok(token)
    }

    /// Check signature and expiry. Issuing does not depend on this; it is
    /// what any downstream consumer of the token runs.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })
    }
}
