use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::auth::password::SecretHasher;
use crate::auth::token::TokenIssuer;
use crate::config::AuthConfig;
use crate::db::models::{Credential, CredentialRef};
use crate::db::store::CredentialStore;
use crate::error::{AppError, AuthError, DatabaseError};
use crate::validation;

/// Identity established by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    #[serde(rename = "username")]
    pub identifier: String,
}

/// Registration and login over a [`CredentialStore`].
///
/// Holds no per-request state; every call goes to the store, so any number
/// of requests (or service instances) can share one.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    hasher: Arc<SecretHasher>,
    tokens: TokenIssuer,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, hasher: SecretHasher, tokens: TokenIssuer) -> Self {
        Self {
            store,
            hasher: Arc::new(hasher),
            tokens,
        }
    }

    pub fn from_config(store: Arc<dyn CredentialStore>, config: &AuthConfig) -> Result<Self, AppError> {
        Ok(Self::new(
            store,
            SecretHasher::from_config(config)?,
            TokenIssuer::new(config.jwt_secret.clone()),
        ))
    }

    pub async fn register(&self, identifier: &str, secret: &str) -> Result<CredentialRef, AppError> {
        validation::credentials(identifier, secret)?;

        if self.store.find_by_identifier(identifier).await?.is_some() {
            warn!(identifier, "Registration rejected, identifier already registered");
            return Err(AuthError::AlreadyRegistered.into());
        }

        let secret_hash = self.hash_secret(secret).await?;
        let credential = Credential::new(identifier.to_string(), secret_hash);

        match self.store.insert(&credential).await {
            Ok(reference) => {
                info!(identifier, id = %reference.id, "Credential created");
                Ok(reference)
            }
            // Lost a race with a concurrent registration; the store's unique
            // key decided.
            Err(DatabaseError::Duplicate) => {
                warn!(identifier, "Registration rejected by unique constraint");
                Err(AuthError::AlreadyRegistered.into())
            }
            Err(e) => {
                error!(identifier, "Failed to store credential: {}", e);
                Err(e.into())
            }
        }
    }

    /// Unknown identifiers and wrong secrets fail identically.
    pub async fn authenticate(&self, identifier: &str, secret: &str) -> Result<Principal, AppError> {
        // Nothing this short or long was ever registered.
        if validation::credentials(identifier, secret).is_err() {
            warn!(identifier, "Authentication failed");
            return Err(AuthError::InvalidCredentials.into());
        }

        let credential = self.store.find_by_identifier(identifier).await.map_err(|e| {
            error!(identifier, "Credential lookup failed: {}", e);
            AppError::from(e)
        })?;

        let hasher = self.hasher.clone();
        let secret = secret.to_string();
        let matched = tokio::task::spawn_blocking(move || match credential {
            Some(credential) => hasher.verify(&credential.secret_hash, &secret),
            None => hasher.verify_decoy(&secret),
        })
        .await
        .map_err(|e| AppError::InternalError(format!("verification task failed: {}", e)))?;

        if !matched {
            warn!(identifier, "Authentication failed");
            return Err(AuthError::InvalidCredentials.into());
        }

        debug!(identifier, "Authentication succeeded");
        Ok(Principal {
            identifier: identifier.to_string(),
        })
    }

    pub fn issue_token(&self, identifier: &str) -> Result<String, AppError> {
        self.tokens.issue(identifier).map_err(|e| {
            error!(identifier, "Failed to issue token: {}", e);
            e
        })
    }

    /// Authenticate, then mint a token for the principal.
    pub async fn login(&self, identifier: &str, secret: &str) -> Result<(Principal, String), AppError> {
        let principal = self.authenticate(identifier, secret).await?;
        let token = self.issue_token(&principal.identifier)?;
        Ok((principal, token))
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    async fn hash_secret(&self, secret: &str) -> Result<String, AppError> {
        let hasher = self.hasher.clone();
        let secret = secret.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&secret))
            .await
            .map_err(|e| AppError::InternalError(format!("hashing task failed: {}", e)))?
    }
}
