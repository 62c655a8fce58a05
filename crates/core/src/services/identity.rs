//! Identity resolver.
//!
//! Maps an opaque session credential issued by the external identity
//! provider to an internal user record. The provider and the internal
//! user table are provisioned independently, so "valid credential, no
//! internal row" is a real state and surfaces as its own error.

use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use servihub_common::{AppError, AppResult};
use servihub_db::{entities::user, repositories::UserRepository};

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// External identity id assigned by the provider.
    pub sub: String,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
    /// Issuer.
    pub iss: String,
    /// Audience, if the provider sets one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

/// Verifies an opaque session credential and yields its claims.
///
/// The production implementation checks the provider's JWT signature;
/// tests substitute their own.
pub trait SessionVerifier: Send + Sync {
    /// Verify a session token. Any failure is `Unauthenticated`.
    fn verify(&self, token: &str) -> AppResult<SessionClaims>;
}

/// Session verifier for the provider's HS256-signed session JWTs.
///
/// Verification is networkless: signature, expiry, issuer and optional
/// audience are all checked locally against the shared secret.
pub struct JwtSessionVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtSessionVerifier {
    /// Create a verifier for the given issuer/secret pair.
    #[must_use]
    pub fn new(issuer: &str, audience: Option<&str>, secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[issuer]);
        match audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Create a verifier from the identity section of the configuration.
    #[must_use]
    pub fn from_config(config: &servihub_common::config::IdentityConfig) -> Self {
        Self::new(
            &config.issuer,
            config.audience.as_deref(),
            &config.session_secret,
        )
    }
}

impl SessionVerifier for JwtSessionVerifier {
    fn verify(&self, token: &str) -> AppResult<SessionClaims> {
        jsonwebtoken::decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Session token verification failed");
                AppError::Unauthenticated
            })
    }
}

/// Resolves session credentials to internal users.
#[derive(Clone)]
pub struct IdentityService {
    user_repo: UserRepository,
    verifier: Arc<dyn SessionVerifier>,
}

impl IdentityService {
    /// Create a new identity service.
    #[must_use]
    pub fn new(user_repo: UserRepository, verifier: Arc<dyn SessionVerifier>) -> Self {
        Self {
            user_repo,
            verifier,
        }
    }

    /// Resolve a bearer session token to the internal user it acts as.
    ///
    /// Fails with `Unauthenticated` when the token does not verify, and
    /// `AccountNotProvisioned` when the external identity has no
    /// internal user row.
    pub async fn resolve(&self, token: &str) -> AppResult<user::Model> {
        let claims = self.verifier.verify(token)?;

        self.user_repo
            .find_by_external_id(&claims.sub)
            .await?
            .ok_or(AppError::AccountNotProvisioned)
    }
}
