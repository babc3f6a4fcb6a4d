//! # Authentication
//!
//! Bearer-token issuance and validation.
//!
//! The marketplace treats authentication as a thin collaborator: a token
//! names an identity and its role, nothing more. Tokens are HS256 JWTs
//! signed with the configured secret; verification yields an
//! [`AuthContext`] that handlers consult for self/admin gates.

use crate::domain::entities::identity::Identity;
use crate::domain::value_objects::{IdentityId, Role};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Banned identities cannot obtain tokens.
    #[error("identity {0} is banned")]
    Banned(IdentityId),

    /// Token could not be created.
    #[error("token creation failed: {0}")]
    TokenCreation(String),

    /// Token is missing, malformed, expired or has a bad signature.
    #[error("invalid token: {0}")]
    InvalidToken(String),
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::InvalidToken(err.to_string())
    }
}

/// JWT claims carried by a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Identity id the token was issued for.
    pub sub: String,
    /// Role at issuance time.
    pub role: Role,
    /// Issued-at, Unix seconds.
    pub iat: i64,
    /// Expiry, Unix seconds.
    pub exp: i64,
}

/// The caller's authenticated identity, as supplied by the token layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// Authenticated identity id.
    pub identity_id: IdentityId,
    /// Role carried by the token.
    pub role: Role,
}

impl AuthContext {
    /// Returns true if the caller holds moderation capability.
    #[inline]
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Returns true if the caller is the given identity.
    #[inline]
    #[must_use]
    pub fn is_self(&self, id: &IdentityId) -> bool {
        &self.identity_id == id
    }
}

/// Issues and validates bearer tokens.
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl_secs: i64,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    /// Creates a token service from the shared secret.
    #[must_use]
    pub fn new(secret: &str, token_ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_ttl_secs,
        }
    }

    /// Issues a bearer token for the identity.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Banned` for banned identities,
    /// `AuthError::TokenCreation` if signing fails.
    pub fn issue(&self, identity: &Identity) -> Result<String, AuthError> {
        if identity.is_banned() {
            return Err(AuthError::Banned(identity.id().clone()));
        }
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: identity.id().as_str().to_owned(),
            role: identity.role(),
            iat: now,
            exp: now + self.token_ttl_secs,
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenCreation(e.to_string()))
    }

    /// Validates a bearer token and returns the caller context.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` for malformed, expired or
    /// tampered tokens.
    pub fn verify(&self, token: &str) -> Result<AuthContext, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())?;
        Ok(AuthContext {
            identity_id: IdentityId::new(data.claims.sub),
            role: data.claims.role,
        })
    }
}
