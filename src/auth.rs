// ABOUTME: JWT access/refresh token issuance and validation plus bcrypt password hashing
// ABOUTME: HS256 tokens carry the user id, a token type, and a unique id per issue
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

//! # Authentication
//!
//! Every login path ends in [`AuthManager::issue_token_pair`]: a short-lived
//! access token for API calls and a longer-lived refresh token that can only
//! be exchanged for a new pair. Validation reports expiry, malformed input,
//! bad signatures, and token-type confusion as distinct errors.

use std::fmt::{Display, Formatter, Result as FmtResult};

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::task;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::constants::service_names::TOKEN_ISSUER;
use crate::errors::{AppError, AppResult};
use crate::models::User;

/// Which half of a token pair a `JWT` is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Presented on API calls
    Access,
    /// Exchanged for a new pair
    Refresh,
}

impl TokenType {
    /// Claim value
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }
}

impl Display for TokenType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// `JWT` validation error with detailed information
#[derive(Debug, Clone, Error)]
pub enum JwtValidationError {
    /// Token has expired
    #[error("JWT token expired at {}", expired_at.format("%Y-%m-%d %H:%M:%S UTC"))]
    TokenExpired {
        /// When the token expired
        expired_at: DateTime<Utc>,
    },
    /// Token signature or claims are invalid
    #[error("JWT token is invalid: {reason}")]
    TokenInvalid {
        /// Reason for invalidity
        reason: String,
    },
    /// Token is not a well-formed `JWT`
    #[error("JWT token is malformed: {details}")]
    TokenMalformed {
        /// Details about malformation
        details: String,
    },
    /// A valid token of the other type
    #[error("Expected a {expected} token but received a {actual} token")]
    WrongTokenType {
        /// Type the caller required
        expected: TokenType,
        /// Type carried by the token
        actual: TokenType,
    },
}

impl From<JwtValidationError> for AppError {
    fn from(error: JwtValidationError) -> Self {
        match error {
            JwtValidationError::TokenExpired { .. } => Self::auth_expired(),
            JwtValidationError::TokenMalformed { .. } => Self::auth_malformed(error.to_string()),
            JwtValidationError::TokenInvalid { .. } | JwtValidationError::WrongTokenType { .. } => {
                Self::auth_invalid(error.to_string())
            }
        }
    }
}

/// `JWT` claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User `ID`
    pub sub: String,
    /// User email
    pub email: String,
    /// Issued at, seconds since the epoch
    pub iat: i64,
    /// Expiration, seconds since the epoch
    pub exp: i64,
    /// Unique token id
    pub jti: String,
    /// Token type
    pub typ: TokenType,
    /// Issuer
    pub iss: String,
}

impl Claims {
    /// The user id carried in `sub`
    ///
    /// # Errors
    ///
    /// Returns `AUTH_MALFORMED` when `sub` is not a UUID
    pub fn user_id(&self) -> AppResult<Uuid> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| AppError::auth_malformed("Token subject is not a user id"))
    }
}

/// Access and refresh tokens issued together
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    /// Access token
    pub access: String,
    /// Refresh token
    pub refresh: String,
}

/// Authentication manager for `JWT` tokens and password hashes
#[derive(Clone)]
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
    bcrypt_cost: u32,
}

impl AuthManager {
    /// Create a manager from a signing secret and token lifetimes
    #[must_use]
    pub fn new(secret: &[u8], access_ttl: Duration, refresh_ttl: Duration, bcrypt_cost: u32) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            access_ttl,
            refresh_ttl,
            bcrypt_cost,
        }
    }

    /// Create a manager from configuration, generating a secret when none is set
    #[must_use]
    pub fn from_config(config: &AuthConfig) -> Self {
        let access_ttl = Duration::minutes(config.access_ttl_minutes);
        let refresh_ttl = Duration::days(config.refresh_ttl_days);
        match &config.jwt_secret {
            Some(secret) => Self::new(secret.as_bytes(), access_ttl, refresh_ttl, config.bcrypt_cost),
            None => Self::new(
                &generate_jwt_secret(),
                access_ttl,
                refresh_ttl,
                config.bcrypt_cost,
            ),
        }
    }

    /// Issue an access token and a refresh token for a user
    ///
    /// # Errors
    ///
    /// Returns an internal error if encoding fails
    pub fn issue_token_pair(&self, user: &User) -> AppResult<TokenPair> {
        Ok(TokenPair {
            access: self.generate_token(user, TokenType::Access)?,
            refresh: self.generate_token(user, TokenType::Refresh)?,
        })
    }

    /// Issue one token of the given type
    ///
    /// # Errors
    ///
    /// Returns an internal error if encoding fails
    pub fn generate_token(&self, user: &User, token_type: TokenType) -> AppResult<String> {
        let now = Utc::now();
        let ttl = match token_type {
            TokenType::Access => self.access_ttl,
            TokenType::Refresh => self.refresh_ttl,
        };

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
            typ: token_type,
            iss: TOKEN_ISSUER.to_owned(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))
    }

    /// Validate a token and require the given type
    ///
    /// # Errors
    ///
    /// Returns a [`JwtValidationError`] describing why the token was rejected
    pub fn validate_token(
        &self,
        token: &str,
        expected: TokenType,
    ) -> Result<Claims, JwtValidationError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked below so the error can carry the expiry time
        validation.validate_exp = false;
        validation.set_issuer(&[TOKEN_ISSUER]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| Self::convert_jwt_error(&e))?;

        let now = Utc::now();
        if now.timestamp() > claims.exp {
            let expired_at = DateTime::from_timestamp(claims.exp, 0).unwrap_or(now);
            warn!(user_id = %claims.sub, expired_at = %expired_at, "JWT token expired");
            return Err(JwtValidationError::TokenExpired { expired_at });
        }

        if claims.typ != expected {
            warn!(user_id = %claims.sub, expected = %expected, actual = %claims.typ, "Wrong token type");
            return Err(JwtValidationError::WrongTokenType {
                expected,
                actual: claims.typ,
            });
        }

        debug!(user_id = %claims.sub, token_type = %claims.typ, "JWT token validated");
        Ok(claims)
    }

    fn convert_jwt_error(e: &JwtError) -> JwtValidationError {
        warn!("JWT token validation failed: {e}");
        match e.kind() {
            ErrorKind::InvalidSignature => JwtValidationError::TokenInvalid {
                reason: "Token signature verification failed".to_owned(),
            },
            ErrorKind::InvalidToken => JwtValidationError::TokenMalformed {
                details: "Token format is invalid".to_owned(),
            },
            ErrorKind::Base64(err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid base64: {err}"),
            },
            ErrorKind::Json(err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid JSON: {err}"),
            },
            ErrorKind::Utf8(err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid UTF-8: {err}"),
            },
            _ => JwtValidationError::TokenInvalid {
                reason: format!("Token validation failed: {e}"),
            },
        }
    }

    /// Hash a password on the blocking pool
    ///
    /// # Errors
    ///
    /// Returns an internal error if hashing fails
    pub async fn hash_password(&self, password: &str) -> AppResult<String> {
        let password = password.to_owned();
        let cost = self.bcrypt_cost;
        task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AppError::internal(format!("Password hashing task failed: {e}")))?
            .map_err(|e| AppError::internal(format!("Password hashing error: {e}")))
    }

    /// Check a password against a stored hash on the blocking pool
    ///
    /// # Errors
    ///
    /// Returns an internal error if the hash cannot be checked
    pub async fn verify_password(&self, password: &str, password_hash: &str) -> AppResult<bool> {
        let password = password.to_owned();
        let password_hash = password_hash.to_owned();
        task::spawn_blocking(move || bcrypt::verify(password, &password_hash))
            .await
            .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))?
            .map_err(|e| AppError::internal(format!("Password verification error: {e}")))
    }
}

/// Generate a random 64-byte `JWT` secret
#[must_use]
pub fn generate_jwt_secret() -> [u8; 64] {
    let mut secret = [0u8; 64];
    OsRng.fill_bytes(&mut secret);
    secret
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    fn manager(access_ttl: Duration) -> AuthManager {
        AuthManager::new(b"test-secret", access_ttl, Duration::days(7), 4)
    }

    fn user() -> User {
        User::new("jane@example.com".to_owned(), "jane".to_owned(), None)
    }

    #[test]
    fn test_access_token_validates() {
        let manager = manager(Duration::minutes(60));
        let user = user();
        let pair = manager.issue_token_pair(&user).unwrap();

        let claims = manager.validate_token(&pair.access, TokenType::Access).unwrap();
        assert_eq!(claims.user_id().unwrap(), user.id);
        assert_eq!(claims.email, "jane@example.com");
        assert_ne!(pair.access, pair.refresh);
    }

    #[test]
    fn test_token_types_are_not_interchangeable() {
        let manager = manager(Duration::minutes(60));
        let pair = manager.issue_token_pair(&user()).unwrap();

        let err = manager
            .validate_token(&pair.refresh, TokenType::Access)
            .unwrap_err();
        assert!(matches!(err, JwtValidationError::WrongTokenType { .. }));

        let err = manager
            .validate_token(&pair.access, TokenType::Refresh)
            .unwrap_err();
        assert_eq!(AppError::from(err).code, ErrorCode::AuthInvalid);
    }

    #[test]
    fn test_expired_token_is_reported_as_expired() {
        let manager = manager(Duration::minutes(-5));
        let token = manager.generate_token(&user(), TokenType::Access).unwrap();

        let err = manager.validate_token(&token, TokenType::Access).unwrap_err();
        assert!(matches!(err, JwtValidationError::TokenExpired { .. }));
        assert_eq!(AppError::from(err).code, ErrorCode::AuthExpired);
    }

    #[test]
    fn test_foreign_signature_and_garbage_are_rejected() {
        let token = AuthManager::new(b"other-secret", Duration::minutes(5), Duration::days(1), 4)
            .generate_token(&user(), TokenType::Access)
            .unwrap();
        let err = manager(Duration::minutes(5))
            .validate_token(&token, TokenType::Access)
            .unwrap_err();
        assert!(matches!(err, JwtValidationError::TokenInvalid { .. }));

        let err = manager(Duration::minutes(5))
            .validate_token("not-a-jwt", TokenType::Access)
            .unwrap_err();
        assert_eq!(AppError::from(err).code, ErrorCode::AuthMalformed);
    }

    #[tokio::test]
    async fn test_password_hash_verifies() {
        let manager = manager(Duration::minutes(5));
        let hash = manager.hash_password("correct horse").await.unwrap();

        assert!(manager.verify_password("correct horse", &hash).await.unwrap());
        assert!(!manager.verify_password("wrong horse", &hash).await.unwrap());
    }

    #[test]
    fn test_generated_secrets_differ() {
        assert_ne!(generate_jwt_secret(), generate_jwt_secret());
    }
}
