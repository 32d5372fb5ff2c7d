//! Bearer credential issuance and verification.
//!
//! Tokens are HS256 JWTs carrying the user id and the premium flag. They are
//! verified without a database round trip, so the premium flag is only as
//! fresh as the last issued token; a new token is handed out on login and on
//! a successful premium purchase.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::ServerError;

/// Claims embedded in every issued token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub ispremiumuser: bool,
    pub iat: i64,
    pub exp: i64,
}

/// Signing configuration shared across handlers.
#[derive(Clone)]
pub struct Credentials {
    secret: String,
    ttl_minutes: i64,
}

impl Credentials {
    pub fn new(secret: impl Into<String>, ttl_minutes: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl_minutes,
        }
    }

    /// Issue a token for a user, stamping the current premium flag.
    pub fn issue(&self, user_id: &str, is_premium: bool) -> Result<String, ServerError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            ispremiumuser: is_premium,
            iat: now,
            exp: now + self.ttl_minutes * 60,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|error| {
            tracing::error!("token issuance failed: {error}");
            ServerError::Generic("token issuance failed".to_string())
        })
    }

    /// Verify a token's signature and expiry, returning its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, ServerError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map(|data| data.claims)
        .map_err(|_| ServerError::Unauthorized("invalid token".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_round_trips() {
        let credentials = Credentials::new("test-secret", 60);
        let token = credentials.issue("user-1", true).unwrap();
        let claims = credentials.verify(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert!(claims.ispremiumuser);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let issuer = Credentials::new("secret-a", 60);
        let verifier = Credentials::new("secret-b", 60);
        let token = issuer.issue("user-1", false).unwrap();
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let credentials = Credentials::new("test-secret", 60);
        let mut token = credentials.issue("user-1", false).unwrap();
        token.pop();
        token.push('A');
        assert!(credentials.verify(&token).is_err());
    }
}
