//! JWT issuance and validation.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

/// Token claims: account id as the subject plus the usual timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Encodes and validates bearer tokens with a shared HS256 secret.
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_hours: i64,
}

impl JwtManager {
    pub fn new(secret: &str, expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry_hours,
        }
    }

    /// Issue a token for the given account.
    pub fn generate(
        &self,
        account_id: Uuid,
        email: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            sub: account_id,
            email: email.to_string(),
            iat: now.unix_timestamp(),
            exp: (now + Duration::hours(self.expiry_hours)).unix_timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
    }

    /// Validate a token and return its claims. Expired or tampered tokens
    /// are rejected.
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trips_claims() {
        let manager = JwtManager::new("test-secret", 24);
        let account_id = Uuid::new_v4();

        let token = manager.generate(account_id, "user@example.com").unwrap();
        let claims = manager.verify(&token).unwrap();

        assert_eq!(claims.sub, account_id);
        assert_eq!(claims.email, "user@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let issuer = JwtManager::new("secret-a", 24);
        let verifier = JwtManager::new("secret-b", 24);

        let token = issuer.generate(Uuid::new_v4(), "user@example.com").unwrap();
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        // Negative expiry puts `exp` in the past.
        let manager = JwtManager::new("test-secret", -1);

        let token = manager.generate(Uuid::new_v4(), "user@example.com").unwrap();
        assert!(manager.verify(&token).is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        let manager = JwtManager::new("test-secret", 24);
        assert!(manager.verify("not.a.token").is_err());
        assert!(manager.verify("").is_err());
    }
}
