use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;

/// JWT claims carried by every authenticated request. Tokens are minted by
/// the external identity service; this service only validates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: Uuid,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

#[derive(Clone)]
pub struct JwtValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtValidator {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
        }
    }

    pub fn validate(&self, token: &str) -> Result<Claims, AppError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }
}

/// Issue a token for a user id. Used by tests and local tooling; production
/// tokens come from the identity service.
pub fn issue_token(secret: &str, user_id: Uuid, ttl_seconds: i64) -> Result<String, AppError> {
    let claims = Claims {
        sub: user_id,
        exp: chrono::Utc::now().timestamp() + ttl_seconds,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn extract_bearer_token(auth_header: &str) -> Result<&str, AppError> {
    auth_header
        .strip_prefix("Bearer ")
        .ok_or(AppError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_issued_token() {
        let user_id = Uuid::new_v4();
        let token = issue_token("test-secret", user_id, 3600).unwrap();
        let claims = JwtValidator::new("test-secret").validate(&token).unwrap();
        assert_eq!(claims.sub, user_id);
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let token = issue_token("secret-a", Uuid::new_v4(), 3600).unwrap();
        assert!(JwtValidator::new("secret-b").validate(&token).is_err());
    }

    #[test]
    fn rejects_expired_token() {
        let token = issue_token("test-secret", Uuid::new_v4(), -3600).unwrap();
        assert!(JwtValidator::new("test-secret").validate(&token).is_err());
    }

    #[test]
    fn bearer_prefix_is_required() {
        assert!(extract_bearer_token("Token abc").is_err());
        assert_eq!(extract_bearer_token("Bearer abc").unwrap(), "abc");
    }
}
