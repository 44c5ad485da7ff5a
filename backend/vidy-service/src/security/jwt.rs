/// JWT issuance and validation for Vidy
///
/// Access and refresh tokens are HS256 tokens signed with *different*
/// secrets, so a refresh token can never pass as an access token even if the
/// `token_type` claim were forged.
use crate::config::AuthConfig;
use crate::error::{AppError, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Claims carried by both token kinds
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
    /// Unique token id, makes every issued refresh token distinct
    pub jti: Uuid,
    pub token_type: TokenType,
    pub email: String,
    pub username: String,
}

/// Freshly issued access + refresh tokens
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(skip)]
    pub access_ttl_secs: i64,
    #[serde(skip)]
    pub refresh_ttl_secs: i64,
}

struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

impl KeyPair {
    fn from_secret(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }
}

/// Signing keys shared through application state
#[derive(Clone)]
pub struct JwtKeys {
    access: Arc<KeyPair>,
    refresh: Arc<KeyPair>,
}

impl JwtKeys {
    pub fn from_config(config: &AuthConfig) -> Self {
        Self {
            access: Arc::new(KeyPair::from_secret(
                &config.access_token_secret,
                config.access_token_ttl_secs,
            )),
            refresh: Arc::new(KeyPair::from_secret(
                &config.refresh_token_secret,
                config.refresh_token_ttl_secs,
            )),
        }
    }

    fn keys(&self, token_type: TokenType) -> &KeyPair {
        match token_type {
            TokenType::Access => &self.access,
            TokenType::Refresh => &self.refresh,
        }
    }

    pub fn issue(
        &self,
        token_type: TokenType,
        user_id: Uuid,
        email: &str,
        username: &str,
    ) -> Result<String> {
        let keys = self.keys(token_type);
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(keys.ttl_secs)).timestamp(),
            jti: Uuid::new_v4(),
            token_type,
            email: email.to_string(),
            username: username.to_string(),
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &keys.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    pub fn issue_pair(&self, user_id: Uuid, email: &str, username: &str) -> Result<TokenPair> {
        Ok(TokenPair {
            access_token: self.issue(TokenType::Access, user_id, email, username)?,
            refresh_token: self.issue(TokenType::Refresh, user_id, email, username)?,
            access_ttl_secs: self.access.ttl_secs,
            refresh_ttl_secs: self.refresh.ttl_secs,
        })
    }

    /// Verify signature, expiry and token kind
    pub fn validate(&self, token: &str, expected: TokenType) -> Result<Claims> {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.keys(expected).decoding, &validation)?;
        if data.claims.token_type != expected {
            return Err(AppError::Unauthorized("Invalid token".to_string()));
        }
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> JwtKeys {
        JwtKeys::from_config(&AuthConfig::default())
    }

    #[test]
    fn test_access_token_round_trip() {
        let keys = keys();
        let user_id = Uuid::new_v4();
        let token = keys
            .issue(TokenType::Access, user_id, "a@vidy.dev", "alice")
            .expect("sign");

        let claims = keys.validate(&token, TokenType::Access).expect("valid");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.token_type, TokenType::Access);
    }

    #[test]
    fn test_refresh_token_rejected_as_access() {
        let keys = keys();
        let pair = keys
            .issue_pair(Uuid::new_v4(), "a@vidy.dev", "alice")
            .expect("pair");

        assert!(keys.validate(&pair.refresh_token, TokenType::Access).is_err());
        assert!(keys.validate(&pair.access_token, TokenType::Refresh).is_err());
        assert!(keys.validate(&pair.refresh_token, TokenType::Refresh).is_ok());
    }

    #[test]
    fn test_refresh_tokens_are_unique() {
        let keys = keys();
        let user_id = Uuid::new_v4();
        let first = keys.issue(TokenType::Refresh, user_id, "a@vidy.dev", "alice").expect("sign");
        let second = keys.issue(TokenType::Refresh, user_id, "a@vidy.dev", "alice").expect("sign");
        assert_ne!(first, second);
    }

    #[test]
    fn test_expired_token_rejected() {
        let config = AuthConfig {
            access_token_ttl_secs: -60,
            ..AuthConfig::default()
        };
        let keys = JwtKeys::from_config(&config);
        let token = keys
            .issue(TokenType::Access, Uuid::new_v4(), "a@vidy.dev", "alice")
            .expect("sign");

        let err = keys.validate(&token, TokenType::Access).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(ref m) if m == "Token expired"));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let keys = keys();
        let token = keys
            .issue(TokenType::Access, Uuid::new_v4(), "a@vidy.dev", "alice")
            .expect("sign");
        let tampered = format!("{}x", token);
        assert!(keys.validate(&tampered, TokenType::Access).is_err());
    }
}
