use anyhow::{Context, Result};
use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::settings::AuthSettings;
use crate::database::models::User;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64, // user id
    pub username: String,
    pub exp: usize,
}

pub fn hash_password(raw: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(raw.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

pub fn verify_password(stored_hash: &str, raw: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(raw.as_bytes(), &parsed)
        .is_ok()
}

pub fn issue_token(user: &User, settings: &AuthSettings) -> Result<String> {
    let exp = (Utc::now() + Duration::seconds(settings.token_ttl_secs)).timestamp() as usize;
    let claims = Claims {
        sub: user.id,
        username: user.username.clone(),
        exp,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.secret.as_bytes()),
    )
    .context("Failed to sign access token")
}

pub fn decode_token(token: &str, settings: &AuthSettings) -> Option<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .ok()
}

/// Pull the token out of an `Authorization: Bearer <JWT>` header value
pub fn bearer_token(header_value: &str) -> Option<&str> {
    header_value.strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_settings() -> AuthSettings {
        AuthSettings {
            secret: "test-secret".to_string(),
            token_ttl_secs: 3600,
        }
    }

    fn test_user() -> User {
        User {
            id: 7,
            username: "admin".to_string(),
            password_hash: String::new(),
            created_at: None,
        }
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("hunter2").unwrap();
        assert!(verify_password(&hash, "hunter2"));
        assert!(!verify_password(&hash, "hunter3"));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("not-a-phc-string", "hunter2"));
    }

    #[test]
    fn token_round_trip() {
        let settings = test_settings();
        let token = issue_token(&test_user(), &settings).unwrap();

        let claims = decode_token(&token, &settings).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.username, "admin");
    }

    #[test]
    fn token_rejected_with_wrong_secret() {
        let token = issue_token(&test_user(), &test_settings()).unwrap();

        let other = AuthSettings {
            secret: "different".to_string(),
            token_ttl_secs: 3600,
        };
        assert!(decode_token(&token, &other).is_none());
    }

    #[test]
    fn bearer_prefix_is_required() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("abc"), None);
    }
}
