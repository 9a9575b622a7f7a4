use anyhow::{bail, Context, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use catalog_common::models::auth::{Claims, IssuedToken};

use crate::config::AuthConfig;

/// Fixed domain-marker claim carried by every token. An opaque
/// constant, never user data; verifiers key on its presence.
pub const DOMAIN_MARKER: &str = "product-catalog";

/// HS256 wants at least as many key bytes as the digest is wide.
const MIN_SECRET_BYTES: usize = 32;

/// Hash a password using argon2id
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("Invalid password hash: {}", e))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Builds signed, self-contained bearer tokens. Constructed once at
/// startup from configuration; construction fails fast on a secret
/// too short for HS256 instead of failing at the first request.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
    expire_hours: i64,
}

impl TokenIssuer {
    pub fn from_config(config: &AuthConfig) -> Result<Self> {
        let secret = config.jwt_secret.as_bytes();
        if secret.len() < MIN_SECRET_BYTES {
            bail!(
                "jwt_secret must be at least {} bytes, got {}",
                MIN_SECRET_BYTES,
                secret.len()
            );
        }
        if config.token_expire_hours < 1 {
            bail!("token_expire_hours must be at least 1");
        }
        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            expire_hours: config.token_expire_hours,
        })
    }

    /// Issue a token for a verified identity. The claim set is the
    /// stable triple (unique name, domain marker, fresh token id) plus
    /// issuer, audience, and timestamps.
    pub fn issue(&self, email: &str) -> Result<IssuedToken> {
        let now = Utc::now();
        let expiration = now + Duration::hours(self.expire_hours);
        let claims = Claims {
            unique_name: email.to_string(),
            catalog: DOMAIN_MARKER.to_string(),
            jti: Uuid::new_v4().to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };
        let token = jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .context("Failed to sign token")?;
        Ok(IssuedToken {
            authenticated: true,
            token,
            expiration,
            message: "Token OK".to_string(),
        })
    }

    /// Verify a presented token: signature, expiry, issuer, and
    /// audience must all check out against the shared parameters.
    pub fn decode(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &validation)
            .context("Invalid token")?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "0123456789abcdef0123456789abcdef".to_string(),
            issuer: "catalog-server".to_string(),
            audience: "catalog-clients".to_string(),
            token_expire_hours: 2,
        }
    }

    #[test]
    fn test_password_hash_and_verify_correct() {
        let password = "my-secure-password";
        let hash = hash_password(password).unwrap();
        assert!(verify_password(password, &hash).unwrap());
    }

    #[test]
    fn test_password_verify_wrong() {
        let hash = hash_password("correct-password").unwrap();
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn test_password_different_salts() {
        let password = "same-password";
        let hash1 = hash_password(password).unwrap();
        let hash2 = hash_password(password).unwrap();
        assert_ne!(hash1, hash2);
        // Both still verify
        assert!(verify_password(password, &hash1).unwrap());
        assert!(verify_password(password, &hash2).unwrap());
    }

    #[test]
    fn test_issue_and_decode_roundtrip() {
        let issuer = TokenIssuer::from_config(&test_config()).unwrap();
        let issued = issuer.issue("user@example.com").unwrap();

        assert!(issued.authenticated);
        let claims = issuer.decode(&issued.token).unwrap();
        assert_eq!(claims.unique_name, "user@example.com");
        assert_eq!(claims.catalog, DOMAIN_MARKER);
        assert_eq!(claims.iss, "catalog-server");
        assert_eq!(claims.aud, "catalog-clients");
    }

    #[test]
    fn test_token_is_three_part_compact_form() {
        let issuer = TokenIssuer::from_config(&test_config()).unwrap();
        let issued = issuer.issue("user@example.com").unwrap();
        assert_eq!(issued.token.split('.').count(), 3);
    }

    #[test]
    fn test_expiration_matches_configured_offset() {
        let issuer = TokenIssuer::from_config(&test_config()).unwrap();
        let before = Utc::now();
        let issued = issuer.issue("user@example.com").unwrap();

        assert!(issued.expiration > before);
        let offset = issued.expiration - before;
        assert!(offset <= Duration::hours(2));
        assert!(offset > Duration::hours(2) - Duration::minutes(1));
    }

    #[test]
    fn test_token_ids_are_unique() {
        let issuer = TokenIssuer::from_config(&test_config()).unwrap();
        let a = issuer.issue("user@example.com").unwrap();
        let b = issuer.issue("user@example.com").unwrap();
        let claims_a = issuer.decode(&a.token).unwrap();
        let claims_b = issuer.decode(&b.token).unwrap();
        assert_ne!(claims_a.jti, claims_b.jti);
    }

    #[test]
    fn test_wrong_secret_fails() {
        let issuer = TokenIssuer::from_config(&test_config()).unwrap();
        let mut other_config = test_config();
        other_config.jwt_secret = "another-secret-another-secret-32b!".to_string();
        let other = TokenIssuer::from_config(&other_config).unwrap();

        let issued = issuer.issue("user@example.com").unwrap();
        assert!(other.decode(&issued.token).is_err());
    }

    #[test]
    fn test_wrong_audience_fails() {
        let issuer = TokenIssuer::from_config(&test_config()).unwrap();
        let mut other_config = test_config();
        other_config.audience = "someone-else".to_string();
        let other = TokenIssuer::from_config(&other_config).unwrap();

        let issued = issuer.issue("user@example.com").unwrap();
        assert!(other.decode(&issued.token).is_err());
    }

    #[test]
    fn test_short_secret_is_rejected_at_construction() {
        let mut config = test_config();
        config.jwt_secret = "too-short".to_string();
        assert!(TokenIssuer::from_config(&config).is_err());
    }

    #[test]
    fn test_nonpositive_expiry_is_rejected_at_construction() {
        let mut config = test_config();
        config.token_expire_hours = 0;
        assert!(TokenIssuer::from_config(&config).is_err());
    }
}
