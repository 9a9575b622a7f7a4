use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Login/registration payload. The password is opaque here; it is only
/// ever passed through to the identity store for hashing/verification.
#[derive(Debug, Clone, Deserialize)]
pub struct UserCredential {
    pub email: String,
    pub password: String,
}

/// JWT claims carried by every issued token.
///
/// The claim set is fixed in order and content (unique name, domain
/// marker, token id) so existing verifiers keep working; don't add or
/// reorder claims without versioning the verifiers too.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account email, doubling as the username.
    pub unique_name: String,
    /// Fixed domain marker, an opaque constant rather than user data.
    pub catalog: String,
    /// Fresh random token id, one per issued token.
    pub jti: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

/// Result of a successful login or registration. Never persisted; the
/// token is self-contained and re-verifiable by any holder of the
/// signing secret.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub authenticated: bool,
    pub token: String,
    pub expiration: DateTime<Utc>,
    pub message: String,
}
