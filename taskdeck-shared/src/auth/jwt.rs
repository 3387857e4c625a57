/// Token generation and validation module
///
/// This module provides the signed, time-limited identity tokens used for
/// TaskDeck authentication. Tokens are signed using HS256 (HMAC-SHA256) and
/// carry the caller's identity claims.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256)
/// - **Expiration**: Always present; 15 minutes by default, callers may
///   choose a longer window (the login flow issues 120-minute tokens)
/// - **Validation**: Signature and expiration checks; an expired token is
///   invalid regardless of signature validity
/// - **Secret Management**: The signing secret should be at least 32 bytes
///
/// There is no refresh or revocation mechanism: verification is stateless
/// (no server-side session store), which trades revocability for horizontal
/// scalability. Acceptable given the short default lifetime.
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::auth::jwt::{create_token, validate_token, Claims};
///
/// # fn example(user: &taskdeck_shared::models::user::User) -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "secret-key-at-least-32-bytes-long!!";
///
/// let claims = Claims::new(user);
/// let token = create_token(&claims, secret)?;
///
/// let validated = validate_token(&token, secret)?;
/// assert_eq!(validated.sub.as_deref(), Some(user.username.as_str()));
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::User;

/// Default token lifetime when the caller does not choose one
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 15;

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Token is malformed or its signature does not verify
    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// Identity claims carried by a token
///
/// # Claims
///
/// - `sub`: Subject (username)
/// - `id`: User ID
/// - `first_name` / `last_name`: Display identity
/// - `is_admin`: Role flag
/// - `iat` / `exp`: Issued-at and expiration (Unix timestamps)
///
/// `sub` and `id` are decoded as optional: a token signed before a claim
/// schema change can carry a valid signature but no identity, and the
/// principal resolver must be able to see that rather than receive a
/// half-built identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - username
    #[serde(default)]
    pub sub: Option<String>,

    /// User ID
    #[serde(default)]
    pub id: Option<Uuid>,

    /// First name
    #[serde(default)]
    pub first_name: String,

    /// Last name
    #[serde(default)]
    pub last_name: String,

    /// Whether the user has the admin role
    #[serde(default)]
    pub is_admin: bool,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims for a user with the default 15-minute expiration
    pub fn new(user: &User) -> Self {
        Self::with_expiration(user, Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES))
    }

    /// Creates claims for a user with a caller-chosen expiration window
    ///
    /// # Example
    ///
    /// ```no_run
    /// use taskdeck_shared::auth::jwt::Claims;
    /// use chrono::Duration;
    ///
    /// # fn example(user: &taskdeck_shared::models::user::User) {
    /// // The login flow issues 120-minute tokens
    /// let claims = Claims::with_expiration(user, Duration::minutes(120));
    /// # }
    /// ```
    pub fn with_expiration(user: &User, expires_in: Duration) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: Some(user.username.clone()),
            id: Some(user.id),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            is_admin: user.is_admin,
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Creates a signed token from claims
///
/// Signs the token using HS256 with the provided secret.
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a token and extracts its claims
///
/// Verifies:
/// - Signature is valid
/// - Token hasn't expired
///
/// # Errors
///
/// - `JwtError::Expired` if `exp` is in the past (even with a correct
///   signature)
/// - `JwtError::Invalid` if the signature mismatches or the token is
///   malformed
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::Invalid(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::User;
    use chrono::{DateTime, Utc};

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn test_user(is_admin: bool) -> User {
        User {
            id: Uuid::new_v4(),
            username: "jdoe".to_string(),
            email: Some("jdoe@example.com".to_string()),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            password_hash: "$argon2id$irrelevant".to_string(),
            is_admin,
            company_id: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_claims_creation() {
        let user = test_user(true);
        let claims = Claims::new(&user);

        assert_eq!(claims.sub.as_deref(), Some("jdoe"));
        assert_eq!(claims.id, Some(user.id));
        assert_eq!(claims.first_name, "John");
        assert_eq!(claims.last_name, "Doe");
        assert!(claims.is_admin);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_claims_default_expiration() {
        let claims = Claims::new(&test_user(false));

        let lifetime = claims.exp - claims.iat;
        assert_eq!(lifetime, DEFAULT_TOKEN_TTL_MINUTES * 60);
    }

    #[test]
    fn test_claims_with_custom_expiration() {
        let claims = Claims::with_expiration(&test_user(false), Duration::minutes(120));

        let lifetime = claims.exp - claims.iat;
        assert_eq!(lifetime, 120 * 60);
    }

    #[test]
    fn test_create_and_validate_roundtrip() {
        let user = test_user(false);
        let claims = Claims::new(&user);
        let token = create_token(&claims, SECRET).expect("Should create token");

        let validated = validate_token(&token, SECRET).expect("Should validate token");
        assert_eq!(validated.sub.as_deref(), Some("jdoe"));
        assert_eq!(validated.id, Some(user.id));
        assert_eq!(validated.first_name, "John");
        assert_eq!(validated.last_name, "Doe");
        assert!(!validated.is_admin);
        assert_eq!(validated.exp, claims.exp);
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let claims = Claims::new(&test_user(false));
        let token = create_token(&claims, SECRET).expect("Should create token");

        let result = validate_token(&token, "a-different-secret-also-32-bytes-long");
        assert!(matches!(result, Err(JwtError::Invalid(_))));
    }

    #[test]
    fn test_validate_expired_token() {
        // Expired an hour ago; signature is still correct
        let claims = Claims::with_expiration(&test_user(false), Duration::hours(-1));
        assert!(claims.is_expired());

        let token = create_token(&claims, SECRET).expect("Should create token");
        let result = validate_token(&token, SECRET);

        assert!(matches!(result, Err(JwtError::Expired)));
    }

    #[test]
    fn test_validate_garbage_token() {
        let result = validate_token("not.a.token", SECRET);
        assert!(matches!(result, Err(JwtError::Invalid(_))));
    }

    #[test]
    fn test_signed_token_without_identity_claims_decodes() {
        // A valid signature does not guarantee identity claims are present.
        // The codec surfaces them as None; rejecting is the resolver's job.
        let now: DateTime<Utc> = Utc::now();
        let claims = Claims {
            sub: None,
            id: None,
            first_name: String::new(),
            last_name: String::new(),
            is_admin: false,
            iat: now.timestamp(),
            exp: (now + Duration::minutes(15)).timestamp(),
        };

        let token = create_token(&claims, SECRET).expect("Should create token");
        let validated = validate_token(&token, SECRET).expect("Signature is valid");

        assert!(validated.sub.is_none());
        assert!(validated.id.is_none());
    }
}
