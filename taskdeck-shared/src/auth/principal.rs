/// Principal resolution
///
/// A [`Principal`] is the authenticated caller's identity for the duration
/// of one request. It is reconstructed from a verified token on every
/// request and never persisted or mutated.
///
/// Resolution fails with [`AuthError`] when the token codec rejects the
/// token, and also when the token's signature is valid but its identity
/// claims (`id`, `sub`) are missing — a defense against malformed-but-signed
/// tokens, e.g. ones issued before a claim schema change.
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::auth::principal::resolve_principal;
///
/// # fn example(token: &str) -> Result<(), Box<dyn std::error::Error>> {
/// let principal = resolve_principal(token, "secret-key-at-least-32-bytes-long!!")?;
/// println!("request from {} (admin: {})", principal.username, principal.is_admin);
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::{validate_token, Claims, JwtError};

/// Error type for authentication failures
///
/// Every variant maps to a 401 at the HTTP boundary: the caller is not
/// authenticated, whatever the precise reason.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No bearer credential was presented
    #[error("Missing credentials")]
    MissingCredentials,

    /// The Authorization header was present but not a bearer token
    #[error("Invalid authorization header: {0}")]
    InvalidFormat(String),

    /// The token failed signature or expiry validation
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// The signature verified but the identity claims are incomplete
    #[error("Token is missing identity claims")]
    MissingClaims,
}

/// The authenticated caller's identity and role
///
/// Constructed fresh per request from verified token claims and discarded
/// when the request completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    /// User ID
    pub id: Uuid,

    /// Username (the token's subject)
    pub username: String,

    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// Whether the caller has the admin role
    pub is_admin: bool,
}

impl Principal {
    /// Builds a principal from verified claims
    ///
    /// Fails with [`AuthError::MissingClaims`] when `id` or `sub` is
    /// absent, even though the signature already verified.
    pub fn from_claims(claims: Claims) -> Result<Self, AuthError> {
        let id = claims.id.ok_or(AuthError::MissingClaims)?;
        let username = claims.sub.ok_or(AuthError::MissingClaims)?;

        Ok(Self {
            id,
            username,
            first_name: claims.first_name,
            last_name: claims.last_name,
            is_admin: claims.is_admin,
        })
    }
}

/// Resolves a caller identity from a token string
///
/// Pure function of the token, the server secret, and the current time.
///
/// # Errors
///
/// - [`AuthError::InvalidToken`] if the codec rejects the token
///   (bad signature, malformed, or expired)
/// - [`AuthError::MissingClaims`] if the signature is valid but `id` or
///   `sub` is absent
pub fn resolve_principal(token: &str, secret: &str) -> Result<Principal, AuthError> {
    let claims = validate_token(token, secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        other => AuthError::InvalidToken(other.to_string()),
    })?;

    Principal::from_claims(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::{create_token, Claims};
    use crate::models::user::User;
    use chrono::{Duration, Utc};

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "jdoe".to_string(),
            email: Some("jdoe@example.com".to_string()),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            password_hash: "$argon2id$irrelevant".to_string(),
            is_admin: false,
            company_id: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn bare_claims() -> Claims {
        let now = Utc::now();
        Claims {
            sub: None,
            id: None,
            first_name: String::new(),
            last_name: String::new(),
            is_admin: false,
            iat: now.timestamp(),
            exp: (now + Duration::minutes(15)).timestamp(),
        }
    }

    #[test]
    fn test_resolve_valid_token() {
        let user = test_user();
        let token = create_token(&Claims::new(&user), SECRET).unwrap();

        let principal = resolve_principal(&token, SECRET).expect("Should resolve");

        assert_eq!(principal.id, user.id);
        assert_eq!(principal.username, "jdoe");
        assert_eq!(principal.first_name, "John");
        assert!(!principal.is_admin);
    }

    #[test]
    fn test_resolve_expired_token() {
        let user = test_user();
        let claims = Claims::with_expiration(&user, Duration::hours(-1));
        let token = create_token(&claims, SECRET).unwrap();

        let result = resolve_principal(&token, SECRET);
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_resolve_wrong_secret() {
        let token = create_token(&Claims::new(&test_user()), SECRET).unwrap();

        let result = resolve_principal(&token, "another-secret-that-is-32-bytes-long!");
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_resolve_signed_token_missing_id() {
        let mut claims = bare_claims();
        claims.sub = Some("jdoe".to_string());
        let token = create_token(&claims, SECRET).unwrap();

        // Signature verifies, identity does not
        let result = resolve_principal(&token, SECRET);
        assert!(matches!(result, Err(AuthError::MissingClaims)));
    }

    #[test]
    fn test_resolve_signed_token_missing_sub() {
        let mut claims = bare_claims();
        claims.id = Some(Uuid::new_v4());
        let token = create_token(&claims, SECRET).unwrap();

        let result = resolve_principal(&token, SECRET);
        assert!(matches!(result, Err(AuthError::MissingClaims)));
    }

    #[test]
    fn test_resolve_garbage_token() {
        let result = resolve_principal("garbage", SECRET);
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }
}
