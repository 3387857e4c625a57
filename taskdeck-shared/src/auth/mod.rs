/// Authentication and authorization utilities
///
/// This module provides the security primitives for TaskDeck:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Signed, time-limited identity tokens (HS256)
/// - [`principal`]: Per-request caller identity derived from a verified token
/// - [`authorization`]: Per-entity allow/deny predicates (admin vs. owner)
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with a random per-password salt
/// - **Tokens**: HS256 signing, absolute expiry on every token, stateless
///   verification (no server-side session store)
/// - **Constant-time Comparison**: Password verification uses the argon2
///   verifier's constant-time comparison
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::auth::password::{hash_password, verify_password};
/// use taskdeck_shared::auth::jwt::{create_token, Claims};
///
/// # fn example(user: &taskdeck_shared::models::user::User) -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash));
///
/// let claims = Claims::new(user);
/// let token = create_token(&claims, "secret-key-at-least-32-bytes-long!!")?;
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod password;
pub mod principal;
