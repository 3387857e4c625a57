/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /auth/login` - Login with username + password, get a bearer token
///
/// Login is the only flow that issues tokens; there is no registration
/// endpoint (users are created by admins) and no refresh mechanism —
/// tokens are valid until natural expiry.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Form, Json};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use taskdeck_shared::{
    auth::{jwt, password},
    models::user::User,
};

/// Token lifetime issued by the login flow
const LOGIN_TOKEN_TTL_MINUTES: i64 = 120;

/// Login request (form-encoded)
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    /// Username
    pub username: String,

    /// Plaintext password
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Signed bearer token (120 minutes)
    pub access_token: String,

    /// Always "bearer"
    pub token_type: String,
}

/// Login endpoint
///
/// Authenticates a user and returns a bearer token.
///
/// # Endpoint
///
/// ```text
/// POST /auth/login
/// Content-Type: application/x-www-form-urlencoded
///
/// username=jdoe&password=Password1
/// ```
///
/// # Response
///
/// `201 Created` with:
///
/// ```json
/// {
///   "access_token": "eyJ...",
///   "token_type": "bearer"
/// }
/// ```
///
/// # Errors
///
/// - `404 Not Found`: Unknown username
/// - `401 Unauthorized`: Wrong password
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> ApiResult<(StatusCode, Json<LoginResponse>)> {
    let user = User::find_by_username(&state.db, &form.username)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if !password::verify_password(&form.password, &user.password_hash) {
        return Err(ApiError::InvalidCredential("Invalid credential".to_string()));
    }

    let claims = jwt::Claims::with_expiration(&user, Duration::minutes(LOGIN_TOKEN_TTL_MINUTES));
    let access_token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok((
        StatusCode::CREATED,
        Json(LoginResponse {
            access_token,
            token_type: "bearer".to_string(),
        }),
    ))
}
