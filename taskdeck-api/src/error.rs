/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>` which automatically converts
/// to the appropriate status code with a JSON body.
///
/// # Taxonomy
///
/// | kind                | status |
/// |---------------------|--------|
/// | `MissingFields`     | 400    |
/// | `Validation`        | 400    |
/// | `Unauthenticated`   | 401    |
/// | `InvalidCredential` | 401    |
/// | `Forbidden`         | 403    |
/// | `NotFound`          | 404    |
/// | `AlreadyExists`     | 409    |
/// | `Internal`          | 500    |
///
/// Every kind is terminal for the current request; nothing is retried
/// internally. Bodies carry a human-readable detail string, never internal
/// stack information — `Internal` details are logged and replaced with a
/// generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Required fields are empty or absent (400)
    MissingFields(Vec<String>),

    /// Request DTO validation failed (400)
    Validation(Vec<ValidationErrorDetail>),

    /// No valid credential was presented (401)
    Unauthenticated(String),

    /// Credentials were presented but are wrong (401)
    InvalidCredential(String),

    /// The caller is authenticated but not allowed (403)
    Forbidden(String),

    /// The target resource does not exist (404)
    NotFound(String),

    /// A uniqueness constraint would be violated (409)
    AlreadyExists(String),

    /// Uncategorized failure (500)
    Internal(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "not_found", "forbidden")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::MissingFields(fields) => write!(f, "Missing fields: {}", fields.join(", ")),
            ApiError::Validation(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::Unauthenticated(msg) => write!(f, "Unauthenticated: {}", msg),
            ApiError::InvalidCredential(msg) => write!(f, "Invalid credential: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::AlreadyExists(msg) => write!(f, "Already exists: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// The status code this error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingFields(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated(_) | ApiError::InvalidCredential(_) => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::AlreadyExists(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (error_code, message, details) = match self {
            ApiError::MissingFields(fields) => (
                "missing_fields",
                format!("Missing fields: {}", fields.join(", ")),
                None,
            ),
            ApiError::Validation(errors) => (
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::Unauthenticated(msg) => ("unauthenticated", msg, None),
            ApiError::InvalidCredential(msg) => ("invalid_credential", msg, None),
            ApiError::Forbidden(msg) => ("forbidden", msg, None),
            ApiError::NotFound(msg) => ("not_found", msg, None),
            ApiError::AlreadyExists(msg) => ("already_exists", msg, None),
            ApiError::Internal(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to API errors
///
/// Uniqueness checks in the services are check-then-act; a concurrent
/// create can still trip the database constraint, which must surface as
/// `AlreadyExists` rather than a generic failure.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation() {
                    let what = match db_err.constraint() {
                        Some(c) if c.contains("username") || c.contains("email") => "User",
                        Some(c) if c.contains("companies") => "Company",
                        _ => "Resource",
                    };
                    return ApiError::AlreadyExists(format!("{} already exists", what));
                }

                ApiError::Internal(format!("Database error: {}", db_err))
            }
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

/// Convert authentication errors to API errors
///
/// Every authentication failure — missing header, malformed presentation,
/// bad signature, expired token, incomplete claims — is a 401.
impl From<taskdeck_shared::auth::principal::AuthError> for ApiError {
    fn from(err: taskdeck_shared::auth::principal::AuthError) -> Self {
        ApiError::Unauthenticated(err.to_string())
    }
}

/// Convert authorization errors to API errors
impl From<taskdeck_shared::auth::authorization::AccessError> for ApiError {
    fn from(err: taskdeck_shared::auth::authorization::AccessError) -> Self {
        use taskdeck_shared::auth::authorization::AccessError;

        match &err {
            AccessError::NotFound(_) => ApiError::NotFound(err.to_string()),
            AccessError::Forbidden(_) => ApiError::Forbidden(err.to_string()),
        }
    }
}

/// Convert token codec errors to API errors
impl From<taskdeck_shared::auth::jwt::JwtError> for ApiError {
    fn from(err: taskdeck_shared::auth::jwt::JwtError) -> Self {
        match err {
            taskdeck_shared::auth::jwt::JwtError::CreateError(msg) => ApiError::Internal(msg),
            other => ApiError::Unauthenticated(other.to_string()),
        }
    }
}

/// Convert password errors to API errors
impl From<taskdeck_shared::auth::password::PasswordError> for ApiError {
    fn from(err: taskdeck_shared::auth::password::PasswordError) -> Self {
        ApiError::Internal(format!("Password operation failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskdeck_shared::auth::authorization::AccessError;
    use taskdeck_shared::auth::principal::AuthError;

    #[test]
    fn test_error_display() {
        let err = ApiError::NotFound("Task not found".to_string());
        assert_eq!(err.to_string(), "Not found: Task not found");

        let err = ApiError::MissingFields(vec!["name".to_string(), "mode".to_string()]);
        assert_eq!(err.to_string(), "Missing fields: name, mode");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::MissingFields(vec![]).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Validation(vec![]).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthenticated("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::InvalidCredential("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::AlreadyExists("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_access_error_conversion() {
        let err: ApiError = AccessError::NotFound("Task").into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err: ApiError = AccessError::Forbidden("User is not owner of this task").into();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_auth_error_conversion_is_unauthenticated() {
        for err in [
            AuthError::MissingCredentials,
            AuthError::InvalidFormat("Expected Bearer token".into()),
            AuthError::InvalidToken("expired".into()),
            AuthError::MissingClaims,
        ] {
            let api_err: ApiError = err.into();
            assert_eq!(api_err.status_code(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
