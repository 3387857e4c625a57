/// User endpoints
///
/// # Endpoints
///
/// - `POST /users` - Create a user (admin only)
/// - `GET /users` - List users (admin only)
/// - `GET /users/:id` - Get a user (self or admin); embeds the user's tasks
/// - `PUT /users/:id` - Update a user (self or admin)
/// - `DELETE /users/:id` - Delete a user (admin only)
///
/// The outward representation never carries the password hash.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
    routes::{non_empty, validate_dto, Pagination},
    routes::tasks::TaskResponse,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskdeck_shared::{
    auth::{
        authorization::{require_admin, require_self_or_admin},
        password,
        principal::Principal,
    },
    models::{
        task::Task,
        user::{CreateUser, UpdateUser, User},
    },
};
use uuid::Uuid;
use validator::Validate;

/// Create user request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Username (unique)
    #[validate(length(max = 100, message = "Username must be at most 100 characters"))]
    pub username: String,

    /// Email address (unique)
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// First name
    #[validate(length(max = 100, message = "First name must be at most 100 characters"))]
    pub first_name: String,

    /// Last name
    #[validate(length(max = 100, message = "Last name must be at most 100 characters"))]
    pub last_name: String,

    /// Plaintext password (hashed before storage, never stored as-is)
    #[validate(length(max = 100, message = "Password must be at most 100 characters"))]
    pub password: String,

    /// Optional company reference
    pub company_id: Option<Uuid>,
}

/// Update user request
///
/// Fields present with a non-empty value overwrite the stored field;
/// absent or empty fields are left untouched.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    /// New first name
    #[validate(length(max = 100, message = "First name must be at most 100 characters"))]
    pub first_name: Option<String>,

    /// New last name
    #[validate(length(max = 100, message = "Last name must be at most 100 characters"))]
    pub last_name: Option<String>,
}

/// Outward representation of a user
///
/// Deliberately has no password field of any kind.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID
    pub id: Uuid,

    /// Username
    pub username: String,

    /// Email address
    pub email: Option<String>,

    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// Whether the user has the admin role
    pub is_admin: bool,

    /// Company the user belongs to
    pub company_id: Option<Uuid>,

    /// The user's tasks (populated on the detail endpoint only)
    #[serde(default)]
    pub tasks: Vec<TaskResponse>,

    /// Created at
    pub created_at: DateTime<Utc>,

    /// Updated at
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            is_admin: user.is_admin,
            company_id: user.company_id,
            tasks: Vec::new(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl UserResponse {
    /// Builds the detail representation with the user's tasks embedded
    pub fn with_tasks(user: User, tasks: Vec<Task>) -> Self {
        let mut response = Self::from(user);
        response.tasks = tasks.into_iter().map(TaskResponse::from).collect();
        response
    }
}

/// Delete user response
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteUserResponse {
    /// Whether the user was deleted
    pub deleted: bool,
}

/// Create user (admin only)
///
/// # Errors
///
/// - `400 Bad Request`: Missing fields or weak password
/// - `403 Forbidden`: Caller is not an admin
/// - `409 Conflict`: Username or email already exists
pub async fn create_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    require_admin(&principal)?;
    validate_dto(&req)?;

    let mut missing = Vec::new();
    if req.username.is_empty() {
        missing.push("username".to_string());
    }
    if req.email.as_deref().unwrap_or("").is_empty() {
        missing.push("email".to_string());
    }
    if req.first_name.is_empty() {
        missing.push("first_name".to_string());
    }
    if req.last_name.is_empty() {
        missing.push("last_name".to_string());
    }
    if req.password.is_empty() {
        missing.push("password".to_string());
    }
    if !missing.is_empty() {
        return Err(ApiError::MissingFields(missing));
    }

    password::validate_password_strength(&req.password).map_err(|e| {
        ApiError::Validation(vec![ValidationErrorDetail {
            field: "password".to_string(),
            message: e,
        }])
    })?;

    // Check-then-act; the unique constraints are the secondary guarantee
    let existing =
        User::find_by_username_or_email(&state.db, &req.username, req.email.as_deref()).await?;
    if existing.is_some() {
        return Err(ApiError::AlreadyExists("User already exists".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username,
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
            password_hash,
            company_id: req.company_id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// List users (admin only)
pub async fn list_users(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(pagination): Query<Pagination>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    require_admin(&principal)?;

    let users = User::list(&state.db, pagination.limit(), pagination.offset()).await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Get user by ID (self or admin)
///
/// Embeds the user's tasks in the response.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is neither the target user nor an admin
/// - `404 Not Found`: User doesn't exist
pub async fn get_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<UserResponse>> {
    require_self_or_admin(&principal, user_id)?;

    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let tasks = Task::list_all_by_owner(&state.db, user.id).await?;

    Ok(Json(UserResponse::with_tasks(user, tasks)))
}

/// Update user (self or admin)
///
/// # Errors
///
/// - `403 Forbidden`: Caller is neither the target user nor an admin
/// - `404 Not Found`: User doesn't exist
pub async fn update_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    require_self_or_admin(&principal, user_id)?;
    validate_dto(&req)?;

    let update = UpdateUser {
        first_name: non_empty(req.first_name),
        last_name: non_empty(req.last_name),
    };

    let user = User::update(&state.db, user_id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user.into()))
}

/// Delete user (admin only)
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not an admin
/// - `404 Not Found`: User doesn't exist
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<DeleteUserResponse>> {
    require_admin(&principal)?;

    let deleted = User::delete(&state.db, user_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    Ok(Json(DeleteUserResponse { deleted }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "jdoe".to_string(),
            email: Some("jdoe@example.com".to_string()),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            is_admin: false,
            company_id: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_user_response_has_no_password_field() {
        let response = UserResponse::from(user());
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["username"], "jdoe");
        assert!(json.get("password").is_none());
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_user_response_with_tasks() {
        use taskdeck_shared::models::task::{TaskPriority, TaskStatus};

        let u = user();
        let task = Task {
            id: Uuid::new_v4(),
            summary: Some("s".to_string()),
            description: Some("d".to_string()),
            status: TaskStatus::Todo,
            priority: TaskPriority::High,
            owner_id: Some(u.id),
            created_at: Utc::now(),
            updated_at: None,
        };

        let response = UserResponse::with_tasks(u, vec![task]);
        assert_eq!(response.tasks.len(), 1);
        assert_eq!(response.tasks[0].status, TaskStatus::Todo);
    }
}
