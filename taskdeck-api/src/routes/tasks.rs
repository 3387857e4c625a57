/// Task endpoints
///
/// # Endpoints
///
/// - `POST /tasks` - Create a task (owner = caller; admins cannot create
///   tasks for others)
/// - `GET /tasks` - Admins list all tasks, ordinary users their own
/// - `GET /tasks/:id` - Admins read any task, owners their own
/// - `PUT /tasks/:id` - Owners update their own tasks (admins any)
/// - `DELETE /tasks/:id` - Owners delete their own tasks (admins any)
///
/// # Existence disclosure
///
/// The read path distinguishes 403 (exists, not yours) from 404 (absent).
/// The write paths fetch through an ownership-scoped query, so mutating an
/// existing foreign task also surfaces as 404. The asymmetry is a
/// deliberate contract: mutators are not told whether others' tasks exist.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::{non_empty, validate_dto, Pagination},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskdeck_shared::{
    auth::{authorization::require_task_access, principal::Principal},
    models::task::{CreateTask, Task, TaskPriority, TaskStatus, UpdateTask},
};
use uuid::Uuid;
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Short summary
    #[validate(length(max = 500, message = "Summary must be at most 500 characters"))]
    pub summary: Option<String>,

    /// Longer description
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    /// Workflow status (defaults to backlog)
    #[serde(default = "default_status")]
    pub status: TaskStatus,

    /// Priority (defaults to low)
    #[serde(default = "default_priority")]
    pub priority: TaskPriority,
}

fn default_status() -> TaskStatus {
    TaskStatus::Backlog
}

fn default_priority() -> TaskPriority {
    TaskPriority::Low
}

/// Update task request
///
/// Fields present with a non-empty value overwrite the stored field;
/// absent or empty fields are left untouched.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    /// New summary
    #[validate(length(max = 500, message = "Summary must be at most 500 characters"))]
    pub summary: Option<String>,

    /// New description
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    /// New status
    pub status: Option<TaskStatus>,

    /// New priority
    pub priority: Option<TaskPriority>,
}

/// Outward representation of a task
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskResponse {
    /// Task ID
    pub id: Uuid,

    /// Short summary
    pub summary: Option<String>,

    /// Longer description
    pub description: Option<String>,

    /// Workflow status
    pub status: TaskStatus,

    /// Priority
    pub priority: TaskPriority,

    /// Owning user
    pub owner_id: Option<Uuid>,

    /// Created at
    pub created_at: DateTime<Utc>,

    /// Updated at
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            summary: task.summary,
            description: task.description,
            status: task.status,
            priority: task.priority,
            owner_id: task.owner_id,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

/// Delete task response
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteTaskResponse {
    /// Whether the task was deleted
    pub deleted: bool,
}

/// The ownership scope for write-path lookups
///
/// Admins fetch unscoped; everyone else only sees their own rows.
fn owner_scope(principal: &Principal) -> Option<Uuid> {
    if principal.is_admin {
        None
    } else {
        Some(principal.id)
    }
}

/// Create task
///
/// The task is always owned by the caller; admins cannot create tasks for
/// other users.
///
/// # Errors
///
/// - `400 Bad Request`: Missing or invalid fields
pub async fn create_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    validate_dto(&req)?;

    let mut missing = Vec::new();
    if req.summary.as_deref().unwrap_or("").is_empty() {
        missing.push("summary".to_string());
    }
    if req.description.as_deref().unwrap_or("").is_empty() {
        missing.push("description".to_string());
    }
    if !missing.is_empty() {
        return Err(ApiError::MissingFields(missing));
    }

    let task = Task::create(
        &state.db,
        CreateTask {
            summary: req.summary,
            description: req.description,
            status: req.status,
            priority: req.priority,
            owner_id: Some(principal.id),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(task.into())))
}

/// List tasks
///
/// Admins see every task; ordinary users see their own.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(pagination): Query<Pagination>,
) -> ApiResult<Json<Vec<TaskResponse>>> {
    let tasks = if principal.is_admin {
        Task::list(&state.db, pagination.limit(), pagination.offset()).await?
    } else {
        Task::list_by_owner(
            &state.db,
            principal.id,
            pagination.limit(),
            pagination.offset(),
        )
        .await?
    };

    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

/// Get task by ID
///
/// # Errors
///
/// - `404 Not Found`: Task doesn't exist
/// - `403 Forbidden`: Task exists but belongs to another user
pub async fn get_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<TaskResponse>> {
    let task = Task::find_by_id(&state.db, task_id).await?;
    require_task_access(&principal, task.as_ref())?;

    // The predicate guarantees the task is present here
    let task = task.ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task.into()))
}

/// Update task
///
/// Fetches through the ownership scope: a non-owner updating an existing
/// foreign task observes 404, not 403.
///
/// # Errors
///
/// - `404 Not Found`: Task doesn't exist or is not owned by the caller
pub async fn update_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(task_id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<TaskResponse>> {
    validate_dto(&req)?;

    Task::find_scoped(&state.db, task_id, owner_scope(&principal))
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let update = UpdateTask {
        summary: non_empty(req.summary),
        description: non_empty(req.description),
        status: req.status,
        priority: req.priority,
    };

    let task = Task::update(&state.db, task_id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task.into()))
}

/// Delete task
///
/// Fetches through the ownership scope: a non-owner deleting an existing
/// foreign task observes 404, not 403.
///
/// # Errors
///
/// - `404 Not Found`: Task doesn't exist or is not owned by the caller
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<DeleteTaskResponse>> {
    Task::find_scoped(&state.db, task_id, owner_scope(&principal))
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let deleted = Task::delete(&state.db, task_id).await?;

    Ok(Json(DeleteTaskResponse { deleted }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(id: Uuid, is_admin: bool) -> Principal {
        Principal {
            id,
            username: "jdoe".to_string(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            is_admin,
        }
    }

    #[test]
    fn test_owner_scope_admin_is_unscoped() {
        assert_eq!(owner_scope(&principal(Uuid::new_v4(), true)), None);
    }

    #[test]
    fn test_owner_scope_user_is_scoped_to_self() {
        let id = Uuid::new_v4();
        assert_eq!(owner_scope(&principal(id, false)), Some(id));
    }

    #[test]
    fn test_create_task_request_defaults() {
        let req: CreateTaskRequest =
            serde_json::from_str(r#"{"summary": "s", "description": "d"}"#).unwrap();

        assert_eq!(req.status, TaskStatus::Backlog);
        assert_eq!(req.priority, TaskPriority::Low);
    }
}
