/// Task model and database operations
///
/// Tasks have exactly one owner (a user id, nullable until assigned). A
/// non-admin may only mutate tasks they own; the mutation queries encode
/// that rule directly (see [`Task::find_scoped`]).
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('backlog', 'todo', 'in_progress', 'done');
/// CREATE TYPE task_priority AS ENUM ('low', 'medium', 'high');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     summary VARCHAR(500),
///     description VARCHAR(500),
///     status task_status NOT NULL DEFAULT 'backlog',
///     priority task_priority NOT NULL DEFAULT 'low',
///     owner_id UUID REFERENCES users(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Workflow status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not yet planned
    Backlog,

    /// Planned, not started
    Todo,

    /// Being worked on
    InProgress,

    /// Finished
    Done,
}

impl TaskStatus {
    /// Converts status to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Backlog => "backlog",
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }
}

/// Priority of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Low priority
    Low,

    /// Medium priority
    Medium,

    /// High priority
    High,
}

impl TaskPriority {
    /// Converts priority to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

/// Task model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID (UUID v4)
    pub id: Uuid,

    /// Short summary
    pub summary: Option<String>,

    /// Longer description
    pub description: Option<String>,

    /// Workflow status
    pub status: TaskStatus,

    /// Priority
    pub priority: TaskPriority,

    /// Owning user (None until assigned)
    pub owner_id: Option<Uuid>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated (None if never updated)
    pub updated_at: Option<DateTime<Utc>>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
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
}

/// Input for updating an existing task
///
/// Only fields carrying a value are written; empty strings are dropped by
/// the handler before they reach this struct, so an empty value cannot
/// clear a stored field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    /// New summary
    pub summary: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New status
    pub status: Option<TaskStatus>,

    /// New priority
    pub priority: Option<TaskPriority>,
}

impl Task {
    /// Creates a new task
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (summary, description, status, priority, owner_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, summary, description, status, priority, owner_id, created_at, updated_at
            "#,
        )
        .bind(data.summary)
        .bind(data.description)
        .bind(data.status)
        .bind(data.priority)
        .bind(data.owner_id)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID, unscoped
    ///
    /// This is the read-path lookup: the caller runs the access predicate
    /// on the result, so a denied read can distinguish Forbidden from
    /// NotFound.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, summary, description, status, priority, owner_id, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID within an ownership scope
    ///
    /// This is the write-path lookup. With `owner_scope = Some(user_id)`
    /// the row is only returned when that user owns it, so a non-owner
    /// mutating an existing foreign task observes an absent row — it
    /// surfaces as NotFound, concealing the task's existence. Admin callers
    /// pass `None` for an unscoped fetch.
    pub async fn find_scoped(
        pool: &PgPool,
        id: Uuid,
        owner_scope: Option<Uuid>,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, summary, description, status, priority, owner_id, created_at, updated_at
            FROM tasks
            WHERE id = $1 AND ($2::UUID IS NULL OR owner_id = $2)
            "#,
        )
        .bind(id)
        .bind(owner_scope)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists all tasks ordered by creation time (admin listing)
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, summary, description, status, priority, owner_id, created_at, updated_at
            FROM tasks
            ORDER BY created_at
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists a user's own tasks ordered by creation time
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, summary, description, status, priority, owner_id, created_at, updated_at
            FROM tasks
            WHERE owner_id = $1
            ORDER BY created_at
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(owner_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists the tasks owned by a user, unpaginated
    ///
    /// Used to embed a user's tasks in its detail representation.
    pub async fn list_all_by_owner(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, summary, description, status, priority, owner_id, created_at, updated_at
            FROM tasks
            WHERE owner_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Updates an existing task
    ///
    /// Only fields present in `data` are written; `updated_at` is set to
    /// the current time. Returns None if the task doesn't exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.summary.is_some() {
            bind_count += 1;
            query.push_str(&format!(", summary = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }
        if data.priority.is_some() {
            bind_count += 1;
            query.push_str(&format!(", priority = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, summary, description, status, priority, owner_id, \
             created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(summary) = data.summary {
            q = q.bind(summary);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Deletes a task by ID
    ///
    /// Returns true if a row was deleted. Callers must have already
    /// resolved the task through [`Task::find_scoped`].
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_status_as_str() {
        assert_eq!(TaskStatus::Backlog.as_str(), "backlog");
        assert_eq!(TaskStatus::Todo.as_str(), "todo");
        assert_eq!(TaskStatus::InProgress.as_str(), "in_progress");
        assert_eq!(TaskStatus::Done.as_str(), "done");
    }

    #[test]
    fn test_task_priority_as_str() {
        assert_eq!(TaskPriority::Low.as_str(), "low");
        assert_eq!(TaskPriority::Medium.as_str(), "medium");
        assert_eq!(TaskPriority::High.as_str(), "high");
    }

    #[test]
    fn test_task_status_serde_uses_snake_case() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");

        let status: TaskStatus = serde_json::from_str("\"backlog\"").unwrap();
        assert_eq!(status, TaskStatus::Backlog);
    }
}
