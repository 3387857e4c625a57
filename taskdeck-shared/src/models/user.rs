/// User model and database operations
///
/// This module provides the User model and CRUD operations for managing
/// user accounts. A user optionally belongs to one company via `company_id`.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     username VARCHAR(100) NOT NULL UNIQUE,
///     email VARCHAR(100) UNIQUE,
///     first_name VARCHAR(100) NOT NULL,
///     last_name VARCHAR(100) NOT NULL,
///     password_hash VARCHAR(255) NOT NULL,
///     is_admin BOOLEAN NOT NULL DEFAULT FALSE,
///     company_id UUID REFERENCES companies(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::models::user::{CreateUser, User};
/// # use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::create(
///     &pool,
///     CreateUser {
///         username: "jdoe".to_string(),
///         email: Some("jdoe@example.com".to_string()),
///         first_name: "John".to_string(),
///         last_name: "Doe".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///         company_id: None,
///     },
/// )
/// .await?;
///
/// let found = User::find_by_username(&pool, "jdoe").await?;
/// assert!(found.is_some());
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// User model representing an account and its credential record
///
/// Passwords are stored as Argon2id hashes, never in plaintext, and the
/// hash must never appear in any outward-facing representation.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Username, unique across all users
    pub username: String,

    /// Email address, unique when present
    pub email: Option<String>,

    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// Whether the user has the admin role
    pub is_admin: bool,

    /// Company the user belongs to, if any
    pub company_id: Option<Uuid>,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated (None if never updated)
    pub updated_at: Option<DateTime<Utc>>,
}

/// Input for creating a new user
///
/// `password_hash` must already be hashed; the model layer never sees
/// plaintext passwords. The admin flag is not part of the create surface —
/// new accounts are ordinary users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Username (unique)
    pub username: String,

    /// Email address (unique)
    pub email: Option<String>,

    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// Argon2id password hash (NOT a plaintext password!)
    pub password_hash: String,

    /// Optional company reference
    pub company_id: Option<Uuid>,
}

/// Input for updating an existing user
///
/// Only fields carrying a value are written. An empty string never reaches
/// this struct: the handler drops empty fields before building the update,
/// so an empty value cannot clear a stored field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    /// New first name
    pub first_name: Option<String>,

    /// New last name
    pub last_name: Option<String>,
}

impl UpdateUser {
    /// True when no field carries a value
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none()
    }
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns an error if the username or email already exists (unique
    /// constraint violation) or the database call fails
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, first_name, last_name, password_hash, company_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, username, email, first_name, last_name, password_hash, is_admin,
                      company_id, created_at, updated_at
            "#,
        )
        .bind(data.username)
        .bind(data.email)
        .bind(data.first_name)
        .bind(data.last_name)
        .bind(data.password_hash)
        .bind(data.company_id)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, first_name, last_name, password_hash, is_admin,
                   company_id, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by username
    ///
    /// Used by the login flow to load the credential record.
    pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, first_name, last_name, password_hash, is_admin,
                   company_id, created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user colliding with either unique field
    ///
    /// Used as the pre-insert uniqueness check; the unique constraints
    /// remain the secondary guarantee under concurrent creates.
    pub async fn find_by_username_or_email(
        pool: &PgPool,
        username: &str,
        email: Option<&str>,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, first_name, last_name, password_hash, is_admin,
                   company_id, created_at, updated_at
            FROM users
            WHERE username = $1 OR ($2::VARCHAR IS NOT NULL AND email = $2)
            "#,
        )
        .bind(username)
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Lists users ordered by creation time
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, first_name, last_name, password_hash, is_admin,
                   company_id, created_at, updated_at
            FROM users
            ORDER BY created_at
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Lists the members of a company
    pub async fn list_by_company(pool: &PgPool, company_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, first_name, last_name, password_hash, is_admin,
                   company_id, created_at, updated_at
            FROM users
            WHERE company_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(company_id)
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Updates an existing user
    ///
    /// Only fields present in `data` are written; `updated_at` is set to
    /// the current time. Returns None if the user doesn't exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateUser,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build the update statement from the fields that carry a value
        let mut query = String::from("UPDATE users SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.first_name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", first_name = ${}", bind_count));
        }
        if data.last_name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", last_name = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, username, email, first_name, last_name, \
             password_hash, is_admin, company_id, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, User>(&query).bind(id);

        if let Some(first_name) = data.first_name {
            q = q.bind(first_name);
        }
        if let Some(last_name) = data.last_name {
            q = q.bind(last_name);
        }

        let user = q.fetch_optional(pool).await?;

        Ok(user)
    }

    /// Deletes a user by ID
    ///
    /// Returns true if a row was deleted, false if the user didn't exist.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
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
    fn test_update_user_is_empty() {
        assert!(UpdateUser::default().is_empty());

        let update = UpdateUser {
            first_name: Some("Jane".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_user_serialization_includes_hash_field() {
        // The model itself carries the hash; excluding it from responses is
        // the DTO layer's job, pinned by the route tests.
        let user = User {
            id: Uuid::new_v4(),
            username: "jdoe".to_string(),
            email: None,
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            password_hash: "$argon2id$x".to_string(),
            is_admin: false,
            company_id: None,
            created_at: Utc::now(),
            updated_at: None,
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["username"], "jdoe");
        assert!(json.get("password_hash").is_some());
    }
}
