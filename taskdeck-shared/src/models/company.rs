/// Company model and database operations
///
/// Companies group users: a user's `company_id` points at its company, and
/// the company's members are the inverse of that reference.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE company_mode AS ENUM ('outsource', 'product');
///
/// CREATE TABLE companies (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(100) NOT NULL UNIQUE,
///     description VARCHAR(500),
///     mode company_mode NOT NULL DEFAULT 'outsource',
///     rating DOUBLE PRECISION,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Business mode of a company
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "company_mode", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CompanyMode {
    /// Outsourcing / services company
    Outsource,

    /// Product company
    Product,
}

impl CompanyMode {
    /// Converts mode to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            CompanyMode::Outsource => "outsource",
            CompanyMode::Product => "product",
        }
    }
}

/// Company model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Company {
    /// Unique company ID (UUID v4)
    pub id: Uuid,

    /// Company name, unique across all companies
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Business mode
    pub mode: CompanyMode,

    /// Rating, 0 to 5
    pub rating: Option<f64>,

    /// When the company was created
    pub created_at: DateTime<Utc>,

    /// When the company was last updated (None if never updated)
    pub updated_at: Option<DateTime<Utc>>,
}

/// Input for creating a new company
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCompany {
    /// Company name (unique)
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Business mode
    pub mode: CompanyMode,

    /// Rating, 0 to 5
    pub rating: Option<f64>,
}

/// Input for updating an existing company
///
/// Only fields carrying a value are written; empty values are dropped by
/// the handler before they reach this struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCompany {
    /// New description
    pub description: Option<String>,

    /// New business mode
    pub mode: Option<CompanyMode>,
}

impl Company {
    /// Creates a new company
    ///
    /// # Errors
    ///
    /// Returns an error if the name already exists (unique constraint
    /// violation) or the database call fails
    pub async fn create(pool: &PgPool, data: CreateCompany) -> Result<Self, sqlx::Error> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (name, description, mode, rating)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, mode, rating, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .bind(data.mode)
        .bind(data.rating)
        .fetch_one(pool)
        .await?;

        Ok(company)
    }

    /// Finds a company by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            SELECT id, name, description, mode, rating, created_at, updated_at
            FROM companies
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(company)
    }

    /// Finds a company by its unique name
    ///
    /// Used as the pre-insert uniqueness check.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Self>, sqlx::Error> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            SELECT id, name, description, mode, rating, created_at, updated_at
            FROM companies
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(pool)
        .await?;

        Ok(company)
    }

    /// Lists companies ordered by creation time
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Self>, sqlx::Error> {
        let companies = sqlx::query_as::<_, Company>(
            r#"
            SELECT id, name, description, mode, rating, created_at, updated_at
            FROM companies
            ORDER BY created_at
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(companies)
    }

    /// Updates an existing company
    ///
    /// Only fields present in `data` are written; `updated_at` is set to
    /// the current time. Returns None if the company doesn't exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateCompany,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE companies SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.mode.is_some() {
            bind_count += 1;
            query.push_str(&format!(", mode = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, name, description, mode, rating, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Company>(&query).bind(id);

        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(mode) = data.mode {
            q = q.bind(mode);
        }

        let company = q.fetch_optional(pool).await?;

        Ok(company)
    }

    /// Deletes a company by ID
    ///
    /// Returns true if a row was deleted, false if the company didn't
    /// exist. Members keep their accounts; their `company_id` is cleared by
    /// the foreign key's ON DELETE SET NULL.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM companies WHERE id = $1")
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
    fn test_company_mode_as_str() {
        assert_eq!(CompanyMode::Outsource.as_str(), "outsource");
        assert_eq!(CompanyMode::Product.as_str(), "product");
    }

    #[test]
    fn test_company_mode_serde_roundtrip() {
        let json = serde_json::to_string(&CompanyMode::Product).unwrap();
        assert_eq!(json, "\"product\"");

        let mode: CompanyMode = serde_json::from_str("\"outsource\"").unwrap();
        assert_eq!(mode, CompanyMode::Outsource);
    }
}
