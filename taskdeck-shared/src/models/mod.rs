/// Database models for TaskDeck
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `company`: Companies users can belong to
/// - `user`: User accounts and credential records
/// - `task`: Tasks owned by users
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::models::user::{CreateUser, User};
/// use taskdeck_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig {
///     url: std::env::var("DATABASE_URL")?,
///     ..Default::default()
/// })
/// .await?;
///
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
/// # Ok(())
/// # }
/// ```

pub mod company;
pub mod task;
pub mod user;
