/// User model and database operations
///
/// Users are the root of every ownership chain: projects and tasks carry a
/// `user_id`, and deleting a user cascades to both.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(100) NOT NULL,
///     email VARCHAR(255) NOT NULL,
///     password_hash TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// CREATE UNIQUE INDEX users_email_lower_key ON users (LOWER(email));
/// ```
///
/// # Example
///
/// ```no_run
/// use tasktrack_shared::models::user::{NewUser, User};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::create(&pool, NewUser {
///     name: "Ada".to_string(),
///     email: "ada@x.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// }).await?;
///
/// // Email look-ups ignore case
/// let found = User::find_by_email(&pool, "ADA@x.com").await?;
/// assert_eq!(found.map(|u| u.id), Some(user.id));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

/// Name of the unique index backing case-insensitive email uniqueness
pub const EMAIL_UNIQUE_CONSTRAINT: &str = "users_email_lower_key";

/// User account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email address, unique regardless of case
    pub email: String,

    /// Argon2id password hash; never serialized
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// Argon2id password hash (NOT plaintext password!)
    pub password_hash: String,
}

/// Outward view of a user: id, name and email only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    /// User ID
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email address
    pub email: String,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

impl User {
    /// Inserts a new user
    ///
    /// # Errors
    ///
    /// Fails with a unique violation on [`EMAIL_UNIQUE_CONSTRAINT`] if the
    /// email is already registered under any casing.
    pub async fn create<'e, E>(executor: E, data: NewUser) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password_hash, created_at
            "#,
        )
        .bind(data.name)
        .bind(data.email)
        .bind(data.password_hash)
        .fetch_one(executor)
        .await
    }

    /// Finds a user by ID
    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Finds a user by email address, ignoring case
    pub async fn find_by_email<'e, E>(
        executor: E,
        email: &str,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM users
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(executor)
        .await
    }

    /// Deletes a user together with all of their projects and tasks
    ///
    /// # Returns
    ///
    /// True if the user existed
    pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Public view of this user
    pub fn public(&self) -> PublicUser {
        PublicUser::from(self)
    }
}
