/// Project model and database operations
///
/// Projects group tasks and are owned by exactly one user. `task_count` is
/// derived at read time and never stored.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     name VARCHAR(255) NOT NULL,
///     description TEXT,
///     color VARCHAR(255) NOT NULL DEFAULT '#3B82F6',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     UNIQUE (id, user_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgExecutor};
use uuid::Uuid;

use super::scoped::{delete_owned, Owned};
use crate::validation::DEFAULT_PROJECT_COLOR;

/// Project record with its derived task count
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Display name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Display color
    pub color: String,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// Number of tasks currently in the project
    pub task_count: i64,
}

impl Owned for Project {
    const KIND: &'static str = "Project";
    const TABLE: &'static str = "projects";
    const COLUMNS: &'static str = "projects.id, projects.user_id, projects.name, \
        projects.description, projects.color, projects.created_at, \
        (SELECT COUNT(*) FROM tasks WHERE tasks.project_id = projects.id) AS task_count";
}

/// Input for creating a project
#[derive(Debug, Clone)]
pub struct NewProject {
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,

    /// Falls back to [`DEFAULT_PROJECT_COLOR`] when `None`
    pub color: Option<String>,
}

/// Partial update; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default)]
pub struct ProjectChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

impl Project {
    /// Inserts a project; the new project has no tasks
    pub async fn create<'e, E>(executor: E, data: NewProject) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let color = data
            .color
            .unwrap_or_else(|| DEFAULT_PROJECT_COLOR.to_string());

        sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (user_id, name, description, color, created_at)
            VALUES ($1, $2, $3, $4, clock_timestamp())
            RETURNING id, user_id, name, description, color, created_at,
                      0::BIGINT AS task_count
            "#,
        )
        .bind(data.user_id)
        .bind(data.name)
        .bind(data.description)
        .bind(color)
        .fetch_one(executor)
        .await
    }

    /// Applies a partial update to a project owned by `owner_id`
    ///
    /// # Returns
    ///
    /// The updated project with a fresh task count, or `None` if no such
    /// project is owned by `owner_id`
    pub async fn update<'e, E>(
        executor: E,
        id: Uuid,
        owner_id: Uuid,
        changes: ProjectChanges,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Project>(
            r#"
            WITH updated AS (
                UPDATE projects
                SET name = COALESCE($3, name),
                    description = COALESCE($4, description),
                    color = COALESCE($5, color)
                WHERE id = $1 AND user_id = $2
                RETURNING id, user_id, name, description, color, created_at
            )
            SELECT updated.id, updated.user_id, updated.name, updated.description,
                   updated.color, updated.created_at,
                   (SELECT COUNT(*) FROM tasks WHERE tasks.project_id = updated.id) AS task_count
            FROM updated
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(changes.name)
        .bind(changes.description)
        .bind(changes.color)
        .fetch_optional(executor)
        .await
    }

    /// Deletes a project owned by `owner_id` together with its tasks
    ///
    /// Tasks are removed explicitly before the project instead of relying
    /// only on the store's cascade. Run this inside a transaction.
    ///
    /// # Returns
    ///
    /// True if the project existed and was deleted
    pub async fn delete_with_tasks(
        conn: &mut PgConnection,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let removed = sqlx::query("DELETE FROM tasks WHERE project_id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&mut *conn)
            .await?
            .rows_affected();

        tracing::debug!(project_id = %id, tasks_removed = removed, "Removed project tasks");

        delete_owned::<Project, _>(&mut *conn, id, owner_id).await
    }
}
