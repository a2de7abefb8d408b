/// Task model and database operations
///
/// A task belongs to one user and one project, and the project must belong
/// to the same user. The store enforces this through a composite foreign
/// key on `(project_id, user_id)`, so a task can never point at a foreign
/// project even if a caller skips the ownership check.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('todo', 'in_progress', 'completed', 'blocked');
/// CREATE TYPE task_priority AS ENUM ('low', 'medium', 'high', 'urgent');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     project_id UUID NOT NULL,
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     status task_status NOT NULL DEFAULT 'todo',
///     priority task_priority NOT NULL DEFAULT 'medium',
///     due_date TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     FOREIGN KEY (project_id, user_id) REFERENCES projects (id, user_id) ON DELETE CASCADE,
///     CHECK (updated_at >= created_at)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use tasktrack_shared::models::task::{NewTask, Task, TaskChanges, TaskPriority, TaskStatus};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, user_id: Uuid, project_id: Uuid) -> Result<(), sqlx::Error> {
/// let task = Task::create(&pool, NewTask {
///     user_id,
///     project_id,
///     title: "Write docs".to_string(),
///     description: None,
///     status: TaskStatus::Todo,
///     priority: TaskPriority::default(),
///     due_date: None,
/// }).await?;
///
/// let changes = TaskChanges {
///     status: Some(TaskStatus::Completed),
///     ..Default::default()
/// };
/// Task::update(&pool, task.id, user_id, changes).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::scoped::Owned;

/// Returned when a string names no known enumeration value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} must be one of: {allowed}")]
pub struct UnknownVariant {
    kind: &'static str,
    allowed: &'static str,
}

/// Task workflow status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started
    #[default]
    Todo,

    /// Being worked on
    InProgress,

    /// Done
    Completed,

    /// Waiting on something else
    Blocked,
}

impl TaskStatus {
    /// Wire and database representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Blocked => "blocked",
        }
    }
}

impl FromStr for TaskStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(TaskStatus::Todo),
            "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            "blocked" => Ok(TaskStatus::Blocked),
            _ => Err(UnknownVariant {
                kind: "Status",
                allowed: "todo, in_progress, completed, blocked",
            }),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    /// Wire and database representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
            TaskPriority::Urgent => "urgent",
        }
    }
}

impl FromStr for TaskPriority {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            "urgent" => Ok(TaskPriority::Urgent),
            _ => Err(UnknownVariant {
                kind: "Priority",
                allowed: "low, medium, high, urgent",
            }),
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Owning project (owned by the same user)
    pub project_id: Uuid,

    /// Short title
    pub title: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Workflow status
    pub status: TaskStatus,

    /// Priority
    pub priority: TaskPriority,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// Last mutation; strictly increases on every update
    pub updated_at: DateTime<Utc>,
}

impl Owned for Task {
    const KIND: &'static str = "Task";
    const TABLE: &'static str = "tasks";
    const COLUMNS: &'static str = "tasks.id, tasks.user_id, tasks.project_id, tasks.title, \
        tasks.description, tasks.status, tasks.priority, tasks.due_date, \
        tasks.created_at, tasks.updated_at";
}

/// Input for creating a task
#[derive(Debug, Clone)]
pub struct NewTask {
    pub user_id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
}

/// Partial update; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<DateTime<Utc>>,
}

impl Task {
    /// Inserts a task
    ///
    /// # Errors
    ///
    /// Fails with a foreign-key violation if `project_id` is not owned by
    /// `user_id`.
    pub async fn create<'e, E>(executor: E, data: NewTask) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (user_id, project_id, title, description, status, priority, due_date,
                               created_at, updated_at)
            SELECT $1, $2, $3, $4, $5, $6, $7, clock.ts, clock.ts
            FROM (SELECT clock_timestamp() AS ts) AS clock
            RETURNING id, user_id, project_id, title, description, status, priority,
                      due_date, created_at, updated_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.project_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.priority)
        .bind(data.due_date)
        .fetch_one(executor)
        .await
    }

    /// Applies a partial update to a task owned by `owner_id`
    ///
    /// `updated_at` moves to the current clock time, or one microsecond past
    /// its previous value if the clock has not advanced.
    ///
    /// # Returns
    ///
    /// The updated task, or `None` if no such task is owned by `owner_id`
    pub async fn update<'e, E>(
        executor: E,
        id: Uuid,
        owner_id: Uuid,
        changes: TaskChanges,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = COALESCE($3, title),
                description = COALESCE($4, description),
                status = COALESCE($5, status),
                priority = COALESCE($6, priority),
                due_date = COALESCE($7, due_date),
                updated_at = GREATEST(clock_timestamp(), updated_at + INTERVAL '1 microsecond')
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, project_id, title, description, status, priority,
                      due_date, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.status)
        .bind(changes.priority)
        .bind(changes.due_date)
        .fetch_optional(executor)
        .await
    }

    /// Lists a project's tasks, newest first
    ///
    /// Scoped by owner as well as project, so a foreign project id yields an
    /// empty list rather than someone else's tasks.
    pub async fn list_by_project<'e, E>(
        executor: E,
        project_id: Uuid,
        owner_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let sql = format!(
            "SELECT {} FROM tasks \
             WHERE tasks.project_id = $1 AND tasks.user_id = $2 \
             ORDER BY tasks.created_at DESC, tasks.id DESC",
            Self::COLUMNS
        );

        sqlx::query_as::<_, Task>(&sql)
            .bind(project_id)
            .bind(owner_id)
            .fetch_all(executor)
            .await
    }
}
