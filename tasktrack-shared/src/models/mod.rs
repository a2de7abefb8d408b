/// Database models for TaskTrack
///
/// # Models
///
/// - `user`: User accounts, the root of every ownership chain
/// - `project`: Named task groupings owned by a user
/// - `task`: Units of work owned by a user inside one of their projects
/// - `scoped`: Owner-scoped find/list/delete shared by projects and tasks
///
/// # Example
///
/// ```no_run
/// use tasktrack_shared::models::project::Project;
/// use tasktrack_shared::models::scoped::{find_owned, list_owned};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, owner: Uuid, project_id: Uuid) -> Result<(), sqlx::Error> {
/// let mine: Vec<Project> = list_owned(&pool, owner).await?;
///
/// // None for a missing project and for someone else's project alike
/// let one: Option<Project> = find_owned(&pool, project_id, owner).await?;
/// # Ok(())
/// # }
/// ```

pub mod project;
pub mod scoped;
pub mod task;
pub mod user;
