/// Owner-scoped lookups shared by every project and task entry point
///
/// Each owned entity describes its table and selected columns once through
/// [`Owned`]; the functions here add the owner predicate
/// (`<table>.id = $1 AND <table>.user_id = $2`). A row that exists but
/// belongs to someone else is reported exactly like a missing row.

use sqlx::{postgres::PgRow, FromRow, PgExecutor};
use uuid::Uuid;

/// An entity whose rows carry an owning `user_id`
pub trait Owned: for<'r> FromRow<'r, PgRow> + Send + Unpin {
    /// Human-readable kind, used in error messages ("Project", "Task")
    const KIND: &'static str;

    /// Table name; also used to qualify columns in predicates
    const TABLE: &'static str;

    /// Select list producing one `Self` row
    const COLUMNS: &'static str;
}

fn select_sql<T: Owned>(predicate: &str) -> String {
    format!(
        "SELECT {} FROM {} WHERE {}",
        T::COLUMNS,
        T::TABLE,
        predicate
    )
}

/// Fetches the row with `id` if, and only if, `owner_id` owns it
pub async fn find_owned<'e, T, E>(
    executor: E,
    id: Uuid,
    owner_id: Uuid,
) -> Result<Option<T>, sqlx::Error>
where
    T: Owned,
    E: PgExecutor<'e>,
{
    let sql = select_sql::<T>(&format!(
        "{table}.id = $1 AND {table}.user_id = $2",
        table = T::TABLE
    ));

    sqlx::query_as::<_, T>(&sql)
        .bind(id)
        .bind(owner_id)
        .fetch_optional(executor)
        .await
}

/// Lists every row owned by `owner_id`, newest first
///
/// Rows stamped with the same instant fall back to id order so pages are
/// stable.
pub async fn list_owned<'e, T, E>(executor: E, owner_id: Uuid) -> Result<Vec<T>, sqlx::Error>
where
    T: Owned,
    E: PgExecutor<'e>,
{
    let sql = format!(
        "{} ORDER BY {table}.created_at DESC, {table}.id DESC",
        select_sql::<T>(&format!("{}.user_id = $1", T::TABLE)),
        table = T::TABLE
    );

    sqlx::query_as::<_, T>(&sql)
        .bind(owner_id)
        .fetch_all(executor)
        .await
}

/// Deletes the row with `id` if `owner_id` owns it
///
/// # Returns
///
/// True if a row was deleted
pub async fn delete_owned<'e, T, E>(executor: E, id: Uuid, owner_id: Uuid) -> Result<bool, sqlx::Error>
where
    T: Owned,
    E: PgExecutor<'e>,
{
    let sql = format!(
        "DELETE FROM {table} WHERE {table}.id = $1 AND {table}.user_id = $2",
        table = T::TABLE
    );

    let result = sqlx::query(&sql)
        .bind(id)
        .bind(owner_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{project::Project, task::Task};

    #[test]
    fn test_project_select_is_owner_scoped() {
        let sql = select_sql::<Project>("projects.id = $1 AND projects.user_id = $2");

        assert!(sql.starts_with("SELECT projects.id"));
        assert!(sql.contains("AS task_count"));
        assert!(sql.ends_with("WHERE projects.id = $1 AND projects.user_id = $2"));
    }

    #[test]
    fn test_task_select_reads_from_tasks() {
        let sql = select_sql::<Task>("tasks.user_id = $1");

        assert!(sql.contains("FROM tasks WHERE tasks.user_id = $1"));
        assert!(sql.contains("tasks.project_id"));
    }
}
