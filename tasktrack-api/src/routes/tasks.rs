/// Task endpoints
///
/// All endpoints are authenticated and scoped to the caller. A task is only
/// reachable by its owner; creating or listing under a project first checks
/// that the caller owns the project.
///
/// # Endpoints
///
/// - `GET /tasks` - List own tasks across projects, newest first
/// - `GET /projects/:id/tasks` - List a project's tasks
/// - `POST /projects/:id/tasks` - Create a task in a project
/// - `GET /tasks/:id` - Get a task
/// - `PUT /tasks/:id` - Partially update a task
/// - `DELETE /tasks/:id` - Delete a task

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ValidatedJson,
    routes::{require_owned, MessageResponse},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::{fmt::Display, str::FromStr};
use tasktrack_shared::{
    auth::middleware::AuthContext,
    models::{
        project::Project,
        scoped::{delete_owned, list_owned},
        task::{NewTask, Task, TaskChanges, TaskPriority, TaskStatus},
    },
    validation::{
        parse_due_date, validate_due_date, validate_task_priority, validate_task_status,
        FieldViolation,
    },
};
use uuid::Uuid;
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: String,

    pub description: Option<String>,

    /// Defaults to `todo`
    #[validate(custom(function = "validate_task_status"))]
    pub status: Option<String>,

    /// Defaults to `medium`
    #[validate(custom(function = "validate_task_priority"))]
    pub priority: Option<String>,

    /// ISO-8601 date or date-time
    #[validate(custom(function = "validate_due_date"))]
    pub due_date: Option<String>,
}

/// Update task request; absent (or null) fields are left untouched
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: Option<String>,

    pub description: Option<String>,

    #[validate(custom(function = "validate_task_status"))]
    pub status: Option<String>,

    #[validate(custom(function = "validate_task_priority"))]
    pub priority: Option<String>,

    #[validate(custom(function = "validate_due_date"))]
    pub due_date: Option<String>,
}

fn parse_field<T>(field: &str, raw: Option<&str>) -> ApiResult<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    raw.map(|value| {
        value
            .parse::<T>()
            .map_err(|e| ApiError::ValidationError(vec![FieldViolation::new(field, e.to_string())]))
    })
    .transpose()
}

fn parse_due(raw: Option<&str>) -> ApiResult<Option<DateTime<Utc>>> {
    raw.map(|value| {
        parse_due_date(value).ok_or_else(|| {
            ApiError::ValidationError(vec![FieldViolation::new(
                "due_date",
                "Due date must be an ISO-8601 date-time",
            )])
        })
    })
    .transpose()
}

impl CreateTaskRequest {
    fn into_new_task(self, user_id: Uuid, project_id: Uuid) -> ApiResult<NewTask> {
        Ok(NewTask {
            user_id,
            project_id,
            status: parse_field::<TaskStatus>("status", self.status.as_deref())?
                .unwrap_or_default(),
            priority: parse_field::<TaskPriority>("priority", self.priority.as_deref())?
                .unwrap_or_default(),
            due_date: parse_due(self.due_date.as_deref())?,
            title: self.title,
            description: self.description,
        })
    }
}

impl TryFrom<UpdateTaskRequest> for TaskChanges {
    type Error = ApiError;

    fn try_from(req: UpdateTaskRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            status: parse_field("status", req.status.as_deref())?,
            priority: parse_field("priority", req.priority.as_deref())?,
            due_date: parse_due(req.due_date.as_deref())?,
            title: req.title,
            description: req.description,
        })
    }
}

/// List all of the caller's tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = list_owned::<Task, _>(&state.db, auth.user_id()).await?;
    Ok(Json(tasks))
}

/// List the tasks of one of the caller's projects
///
/// # Errors
///
/// - `400 Bad Request`: Malformed project id
/// - `404 Not Found`: No such project owned by the caller
pub async fn list_project_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(project_id): Path<String>,
) -> ApiResult<Json<Vec<Task>>> {
    let project = require_owned::<Project, _>(&state.db, &project_id, &auth.user).await?;
    let tasks = Task::list_by_project(&state.db, project.id, auth.user_id()).await?;
    Ok(Json(tasks))
}

/// Create a task in one of the caller's projects
///
/// # Errors
///
/// - `400 Bad Request`: Malformed project id or validation failed
/// - `404 Not Found`: No such project owned by the caller
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(project_id): Path<String>,
    ValidatedJson(req): ValidatedJson<CreateTaskRequest>,
) -> ApiResult<Json<Task>> {
    let mut tx = state.db.begin().await?;

    let project = require_owned::<Project, _>(&mut *tx, &project_id, &auth.user).await?;
    let data = req.into_new_task(auth.user_id(), project.id)?;
    let task = Task::create(&mut *tx, data).await?;

    tx.commit().await?;

    tracing::info!(
        user_id = %auth.user_id(),
        project_id = %project.id,
        task_id = %task.id,
        "Task created"
    );

    Ok(Json(task))
}

/// Get one of the caller's tasks
///
/// # Errors
///
/// - `400 Bad Request`: Malformed id
/// - `404 Not Found`: No such task owned by the caller
pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<Task>> {
    let task = require_owned::<Task, _>(&state.db, &id, &auth.user).await?;
    Ok(Json(task))
}

/// Partially update one of the caller's tasks
///
/// Owning the task is sufficient; its project is not re-checked because
/// ownership fields never change after creation.
///
/// # Errors
///
/// - `400 Bad Request`: Malformed id or validation failed
/// - `404 Not Found`: No such task owned by the caller
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    let changes = TaskChanges::try_from(req)?;

    let mut tx = state.db.begin().await?;

    let existing = require_owned::<Task, _>(&mut *tx, &id, &auth.user).await?;
    let task = Task::update(&mut *tx, existing.id, auth.user_id(), changes)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    tx.commit().await?;

    tracing::info!(user_id = %auth.user_id(), task_id = %task.id, "Task updated");

    Ok(Json(task))
}

/// Delete one of the caller's tasks
///
/// # Errors
///
/// - `400 Bad Request`: Malformed id
/// - `404 Not Found`: No such task owned by the caller
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let mut tx = state.db.begin().await?;

    let task = require_owned::<Task, _>(&mut *tx, &id, &auth.user).await?;
    if !delete_owned::<Task, _>(&mut *tx, task.id, auth.user_id()).await? {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    tx.commit().await?;

    tracing::info!(user_id = %auth.user_id(), task_id = %task.id, "Task deleted");

    Ok(Json(MessageResponse::deleted::<Task>()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasktrack_shared::validation::collect_violations;

    fn fields(errors: &validator::ValidationErrors) -> Vec<String> {
        collect_violations(errors)
            .into_iter()
            .map(|v| v.field)
            .collect()
    }

    #[test]
    fn test_create_defaults() {
        let req: CreateTaskRequest = serde_json::from_str(r#"{"title":"Write spec"}"#).unwrap();
        assert!(req.validate().is_ok());

        let task = req.into_new_task(Uuid::new_v4(), Uuid::new_v4()).unwrap();
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.priority, TaskPriority::Medium);
        assert!(task.due_date.is_none());
    }

    #[test]
    fn test_create_rejects_invalid_enumerations() {
        let req: CreateTaskRequest = serde_json::from_str(
            r#"{"title":"x","status":"not-a-status","priority":"whenever"}"#,
        )
        .unwrap();

        let errors = req.validate().unwrap_err();
        assert_eq!(fields(&errors), vec!["priority", "status"]);
    }

    #[test]
    fn test_create_reports_all_violations() {
        let req: CreateTaskRequest =
            serde_json::from_str(r#"{"status":"nope","due_date":"someday"}"#).unwrap();

        let errors = req.validate().unwrap_err();
        assert_eq!(fields(&errors), vec!["due_date", "status", "title"]);
    }

    #[test]
    fn test_create_parses_due_date() {
        let req: CreateTaskRequest = serde_json::from_str(
            r#"{"title":"x","status":"in_progress","priority":"high","due_date":"2025-06-01"}"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());

        let task = req.into_new_task(Uuid::new_v4(), Uuid::new_v4()).unwrap();
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.priority, TaskPriority::High);
        assert_eq!(
            task.due_date.map(|d| d.to_rfc3339()),
            Some("2025-06-01T00:00:00+00:00".to_string())
        );
    }

    #[test]
    fn test_update_only_carries_present_fields() {
        let req: UpdateTaskRequest =
            serde_json::from_str(r#"{"status":"completed","due_date":null}"#).unwrap();
        assert!(req.validate().is_ok());

        let changes = TaskChanges::try_from(req).unwrap();
        assert_eq!(changes.status, Some(TaskStatus::Completed));
        assert!(changes.title.is_none());
        assert!(changes.description.is_none());
        assert!(changes.priority.is_none());
        assert!(changes.due_date.is_none());
    }

    #[test]
    fn test_update_rejects_empty_title() {
        let req: UpdateTaskRequest = serde_json::from_str(r#"{"title":""}"#).unwrap();
        assert_eq!(fields(&req.validate().unwrap_err()), vec!["title"]);
    }

    #[test]
    fn test_parse_field_maps_to_violation() {
        match parse_field::<TaskStatus>("status", Some("nope")) {
            Err(ApiError::ValidationError(violations)) => {
                assert_eq!(violations[0].field, "status");
            }
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }
}
