/// Project endpoints
///
/// All endpoints are authenticated and scoped to the caller.
///
/// # Endpoints
///
/// - `GET /projects` - List own projects, newest first
/// - `POST /projects` - Create a project
/// - `GET /projects/:id` - Get a project
/// - `PUT /projects/:id` - Partially update a project
/// - `DELETE /projects/:id` - Delete a project and its tasks

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
use serde::Deserialize;
use tasktrack_shared::{
    auth::middleware::AuthContext,
    models::{
        project::{NewProject, Project, ProjectChanges},
        scoped::list_owned,
    },
};
use validator::Validate;

/// Create project request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 255,
        message = "Project name must be between 1 and 255 characters"
    ))]
    pub name: String,

    pub description: Option<String>,

    /// Defaults to `#3B82F6`
    #[validate(length(max = 255, message = "Color must be at most 255 characters"))]
    pub color: Option<String>,
}

/// Update project request; absent (or null) fields are left untouched
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Project name must be between 1 and 255 characters"
    ))]
    pub name: Option<String>,

    pub description: Option<String>,

    #[validate(length(max = 255, message = "Color must be at most 255 characters"))]
    pub color: Option<String>,
}

impl From<UpdateProjectRequest> for ProjectChanges {
    fn from(req: UpdateProjectRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            color: req.color,
        }
    }
}

/// List the caller's projects
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Project>>> {
    let projects = list_owned::<Project, _>(&state.db, auth.user_id()).await?;
    Ok(Json(projects))
}

/// Get one of the caller's projects
///
/// # Errors
///
/// - `400 Bad Request`: Malformed id
/// - `404 Not Found`: No such project owned by the caller
pub async fn get_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<Project>> {
    let project = require_owned::<Project, _>(&state.db, &id, &auth.user).await?;
    Ok(Json(project))
}

/// Create a project owned by the caller
pub async fn create_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ValidatedJson(req): ValidatedJson<CreateProjectRequest>,
) -> ApiResult<Json<Project>> {
    let project = Project::create(
        &state.db,
        NewProject {
            user_id: auth.user_id(),
            name: req.name,
            description: req.description,
            color: req.color,
        },
    )
    .await?;

    tracing::info!(user_id = %auth.user_id(), project_id = %project.id, "Project created");

    Ok(Json(project))
}

/// Partially update one of the caller's projects
///
/// # Errors
///
/// - `400 Bad Request`: Malformed id or validation failed
/// - `404 Not Found`: No such project owned by the caller
pub async fn update_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateProjectRequest>,
) -> ApiResult<Json<Project>> {
    let mut tx = state.db.begin().await?;

    let existing = require_owned::<Project, _>(&mut *tx, &id, &auth.user).await?;

    let project = Project::update(&mut *tx, existing.id, auth.user_id(), req.into())
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    tx.commit().await?;

    tracing::info!(user_id = %auth.user_id(), project_id = %project.id, "Project updated");

    Ok(Json(project))
}

/// Delete one of the caller's projects together with its tasks
///
/// # Errors
///
/// - `400 Bad Request`: Malformed id
/// - `404 Not Found`: No such project owned by the caller
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let mut tx = state.db.begin().await?;

    let project = require_owned::<Project, _>(&mut *tx, &id, &auth.user).await?;

    if !Project::delete_with_tasks(&mut *tx, project.id, auth.user_id()).await? {
        return Err(ApiError::NotFound("Project not found".to_string()));
    }

    tx.commit().await?;

    tracing::info!(
        user_id = %auth.user_id(),
        project_id = %project.id,
        tasks = project.task_count,
        "Project deleted"
    );

    Ok(Json(MessageResponse::deleted::<Project>()))
}
