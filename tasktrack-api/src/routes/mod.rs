/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Root and health check endpoints
/// - `auth`: Signup, login, logout and current user
/// - `projects`: Owner-scoped project CRUD
/// - `tasks`: Owner-scoped task CRUD, per project and across projects
///
/// Project and task handlers resolve path ids through [`require_owned`], so
/// a malformed id, a missing row and someone else's row are handled the
/// same way everywhere.

pub mod auth;
pub mod health;
pub mod projects;
pub mod tasks;

use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use tasktrack_shared::models::{
    scoped::{find_owned, Owned},
    user::User,
};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};

/// Plain acknowledgement body
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// `"<Kind> deleted successfully"`
    pub fn deleted<T: Owned>() -> Self {
        Self::new(format!("{} deleted successfully", T::KIND))
    }
}

/// Parses a path id for entity `T`
///
/// # Errors
///
/// `BadRequest` if `raw` is not a UUID
pub fn parse_id<T: Owned>(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| {
        ApiError::BadRequest(format!("Invalid {} ID format", T::KIND.to_lowercase()))
    })
}

/// Loads the `T` with id `raw_id` owned by `user`
///
/// # Errors
///
/// - `BadRequest` if `raw_id` is not a UUID
/// - `NotFound` if no such row exists or it belongs to another user
pub async fn require_owned<'e, T, E>(executor: E, raw_id: &str, user: &User) -> ApiResult<T>
where
    T: Owned,
    E: PgExecutor<'e>,
{
    let id = parse_id::<T>(raw_id)?;

    find_owned::<T, E>(executor, id, user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("{} not found", T::KIND)))
}
