/// Error handling for the API server
///
/// Every handler returns `Result<T, ApiError>`; this module is the single
/// place where an error becomes an HTTP status and JSON body.
///
/// # Response Format
///
/// ```json
/// {
///   "detail": "Validation error",
///   "errors": [{ "field": "name", "message": "..." }],
///   "message": "..."
/// }
/// ```
///
/// `errors` is present only for validation failures and `message` only for
/// internal errors.
///
/// # Example
///
/// ```
/// use tasktrack_api::error::{ApiError, ApiResult};
///
/// fn check(found: bool) -> ApiResult<()> {
///     if !found {
///         return Err(ApiError::NotFound("Project not found".to_string()));
///     }
///     Ok(())
/// }
/// ```

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tasktrack_shared::{
    auth::{jwt::JwtError, middleware::AuthError, password::PasswordError},
    models::user::EMAIL_UNIQUE_CONSTRAINT,
    validation::FieldViolation,
};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed input: bad id, unparseable body (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// One entry per violated field rule (400)
    #[error("Validation failed: {} errors", .0.len())]
    ValidationError(Vec<FieldViolation>),

    /// Missing, invalid or expired credentials (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Absent, or not owned by the caller (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unique or referential constraint violated (400)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Anything unanticipated (500); the text is logged, never returned
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Error response format
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Summary
    pub detail: String,

    /// Per-field violations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldViolation>>,

    /// Additional human-readable context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    fn detail(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            errors: None,
            message: None,
        }
    }
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::ValidationError(_) | ApiError::Conflict(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg) => ErrorResponse::detail(msg),
            ApiError::ValidationError(errors) => ErrorResponse {
                errors: Some(errors),
                ..ErrorResponse::detail("Validation error")
            },
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                ErrorResponse {
                    message: Some("An unexpected error occurred".to_string()),
                    ..ErrorResponse::detail("Internal server error")
                }
            }
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                // Constraint violations that slipped past validation are conflicts
                if let Some(constraint) = db_err.constraint() {
                    if constraint == EMAIL_UNIQUE_CONSTRAINT || constraint.contains("email") {
                        return ApiError::Conflict("Email already registered".to_string());
                    }
                    tracing::warn!(constraint, "Database constraint violation");
                    return ApiError::Conflict("Database constraint violation".to_string());
                }

                ApiError::InternalError(format!("Database error: {}", db_err))
            }
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert auth errors to API errors
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials => ApiError::Unauthorized("Not authenticated".to_string()),
            AuthError::InvalidFormat => {
                ApiError::Unauthorized("Invalid authentication credentials".to_string())
            }
            AuthError::InvalidToken(reason) => {
                tracing::debug!(%reason, "Rejected bearer token");
                ApiError::Unauthorized("Could not validate credentials".to_string())
            }
            AuthError::UnknownSubject => {
                tracing::debug!("Rejected token for deleted user");
                ApiError::Unauthorized("Could not validate credentials".to_string())
            }
            AuthError::Database(err) => {
                ApiError::InternalError(format!("Authentication lookup failed: {}", err))
            }
        }
    }
}

/// Convert password errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Convert JWT errors to API errors
impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::CreateError(msg) => ApiError::InternalError(msg),
            JwtError::Expired | JwtError::InvalidToken(_) => {
                ApiError::Unauthorized("Could not validate credentials".to_string())
            }
        }
    }
}
