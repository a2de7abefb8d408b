/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /auth/signup` - Create an account and get a token
/// - `POST /auth/login` - Exchange credentials for a token
/// - `POST /auth/logout` - Stateless acknowledgement; clients drop the token
/// - `GET /auth/me` - Current user (authenticated)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ValidatedJson,
    routes::MessageResponse,
};
use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use tasktrack_shared::{
    auth::{jwt, middleware::AuthContext, password},
    models::user::{NewUser, PublicUser, User},
};
use validator::Validate;

/// Same response for unknown email and wrong password
const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Signup request
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    /// Display name
    #[serde(default)]
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub name: String,

    /// Email address
    #[serde(default)]
    #[validate(
        email(message = "Invalid email address"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: String,

    /// Plaintext password, hashed before storage
    #[serde(default)]
    #[validate(length(
        min = 8,
        max = 128,
        message = "Password must be between 8 and 128 characters"
    ))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[serde(default)]
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    /// Password
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Signup/login response
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The authenticated user
    pub user: PublicUser,

    /// Bearer token for subsequent calls
    #[serde(rename = "accessToken")]
    pub access_token: String,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /auth/signup
/// Content-Type: application/json
///
/// { "name": "Ada", "email": "ada@x.com", "password": "longenough1" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed or email already registered
/// - `500 Internal Server Error`: Server error
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SignupRequest>,
) -> ApiResult<Json<AuthResponse>> {
    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;

    // A concurrent signup can still win the race; the unique index turns
    // that into a conflict through `From<sqlx::Error>`
    let user = User::create(
        &state.db,
        NewUser {
            name: req.name,
            email: req.email,
            password_hash,
        },
    )
    .await?;

    let access_token = jwt::issue_token(user.id, &state.tokens)?;

    tracing::info!(user_id = %user.id, "User signed up");

    Ok(Json(AuthResponse {
        user: user.public(),
        access_token,
    }))
}

/// Login with email and password
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Unknown email or wrong password (indistinguishable)
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let Some(user) = User::find_by_email(&state.db, &req.email).await? else {
        password::verify_dummy(&req.password);
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    if !password::verify_password(&req.password, &user.password_hash)? {
        tracing::debug!(user_id = %user.id, "Login rejected: wrong password");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let access_token = jwt::issue_token(user.id, &state.tokens)?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(AuthResponse {
        user: user.public(),
        access_token,
    }))
}

/// Logout
///
/// Tokens are not tracked server-side, so this only acknowledges.
pub async fn logout() -> Json<MessageResponse> {
    Json(MessageResponse::new("Logged out successfully"))
}

/// Current user
pub async fn me(Extension(auth): Extension<AuthContext>) -> Json<PublicUser> {
    Json(auth.user.public())
}
