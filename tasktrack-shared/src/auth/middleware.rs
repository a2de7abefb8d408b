/// Request authentication
///
/// Resolves the raw `Authorization` header of an inbound call to a stored
/// user. The API layer runs this once per protected request and puts the
/// resulting [`AuthContext`] into the request extensions; handlers never
/// take identity from request bodies.
///
/// # Example
///
/// ```no_run
/// use tasktrack_shared::auth::jwt::TokenSettings;
/// use tasktrack_shared::auth::middleware::authenticate;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let settings = TokenSettings::hs256("your-secret-key-at-least-32-bytes-long");
/// let auth = authenticate(&pool, Some("Bearer eyJ..."), &settings).await?;
/// println!("caller: {}", auth.user.id);
/// # Ok(())
/// # }
/// ```

use sqlx::PgPool;
use uuid::Uuid;

use super::jwt::{resolve_token, JwtError, TokenSettings};
use crate::models::user::User;

/// Caller identity for the duration of one request
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// The authenticated user, freshly loaded from the store
    pub user: User,
}

impl AuthContext {
    /// Authenticated user ID
    pub fn user_id(&self) -> Uuid {
        self.user.id
    }
}

/// Error type for request authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No `Authorization` header
    #[error("Missing authorization header")]
    MissingCredentials,

    /// Header present but not `Bearer <token>`
    #[error("Invalid authorization header format")]
    InvalidFormat,

    /// Token failed verification
    #[error(transparent)]
    InvalidToken(#[from] JwtError),

    /// Token is valid but its subject no longer exists
    #[error("Token subject no longer exists")]
    UnknownSubject,

    /// Store look-up failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Extracts the token from a `Bearer <token>` header value
///
/// The scheme is matched case-insensitively; surrounding whitespace is
/// ignored.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MissingCredentials)?.trim();

    let (scheme, token) = header.split_once(' ').ok_or(AuthError::InvalidFormat)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidFormat);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::InvalidFormat);
    }

    Ok(token)
}

/// Resolves an `Authorization` header value to the user it identifies
///
/// # Errors
///
/// - `MissingCredentials` / `InvalidFormat` for an absent or malformed header
/// - `InvalidToken` for malformed, tampered, wrongly signed or expired tokens
/// - `UnknownSubject` if the user has been deleted since the token was issued
/// - `Database` if the look-up itself fails
pub async fn authenticate(
    pool: &PgPool,
    header: Option<&str>,
    settings: &TokenSettings,
) -> Result<AuthContext, AuthError> {
    let token = bearer_token(header)?;
    let user_id = resolve_token(token, settings)?;

    let user = User::find_by_id(pool, user_id)
        .await?
        .ok_or(AuthError::UnknownSubject)?;

    Ok(AuthContext { user })
}
