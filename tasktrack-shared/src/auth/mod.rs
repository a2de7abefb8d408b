/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Bearer token issuing and resolution
/// - [`middleware`]: Resolves an `Authorization` header to a stored user
///
/// # Example
///
/// ```
/// use tasktrack_shared::auth::jwt::{issue_token, resolve_token, TokenSettings};
/// use tasktrack_shared::auth::password::{hash_password, verify_password};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let settings = TokenSettings::hs256("a-secret-that-is-at-least-32-bytes!!");
/// let user_id = Uuid::new_v4();
/// let token = issue_token(user_id, &settings)?;
/// assert_eq!(resolve_token(&token, &settings)?, user_id);
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
