/// Bearer token issuing and resolution
///
/// Tokens are JWTs signed with a shared secret. They carry the user id as
/// subject, issue and expiry timestamps, and a `type` marker so other token
/// classes can be introduced later without being mistaken for access tokens.
///
/// # Security
///
/// - **Algorithm**: HMAC family (HS256 by default, HS384/HS512 configurable)
/// - **Expiration**: Configurable, 7 days by default, no leeway
/// - **Secret Management**: Secrets should be at least 32 bytes (256 bits)
///
/// # Example
///
/// ```
/// use tasktrack_shared::auth::jwt::{issue_token, resolve_token, TokenSettings};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let settings = TokenSettings::hs256("your-secret-key-at-least-32-bytes-long");
/// let user_id = Uuid::new_v4();
///
/// let token = issue_token(user_id, &settings)?;
/// assert_eq!(resolve_token(&token, &settings)?, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Default token lifetime in days
pub const DEFAULT_TOKEN_LIFETIME_DAYS: i64 = 7;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Token is malformed, unsigned, tampered with or of the wrong type
    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

/// Token class marker carried in the `type` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Access token presented as `Authorization: Bearer <token>`
    Access,
}

/// JWT claims structure
///
/// - `sub`: Subject (user ID)
/// - `iat`: Issued at (Unix timestamp)
/// - `exp`: Expiration (Unix timestamp)
/// - `type`: Token class
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - User ID
    pub sub: Uuid,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Token type
    #[serde(rename = "type")]
    pub token_type: TokenType,
}

impl Claims {
    /// Creates access-token claims for `user_id` expiring after `lifetime`
    pub fn new(user_id: Uuid, lifetime: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
            token_type: TokenType::Access,
        }
    }
}

/// Signing parameters, built once from configuration
#[derive(Clone)]
pub struct TokenSettings {
    secret: String,
    algorithm: Algorithm,
    lifetime: Duration,
}

impl TokenSettings {
    /// Creates token settings
    pub fn new(secret: impl Into<String>, algorithm: Algorithm, lifetime: Duration) -> Self {
        Self {
            secret: secret.into(),
            algorithm,
            lifetime,
        }
    }

    /// HS256 settings with the default 7-day lifetime
    pub fn hs256(secret: impl Into<String>) -> Self {
        Self::new(
            secret,
            Algorithm::HS256,
            Duration::days(DEFAULT_TOKEN_LIFETIME_DAYS),
        )
    }

    /// How long issued tokens stay valid
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }
}

impl fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

/// Signs `claims` into a JWT string
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails.
pub fn create_token(claims: &Claims, settings: &TokenSettings) -> Result<String, JwtError> {
    let header = Header::new(settings.algorithm);
    let key = EncodingKey::from_secret(settings.secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Issues a fresh access token for `user_id`
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails.
pub fn issue_token(user_id: Uuid, settings: &TokenSettings) -> Result<String, JwtError> {
    create_token(&Claims::new(user_id, settings.lifetime()), settings)
}

/// Validates a JWT and returns its claims
///
/// Verifies the signature with the configured algorithm, requires `exp` and
/// `sub`, and rejects expired tokens without leeway.
///
/// # Errors
///
/// - `JwtError::Expired` if the token is past its expiry
/// - `JwtError::InvalidToken` for anything else (bad signature, wrong
///   algorithm, malformed input, unknown token type)
pub fn validate_token(token: &str, settings: &TokenSettings) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(settings.secret.as_bytes());

    let mut validation = Validation::new(settings.algorithm);
    validation.leeway = 0;
    validation.validate_exp = true;
    validation.set_required_spec_claims(&["exp", "sub"]);

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::InvalidToken(e.to_string()),
    })?;

    Ok(token_data.claims)
}

/// Resolves a bearer token to the user id it was issued for
///
/// # Errors
///
/// Same as [`validate_token`].
pub fn resolve_token(token: &str, settings: &TokenSettings) -> Result<Uuid, JwtError> {
    validate_token(token, settings).map(|claims| claims.sub)
}
