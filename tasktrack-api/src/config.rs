/// Configuration management for the API server
///
/// Configuration is read once at startup from the process environment
/// (optionally seeded from a `.env` file) and handed to the router inside
/// `AppState`. Nothing reads the environment after that.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `PORT`: Port to bind to (default: 5000)
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `JWT_SECRET`: Secret key for token signing (required, at least 32 characters)
/// - `JWT_ALGORITHM`: HS256, HS384 or HS512 (default: HS256)
/// - `JWT_EXPIRATION_DAYS`: Token lifetime in days, 1 to 3650 (default: 7)
/// - `FRONTEND_URL`: Allowed cross-origin caller (default: http://localhost:5173, `*` allows any)
/// - `PRODUCTION`: Production mode flag (default: false)
/// - `RUST_LOG`: Log filter (default: tasktrack_api=debug,tower_http=debug)
///
/// # Example
///
/// ```no_run
/// use tasktrack_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use anyhow::Context;
use chrono::Duration;
use config::{builder::DefaultState, ConfigBuilder, ConfigError, Environment};
use jsonwebtoken::Algorithm;
use std::str::FromStr;
use tasktrack_shared::{auth::jwt::TokenSettings, db::pool};

/// Frontend origin used when `FRONTEND_URL` is unset
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";

/// Local development origins that are always allowed
const LOCAL_DEV_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://localhost:3000"];

/// Shortest accepted signing secret
const MIN_SECRET_LEN: usize = 32;

/// Longest accepted token lifetime (ten years)
const MAX_EXPIRATION_DAYS: i64 = 3650;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT configuration
    pub jwt: JwtConfig,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins; `["*"]` means any origin
    pub cors_origins: Vec<String>,

    /// Production mode
    pub production: bool,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for token signing
    ///
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,

    /// HMAC signing algorithm
    pub algorithm: Algorithm,

    /// Token lifetime in days
    pub expiration_days: i64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("expiration_days", &self.expiration_days)
            .finish()
    }
}

impl DatabaseConfig {
    /// Pool settings for the shared database layer
    pub fn pool_config(&self) -> pool::DatabaseConfig {
        pool::DatabaseConfig {
            max_connections: self.max_connections,
            ..pool::DatabaseConfig::new(self.url.clone())
        }
    }
}

impl JwtConfig {
    /// Signing parameters for issuing and resolving tokens
    pub fn token_settings(&self) -> TokenSettings {
        TokenSettings::new(
            self.secret.clone(),
            self.algorithm,
            Duration::days(self.expiration_days),
        )
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// A `.env` file in the working directory is loaded first if present.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing
    /// - Environment variables have invalid values
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let source = Self::defaults()?
            .add_source(Environment::default())
            .build()
            .context("Failed to read configuration from environment")?;

        Self::from_config(&source)
    }

    /// Builder pre-populated with every optional setting's default
    ///
    /// Keys are the lowercase forms of the environment variable names.
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        config::Config::builder()
            .set_default("api_host", "0.0.0.0")?
            .set_default("port", 5000_i64)?
            .set_default("database_max_connections", 10_i64)?
            .set_default("jwt_algorithm", "HS256")?
            .set_default("jwt_expiration_days", 7_i64)?
            .set_default("frontend_url", DEFAULT_FRONTEND_URL)?
            .set_default("production", false)
    }

    /// Builds and validates configuration from an already-assembled source
    ///
    /// # Errors
    ///
    /// Returns an error if a required key is missing or a value is invalid.
    pub fn from_config(source: &config::Config) -> anyhow::Result<Self> {
        let database_url = source
            .get_string("database_url")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let jwt_secret = source
            .get_string("jwt_secret")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if jwt_secret.len() < MIN_SECRET_LEN {
            anyhow::bail!("JWT_SECRET must be at least {} characters long", MIN_SECRET_LEN);
        }

        let algorithm = parse_algorithm(&source.get_string("jwt_algorithm")?)?;

        let expiration_days: i64 = source
            .get("jwt_expiration_days")
            .context("JWT_EXPIRATION_DAYS must be an integer")?;
        if !(1..=MAX_EXPIRATION_DAYS).contains(&expiration_days) {
            anyhow::bail!(
                "JWT_EXPIRATION_DAYS must be between 1 and {}",
                MAX_EXPIRATION_DAYS
            );
        }

        let port: u16 = source.get("port").context("PORT must be a valid port number")?;
        let max_connections: u32 = source
            .get("database_max_connections")
            .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?;

        Ok(Self {
            api: ApiConfig {
                host: source.get_string("api_host")?,
                port,
                cors_origins: cors_origins(&source.get_string("frontend_url")?),
                production: source.get_bool("production")?,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            jwt: JwtConfig {
                secret: jwt_secret,
                algorithm,
                expiration_days,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

fn parse_algorithm(raw: &str) -> anyhow::Result<Algorithm> {
    let algorithm = Algorithm::from_str(&raw.trim().to_uppercase())
        .map_err(|_| anyhow::anyhow!("Unknown JWT_ALGORITHM: {}", raw))?;

    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(algorithm),
        _ => anyhow::bail!("JWT_ALGORITHM must be one of HS256, HS384, HS512"),
    }
}

fn cors_origins(frontend_url: &str) -> Vec<String> {
    let frontend_url = frontend_url.trim().trim_end_matches('/');
    if frontend_url == "*" {
        return vec!["*".to_string()];
    }

    let mut origins = vec![frontend_url.to_string()];
    for origin in LOCAL_DEV_ORIGINS {
        if !origins.iter().any(|o| o == origin) {
            origins.push(origin.to_string());
        }
    }
    origins
}
