/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use tasktrack_api::{app::{build_router, AppState}, config::Config};
/// use tasktrack_shared::db::pool::create_pool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(&config.database.pool_config()).await?;
/// let app = build_router(AppState::new(pool, config));
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, routes};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tasktrack_shared::auth::{jwt::TokenSettings, middleware::authenticate};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Token signing parameters derived from `config.jwt`
    pub tokens: Arc<TokenSettings>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        let tokens = Arc::new(config.jwt.token_settings());

        Self {
            db,
            config: Arc::new(config),
            tokens,
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /                       # Service info (public)
/// ├── GET  /health                 # Health check (public)
/// ├── /auth/
/// │   ├── POST /signup             # public
/// │   ├── POST /login              # public
/// │   ├── POST /logout             # public
/// │   └── GET  /me                 # authenticated
/// ├── /projects                    # authenticated
/// │   ├── GET, POST /
/// │   ├── GET, PUT, DELETE /:id
/// │   └── GET, POST /:id/tasks
/// └── /tasks                       # authenticated
///     ├── GET /
///     └── GET, PUT, DELETE /:id
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Authentication (protected routes only)
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::health_check))
        .route("/auth/signup", post(routes::auth::signup))
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/logout", post(routes::auth::logout));

    let protected_routes = Router::new()
        .route("/auth/me", get(routes::auth::me))
        .route(
            "/projects",
            get(routes::projects::list_projects).post(routes::projects::create_project),
        )
        .route(
            "/projects/:id",
            get(routes::projects::get_project)
                .put(routes::projects::update_project)
                .delete(routes::projects::delete_project),
        )
        .route(
            "/projects/:id/tasks",
            get(routes::tasks::list_project_tasks).post(routes::tasks::create_task),
        )
        .route("/tasks", get(routes::tasks::list_tasks))
        .route(
            "/tasks/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_layer));

    let cors = cors_layer(&state.config.api.cors_origins);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        // Development mode: permissive CORS
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

/// JWT authentication middleware layer
///
/// Resolves the bearer token to a stored user, then injects `AuthContext`
/// into request extensions.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let auth_context = authenticate(&state.db, header, &state.tokens).await?;

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_accepts_configured_origins() {
        // Construction must not panic for either mode
        let _ = cors_layer(&["*".to_string()]);
        let _ = cors_layer(&[
            "http://localhost:5173".to_string(),
            "not a header\nvalue".to_string(),
        ]);
    }
}
