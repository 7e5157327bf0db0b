/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use taskmanager_api::{app::AppState, config::Config};
/// use taskmanager_shared::{db::pool, store::postgres::PgUserStore};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = pool::create_pool(pool::DatabaseConfig {
///     url: config.database.url.clone(),
///     ..Default::default()
/// })
/// .await?;
/// let state = AppState::new(Arc::new(PgUserStore::new(pool)), config);
/// let app = taskmanager_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, middleware::security::SecurityHeadersLayer};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use taskmanager_shared::{
    auth::{
        jwt::JwtKeys,
        middleware::{bearer_token, AuthContext},
    },
    store::UserStore,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// User document store
    pub store: Arc<dyn UserStore>,

    /// Application configuration
    pub config: Arc<Config>,

    jwt: Arc<JwtKeys>,
}

impl AppState {
    /// Creates new application state
    pub fn new(store: Arc<dyn UserStore>, config: Config) -> Self {
        let jwt = Arc::new(config.jwt.keys());

        Self {
            store,
            config: Arc::new(config),
            jwt,
        }
    }

    /// Keys for issuing and verifying tokens
    pub fn jwt(&self) -> &JwtKeys {
        &self.jwt
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// ```text
/// /
/// ├── GET    /                       # Greeting (public)
/// ├── GET    /health                 # Health check (public)
/// ├── POST   /signup                 # public
/// ├── POST   /login                  # public
/// ├── GET    /profile                # authenticated
/// ├── PUT    /editprofile/username   # authenticated
/// ├── PUT    /editprofile/password   # authenticated
/// ├── GET    /tasks                  # authenticated
/// ├── POST   /tasks                  # authenticated
/// ├── PUT    /tasks/:id              # authenticated
/// └── DELETE /tasks/:id              # authenticated
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Security headers
/// 2. CORS (tower-http CorsLayer)
/// 3. Logging (tower-http TraceLayer)
/// 4. Authentication (protected routes only)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let public_routes = Router::new()
        .route("/", get(routes::health::greeting))
        .route("/health", get(routes::health::health_check))
        .route("/signup", post(routes::auth::signup))
        .route("/login", post(routes::auth::login));

    // route_layer keeps unmatched paths as 404 instead of 401
    let protected_routes = Router::new()
        .route("/profile", get(routes::profile::get_profile))
        .route("/editprofile/username", put(routes::profile::edit_username))
        .route("/editprofile/password", put(routes::profile::edit_password))
        .route(
            "/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/tasks/:id",
            put(routes::tasks::update_task).delete(routes::tasks::delete_task),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_layer));

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.iter().any(|origin| origin == "*") {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
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
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Verifies the bearer token before the handler runs and injects an
/// [`AuthContext`] into the request extensions. Rejected requests never
/// reach the store.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(req.headers())?;
    let claims = state.jwt().verify(token)?;

    req.extensions_mut().insert(AuthContext::from_claims(claims));

    Ok(next.run(req).await)
}
