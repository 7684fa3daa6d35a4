use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use sqlx::SqlitePool;

use crate::authz::{PermissionService, SnapshotBuilder};
use crate::errors::AppError;
use crate::jwt::{JwtConfig, TokenService};
use crate::middleware::pipeline;
use crate::routes::{auth, health};
use crate::store::{SqliteStore, UserReader};

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub users: Arc<dyn UserReader>,
    pub permissions: PermissionService,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(pool: SqlitePool, jwt: JwtConfig) -> Self {
        let store = Arc::new(SqliteStore::new(pool.clone()));

        let permissions = PermissionService::new(store.clone(), store.clone(), store.clone());
        let snapshots = SnapshotBuilder::new(store.clone(), store.clone());

        Self {
            pool,
            users: store,
            permissions,
            tokens: TokenService::new(jwt, snapshots),
        }
    }
}

const DEFAULT_PORT: u16 = 8000;

/// Listening port from `APP_PORT`, 8000 when unset.
pub fn port_from_env() -> Result<u16, AppError> {
    parse_port(std::env::var("APP_PORT").ok().as_deref())
}

fn parse_port(raw: Option<&str>) -> Result<u16, AppError> {
    match raw {
        None => Ok(DEFAULT_PORT),
        Some(value) => value
            .trim()
            .parse::<u16>()
            .map_err(|_| AppError::configuration(format!("APP_PORT must be a valid port, got {value:?}"))),
    }
}

pub async fn create_app(pool: SqlitePool) -> Result<Router, AppError> {
    let jwt_config = JwtConfig::from_env()?;
    let state = AppState::new(pool, jwt_config);

    Ok(build_router(state, Router::new()))
}

/// Mounts the built-in `/api` routes next to `handlers` and puts both behind
/// the authorization pipeline.
pub fn build_router(state: AppState, handlers: Router<AppState>) -> Router {
    let auth_routes = Router::new()
        .route("/refresh", post(auth::refresh))
        .route("/session", get(auth::session));

    let router = Router::new()
        .route("/api/health", get(health::health))
        .nest("/api/auth", auth_routes)
        .merge(handlers);

    pipeline(router, &state).with_state(state)
}
