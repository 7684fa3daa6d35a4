#![allow(dead_code)]

use anyhow::{Context, Result};
use axum::body::{self, Body};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::{Json, Router};
use serde_json::Value;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::util::ServiceExt;

use tracker_authz::jwt::JwtConfig;
use tracker_authz::models::User;
use tracker_authz::{build_router, AppState, RequestContext};

pub const ROOT: i64 = 1;
pub const OWNER: i64 = 42;
pub const MEMBER: i64 = 44;
pub const OUTSIDER: i64 = 45;

pub const OWNERLESS_PROJECT: i64 = 1;
pub const TEAM_PROJECT: i64 = 123;
pub const OTHER_PROJECT: i64 = 200;

pub const OWNERLESS_ISSUE: i64 = 10;
pub const TEAM_ISSUE: i64 = 11;
pub const OTHER_ISSUE: i64 = 20;

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub pool: SqlitePool,
    _dir: TempDir,
}

async fn echo_context(ctx: RequestContext) -> Json<RequestContext> {
    Json(ctx)
}

/// Migrated temp database seeded with:
/// team 7 (42 owner, 44 member) owning project 123 / issue 11,
/// team 8 (45 owner) owning project 200 / issue 20,
/// ownerless project 1 / issue 10, superuser 1.
pub async fn spawn() -> Result<TestApp> {
    let dir = tempfile::tempdir().context("failed to create tempdir")?;
    let opts = SqliteConnectOptions::new()
        .filename(dir.path().join("authz.db"))
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(opts).await?;

    let migrator = sqlx::migrate::Migrator::new(std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations"))
        .await?;
    migrator.run(&pool).await?;

    seed(&pool).await?;

    let state = AppState::new(pool.clone(), JwtConfig::new("test-secret"));
    let handlers = Router::new().fallback(echo_context);
    let router = build_router(state.clone(), handlers);

    Ok(TestApp {
        router,
        state,
        pool,
        _dir: dir,
    })
}

async fn seed(pool: &SqlitePool) -> Result<()> {
    let statements = [
        "INSERT INTO users (id, username, is_superuser) VALUES (1, 'root', 1), (42, 'olivia', 0), (44, 'mika', 0), (45, 'sam', 0)",
        "INSERT INTO teams (id, name) VALUES (7, 'core'), (8, 'platform')",
        "INSERT INTO team_members (team_id, user_id, role) VALUES (7, 42, 'owner'), (7, 44, 'member'), (8, 45, 'owner')",
        "INSERT INTO projects (id, name, team_id) VALUES (1, 'public', NULL), (123, 'tracker', 7), (200, 'infra', 8)",
        "INSERT INTO issues (id, project_id, title) VALUES (10, 1, 'typo'), (11, 123, 'crash'), (20, 200, 'disk')",
    ];

    for sql in statements {
        sqlx::query(sql).execute(pool).await?;
    }

    Ok(())
}

impl TestApp {
    pub async fn user(&self, id: i64) -> Result<User> {
        let user = sqlx::query_as::<_, User>("SELECT id, username, is_superuser FROM users WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn access_token(&self, id: i64) -> Result<String> {
        let user = self.user(id).await?;
        Ok(self.state.tokens.access_token(&user).await?)
    }

    pub async fn send(&self, method: Method, uri: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        self.call(builder.body(Body::empty())?).await
    }

    pub async fn call(&self, req: Request<Body>) -> Result<(StatusCode, Value)> {
        let resp: Response = self.router.clone().oneshot(req).await?;
        let status = resp.status();
        let bytes = body::to_bytes(resp.into_body(), 10_485_760).await?;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).with_context(|| format!("non-json body: {}", String::from_utf8_lossy(&bytes)))?
        };
        Ok((status, value))
    }
}
