//! Request pipeline placed in front of the business handlers.
//!
//! Fixed order, outermost first:
//! CORS, raw request trace, authentication, project access, project
//! management, issue access, issue management, handler.

mod auth;
mod issue;
pub mod path;
mod project;

pub use auth::authenticate;
pub use issue::{issue_access, issue_management};
pub use project::{project_access, project_management};

use std::fmt;

use axum::http::Method;
use axum::middleware::from_fn_with_state;
use axum::response::{IntoResponse, Response};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::app::AppState;
use crate::context::RequestContext;
use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ProjectAccess,
    ProjectManagement,
    IssueAccess,
    IssueManagement,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ProjectAccess => "project_access",
            Stage::ProjectManagement => "project_management",
            Stage::IssueAccess => "issue_access",
            Stage::IssueManagement => "issue_management",
        };
        f.write_str(name)
    }
}

/// Logs the rejection and renders the JSON error response.
pub(crate) fn reject(stage: Stage, ctx: &RequestContext, err: AppError) -> Response {
    if err.status().is_server_error() {
        tracing::error!(
            %stage,
            user_id = ?ctx.user_id,
            project_id = ?ctx.project_id,
            issue_id = ?ctx.issue_id,
            error = ?err,
            "authorization check failed"
        );
    } else {
        tracing::warn!(
            %stage,
            user_id = ?ctx.user_id,
            project_id = ?ctx.project_id,
            issue_id = ?ctx.issue_id,
            error = %err,
            "request rejected"
        );
    }

    err.into_response()
}

pub fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_origin(Any)
        .allow_headers(Any)
}

/// Wraps `router` in the authorization pipeline. Layers added last run first.
pub fn pipeline(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    router
        .layer(from_fn_with_state(state.clone(), issue_management))
        .layer(from_fn_with_state(state.clone(), issue_access))
        .layer(from_fn_with_state(state.clone(), project_management))
        .layer(from_fn_with_state(state.clone(), project_access))
        .layer(from_fn_with_state(state.clone(), authenticate))
        .layer(TraceLayer::new_for_http())
        .layer(cors())
}
