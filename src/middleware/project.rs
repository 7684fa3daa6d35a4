//! Project access and project management stages.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use super::path::{is_read_only, ResourcePath, Target};
use super::{reject, Stage};
use crate::app::AppState;
use crate::context::RequestContext;

/// Requires read access to the project named in the path. Collection
/// requests (including creates, which have no id yet) and placeholders pass
/// through untouched.
pub async fn project_access(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let target = ResourcePath::parse(request.uri().path()).project_target();
    let ctx = RequestContext::from_extensions(request.extensions());

    let project_id = match target {
        Ok(Target::Bypass) => return next.run(request).await,
        Ok(Target::Id(id)) => id,
        Err(err) => return reject(Stage::ProjectAccess, &ctx, err),
    };

    if let Err(err) = state.permissions.can_access_project(&ctx, project_id).await {
        return reject(Stage::ProjectAccess, &ctx.with_project(project_id), err);
    }

    request.extensions_mut().insert(ctx.with_project(project_id));
    next.run(request).await
}

/// Requires management rights for mutating requests on a project. The
/// `stats` sub-resource is read-only whatever the verb, and requests aimed at
/// the project's issues are checked with the issue-management relaxation.
pub async fn project_management(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    if is_read_only(request.method()) {
        return next.run(request).await;
    }

    let (target, issue_management) = {
        let path = ResourcePath::parse(request.uri().path());
        let target = if path.is_project_stats() {
            Ok(Target::Bypass)
        } else {
            path.project_target()
        };
        (target, path.is_issue_management())
    };
    let ctx = RequestContext::from_extensions(request.extensions());

    let project_id = match target {
        Ok(Target::Bypass) => return next.run(request).await,
        Ok(Target::Id(id)) => id,
        Err(err) => return reject(Stage::ProjectManagement, &ctx, err),
    };

    if let Err(err) = state
        .permissions
        .can_manage_project(&ctx, project_id, issue_management)
        .await
    {
        return reject(Stage::ProjectManagement, &ctx.with_project(project_id), err);
    }

    request.extensions_mut().insert(ctx.with_project(project_id));
    next.run(request).await
}
