//! Issue access and issue management stages.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use super::path::{is_read_only, ResourcePath, Target};
use super::{reject, Stage};
use crate::app::AppState;
use crate::context::RequestContext;

pub async fn issue_access(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let target = ResourcePath::parse(request.uri().path()).issue_target();
    let ctx = RequestContext::from_extensions(request.extensions());

    let issue_id = match target {
        Ok(Target::Bypass) => return next.run(request).await,
        Ok(Target::Id(id)) => id,
        Err(err) => return reject(Stage::IssueAccess, &ctx, err),
    };

    if let Err(err) = state.permissions.can_access_issue(&ctx, issue_id).await {
        return reject(Stage::IssueAccess, &ctx.with_issue(issue_id), err);
    }

    request.extensions_mut().insert(ctx.with_issue(issue_id));
    next.run(request).await
}

pub async fn issue_management(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    if is_read_only(request.method()) {
        return next.run(request).await;
    }

    let target = ResourcePath::parse(request.uri().path()).issue_target();
    let ctx = RequestContext::from_extensions(request.extensions());

    let issue_id = match target {
        Ok(Target::Bypass) => return next.run(request).await,
        Ok(Target::Id(id)) => id,
        Err(err) => return reject(Stage::IssueManagement, &ctx, err),
    };

    if let Err(err) = state.permissions.can_manage_issue(&ctx, issue_id).await {
        return reject(Stage::IssueManagement, &ctx.with_issue(issue_id), err);
    }

    request.extensions_mut().insert(ctx.with_issue(issue_id));
    next.run(request).await
}
