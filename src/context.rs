//! Request-scoped identity and resolved resource identifiers.
//!
//! Each pipeline stage reads the current [`RequestContext`] from the request
//! extensions, derives an augmented copy and re-inserts it. Values are set once
//! and never mutated afterwards.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::Extensions;
use serde::Serialize;

use crate::models::{IssueId, ProjectId, UserId};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestContext {
    pub user_id: Option<UserId>,
    pub is_superuser: bool,
    pub project_id: Option<ProjectId>,
    pub issue_id: Option<IssueId>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn for_user(user_id: UserId, is_superuser: bool) -> Self {
        Self::default().with_principal(user_id, is_superuser)
    }

    pub fn with_principal(&self, user_id: UserId, is_superuser: bool) -> Self {
        Self {
            user_id: Some(user_id),
            is_superuser,
            ..self.clone()
        }
    }

    pub fn with_project(&self, project_id: ProjectId) -> Self {
        Self {
            project_id: Some(project_id),
            ..self.clone()
        }
    }

    pub fn with_issue(&self, issue_id: IssueId) -> Self {
        Self {
            issue_id: Some(issue_id),
            ..self.clone()
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    /// Context carried by `extensions`, anonymous when no stage has set one.
    pub fn from_extensions(extensions: &Extensions) -> Self {
        extensions.get::<RequestContext>().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(RequestContext::from_extensions(&parts.extensions))
    }
}
