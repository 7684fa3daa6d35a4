//! Read-only collaborator contracts the authorization core depends on.
//!
//! Implementations must be safe to share between in-flight requests. A
//! missing row surfaces as `AppError::NotFound`; anything else the backend
//! reports is passed through untouched.

mod sqlite;

pub use sqlite::SqliteStore;

use async_trait::async_trait;

use crate::errors::AppResult;
use crate::models::{Issue, IssueId, Project, ProjectId, Team, TeamId, TeamMember, User, UserId};

#[async_trait]
pub trait TeamReader: Send + Sync {
    async fn get_teams_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Team>>;
    async fn get_members(&self, team_id: TeamId) -> AppResult<Vec<TeamMember>>;
    async fn list(&self) -> AppResult<Vec<Team>>;
}

#[async_trait]
pub trait ProjectReader: Send + Sync {
    async fn get_by_id(&self, project_id: ProjectId) -> AppResult<Project>;
    async fn list(&self) -> AppResult<Vec<Project>>;
}

#[async_trait]
pub trait IssueReader: Send + Sync {
    async fn get_by_id(&self, issue_id: IssueId) -> AppResult<Issue>;
}

#[async_trait]
pub trait UserReader: Send + Sync {
    async fn get_by_id(&self, user_id: UserId) -> AppResult<User>;
}
