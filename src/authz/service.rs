use std::collections::HashSet;
use std::sync::Arc;

use crate::context::RequestContext;
use crate::errors::{AppError, AppResult};
use crate::models::team::role_of;
use crate::models::{IssueId, Project, ProjectId, TeamId, UserId};
use crate::store::{IssueReader, ProjectReader, TeamReader};

use super::access::filter_accessible;

/// Answers access and management questions for the principal carried by a
/// [`RequestContext`].
///
/// Errors:
/// - `NotFound` when the project or issue does not exist
/// - `Forbidden` ("permission denied") when the principal's role is insufficient
/// - `Unauthorized` ("user not found") when no principal has been resolved
/// - anything else is a collaborator failure, returned unchanged
#[derive(Clone)]
pub struct PermissionService {
    projects: Arc<dyn ProjectReader>,
    issues: Arc<dyn IssueReader>,
    teams: Arc<dyn TeamReader>,
}

impl PermissionService {
    pub fn new(
        projects: Arc<dyn ProjectReader>,
        issues: Arc<dyn IssueReader>,
        teams: Arc<dyn TeamReader>,
    ) -> Self {
        Self { projects, issues, teams }
    }

    pub async fn can_access_project(&self, ctx: &RequestContext, project_id: ProjectId) -> AppResult<()> {
        // The project is loaded first so a missing project is NotFound even
        // for anonymous callers.
        let project = self.projects.get_by_id(project_id).await?;

        if ctx.is_superuser {
            return Ok(());
        }

        let Some(team_id) = project.team_id else {
            return Ok(());
        };

        let user_id = ctx.user_id.ok_or_else(AppError::user_not_found)?;
        let team_ids = self.team_ids_of(user_id).await?;

        if team_ids.contains(&team_id) {
            Ok(())
        } else {
            tracing::debug!(user_id, project_id, team_id, "not a member of the project team");
            Err(AppError::permission_denied())
        }
    }

    pub async fn can_access_issue(&self, ctx: &RequestContext, issue_id: IssueId) -> AppResult<()> {
        if ctx.is_superuser {
            return Ok(());
        }

        let issue = self.issues.get_by_id(issue_id).await?;
        self.can_access_project(ctx, issue.project_id).await
    }

    /// `issue_management` relaxes the rule for issue lifecycle changes: any
    /// team member (or any authenticated user on an ownerless project) passes.
    pub async fn can_manage_project(
        &self,
        ctx: &RequestContext,
        project_id: ProjectId,
        issue_management: bool,
    ) -> AppResult<()> {
        let project = self.projects.get_by_id(project_id).await?;

        if ctx.is_superuser {
            return Ok(());
        }

        let Some(team_id) = project.team_id else {
            if !issue_management {
                return Err(AppError::permission_denied());
            }
            return ctx.user_id.map(|_| ()).ok_or_else(AppError::user_not_found);
        };

        let user_id = ctx.user_id.ok_or_else(AppError::user_not_found)?;
        let members = self.teams.get_members(team_id).await?;

        match role_of(&members, user_id) {
            Some(role) if role.can_manage() || issue_management => Ok(()),
            role => {
                tracing::debug!(user_id, project_id, team_id, ?role, issue_management, "management denied");
                Err(AppError::permission_denied())
            }
        }
    }

    pub async fn can_manage_issue(&self, ctx: &RequestContext, issue_id: IssueId) -> AppResult<()> {
        if ctx.is_superuser {
            return Ok(());
        }

        let issue = self.issues.get_by_id(issue_id).await?;
        self.can_manage_project(ctx, issue.project_id, true).await
    }

    /// Filters `projects` down to those the principal may read.
    ///
    /// Returns `Unauthorized` without an identity: this may run before
    /// authentication has populated the context, and the caller is expected
    /// to let that authentication failure surface instead.
    pub async fn get_accessible_projects(
        &self,
        ctx: &RequestContext,
        projects: Vec<Project>,
    ) -> AppResult<Vec<Project>> {
        if ctx.is_superuser {
            return Ok(projects);
        }

        let user_id = ctx.user_id.ok_or_else(AppError::user_not_found)?;
        let team_ids = self.team_ids_of(user_id).await?;

        Ok(filter_accessible(projects, &team_ids))
    }

    async fn team_ids_of(&self, user_id: UserId) -> AppResult<HashSet<TeamId>> {
        let teams = self.teams.get_teams_by_user_id(user_id).await?;
        Ok(teams.into_iter().map(|team| team.id).collect())
    }
}
