use async_trait::async_trait;
use sqlx::SqlitePool;

use super::{IssueReader, ProjectReader, TeamReader, UserReader};
use crate::errors::{AppError, AppResult};
use crate::models::team::DbTeamMember;
use crate::models::{Issue, IssueId, Project, ProjectId, Team, TeamId, TeamMember, User, UserId};

#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeamReader for SqliteStore {
    async fn get_teams_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Team>> {
        let teams = sqlx::query_as::<_, Team>(
            "SELECT t.id, t.name FROM teams t JOIN team_members m ON m.team_id = t.id WHERE m.user_id = ? ORDER BY t.id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(teams)
    }

    async fn get_members(&self, team_id: TeamId) -> AppResult<Vec<TeamMember>> {
        let rows = sqlx::query_as::<_, DbTeamMember>(
            "SELECT team_id, user_id, role FROM team_members WHERE team_id = ? ORDER BY user_id",
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TeamMember::try_from).collect()
    }

    async fn list(&self) -> AppResult<Vec<Team>> {
        let teams = sqlx::query_as::<_, Team>("SELECT id, name FROM teams ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(teams)
    }
}

#[async_trait]
impl ProjectReader for SqliteStore {
    async fn get_by_id(&self, project_id: ProjectId) -> AppResult<Project> {
        sqlx::query_as::<_, Project>("SELECT id, name, team_id FROM projects WHERE id = ?")
            .bind(project_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::entity_not_found("project"))
    }

    async fn list(&self) -> AppResult<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>("SELECT id, name, team_id FROM projects ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(projects)
    }
}

#[async_trait]
impl IssueReader for SqliteStore {
    async fn get_by_id(&self, issue_id: IssueId) -> AppResult<Issue> {
        sqlx::query_as::<_, Issue>("SELECT id, project_id, title FROM issues WHERE id = ?")
            .bind(issue_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::entity_not_found("issue"))
    }
}

#[async_trait]
impl UserReader for SqliteStore {
    async fn get_by_id(&self, user_id: UserId) -> AppResult<User> {
        sqlx::query_as::<_, User>("SELECT id, username, is_superuser FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::entity_not_found("user"))
    }
}
