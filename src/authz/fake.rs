//! In-memory readers with failure injection for unit tests.

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;

use crate::errors::{AppError, AppResult};
use crate::models::{Issue, IssueId, Project, ProjectId, Role, Team, TeamId, TeamMember, UserId};
use crate::store::{IssueReader, ProjectReader, TeamReader};

#[derive(Debug, Default)]
pub struct FakeStore {
    teams: BTreeMap<TeamId, Team>,
    members: Vec<TeamMember>,
    projects: BTreeMap<ProjectId, Project>,
    issues: BTreeMap<IssueId, Issue>,
    failing_members: HashSet<TeamId>,
    fail_user_teams: bool,
    fail_team_list: bool,
    fail_project_list: bool,
}

impl FakeStore {
    pub fn with_team(mut self, id: TeamId, name: &str) -> Self {
        self.teams.insert(id, Team { id, name: name.to_string() });
        self
    }

    pub fn with_member(mut self, team_id: TeamId, user_id: UserId, role: Role) -> Self {
        self.members.push(TeamMember { team_id, user_id, role });
        self
    }

    pub fn with_project(mut self, id: ProjectId, team_id: Option<TeamId>) -> Self {
        self.projects.insert(
            id,
            Project {
                id,
                name: format!("project-{id}"),
                team_id,
            },
        );
        self
    }

    pub fn with_issue(mut self, id: IssueId, project_id: ProjectId) -> Self {
        self.issues.insert(
            id,
            Issue {
                id,
                project_id,
                title: format!("issue-{id}"),
            },
        );
        self
    }

    pub fn failing_members(mut self, team_id: TeamId) -> Self {
        self.failing_members.insert(team_id);
        self
    }

    pub fn failing_user_teams(mut self) -> Self {
        self.fail_user_teams = true;
        self
    }

    pub fn failing_team_list(mut self) -> Self {
        self.fail_team_list = true;
        self
    }

    pub fn failing_project_list(mut self) -> Self {
        self.fail_project_list = true;
        self
    }
}

fn unavailable(what: &str) -> AppError {
    AppError::internal(format!("{what} unavailable"))
}

#[async_trait]
impl TeamReader for FakeStore {
    async fn get_teams_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Team>> {
        if self.fail_user_teams {
            return Err(unavailable("user teams"));
        }
        let ids: HashSet<TeamId> = self
            .members
            .iter()
            .filter(|m| m.user_id == user_id)
            .map(|m| m.team_id)
            .collect();
        Ok(self.teams.values().filter(|t| ids.contains(&t.id)).cloned().collect())
    }

    async fn get_members(&self, team_id: TeamId) -> AppResult<Vec<TeamMember>> {
        if self.failing_members.contains(&team_id) {
            return Err(unavailable("team members"));
        }
        Ok(self.members.iter().filter(|m| m.team_id == team_id).cloned().collect())
    }

    async fn list(&self) -> AppResult<Vec<Team>> {
        if self.fail_team_list {
            return Err(unavailable("team list"));
        }
        Ok(self.teams.values().cloned().collect())
    }
}

#[async_trait]
impl ProjectReader for FakeStore {
    async fn get_by_id(&self, project_id: ProjectId) -> AppResult<Project> {
        self.projects
            .get(&project_id)
            .cloned()
            .ok_or_else(|| AppError::entity_not_found("project"))
    }

    async fn list(&self) -> AppResult<Vec<Project>> {
        if self.fail_project_list {
            return Err(unavailable("project list"));
        }
        Ok(self.projects.values().cloned().collect())
    }
}

#[async_trait]
impl IssueReader for FakeStore {
    async fn get_by_id(&self, issue_id: IssueId) -> AppResult<Issue> {
        self.issues
            .get(&issue_id)
            .cloned()
            .ok_or_else(|| AppError::entity_not_found("issue"))
    }
}
