use std::collections::HashSet;
use std::sync::Arc;

use crate::errors::AppResult;
use crate::models::team::role_of;
use crate::models::{ProjectPermission, Role, TeamId, User, UserPermissions};
use crate::store::{ProjectReader, TeamReader};

use super::access::filter_accessible;

/// Computes the [`UserPermissions`] snapshot frozen into access tokens.
///
/// Runs once per token issuance, never per request. The work is best effort:
/// a failed membership lookup for one team skips that team, while a failed
/// top-level team or project listing stops the computation and the snapshot
/// is returned with whatever had been filled in so far.
#[derive(Clone)]
pub struct SnapshotBuilder {
    projects: Arc<dyn ProjectReader>,
    teams: Arc<dyn TeamReader>,
}

impl SnapshotBuilder {
    pub fn new(projects: Arc<dyn ProjectReader>, teams: Arc<dyn TeamReader>) -> Self {
        Self { projects, teams }
    }

    pub async fn build(&self, user: &User) -> UserPermissions {
        let mut snapshot = UserPermissions::default();

        let outcome = if user.is_superuser {
            self.fill_superuser(&mut snapshot).await
        } else {
            self.fill_regular(user, &mut snapshot).await
        };

        if let Err(err) = outcome {
            tracing::error!(
                user_id = user.id,
                error = %err,
                "permission snapshot aborted, issuing token with partial permissions"
            );
        }

        snapshot
    }

    async fn fill_superuser(&self, snapshot: &mut UserPermissions) -> AppResult<()> {
        snapshot.can_create_projects = true;
        snapshot.can_create_teams = true;
        snapshot.can_manage_users = true;

        for project in self.projects.list().await? {
            snapshot
                .project_permissions
                .insert(project.id, ProjectPermission::full(Role::Owner));
        }

        for team in self.teams.list().await? {
            snapshot.team_roles.insert(team.id, Role::Owner);
        }

        Ok(())
    }

    async fn fill_regular(&self, user: &User, snapshot: &mut UserPermissions) -> AppResult<()> {
        let teams = self.teams.get_teams_by_user_id(user.id).await?;
        let team_ids: HashSet<TeamId> = teams.iter().map(|team| team.id).collect();

        for team in &teams {
            let members = match self.teams.get_members(team.id).await {
                Ok(members) => members,
                Err(err) => {
                    tracing::warn!(
                        user_id = user.id,
                        team_id = team.id,
                        error = %err,
                        "skipping team in permission snapshot"
                    );
                    continue;
                }
            };

            if let Some(role) = role_of(&members, user.id) {
                snapshot.team_roles.insert(team.id, role);
                if role.can_manage() {
                    snapshot.can_create_projects = true;
                    snapshot.can_create_teams = true;
                }
            }
        }

        let projects = self.projects.list().await?;
        for project in filter_accessible(projects, &team_ids) {
            let permission = match project.team_id {
                Some(team_id) => match snapshot.team_roles.get(&team_id) {
                    Some(role) => ProjectPermission::for_role(*role),
                    None => ProjectPermission::read_only(None),
                },
                None => ProjectPermission::read_only(None),
            };
            snapshot.project_permissions.insert(project.id, permission);
        }

        Ok(())
    }
}
