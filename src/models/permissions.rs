use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ProjectId, Role, TeamId};

/// Capabilities on a single project as seen at token issuance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPermission {
    pub can_read: bool,
    pub can_write: bool,
    pub can_delete: bool,
    pub can_manage: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_role: Option<Role>,
}

impl ProjectPermission {
    pub fn full(role: Role) -> Self {
        Self {
            can_read: true,
            can_write: true,
            can_delete: true,
            can_manage: true,
            team_role: Some(role),
        }
    }

    pub fn read_only(team_role: Option<Role>) -> Self {
        Self {
            can_read: true,
            team_role,
            ..Self::default()
        }
    }

    pub fn for_role(role: Role) -> Self {
        if role.can_manage() {
            Self::full(role)
        } else {
            Self::read_only(Some(role))
        }
    }
}

/// Point-in-time permission snapshot embedded in access tokens.
///
/// Never refreshed in place: it stays as computed until the access token
/// expires, so the access-token TTL bounds how stale it can be.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPermissions {
    #[serde(default)]
    pub project_permissions: BTreeMap<ProjectId, ProjectPermission>,
    #[serde(default)]
    pub team_roles: BTreeMap<TeamId, Role>,
    #[serde(default)]
    pub can_create_projects: bool,
    #[serde(default)]
    pub can_create_teams: bool,
    #[serde(default)]
    pub can_manage_users: bool,
}

impl UserPermissions {
    pub fn project(&self, project_id: ProjectId) -> Option<&ProjectPermission> {
        self.project_permissions.get(&project_id)
    }
}
