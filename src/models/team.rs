use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{Role, TeamId, UserId};
use crate::errors::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub team_id: TeamId,
    pub user_id: UserId,
    pub role: Role,
}

#[derive(Debug, Clone, FromRow)]
pub struct DbTeamMember {
    pub team_id: TeamId,
    pub user_id: UserId,
    pub role: String,
}

impl TryFrom<DbTeamMember> for TeamMember {
    type Error = AppError;

    fn try_from(value: DbTeamMember) -> Result<Self, Self::Error> {
        Ok(TeamMember {
            team_id: value.team_id,
            user_id: value.user_id,
            role: value.role.parse()?,
        })
    }
}

/// Role held by `user_id` among `members`, if any.
pub fn role_of(members: &[TeamMember], user_id: UserId) -> Option<Role> {
    members
        .iter()
        .find(|member| member.user_id == user_id)
        .map(|member| member.role)
}
