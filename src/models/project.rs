use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{ProjectId, TeamId};

/// A project without a team is ownerless: readable by everyone, never
/// manageable outside issue lifecycle changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub team_id: Option<TeamId>,
}
