use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{IssueId, ProjectId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Issue {
    pub id: IssueId,
    pub project_id: ProjectId,
    pub title: String,
}
