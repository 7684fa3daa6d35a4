use std::collections::HashSet;

use crate::models::{Project, TeamId};

/// A project is visible when it is ownerless or owned by one of `team_ids`.
/// Input order is preserved.
pub fn filter_accessible(projects: Vec<Project>, team_ids: &HashSet<TeamId>) -> Vec<Project> {
    projects
        .into_iter()
        .filter(|project| match project.team_id {
            None => true,
            Some(team_id) => team_ids.contains(&team_id),
        })
        .collect()
}
