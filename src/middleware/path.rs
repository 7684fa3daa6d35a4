//! Recovers resource identifiers from a request path without a route table.
//!
//! The matcher looks for the literal `projects` and `issues` markers and reads
//! the segment that follows each one. It knows nothing about which handler
//! will eventually serve the request.

use axum::http::Method;

use crate::errors::AppError;

const PROJECTS: &str = "projects";
const ISSUES: &str = "issues";
const STATS: &str = "stats";

/// Segments after `projects` that are not project identifiers.
pub const PROJECT_PLACEHOLDERS: &[&str] = &["", "add", "recent"];
/// Segments after `issues` that are not issue identifiers.
pub const ISSUE_PLACEHOLDERS: &[&str] = &["", "recent", "timeseries"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Nothing to authorize: no identifier present, or a placeholder.
    Bypass,
    Id(i64),
}

#[derive(Debug, Clone)]
pub struct ResourcePath<'a> {
    segments: Vec<&'a str>,
}

impl<'a> ResourcePath<'a> {
    pub fn parse(path: &'a str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = path.strip_prefix('/').unwrap_or(path);
        let segments = if path.is_empty() { Vec::new() } else { path.split('/').collect() };
        Self { segments }
    }

    fn position(&self, marker: &str) -> Option<usize> {
        self.segments.iter().position(|segment| *segment == marker)
    }

    fn after(&self, marker: &str, offset: usize) -> Option<&'a str> {
        let idx = self.position(marker)?;
        self.segments.get(idx + offset).copied()
    }

    /// Raw segment following `projects`, `None` when the path stops there.
    pub fn project_segment(&self) -> Option<&'a str> {
        self.after(PROJECTS, 1)
    }

    /// Raw segment following `issues`.
    pub fn issue_segment(&self) -> Option<&'a str> {
        self.after(ISSUES, 1)
    }

    /// Sub-resource under the project, e.g. `stats` in `/projects/3/stats`.
    pub fn project_sub_resource(&self) -> Option<&'a str> {
        self.after(PROJECTS, 2)
    }

    pub fn is_project_stats(&self) -> bool {
        self.project_sub_resource() == Some(STATS)
    }

    /// Actions on one issue nested under its project
    /// (`/projects/{id}/issues/{issue}[/...]`) get the issue-management
    /// relaxation. The issues collection itself does not.
    pub fn is_issue_management(&self) -> bool {
        self.project_sub_resource() == Some(ISSUES)
            && self
                .after(PROJECTS, 3)
                .is_some_and(|segment| !ISSUE_PLACEHOLDERS.contains(&segment))
    }

    pub fn project_target(&self) -> Result<Target, AppError> {
        classify(self.project_segment(), PROJECT_PLACEHOLDERS, "project")
    }

    pub fn issue_target(&self) -> Result<Target, AppError> {
        classify(self.issue_segment(), ISSUE_PLACEHOLDERS, "issue")
    }
}

fn classify(segment: Option<&str>, placeholders: &[&str], entity: &str) -> Result<Target, AppError> {
    let Some(segment) = segment else {
        return Ok(Target::Bypass);
    };

    if placeholders.contains(&segment) {
        return Ok(Target::Bypass);
    }

    segment
        .parse::<u64>()
        .ok()
        .and_then(|id| i64::try_from(id).ok())
        .map(Target::Id)
        .ok_or_else(|| AppError::bad_request(format!("invalid {entity} id: {segment}")))
}

pub fn is_read_only(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}
