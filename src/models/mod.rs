pub mod issue;
pub mod permissions;
pub mod project;
pub mod role;
pub mod team;
pub mod user;

pub type UserId = i64;
pub type TeamId = i64;
pub type ProjectId = i64;
pub type IssueId = i64;

pub use issue::Issue;
pub use permissions::{ProjectPermission, UserPermissions};
pub use project::Project;
pub use role::Role;
pub use team::{Team, TeamMember};
pub use user::User;
