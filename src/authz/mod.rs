//! Authorization core: live permission checks and token permission snapshots.
//!
//! Both halves share one project-visibility rule (ownerless projects, or
//! projects owned by one of the principal's teams).

mod access;
mod service;
mod snapshot;

#[cfg(test)]
pub(crate) mod fake;

pub use access::filter_accessible;
pub use service::PermissionService;
pub use snapshot::SnapshotBuilder;
