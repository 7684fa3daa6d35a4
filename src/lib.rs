pub mod app;
pub mod authz;
pub mod context;
pub mod db;
pub mod errors;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod store;

pub use app::{build_router, create_app, AppState};
pub use context::RequestContext;
