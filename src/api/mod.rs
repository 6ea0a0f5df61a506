//! HTTP API: request/response schemas, handlers, and routing

pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;

pub use error::ApiError;
pub use handlers::AppState;
pub use routes::build_router;
