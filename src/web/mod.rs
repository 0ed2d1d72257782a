//! Web server module
//!
//! Provides the read-only HTTP search API.

mod error;
mod handlers;
mod routes;
mod state;

pub use error::ApiError;
pub use handlers::{SearchParams, SearchResponse};
pub use routes::create_router;
pub use state::AppState;
