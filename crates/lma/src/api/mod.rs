//! HTTP API module.

mod error;
mod extract;
mod handlers;
mod routes;
mod state;

pub use error::{ApiError, ApiResult, ErrorResponse};
pub use extract::{ApiJson, ApiQuery};
pub use routes::create_router;
pub use state::AppState;
