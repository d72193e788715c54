//! Student directory module.

mod models;
mod service;

pub use models::Student;
pub use service::{StudentDirectory, StudentError};
