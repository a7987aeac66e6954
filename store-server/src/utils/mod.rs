//! Utility module - shared helpers and types
//!
//! - [`AppError`] / [`AppResult`] - application error type and result alias
//! - [`AppResponse`] - API response envelope
//! - logging, validation and pagination helpers

pub mod error;
pub mod logger;
pub mod time;
pub mod types;
pub mod validation;

pub use error::{AppError, AppResponse, AppResult};
pub use time::{HOUR_MS, MINUTE_MS, now_millis};
pub use types::Paginated;
