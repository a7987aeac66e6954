//! Repository module
//!
//! Query-per-method repositories over the embedded SurrealDB handle. All
//! stock counter writes go through `InventoryRepository`'s guarded paths —
//! no other code writes `stock_quantity` or `reserved_quantity`.

pub mod history;
pub mod inventory;
pub mod order;
pub mod product;

pub use history::OrderHistoryRepository;
pub use inventory::{AdjustOutcome, InventoryRepository, MovementFilter, NewMovement, StockTarget};
pub use order::OrderRepository;
pub use product::ProductRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

use crate::utils::AppError;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

/// Marker thrown inside the adjustment transaction when the zero-floor
/// guard rejects the update
const THROW_INSUFFICIENT: &str = "insufficient_stock";

/// Marker thrown when a transaction targets a row that does not exist
const THROW_TARGET_MISSING: &str = "target_missing";

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Map statement-level errors of a transactional query
///
/// A failed transaction surfaces as a generic "failed transaction" error on
/// the statement being taken; the THROW'd marker lives in a different
/// statement's error. Scan all of them so the marker wins over the generic
/// message.
pub(crate) fn take_query_errors(response: &mut surrealdb::Response) -> RepoResult<()> {
    let errors = response.take_errors();
    if errors.is_empty() {
        return Ok(());
    }

    let messages: Vec<String> = errors.into_values().map(|e| e.to_string()).collect();
    if messages.iter().any(|m| m.contains(THROW_INSUFFICIENT)) {
        return Err(RepoError::InsufficientStock(
            "available stock would drop below zero".to_string(),
        ));
    }
    if messages.iter().any(|m| m.contains(THROW_TARGET_MISSING)) {
        return Err(RepoError::NotFound("stock target not found".to_string()));
    }
    Err(RepoError::Database(messages.join("; ")))
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::InsufficientStock(msg) => AppError::InsufficientStock(msg),
            RepoError::Conflict(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
