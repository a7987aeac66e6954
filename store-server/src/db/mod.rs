//! Database module
//!
//! Embedded SurrealDB storage. The server opens a RocksDB-backed instance
//! under the work directory; tests use the in-memory engine.

pub mod models;
pub mod repository;
pub mod schema;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use crate::utils::AppError;

const NS: &str = "store";
const DB: &str = "store";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk database and apply schema definitions
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db: Surreal<Db> = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        db.use_ns(NS)
            .use_db(DB)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        schema::apply(&db).await?;
        tracing::info!("Database ready at {}", db_path);

        Ok(Self { db })
    }

    /// In-memory database (tests, local tooling)
    pub async fn memory() -> Result<Self, AppError> {
        let db: Surreal<Db> = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open memory database: {e}")))?;
        db.use_ns(NS)
            .use_db(DB)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        schema::apply(&db).await?;

        Ok(Self { db })
    }
}
