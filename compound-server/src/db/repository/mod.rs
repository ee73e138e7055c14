//! Repository Module
//!
//! Provides CRUD operations for the SurrealDB tables.
//!
//! ID convention: 全栈统一使用 "table:id" 格式，内部用 `surrealdb::RecordId`：
//!   - 解析: `let id: RecordId = "medicine:abc".parse()?;`
//!   - 创建: `RecordId::from_table_key("medicine", "abc")`
//!   - CRUD: `db.select(id)` / `db.delete(id)` 直接使用 RecordId

// Auth
pub mod account;

// Catalog
pub mod substance;

// Orders
pub mod composition;
pub mod medicine;

// Re-exports
pub use account::AccountRepository;
pub use composition::CompositionRepository;
pub use medicine::MedicineRepository;
pub use substance::SubstanceRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        let msg = err.to_string();
        // UNIQUE index violations surface as "already contains" in SurrealDB
        if msg.contains("already contains") {
            RepoError::Duplicate(msg)
        } else {
            RepoError::Database(msg)
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
