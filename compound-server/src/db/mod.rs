//! Database Module
//!
//! 嵌入式 SurrealDB：连接、表结构定义、初始账号

pub mod models;
pub mod repository;

use shared::AppError;
use shared::Role;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use crate::db::models::Account;
use crate::db::repository::AccountRepository;

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the RocksDB-backed database at `db_path`
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        let service = Self { db };
        service.init().await?;

        tracing::info!(path = %db_path, "Database connection established (SurrealDB/RocksDB)");
        Ok(service)
    }

    /// In-memory database, used by tests
    pub async fn memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;

        let service = Self { db };
        service.init().await?;
        Ok(service)
    }

    async fn init(&self) -> Result<(), AppError> {
        self.db
            .use_ns("galen")
            .use_db("main")
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        self.define_schema().await?;
        Ok(())
    }

    /// Define tables and the indexes the invariants rely on
    ///
    /// - `account.username` unique
    /// - `composition (medicine, substance)` unique — one line per
    ///   (order, substance) pair, enforced by the storage layer
    async fn define_schema(&self) -> Result<(), AppError> {
        self.db
            .query(
                "
                DEFINE TABLE IF NOT EXISTS account SCHEMALESS;
                DEFINE INDEX IF NOT EXISTS account_username ON TABLE account COLUMNS username UNIQUE;
                DEFINE TABLE IF NOT EXISTS substance SCHEMALESS;
                DEFINE TABLE IF NOT EXISTS medicine SCHEMALESS;
                DEFINE TABLE IF NOT EXISTS composition SCHEMALESS;
                DEFINE INDEX IF NOT EXISTS composition_line ON TABLE composition COLUMNS medicine, substance UNIQUE;
                ",
            )
            .await
            .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;

        tracing::debug!("Database schema defined");
        Ok(())
    }

    /// 首次启动时创建初始审核员账号
    ///
    /// 已存在任意审核员则跳过。
    pub async fn seed_moderator(&self, password: &str) -> Result<(), AppError> {
        let mut result = self
            .db
            .query("SELECT * FROM account WHERE role = $role LIMIT 1")
            .bind(("role", Role::Moderator))
            .await
            .map_err(|e| AppError::database(format!("Failed to query accounts: {e}")))?;

        let existing: Option<Account> = result
            .take(0)
            .map_err(|e| AppError::database(format!("Failed to parse account: {e}")))?;

        if existing.is_some() {
            return Ok(());
        }

        // Inserted via repository so the password hash is stored
        // (the model skips it on serialization).
        let repo = AccountRepository::new(self.db.clone());
        repo.create("moderator", password, Role::Moderator)
            .await
            .map_err(|e| AppError::database(format!("Failed to seed moderator: {e}")))?;

        tracing::info!("Seeded initial moderator account");
        Ok(())
    }
}
