//! Account Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::Account;
use shared::Role;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct AccountRepository {
    base: BaseRepository,
}

impl AccountRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_username(&self, username: &str) -> RepoResult<Option<Account>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM account WHERE username = $username LIMIT 1")
            .bind(("username", username.to_string()))
            .await?;
        let account: Option<Account> = result.take(0)?;
        Ok(account)
    }

    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Account>> {
        let account: Option<Account> = self.base.db().select(id.clone()).await?;
        Ok(account)
    }

    /// Create an account with a freshly hashed password
    ///
    /// The username UNIQUE index turns a concurrent duplicate into
    /// [`RepoError::Duplicate`]. Inserted with an explicit query because the
    /// password hash is `skip_serializing` on the model.
    pub async fn create(&self, username: &str, password: &str, role: Role) -> RepoResult<Account> {
        let hash = Account::hash_password(password)
            .map_err(|e| RepoError::Validation(format!("Failed to hash password: {e}")))?;

        let mut result = self
            .base
            .db()
            .query(
                "CREATE account SET
                    username = $username,
                    hash_pass = $hash,
                    role = $role,
                    is_active = true,
                    created_at = $now
                 RETURN AFTER",
            )
            .bind(("username", username.to_string()))
            .bind(("hash", hash))
            .bind(("role", role))
            .bind(("now", shared::util::now_millis()))
            .await?;

        let accounts: Vec<Account> = result.take(0)?;
        accounts
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to create account".to_string()))
    }
}
