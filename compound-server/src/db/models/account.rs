//! Account Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::Role;
use surrealdb::RecordId;

/// Account model matching the SurrealDB schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub username: String,
    #[serde(skip_serializing)]
    pub hash_pass: String,
    pub role: Role,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: i64,
}

fn default_true() -> bool {
    true
}

impl Account {
    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.hash_pass)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = Account::hash_password("s3cret").unwrap();
        let account = Account {
            id: None,
            username: "maria".to_string(),
            hash_pass: hash,
            role: Role::User,
            is_active: true,
            created_at: 0,
        };

        assert!(account.verify_password("s3cret").unwrap());
        assert!(!account.verify_password("wrong").unwrap());
    }

    #[test]
    fn test_hash_is_not_serialized() {
        let account = Account {
            id: None,
            username: "maria".to_string(),
            hash_pass: "$argon2id$something".to_string(),
            role: Role::User,
            is_active: true,
            created_at: 0,
        };

        let json = serde_json::to_string(&account).unwrap();
        assert!(!json.contains("argon2id"));
    }
}
