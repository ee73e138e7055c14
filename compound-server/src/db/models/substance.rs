//! Substance Model (catalog entry)

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// Substance status — archived entries stay referenceable by historical
/// orders but are excluded from listings and new compositions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubstanceStatus {
    Active,
    Archived,
}

/// Catalog substance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Substance {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Numeric catalog code
    pub number: i64,
    /// Reference into the external image store
    pub image: Option<String>,
    pub status: SubstanceStatus,
}

impl Substance {
    pub fn is_active(&self) -> bool {
        self.status == SubstanceStatus::Active
    }
}

/// Create substance payload (moderator)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubstanceCreate {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 1))]
    pub number: i64,
    pub image: Option<String>,
}

/// Update substance payload (moderator)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubstanceUpdate {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub number: Option<i64>,
    pub image: Option<String>,
}
