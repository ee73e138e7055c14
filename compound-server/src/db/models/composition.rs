//! Composition Model (order ⇄ substance line items)

use super::serde_helpers;
use super::substance::SubstanceStatus;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// Weight a substance enters a composition with before the user edits it
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// One (medicine, substance, weight) line
///
/// Uniqueness of (medicine, substance) is enforced by the
/// `composition_line` UNIQUE index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositionLine {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub medicine: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub substance: RecordId,
    pub weight: f64,
}

/// Materialized composition entry for display: substance metadata joined
/// with its weight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositionEntry {
    pub substance_id: String,
    pub name: String,
    pub number: i64,
    pub image: Option<String>,
    pub status: SubstanceStatus,
    pub weight: f64,
}

/// Weight edit payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct WeightUpdate {
    #[validate(range(min = 0.001))]
    pub weight: f64,
}
