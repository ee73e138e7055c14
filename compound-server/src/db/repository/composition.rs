//! Composition Repository (the ledger)
//!
//! Pure collection logic under the engine: line uniqueness, the materialized
//! composition view, and bulk removal. No transition logic lives here.

use super::{BaseRepository, RepoResult};
use crate::db::models::{CompositionEntry, CompositionLine};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const COMPOSITION_TABLE: &str = "composition";

#[derive(Clone)]
pub struct CompositionRepository {
    base: BaseRepository,
}

impl CompositionRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Materialized composition of an order: substance metadata + weight
    pub async fn entries_for(&self, medicine: &RecordId) -> RepoResult<Vec<CompositionEntry>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT <string>substance AS substance_id,
                        substance.name AS name,
                        substance.number AS number,
                        substance.image AS image,
                        substance.status AS status,
                        weight
                 FROM composition
                 WHERE medicine = $medicine
                 ORDER BY number",
            )
            .bind(("medicine", medicine.clone()))
            .await?;
        let entries: Vec<CompositionEntry> = result.take(0)?;
        Ok(entries)
    }

    /// Number of lines attached to an order
    pub async fn count_for(&self, medicine: &RecordId) -> RepoResult<usize> {
        #[derive(serde::Deserialize)]
        struct Count {
            count: usize,
        }

        let mut result = self
            .base
            .db()
            .query("SELECT count() AS count FROM composition WHERE medicine = $medicine GROUP ALL")
            .bind(("medicine", medicine.clone()))
            .await?;
        let counts: Vec<Count> = result.take(0)?;
        Ok(counts.into_iter().next().map(|c| c.count).unwrap_or(0))
    }

    /// Append a line
    ///
    /// A second line for the same (medicine, substance) pair trips the
    /// `composition_line` UNIQUE index and comes back as
    /// [`super::RepoError::Duplicate`].
    pub async fn add_line(
        &self,
        medicine: RecordId,
        substance: RecordId,
        weight: f64,
    ) -> RepoResult<CompositionLine> {
        let line = CompositionLine {
            id: None,
            medicine,
            substance,
            weight,
        };

        let created: Option<CompositionLine> = self
            .base
            .db()
            .create(COMPOSITION_TABLE)
            .content(line)
            .await?;

        created.ok_or_else(|| {
            super::RepoError::Database("Failed to create composition line".to_string())
        })
    }

    /// Update one line's weight; `Ok(None)` when the line does not exist
    pub async fn update_weight(
        &self,
        medicine: &RecordId,
        substance: &RecordId,
        weight: f64,
    ) -> RepoResult<Option<CompositionLine>> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE composition SET weight = $weight
                 WHERE medicine = $medicine AND substance = $substance
                 RETURN AFTER",
            )
            .bind(("medicine", medicine.clone()))
            .bind(("substance", substance.clone()))
            .bind(("weight", weight))
            .await?;
        let lines: Vec<CompositionLine> = result.take(0)?;
        Ok(lines.into_iter().next())
    }

    /// Remove one line; `false` when the line did not exist
    pub async fn remove_line(
        &self,
        medicine: &RecordId,
        substance: &RecordId,
    ) -> RepoResult<bool> {
        let mut result = self
            .base
            .db()
            .query(
                "DELETE composition
                 WHERE medicine = $medicine AND substance = $substance
                 RETURN BEFORE",
            )
            .bind(("medicine", medicine.clone()))
            .bind(("substance", substance.clone()))
            .await?;
        let removed: Vec<CompositionLine> = result.take(0)?;
        Ok(!removed.is_empty())
    }

    /// Remove every line of an order (used when the owner withdraws a draft)
    pub async fn remove_all(&self, medicine: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query("DELETE composition WHERE medicine = $medicine")
            .bind(("medicine", medicine.clone()))
            .await?;
        Ok(())
    }
}
