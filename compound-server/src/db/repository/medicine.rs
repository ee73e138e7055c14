//! Medicine Repository
//!
//! 状态迁移一律走条件更新（compare-and-set）：
//! `UPDATE … WHERE status = $from RETURN AFTER`。
//! 并发迁移只有一个赢家，输家拿到空结果，由引擎映射为 Conflict。

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Medicine, MedicineStatus, MedicineSummary};
use shared::util::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const MEDICINE_TABLE: &str = "medicine";

/// Filters for the order query surface
#[derive(Debug, Clone, Default)]
pub struct MedicineFilter {
    /// Restrict to a single owner (non-moderator callers)
    pub owner: Option<RecordId>,
    /// Status equality filter
    pub status: Option<MedicineStatus>,
    /// Formation-date lower bound (epoch millis, already widened)
    pub formation_from: Option<i64>,
    /// Formation-date upper bound, exclusive (epoch millis, already widened)
    pub formation_until: Option<i64>,
}

#[derive(Clone)]
pub struct MedicineRepository {
    base: BaseRepository,
}

impl MedicineRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Medicine>> {
        let medicine: Option<Medicine> = self.base.db().select(id.clone()).await?;
        Ok(medicine)
    }

    /// The owner's current draft, if any
    pub async fn find_draft_by_owner(&self, owner: &RecordId) -> RepoResult<Option<Medicine>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM medicine WHERE owner = $owner AND status = $status LIMIT 1")
            .bind(("owner", owner.clone()))
            .bind(("status", MedicineStatus::Draft))
            .await?;
        let medicine: Option<Medicine> = result.take(0)?;
        Ok(medicine)
    }

    /// Create a fresh draft for `owner`
    ///
    /// Callers must hold the owner's draft lock; this method itself does not
    /// re-check draft uniqueness.
    pub async fn create_draft(&self, owner: RecordId) -> RepoResult<Medicine> {
        let medicine = Medicine {
            id: None,
            owner,
            status: MedicineStatus::Draft,
            dose: None,
            date_created: now_millis(),
            date_formation: None,
            date_complete: None,
            moderator: None,
        };

        let created: Option<Medicine> = self
            .base
            .db()
            .create(MEDICINE_TABLE)
            .content(medicine)
            .await?;

        created.ok_or_else(|| RepoError::Database("Failed to create draft".to_string()))
    }

    /// Compare-and-set status transition
    ///
    /// Side-effect fields follow the target state:
    /// - `Formed`: stamps `date_formation`
    /// - `Completed` / `Rejected`: stamps `date_complete` and `moderator`
    ///
    /// Returns `Ok(None)` when the record's status was no longer `from`
    /// (the caller lost the race).
    pub async fn transition(
        &self,
        id: &RecordId,
        from: MedicineStatus,
        to: MedicineStatus,
        moderator: Option<RecordId>,
    ) -> RepoResult<Option<Medicine>> {
        let mut statement = String::from("UPDATE $id SET status = $to");
        match to {
            MedicineStatus::Formed => statement.push_str(", date_formation = $now"),
            MedicineStatus::Completed | MedicineStatus::Rejected => {
                statement.push_str(", date_complete = $now, moderator = $moderator")
            }
            _ => {}
        }
        statement.push_str(" WHERE status = $from RETURN AFTER");

        let mut result = self
            .base
            .db()
            .query(statement)
            .bind(("id", id.clone()))
            .bind(("from", from))
            .bind(("to", to))
            .bind(("now", now_millis()))
            .bind(("moderator", moderator))
            .await?;

        let medicines: Vec<Medicine> = result.take(0)?;
        Ok(medicines.into_iter().next())
    }

    /// Unconditional dose write — deliberately no status check, the callback
    /// is accepted whatever state the order is in
    pub async fn set_dose(&self, id: &RecordId, value: f64) -> RepoResult<Option<Medicine>> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $id SET dose = $value RETURN AFTER")
            .bind(("id", id.clone()))
            .bind(("value", value))
            .await?;
        let medicines: Vec<Medicine> = result.take(0)?;
        Ok(medicines.into_iter().next())
    }

    /// Order query surface: Draft and Deleted are never listed
    pub async fn search(&self, filter: MedicineFilter) -> RepoResult<Vec<MedicineSummary>> {
        let mut statement = String::from(
            "SELECT <string>id AS id,
                    owner.username AS owner,
                    moderator.username AS moderator,
                    status, dose, date_created, date_formation, date_complete
             FROM medicine
             WHERE status NOT IN $hidden",
        );

        if filter.owner.is_some() {
            statement.push_str(" AND owner = $owner");
        }
        if filter.status.is_some() {
            statement.push_str(" AND status = $status");
        }
        if filter.formation_from.is_some() {
            statement.push_str(" AND date_formation >= $formation_from");
        }
        if filter.formation_until.is_some() {
            statement.push_str(" AND date_formation < $formation_until");
        }
        statement.push_str(" ORDER BY date_created DESC");

        let mut query = self.base.db().query(statement).bind((
            "hidden",
            vec![MedicineStatus::Draft, MedicineStatus::Deleted],
        ));

        if let Some(owner) = filter.owner {
            query = query.bind(("owner", owner));
        }
        if let Some(status) = filter.status {
            query = query.bind(("status", status));
        }
        if let Some(from) = filter.formation_from {
            query = query.bind(("formation_from", from));
        }
        if let Some(until) = filter.formation_until {
            query = query.bind(("formation_until", until));
        }

        let mut result = query.await?;
        let summaries: Vec<MedicineSummary> = result.take(0)?;
        Ok(summaries)
    }
}
