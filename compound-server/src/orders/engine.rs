//! Order Lifecycle Engine
//!
//! 状态机、权限、所有权检查集中在这里：
//! - 获取/创建草稿持每用户互斥锁，保证同一用户至多一份草稿
//! - 所有状态迁移走仓储层的 compare-and-set，输家得到 Conflict
//! - 剂量回调不做状态检查，任何状态下均接受写入

use std::sync::Arc;

use dashmap::DashMap;
use serde::Deserialize;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use tokio::sync::Mutex;

use crate::auth::{Capability, CurrentUser};
use crate::db::models::{
    CompositionEntry, Medicine, MedicineStatus, MedicineSummary, composition::DEFAULT_WEIGHT,
};
use crate::db::repository::{
    CompositionRepository, MedicineRepository, RepoError, SubstanceRepository,
    medicine::MedicineFilter,
};
use crate::services::DoseService;
use crate::utils::ids::{missing_id, parse_account_id, parse_medicine_id, parse_substance_id};
use crate::utils::time::{parse_datetime_millis, widen_formation_range};
use shared::{AppError, AppResult, ErrorCode};

/// Moderator decision on a formed order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecideOutcome {
    Approve,
    Reject,
}

/// Query parameters of the order search surface
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MedicineSearch {
    /// Legacy numeric status filter (1..=5); 0/absent means no filter
    #[serde(default)]
    pub status: Option<u8>,
    pub date_formation_start: Option<String>,
    pub date_formation_end: Option<String>,
}

/// 订单生命周期引擎
///
/// 仓储按请求构造（与处理器层一致），引擎自身只持有数据库句柄、
/// 剂量编排服务和草稿锁表。
#[derive(Clone, Debug)]
pub struct OrderEngine {
    db: Surreal<Db>,
    dose: DoseService,
    /// 每用户草稿锁：get-or-create 的原子性依赖它
    draft_locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl OrderEngine {
    pub fn new(db: Surreal<Db>, dose: DoseService) -> Self {
        Self {
            db,
            dose,
            draft_locks: Arc::new(DashMap::new()),
        }
    }

    fn medicines(&self) -> MedicineRepository {
        MedicineRepository::new(self.db.clone())
    }

    fn substances(&self) -> SubstanceRepository {
        SubstanceRepository::new(self.db.clone())
    }

    fn composition(&self) -> CompositionRepository {
        CompositionRepository::new(self.db.clone())
    }

    // =========================================================================
    // Draft management
    // =========================================================================

    /// Get the caller's draft, creating one if none exists
    ///
    /// Exclusive under concurrency: the per-user mutex serializes the
    /// find-then-create sequence, so racing callers observe and reuse a
    /// single draft instead of creating siblings.
    pub async fn get_or_create_draft(&self, user: &CurrentUser) -> AppResult<Medicine> {
        user.require(Capability::ComposeOrder)?;
        let owner = parse_account_id(&user.id)?;

        let lock = self
            .draft_locks
            .entry(user.id.clone())
            .or_default()
            .clone();
        let _guard = lock.lock().await;

        let repo = self.medicines();
        if let Some(draft) = repo.find_draft_by_owner(&owner).await? {
            return Ok(draft);
        }

        let draft = repo.create_draft(owner).await?;
        tracing::info!(owner = %user.id, draft = ?draft.id, "Draft created");
        Ok(draft)
    }

    /// The caller's draft id and line count, if a draft exists (list views)
    pub async fn draft_overview(&self, user: &CurrentUser) -> AppResult<Option<(String, usize)>> {
        if !matches!(user.role, shared::Role::User) {
            return Ok(None);
        }
        let owner = parse_account_id(&user.id)?;

        let Some(draft) = self.medicines().find_draft_by_owner(&owner).await? else {
            return Ok(None);
        };
        let id = draft
            .id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_default();
        let count = self
            .composition()
            .count_for(draft.id.as_ref().ok_or_else(missing_id)?)
            .await?;
        Ok(Some((id, count)))
    }

    // =========================================================================
    // Composition Ledger operations (only valid on the caller's draft)
    // =========================================================================

    /// Add a substance to the caller's draft, creating the draft on first add
    pub async fn add_to_draft(
        &self,
        user: &CurrentUser,
        substance_id: &str,
    ) -> AppResult<Vec<CompositionEntry>> {
        let draft = self.get_or_create_draft(user).await?;
        let medicine_id = draft.id.as_ref().ok_or_else(missing_id)?.to_string();
        self.add_substance(user, &medicine_id, substance_id).await
    }

    /// Append a composition line to a draft order
    pub async fn add_substance(
        &self,
        user: &CurrentUser,
        medicine_id: &str,
        substance_id: &str,
    ) -> AppResult<Vec<CompositionEntry>> {
        user.require(Capability::ComposeOrder)?;
        let medicine_rid = parse_medicine_id(medicine_id)?;
        let substance_rid = parse_substance_id(substance_id)?;

        let medicine = self.owned_draft(user, &medicine_rid).await?;

        // Archived substances stay visible on historical orders but cannot
        // enter new compositions
        let substance = self
            .substances()
            .find_by_id(&substance_rid)
            .await?
            .filter(|s| s.is_active())
            .ok_or_else(|| AppError::new(ErrorCode::SubstanceNotFound))?;

        let medicine_rid = medicine.id.as_ref().ok_or_else(missing_id)?;
        match self
            .composition()
            .add_line(
                medicine_rid.clone(),
                substance.id.clone().ok_or_else(missing_id)?,
                DEFAULT_WEIGHT,
            )
            .await
        {
            Ok(_) => {}
            Err(RepoError::Duplicate(_)) => {
                return Err(AppError::new(ErrorCode::SubstanceAlreadyInOrder));
            }
            Err(e) => return Err(e.into()),
        }

        Ok(self.composition().entries_for(medicine_rid).await?)
    }

    /// Remove a composition line from a draft order
    pub async fn remove_substance(
        &self,
        user: &CurrentUser,
        medicine_id: &str,
        substance_id: &str,
    ) -> AppResult<Vec<CompositionEntry>> {
        user.require(Capability::ComposeOrder)?;
        let medicine_rid = parse_medicine_id(medicine_id)?;
        let substance_rid = parse_substance_id(substance_id)?;

        self.owned_draft(user, &medicine_rid).await?;

        let removed = self
            .composition()
            .remove_line(&medicine_rid, &substance_rid)
            .await?;
        if !removed {
            return Err(AppError::new(ErrorCode::CompositionLineNotFound));
        }

        Ok(self.composition().entries_for(&medicine_rid).await?)
    }

    /// Edit one line's weight on a draft order
    pub async fn update_weight(
        &self,
        user: &CurrentUser,
        medicine_id: &str,
        substance_id: &str,
        weight: f64,
    ) -> AppResult<Vec<CompositionEntry>> {
        user.require(Capability::ComposeOrder)?;
        let medicine_rid = parse_medicine_id(medicine_id)?;
        let substance_rid = parse_substance_id(substance_id)?;

        self.owned_draft(user, &medicine_rid).await?;

        let updated = self
            .composition()
            .update_weight(&medicine_rid, &substance_rid, weight)
            .await?;
        if updated.is_none() {
            return Err(AppError::new(ErrorCode::CompositionLineNotFound));
        }

        Ok(self.composition().entries_for(&medicine_rid).await?)
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Owner submits the draft for moderation: Draft -> Formed
    pub async fn submit(&self, user: &CurrentUser, medicine_id: &str) -> AppResult<Medicine> {
        user.require(Capability::ComposeOrder)?;
        let medicine_rid = parse_medicine_id(medicine_id)?;

        let medicine = self.owned_medicine(user, &medicine_rid).await?;
        if medicine.status != MedicineStatus::Draft {
            return Err(AppError::new(ErrorCode::OrderNotDraft));
        }

        self.medicines()
            .transition(
                &medicine_rid,
                MedicineStatus::Draft,
                MedicineStatus::Formed,
                None,
            )
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::OrderStatusConflict))
    }

    /// Moderator decision: Formed -> Completed | Rejected
    ///
    /// Approve first hands off to the dose orchestrator (fire-and-continue),
    /// then flips the status; the dose itself arrives later via callback.
    pub async fn decide(
        &self,
        user: &CurrentUser,
        medicine_id: &str,
        outcome: DecideOutcome,
    ) -> AppResult<Medicine> {
        user.require(Capability::DecideOrder)?;
        let medicine_rid = parse_medicine_id(medicine_id)?;
        let moderator_rid = parse_account_id(&user.id)?;

        let medicine = self
            .medicines()
            .find_by_id(&medicine_rid)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
        if medicine.status != MedicineStatus::Formed {
            return Err(AppError::new(ErrorCode::OrderNotFormed));
        }

        let to = match outcome {
            DecideOutcome::Approve => {
                self.dose.request_dose(medicine_rid.to_string());
                MedicineStatus::Completed
            }
            DecideOutcome::Reject => MedicineStatus::Rejected,
        };

        let decided = self
            .medicines()
            .transition(
                &medicine_rid,
                MedicineStatus::Formed,
                to,
                Some(moderator_rid),
            )
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::OrderStatusConflict))?;

        tracing::info!(
            medicine = %medicine_rid,
            moderator = %user.id,
            outcome = ?outcome,
            "Order decided"
        );
        Ok(decided)
    }

    /// Owner withdraws the draft: Draft -> Deleted, composition cleared
    pub async fn withdraw(&self, user: &CurrentUser, medicine_id: &str) -> AppResult<Medicine> {
        user.require(Capability::ComposeOrder)?;
        let medicine_rid = parse_medicine_id(medicine_id)?;

        let medicine = self.owned_medicine(user, &medicine_rid).await?;
        if medicine.status != MedicineStatus::Draft {
            return Err(AppError::new(ErrorCode::OrderNotDraft));
        }

        let withdrawn = self
            .medicines()
            .transition(
                &medicine_rid,
                MedicineStatus::Draft,
                MedicineStatus::Deleted,
                None,
            )
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::OrderStatusConflict))?;

        // Lines die with the order
        self.composition().remove_all(&medicine_rid).await?;
        Ok(withdrawn)
    }

    // =========================================================================
    // Dose callback
    // =========================================================================

    /// Accept the computed dose from the remote service
    ///
    /// No status check: the callback may arrive before, during, or long after
    /// the Completed flip, and is applied regardless of the order's state.
    pub async fn receive_dose(
        &self,
        user: &CurrentUser,
        medicine_id: &str,
        value: f64,
    ) -> AppResult<Medicine> {
        user.require(Capability::WriteDose)?;
        let medicine_rid = parse_medicine_id(medicine_id)?;

        let updated = self
            .medicines()
            .set_dose(&medicine_rid, value)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

        tracing::info!(medicine = %medicine_rid, value, "Dose received");
        Ok(updated)
    }

    // =========================================================================
    // Read surface
    // =========================================================================

    /// One order with its materialized composition
    ///
    /// Visible to the owner; moderators can read any order. Others get
    /// NotFound rather than Forbidden so order ids do not leak.
    pub async fn get(
        &self,
        user: &CurrentUser,
        medicine_id: &str,
    ) -> AppResult<(Medicine, Vec<CompositionEntry>)> {
        let medicine_rid = parse_medicine_id(medicine_id)?;

        let medicine = self
            .medicines()
            .find_by_id(&medicine_rid)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

        if !user.is_moderator() && !medicine.is_owned_by(&user.id) {
            return Err(AppError::new(ErrorCode::OrderNotFound));
        }

        let entries = self.composition().entries_for(&medicine_rid).await?;
        Ok((medicine, entries))
    }

    /// Order listing: excludes Draft and Deleted, scoped to the caller
    /// unless the caller is a moderator
    pub async fn search(
        &self,
        user: &CurrentUser,
        query: MedicineSearch,
    ) -> AppResult<Vec<MedicineSummary>> {
        user.require(Capability::BrowseCatalog)?;

        let status = match query.status {
            None | Some(0) => None,
            Some(code) => Some(
                MedicineStatus::try_from(code)
                    .map_err(|c| AppError::invalid(format!("Unknown status code {c}")))?,
            ),
        };

        let start = query
            .date_formation_start
            .as_deref()
            .and_then(parse_datetime_millis);
        let end = query
            .date_formation_end
            .as_deref()
            .and_then(parse_datetime_millis);
        let (formation_from, formation_until) = widen_formation_range(start, end);

        let owner = if user.is_moderator() {
            None
        } else {
            Some(parse_account_id(&user.id)?)
        };

        let filter = MedicineFilter {
            owner,
            status,
            formation_from,
            formation_until,
        };
        Ok(self.medicines().search(filter).await?)
    }

    // =========================================================================
    // Internal checks
    // =========================================================================

    /// Load an order, requiring the caller to be its owner
    async fn owned_medicine(
        &self,
        user: &CurrentUser,
        medicine_rid: &RecordId,
    ) -> AppResult<Medicine> {
        let medicine = self
            .medicines()
            .find_by_id(medicine_rid)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

        // 与原语义一致：非所有者按不存在处理
        if !medicine.is_owned_by(&user.id) {
            return Err(AppError::new(ErrorCode::OrderNotFound));
        }
        Ok(medicine)
    }

    /// Load an order for a ledger operation
    ///
    /// Ledger operations are forbidden (not a status conflict) when the
    /// caller is not the owner or the order has left Draft; the transition
    /// endpoints use Conflict instead.
    async fn owned_draft(
        &self,
        user: &CurrentUser,
        medicine_rid: &RecordId,
    ) -> AppResult<Medicine> {
        let medicine = self
            .medicines()
            .find_by_id(medicine_rid)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

        if !medicine.is_owned_by(&user.id) {
            return Err(AppError::new(ErrorCode::NotOwner));
        }
        if medicine.status != MedicineStatus::Draft {
            return Err(AppError::forbidden("Order is no longer in draft state"));
        }
        Ok(medicine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decide_outcome_deserialization() {
        let approve: DecideOutcome = serde_json::from_str("\"approve\"").unwrap();
        assert_eq!(approve, DecideOutcome::Approve);
        let reject: DecideOutcome = serde_json::from_str("\"reject\"").unwrap();
        assert_eq!(reject, DecideOutcome::Reject);
        assert!(serde_json::from_str::<DecideOutcome>("\"defer\"").is_err());
    }
}
