//! Medicine API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{CompositionEntry, Medicine, MedicineSummary, WeightUpdate};
use crate::orders::{DecideOutcome, MedicineSearch};
use crate::utils::{AppError, AppResult};
use shared::dose::DoseCallback;

/// Full order detail: aggregate fields plus the materialized composition
#[derive(Debug, Serialize)]
pub struct MedicineDetail {
    #[serde(flatten)]
    pub medicine: Medicine,
    pub substances: Vec<CompositionEntry>,
}

/// GET /api/medicines - 查询订单（排除草稿与已删除）
///
/// 非审核员只能看到自己的订单；支持状态过滤和成型日期范围过滤。
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<MedicineSearch>,
) -> AppResult<Json<Vec<MedicineSummary>>> {
    let medicines = state.engine.search(&user, query).await?;
    Ok(Json(medicines))
}

/// GET /api/medicines/{id} - 订单详情（所有者或审核员）
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<MedicineDetail>> {
    let (medicine, substances) = state.engine.get(&user, &id).await?;
    Ok(Json(MedicineDetail {
        medicine,
        substances,
    }))
}

/// PUT /api/medicines/{id}/submit - 所有者提交草稿：Draft -> Formed
pub async fn submit(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Medicine>> {
    let medicine = state.engine.submit(&user, &id).await?;
    Ok(Json(medicine))
}

/// Decision payload
#[derive(Debug, serde::Deserialize)]
pub struct DecideRequest {
    pub outcome: DecideOutcome,
}

/// PUT /api/medicines/{id}/decide - 审核员裁决：Formed -> Completed | Rejected
///
/// 批准分支先向剂量服务发起计算请求（不等待），随后立即完成迁移。
pub async fn decide(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<DecideRequest>,
) -> AppResult<Json<Medicine>> {
    let medicine = state.engine.decide(&user, &id, payload.outcome).await?;
    Ok(Json(medicine))
}

/// DELETE /api/medicines/{id} - 所有者撤回草稿：Draft -> Deleted
pub async fn withdraw(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Medicine>> {
    let medicine = state.engine.withdraw(&user, &id).await?;
    Ok(Json(medicine))
}

/// PUT /api/medicines/{id}/dose - 剂量回调（remote_service）
///
/// 无条件写入：回调可能先于、也可能远晚于状态迁移到达。
pub async fn receive_dose(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<DoseCallback>,
) -> AppResult<Json<Medicine>> {
    let medicine = state.engine.receive_dose(&user, &id, payload.value).await?;
    Ok(Json(medicine))
}

/// PUT /api/medicines/{id}/substances/{substance_id} - 修改组方权重
pub async fn update_weight(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path((id, substance_id)): Path<(String, String)>,
    Json(payload): Json<WeightUpdate>,
) -> AppResult<Json<Vec<CompositionEntry>>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let entries = state
        .engine
        .update_weight(&user, &id, &substance_id, payload.weight)
        .await?;
    Ok(Json(entries))
}

/// DELETE /api/medicines/{id}/substances/{substance_id} - 移除组方物质
pub async fn remove_substance(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path((id, substance_id)): Path<(String, String)>,
) -> AppResult<Json<Vec<CompositionEntry>>> {
    let entries = state
        .engine
        .remove_substance(&user, &id, &substance_id)
        .await?;
    Ok(Json(entries))
}
