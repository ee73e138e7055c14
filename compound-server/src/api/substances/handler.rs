//! Substance API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::{Capability, CurrentUser};
use crate::core::ServerState;
use crate::db::models::{CompositionEntry, Substance, SubstanceCreate, SubstanceUpdate};
use crate::db::repository::SubstanceRepository;
use crate::utils::ids::parse_substance_id;
use crate::utils::{AppError, AppResult};

/// Query params for the catalog listing
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub substance_name: Option<String>,
}

/// Catalog listing plus the caller's draft context
#[derive(Debug, Serialize)]
pub struct SubstanceListResponse {
    pub substances: Vec<Substance>,
    /// Composition line count of the caller's draft (null without a draft)
    pub substances_count: Option<usize>,
    /// The caller's draft order id (null without a draft)
    pub draft_medicine_id: Option<String>,
}

/// GET /api/substances - 列出在用物质（可按名称过滤），附当前草稿信息
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<SubstanceListResponse>> {
    user.require(Capability::BrowseCatalog)?;

    let repo = SubstanceRepository::new(state.get_db());
    let substances = repo
        .find_active(query.substance_name.as_deref())
        .await
        .map_err(AppError::from)?;

    let draft = state.engine.draft_overview(&user).await?;
    let (draft_medicine_id, substances_count) = match draft {
        Some((id, count)) => (Some(id), Some(count)),
        None => (None, None),
    };

    Ok(Json(SubstanceListResponse {
        substances,
        substances_count,
        draft_medicine_id,
    }))
}

/// GET /api/substances/{id} - 获取单个物质
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Substance>> {
    user.require(Capability::BrowseCatalog)?;
    let rid = parse_substance_id(&id)?;

    let repo = SubstanceRepository::new(state.get_db());
    let substance = repo
        .find_by_id(&rid)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(shared::ErrorCode::SubstanceNotFound))?;
    Ok(Json(substance))
}

/// POST /api/substances - 创建物质（审核员）
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<SubstanceCreate>,
) -> AppResult<Json<Substance>> {
    user.require(Capability::ManageCatalog)?;
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let repo = SubstanceRepository::new(state.get_db());
    let substance = repo.create(payload).await.map_err(AppError::from)?;
    Ok(Json(substance))
}

/// PUT /api/substances/{id} - 修改物质（审核员）
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<SubstanceUpdate>,
) -> AppResult<Json<Substance>> {
    user.require(Capability::ManageCatalog)?;
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let rid = parse_substance_id(&id)?;

    let repo = SubstanceRepository::new(state.get_db());
    let substance = repo.update(&rid, payload).await.map_err(AppError::from)?;
    Ok(Json(substance))
}

/// DELETE /api/substances/{id} - 归档物质（软删除，审核员）
pub async fn archive(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Substance>> {
    user.require(Capability::ManageCatalog)?;
    let rid = parse_substance_id(&id)?;

    let repo = SubstanceRepository::new(state.get_db());
    let substance = repo.archive(&rid).await.map_err(AppError::from)?;
    Ok(Json(substance))
}

/// Image reference payload (the image itself lives in external storage)
#[derive(Debug, Deserialize, Validate)]
pub struct ImageUpdate {
    #[validate(length(min = 1, max = 2048))]
    pub image: String,
}

/// PUT /api/substances/{id}/image - 更新物质图片引用（审核员）
pub async fn set_image(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<ImageUpdate>,
) -> AppResult<Json<Substance>> {
    user.require(Capability::ManageCatalog)?;
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let rid = parse_substance_id(&id)?;

    let repo = SubstanceRepository::new(state.get_db());
    let substance = repo
        .set_image(&rid, payload.image)
        .await
        .map_err(AppError::from)?;
    Ok(Json(substance))
}

/// POST /api/substances/{id}/add - 把物质加入当前用户的草稿药单
///
/// 用户没有草稿时隐式创建一份（get-or-create 为原子操作）。
pub async fn add_to_draft(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<CompositionEntry>>> {
    let entries = state.engine.add_to_draft(&user, &id).await?;
    Ok(Json(entries))
}
