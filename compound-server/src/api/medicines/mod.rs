//! Medicine API Module
//!
//! 药单的读取、提交、裁决、撤回、组方增删以及剂量回调。
//! 所有变更经由订单生命周期引擎，处理器保持薄层。

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

/// Medicine router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/medicines", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id).delete(handler::withdraw))
        .route("/{id}/submit", put(handler::submit))
        .route("/{id}/decide", put(handler::decide))
        // 剂量回调：仅 remote_service 角色（能力检查在引擎内）
        .route("/{id}/dose", put(handler::receive_dose))
        .route(
            "/{id}/substances/{substance_id}",
            put(handler::update_weight).delete(handler::remove_substance),
        )
}
