//! Substance API Module
//!
//! 目录浏览对所有登录用户开放；创建/修改/归档需要审核员能力
//! （能力检查在处理器内统一通过 [`crate::auth::Capability`] 完成）。

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

/// Substance router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/substances", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::archive),
        )
        .route("/{id}/image", put(handler::set_image))
        // 加入当前用户的草稿药单（必要时隐式建草稿）
        .route("/{id}/add", post(handler::add_to_draft))
}
