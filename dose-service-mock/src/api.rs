use crate::state::AppState;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::post,
};
use rand::Rng;
use shared::dose::{DOSE_UNAVAILABLE, DoseCallback, DoseRequest};
use std::sync::Arc;

/// POST /calc_dose — 接收计算请求，立即确认，延迟后回调
///
/// 与后端的约定：本接口只确认收到；计算结果通过
/// `PUT {backend}/api/medicines/{id}/dose` 异步写回。
async fn calc_dose(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DoseRequest>,
) -> StatusCode {
    tracing::info!(medicine_id = %req.medicine_id, "Dose request received");

    tokio::spawn(async move {
        tokio::time::sleep(state.response_delay).await;
        send_dose(&state, &req.medicine_id).await;
    });

    StatusCode::OK
}

/// Compute a value and push it back to the backend
///
/// 约三成请求返回哨兵值 -1（无法计算），其余返回 0.25..25.0 的剂量。
async fn send_dose(state: &AppState, medicine_id: &str) {
    let value = {
        let mut rng = rand::thread_rng();
        if rng.gen_bool(0.3) {
            DOSE_UNAVAILABLE
        } else {
            (rng.gen_range(0.25..25.0_f64) * 100.0).round() / 100.0
        }
    };

    let url = format!("{}/api/medicines/{}/dose", state.backend_url, medicine_id);
    let payload = DoseCallback { value };

    let result = state
        .client
        .put(&url)
        .bearer_auth(&state.service_token)
        .json(&payload)
        .send()
        .await;

    match result {
        Ok(resp) if resp.status().is_success() => {
            tracing::info!(medicine_id = %medicine_id, value, "Dose delivered");
        }
        Ok(resp) => {
            tracing::warn!(
                medicine_id = %medicine_id,
                status = %resp.status(),
                "Backend rejected dose callback"
            );
        }
        Err(e) => {
            tracing::warn!(medicine_id = %medicine_id, error = %e, "Dose callback failed");
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    use tower::limit::ConcurrencyLimitLayer;

    // 并发限制：最多 100 个并发请求
    let concurrency_limit = ConcurrencyLimitLayer::new(100);

    Router::new()
        .route("/calc_dose", post(calc_dose))
        .layer(concurrency_limit)
        .with_state(state)
}
