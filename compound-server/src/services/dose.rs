//! Dose Calculation Orchestrator
//!
//! 批准迁移与外部剂量服务之间的桥：出站请求在独立任务中发送，
//! 带有限超时；任何失败只记录日志，绝不回传给 `decide` 的调用方。
//! 计算结果由剂量服务通过回调接口异步写回（见 api/medicines）。

use shared::dose::DoseRequest;
use std::time::Duration;

/// Outbound half of the dose handshake
///
/// At-most-once, fire-and-forget: no retry, no delivery guarantee. A
/// completed order may stay without a dose if the send is lost — accepted
/// by design of the handshake.
#[derive(Clone, Debug)]
pub struct DoseService {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl DoseService {
    pub fn new(base_url: String, timeout_secs: u64) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Ask the external service to compute a dose for `medicine_id`
    ///
    /// Detached task: returns immediately, never blocks the approving
    /// moderator's response. The HTTP response body is ignored.
    pub fn request_dose(&self, medicine_id: String) {
        let client = self.client.clone();
        let url = format!("{}/calc_dose", self.base_url);
        let timeout = self.timeout;

        tokio::spawn(async move {
            let body = DoseRequest {
                medicine_id: medicine_id.clone(),
            };

            match client
                .post(&url)
                .json(&body)
                .timeout(timeout)
                .send()
                .await
            {
                Ok(resp) if resp.status().is_success() => {
                    tracing::debug!(medicine_id = %medicine_id, "Dose request accepted");
                }
                Ok(resp) => {
                    tracing::warn!(
                        medicine_id = %medicine_id,
                        status = %resp.status(),
                        "Dose request rejected by dosing service"
                    );
                }
                Err(e) => {
                    // UpstreamUnavailable: swallowed, the Completed transition
                    // must not depend on the dosing service
                    tracing::warn!(
                        medicine_id = %medicine_id,
                        error = %e,
                        "Dose request failed"
                    );
                }
            }
        });
    }
}
