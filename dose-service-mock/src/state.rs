use std::time::Duration;

/// Shared state of the mock dosing service
#[derive(Debug)]
pub struct AppState {
    /// HTTP client used for the callback
    pub client: reqwest::Client,
    /// Base URL of the compound server, e.g. http://localhost:8000
    pub backend_url: String,
    /// Bearer token with the remote_service role, provisioned at deploy time
    pub service_token: String,
    /// Simulated computation time before the callback fires
    pub response_delay: Duration,
}

impl AppState {
    pub fn from_env() -> Self {
        let backend_url = std::env::var("BACKEND_URL")
            .unwrap_or_else(|_| "http://localhost:8000".into())
            .trim_end_matches('/')
            .to_string();
        let service_token = std::env::var("SERVICE_TOKEN").unwrap_or_default();
        let delay_secs = std::env::var("RESPONSE_DELAY_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3);

        if service_token.is_empty() {
            tracing::warn!("SERVICE_TOKEN not set - callbacks will be rejected by the backend");
        }

        Self {
            client: reqwest::Client::new(),
            backend_url,
            service_token,
            response_delay: Duration::from_secs(delay_secs),
        }
    }
}
