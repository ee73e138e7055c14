//! Wire types of the dose-calculation handshake
//!
//! The compound server POSTs a [`DoseRequest`] to the dosing service and
//! ignores the response body. The dosing service later calls back with a
//! [`DoseCallback`] carrying the computed value.

use serde::{Deserialize, Serialize};

/// Sentinel value the dosing service reports when it could not compute a dose
pub const DOSE_UNAVAILABLE: f64 = -1.0;

/// Outbound request: backend -> dosing service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoseRequest {
    /// Order id in "medicine:key" form
    pub medicine_id: String,
}

/// Callback payload: dosing service -> backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoseCallback {
    /// Computed dose, or [`DOSE_UNAVAILABLE`]
    pub value: f64,
}
