//! Shared types for the Galen compounding service
//!
//! Types used by both the compound server and the remote dosing service:
//!
//! - [`error`]: unified error codes, [`AppError`] and [`ApiResponse`]
//! - [`models`]: role model
//! - [`client`]: auth request/response DTOs
//! - [`dose`]: wire types of the dose-calculation handshake
//! - [`util`]: small helpers (timestamps)

pub mod client;
pub mod dose;
pub mod error;
pub mod models;
pub mod util;

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use models::Role;
