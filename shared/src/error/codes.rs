//! Unified error codes for the Galen service
//!
//! This module defines all error codes used across the compound server and the
//! dosing service. Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Catalog (substance) errors
//! - 4xxx: Order (medicine) errors
//! - 5xxx: Dose errors
//! - 8xxx: Account errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-service compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Value out of range
    ValueOutOfRange = 7,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is disabled
    AccountDisabled = 1005,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Moderator role required
    ModeratorRequired = 2002,
    /// Remote-service role required
    ServiceRoleRequired = 2003,
    /// Caller is not the owner of the resource
    NotOwner = 2004,

    // ==================== 3xxx: Catalog ====================
    /// Substance not found
    SubstanceNotFound = 3001,
    /// Substance has been archived
    SubstanceArchived = 3002,

    // ==================== 4xxx: Order ====================
    /// Medicine order not found
    OrderNotFound = 4001,
    /// Operation requires the order to be in draft state
    OrderNotDraft = 4002,
    /// Operation requires the order to be formed (awaiting moderation)
    OrderNotFormed = 4003,
    /// Order status changed underneath a concurrent transition
    OrderStatusConflict = 4004,
    /// Substance is already part of the order composition
    SubstanceAlreadyInOrder = 4005,
    /// Composition line not found
    CompositionLineNotFound = 4006,
    /// Decision outcome must be approve or reject
    InvalidDecision = 4007,

    // ==================== 5xxx: Dose ====================
    /// Dosing service could not be reached (absorbed, never surfaced)
    DoseServiceUnavailable = 5001,

    // ==================== 8xxx: Account ====================
    /// Account not found
    AccountNotFound = 8001,
    /// Username already taken
    UsernameExists = 8002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::AccountDisabled => "Account is disabled",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::ModeratorRequired => "Moderator role is required",
            ErrorCode::ServiceRoleRequired => "Remote-service role is required",
            ErrorCode::NotOwner => "Caller does not own this resource",

            // Catalog
            ErrorCode::SubstanceNotFound => "Substance not found",
            ErrorCode::SubstanceArchived => "Substance has been archived",

            // Order
            ErrorCode::OrderNotFound => "Medicine order not found",
            ErrorCode::OrderNotDraft => "Order is not in draft state",
            ErrorCode::OrderNotFormed => "Order is not awaiting moderation",
            ErrorCode::OrderStatusConflict => "Order status has already advanced",
            ErrorCode::SubstanceAlreadyInOrder => "Substance is already in the order",
            ErrorCode::CompositionLineNotFound => "Composition line not found",
            ErrorCode::InvalidDecision => "Decision must be approve or reject",

            // Dose
            ErrorCode::DoseServiceUnavailable => "Dosing service is unavailable",

            // Account
            ErrorCode::AccountNotFound => "Account not found",
            ErrorCode::UsernameExists => "Username already taken",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::AccountDisabled),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::ModeratorRequired),
            2003 => Ok(ErrorCode::ServiceRoleRequired),
            2004 => Ok(ErrorCode::NotOwner),

            // Catalog
            3001 => Ok(ErrorCode::SubstanceNotFound),
            3002 => Ok(ErrorCode::SubstanceArchived),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderNotDraft),
            4003 => Ok(ErrorCode::OrderNotFormed),
            4004 => Ok(ErrorCode::OrderStatusConflict),
            4005 => Ok(ErrorCode::SubstanceAlreadyInOrder),
            4006 => Ok(ErrorCode::CompositionLineNotFound),
            4007 => Ok(ErrorCode::InvalidDecision),

            // Dose
            5001 => Ok(ErrorCode::DoseServiceUnavailable),

            // Account
            8001 => Ok(ErrorCode::AccountNotFound),
            8002 => Ok(ErrorCode::UsernameExists),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::PermissionDenied.code(), 2001);
        assert_eq!(ErrorCode::SubstanceNotFound.code(), 3001);
        assert_eq!(ErrorCode::OrderStatusConflict.code(), 4004);
        assert_eq!(ErrorCode::DoseServiceUnavailable.code(), 5001);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_roundtrip_via_u16() {
        for code in [
            ErrorCode::Success,
            ErrorCode::NotFound,
            ErrorCode::TokenExpired,
            ErrorCode::OrderNotDraft,
            ErrorCode::SubstanceAlreadyInOrder,
            ErrorCode::UsernameExists,
            ErrorCode::DatabaseError,
        ] {
            let value: u16 = code.into();
            assert_eq!(ErrorCode::try_from(value), Ok(code));
        }
    }

    #[test]
    fn test_invalid_code_rejected() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(7777), Err(InvalidErrorCode(7777)));
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&ErrorCode::OrderNotFound).unwrap();
        assert_eq!(json, "4001");

        let code: ErrorCode = serde_json::from_str("2001").unwrap();
        assert_eq!(code, ErrorCode::PermissionDenied);
    }
}
