//! Medicine Model (the order aggregate)

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

// =============================================================================
// Status state machine
// =============================================================================

/// 药单状态机
///
/// ```text
/// Draft ──submit──> Formed ──approve──> Completed
///   │                  └─────reject───> Rejected
///   └──withdraw──> Deleted
/// ```
///
/// Completed / Rejected / Deleted 均为终态。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MedicineStatus {
    Draft,
    Formed,
    Completed,
    Rejected,
    Deleted,
}

impl MedicineStatus {
    /// Numeric code kept wire-compatible with the legacy API (1..=5)
    pub const fn code(&self) -> u8 {
        match self {
            Self::Draft => 1,
            Self::Formed => 2,
            Self::Completed => 3,
            Self::Rejected => 4,
            Self::Deleted => 5,
        }
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Rejected | Self::Deleted)
    }

    /// Whether the state machine admits `self -> to`
    pub const fn can_transition(&self, to: MedicineStatus) -> bool {
        matches!(
            (self, to),
            (Self::Draft, Self::Formed)
                | (Self::Draft, Self::Deleted)
                | (Self::Formed, Self::Completed)
                | (Self::Formed, Self::Rejected)
        )
    }
}

impl TryFrom<u8> for MedicineStatus {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Draft),
            2 => Ok(Self::Formed),
            3 => Ok(Self::Completed),
            4 => Ok(Self::Rejected),
            5 => Ok(Self::Deleted),
            other => Err(other),
        }
    }
}

// =============================================================================
// Medicine (aggregate root)
// =============================================================================

/// Medicine order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medicine {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub owner: RecordId,
    pub status: MedicineStatus,
    /// Computed by the external dosing service, arrives asynchronously
    pub dose: Option<f64>,
    /// Epoch millis
    pub date_created: i64,
    /// Set on submission
    pub date_formation: Option<i64>,
    /// Set on terminal decision
    pub date_complete: Option<i64>,
    /// Moderator who decided, set on terminal decision
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub moderator: Option<RecordId>,
}

impl Medicine {
    /// Whether `account_id` ("account:key") owns this order
    pub fn is_owned_by(&self, account_id: &str) -> bool {
        self.owner.to_string() == account_id
    }
}

// =============================================================================
// Query projections
// =============================================================================

/// Order summary for list views (owner/moderator resolved to usernames)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicineSummary {
    pub id: String,
    pub owner: Option<String>,
    pub moderator: Option<String>,
    pub status: MedicineStatus,
    pub dose: Option<f64>,
    pub date_created: i64,
    pub date_formation: Option<i64>,
    pub date_complete: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_transitions() {
        use MedicineStatus::*;

        assert!(Draft.can_transition(Formed));
        assert!(Draft.can_transition(Deleted));
        assert!(Formed.can_transition(Completed));
        assert!(Formed.can_transition(Rejected));
    }

    #[test]
    fn test_invalid_transitions() {
        use MedicineStatus::*;

        assert!(!Draft.can_transition(Completed));
        assert!(!Draft.can_transition(Rejected));
        assert!(!Formed.can_transition(Draft));
        assert!(!Formed.can_transition(Deleted));
        // 终态不再迁移
        for terminal in [Completed, Rejected, Deleted] {
            for to in [Draft, Formed, Completed, Rejected, Deleted] {
                assert!(!terminal.can_transition(to));
            }
        }
    }

    #[test]
    fn test_terminal_states() {
        assert!(!MedicineStatus::Draft.is_terminal());
        assert!(!MedicineStatus::Formed.is_terminal());
        assert!(MedicineStatus::Completed.is_terminal());
        assert!(MedicineStatus::Rejected.is_terminal());
        assert!(MedicineStatus::Deleted.is_terminal());
    }

    #[test]
    fn test_legacy_codes() {
        for status in [
            MedicineStatus::Draft,
            MedicineStatus::Formed,
            MedicineStatus::Completed,
            MedicineStatus::Rejected,
            MedicineStatus::Deleted,
        ] {
            assert_eq!(MedicineStatus::try_from(status.code()), Ok(status));
        }
        assert!(MedicineStatus::try_from(0).is_err());
        assert!(MedicineStatus::try_from(6).is_err());
    }

    #[test]
    fn test_status_serde_form() {
        assert_eq!(
            serde_json::to_string(&MedicineStatus::Formed).unwrap(),
            "\"FORMED\""
        );
        let status: MedicineStatus = serde_json::from_str("\"COMPLETED\"").unwrap();
        assert_eq!(status, MedicineStatus::Completed);
    }
}
