use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::account::UserId;
use crate::error::{DomainError, DomainResult};
use crate::tool::Tool;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReservationId(pub Uuid);

impl ReservationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ReservationId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for ReservationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Reserved,
    Confirmed,
    Reverted,
}

impl ReservationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reserved => "reserved",
            Self::Confirmed => "confirmed",
            Self::Reverted => "reverted",
        }
    }
}

impl Display for ReservationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reserved" => Ok(Self::Reserved),
            "confirmed" => Ok(Self::Confirmed),
            "reverted" => Ok(Self::Reverted),
            other => Err(DomainError::UnknownReservationStatus(other.to_string())),
        }
    }
}

/// A hold placed against a credit account for one billable action.
///
/// The only legal transitions are Reserved→Confirmed and
/// Reserved→Reverted; a resolved record never changes again.
#[derive(Debug, Clone)]
pub struct Reservation {
    pub id: ReservationId,
    pub user_id: UserId,
    pub tool: Tool,
    pub amount: i32,
    pub status: ReservationStatus,
    pub description: String,
    pub reason: Option<String>,
    pub created_at: OffsetDateTime,
    pub resolved_at: Option<OffsetDateTime>,
}

impl Reservation {
    pub fn new_hold(
        user_id: UserId,
        tool: Tool,
        description: String,
        now: OffsetDateTime,
    ) -> Self {
        Self {
            id: ReservationId::new(),
            user_id,
            tool,
            amount: tool.cost(),
            status: ReservationStatus::Reserved,
            description,
            reason: None,
            created_at: now,
            resolved_at: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.status != ReservationStatus::Reserved
    }

    /// Settle the hold: the credits are charged.
    pub fn confirm(&mut self, now: OffsetDateTime) -> DomainResult<()> {
        if self.is_resolved() {
            return Err(DomainError::HoldAlreadyResolved {
                status: self.status,
            });
        }

        self.status = ReservationStatus::Confirmed;
        self.resolved_at = Some(now);
        Ok(())
    }

    /// Release the hold without charging, recording why.
    pub fn revert(&mut self, reason: String, now: OffsetDateTime) -> DomainResult<()> {
        if self.is_resolved() {
            return Err(DomainError::HoldAlreadyResolved {
                status: self.status,
            });
        }

        self.status = ReservationStatus::Reverted;
        self.reason = Some(reason);
        self.resolved_at = Some(now);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn hold() -> Reservation {
        Reservation::new_hold(
            UserId::new(),
            Tool::JobMatch,
            "match against uploaded CV".to_string(),
            OffsetDateTime::UNIX_EPOCH,
        )
    }

    #[test]
    fn test_new_hold_starts_reserved_with_tool_cost() {
        let r = hold();
        assert_eq!(r.status, ReservationStatus::Reserved);
        assert_eq!(r.amount, Tool::JobMatch.cost());
        assert!(r.resolved_at.is_none());
        assert!(r.reason.is_none());
    }

    #[test]
    fn test_confirm_resolves_the_hold() {
        let mut r = hold();
        r.confirm(OffsetDateTime::UNIX_EPOCH).unwrap();
        assert_eq!(r.status, ReservationStatus::Confirmed);
        assert!(r.resolved_at.is_some());
    }

    #[test]
    fn test_revert_records_the_reason() {
        let mut r = hold();
        r.revert("matching service unreachable".to_string(), OffsetDateTime::UNIX_EPOCH)
            .unwrap();
        assert_eq!(r.status, ReservationStatus::Reverted);
        assert_eq!(r.reason.as_deref(), Some("matching service unreachable"));
    }

    #[test]
    fn test_no_transition_leaves_a_resolved_hold() {
        let mut r = hold();
        r.confirm(OffsetDateTime::UNIX_EPOCH).unwrap();

        assert!(matches!(
            r.confirm(OffsetDateTime::UNIX_EPOCH),
            Err(DomainError::HoldAlreadyResolved { .. })
        ));
        assert!(matches!(
            r.revert("late".to_string(), OffsetDateTime::UNIX_EPOCH),
            Err(DomainError::HoldAlreadyResolved { .. })
        ));
        assert_eq!(r.status, ReservationStatus::Confirmed);
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [
            ReservationStatus::Reserved,
            ReservationStatus::Confirmed,
            ReservationStatus::Reverted,
        ] {
            assert_eq!(status.as_str().parse::<ReservationStatus>().unwrap(), status);
        }
    }
}
