use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
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

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

/// Per-user ledger record: the prepaid balance plus the sum of
/// outstanding holds. `balance - reserved_total` is what new
/// reservations may draw on and must never go negative.
#[derive(Debug, Clone)]
pub struct CreditAccount {
    pub user_id: UserId,
    pub balance: i32,
    pub reserved_total: i32,
    pub updated_at: OffsetDateTime,
}

impl CreditAccount {
    pub fn new(user_id: UserId, opening_balance: i32, now: OffsetDateTime) -> Self {
        Self {
            user_id,
            balance: opening_balance,
            reserved_total: 0,
            updated_at: now,
        }
    }

    pub fn available(&self) -> i32 {
        self.balance - self.reserved_total
    }

    pub fn can_afford(&self, cost: i32) -> bool {
        self.available() >= cost
    }

    /// Earmark `amount` credits for a pending operation. The balance is
    /// untouched until the hold is captured.
    pub fn place_hold(
        &mut self,
        amount: i32,
        now: OffsetDateTime,
    ) -> Result<(), InsufficientCreditsError> {
        if self.available() < amount {
            return Err(InsufficientCreditsError {
                required: amount,
                available: self.available(),
            });
        }

        self.reserved_total += amount;
        self.updated_at = now;
        Ok(())
    }

    /// Settle a hold against the balance after the paid operation
    /// delivered. Callers must have placed a hold of `amount` first.
    pub fn capture_hold(&mut self, amount: i32, now: OffsetDateTime) {
        self.balance -= amount;
        self.reserved_total -= amount;
        self.updated_at = now;
    }

    /// Give a hold back without charging, leaving the balance as it was.
    pub fn release_hold(&mut self, amount: i32, now: OffsetDateTime) {
        self.reserved_total -= amount;
        self.updated_at = now;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsufficientCreditsError {
    pub required: i32,
    pub available: i32,
}

impl Display for InsufficientCreditsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "Insufficient credits: required {}, available {}",
            self.required, self.available
        )
    }
}

impl Error for InsufficientCreditsError {}
