use std::sync::Arc;

use time::OffsetDateTime;

use crate::error::AppResult;
use domain::account::{CreditAccount, UserId};
use domain::reservation::{Reservation, ReservationId};
use domain::tool::Tool;

/// Durable ledger of balances and holds. Implementations must make
/// `reserve`, `confirm` and `revert` atomic per account; two concurrent
/// reservations may never jointly push `available` negative.
#[async_trait::async_trait]
pub trait CreditStorePort: Send + Sync {
    /// Load the account, creating it with the signup grant on first use.
    async fn get_account(&self, user_id: &UserId) -> AppResult<CreditAccount>;

    /// Place a hold of `tool.cost()` credits. Fails with
    /// `InsufficientCredits` and no side effect when the available
    /// balance does not cover the cost.
    async fn reserve(
        &self,
        user_id: &UserId,
        tool: Tool,
        description: &str,
    ) -> AppResult<Reservation>;

    /// Capture a hold against the balance. Returns false (no state
    /// change) for unknown or already-resolved reservations.
    async fn confirm(&self, id: &ReservationId) -> AppResult<bool>;

    /// Release a hold without charging. Returns false (no state change)
    /// for unknown or already-resolved reservations.
    async fn revert(&self, id: &ReservationId, reason: &str) -> AppResult<bool>;

    /// Reservations still held past the cutoff, for the sweeper.
    async fn find_stale_reservation_ids(
        &self,
        older_than: OffsetDateTime,
    ) -> AppResult<Vec<ReservationId>>;
}

pub type DynCreditStorePort = Arc<dyn CreditStorePort>;
