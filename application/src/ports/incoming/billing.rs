use crate::error::AppResult;
use domain::account::{CreditAccount, UserId};
use domain::reservation::{Reservation, ReservationId};
use domain::tool::Tool;

#[async_trait::async_trait]
pub trait CreditQueryUseCase: Send + Sync {
    async fn account_summary(&self, user_id: &UserId) -> AppResult<CreditAccount>;

    /// Read-only check against `balance - reserved_total`; places no hold.
    async fn has_enough_credits(&self, user_id: &UserId, tool: Tool) -> AppResult<bool>;
}

#[async_trait::async_trait]
pub trait ReservationUseCase: Send + Sync {
    async fn reserve_credits(
        &self,
        user_id: &UserId,
        tool: Tool,
        description: String,
    ) -> AppResult<Reservation>;

    /// Returns false when the reservation was already resolved (or is
    /// unknown); callers treat that as a harmless no-op.
    async fn confirm_reservation(&self, id: &ReservationId) -> AppResult<bool>;

    async fn revert_reservation(&self, id: &ReservationId, reason: String) -> AppResult<bool>;
}
