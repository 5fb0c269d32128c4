use std::future::Future;

use tracing::{debug, instrument, warn};

use domain::account::{CreditAccount, UserId};
use domain::matching::ResultSource;
use domain::reservation::{Reservation, ReservationId};
use domain::tool::Tool;

use crate::error::AppResult;
use crate::ports::incoming::billing::{CreditQueryUseCase, ReservationUseCase};
use crate::ports::outgoing::credit_store::DynCreditStorePort;

const FALLBACK_REVERT_REASON: &str = "degraded fallback result delivered";

/// What a billable operation hands back to the coordinator.
#[derive(Debug, Clone)]
pub struct ToolRun<T> {
    pub payload: T,
    pub source: ResultSource,
    pub attempts: u32,
}

/// The coordinator's verdict: the payload plus how the hold was settled.
#[derive(Debug, Clone)]
pub struct ToolOutcome<T> {
    pub reservation_id: ReservationId,
    pub payload: T,
    pub source: ResultSource,
    pub attempts: u32,
    pub charged: bool,
}

/// Owns the reserve → run → confirm/revert lifecycle for every paid
/// operation. All ledger mutation goes through the store's three
/// primitives; idempotency of confirm/revert is the store's job.
pub struct BillingService {
    store: DynCreditStorePort,
}

impl BillingService {
    pub fn new(store: DynCreditStorePort) -> Self {
        Self { store }
    }

    /// Run one billable action under a credit hold.
    ///
    /// The hold is durably placed before `operation` runs. A Live
    /// outcome confirms the hold; a Fallback outcome delivers the
    /// payload but gives the hold back (degraded data is not billed);
    /// a hard failure reverts and propagates. Exactly one of
    /// confirm/revert is attempted per reservation.
    #[instrument(skip(self, operation, description))]
    pub async fn perform<T, F, Fut>(
        &self,
        user_id: &UserId,
        tool: Tool,
        description: String,
        operation: F,
    ) -> AppResult<ToolOutcome<T>>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = AppResult<ToolRun<T>>> + Send,
        T: Send,
    {
        let reservation = self.store.reserve(user_id, tool, &description).await?;
        debug!(
            reservation = %reservation.id,
            amount = reservation.amount,
            "Reserved credits for {tool}"
        );

        match operation().await {
            Ok(run) if run.source.is_live() => {
                let charged = self.settle_confirm(&reservation.id).await;
                Ok(ToolOutcome {
                    reservation_id: reservation.id,
                    payload: run.payload,
                    source: run.source,
                    attempts: run.attempts,
                    charged,
                })
            }
            Ok(run) => {
                self.settle_revert(&reservation.id, FALLBACK_REVERT_REASON)
                    .await;
                Ok(ToolOutcome {
                    reservation_id: reservation.id,
                    payload: run.payload,
                    source: run.source,
                    attempts: run.attempts,
                    charged: false,
                })
            }
            Err(err) => {
                self.settle_revert(&reservation.id, &err.to_string()).await;
                Err(err)
            }
        }
    }

    /// Confirm, downgrading store failures to a reconciliation warning:
    /// the caller already holds a usable result and billing must not
    /// block delivery.
    async fn settle_confirm(&self, id: &ReservationId) -> bool {
        match self.store.confirm(id).await {
            Ok(true) => {
                debug!(reservation = %id, "Confirmed reservation");
                true
            }
            Ok(false) => {
                warn!(reservation = %id, "Confirm was a no-op, hold already resolved");
                false
            }
            Err(err) => {
                warn!(
                    reservation = %id,
                    error = %err,
                    "Confirm failed, reservation needs reconciliation"
                );
                false
            }
        }
    }

    async fn settle_revert(&self, id: &ReservationId, reason: &str) {
        match self.store.revert(id, reason).await {
            Ok(true) => {
                debug!(reservation = %id, reason, "Reverted reservation, credits restored");
            }
            Ok(false) => {
                warn!(reservation = %id, "Revert was a no-op, hold already resolved");
            }
            Err(err) => {
                warn!(
                    reservation = %id,
                    error = %err,
                    "Revert failed, reservation needs reconciliation"
                );
            }
        }
    }
}

#[async_trait::async_trait]
impl CreditQueryUseCase for BillingService {
    #[instrument(skip(self))]
    async fn account_summary(&self, user_id: &UserId) -> AppResult<CreditAccount> {
        self.store.get_account(user_id).await
    }

    #[instrument(skip(self))]
    async fn has_enough_credits(&self, user_id: &UserId, tool: Tool) -> AppResult<bool> {
        let account = self.store.get_account(user_id).await?;
        Ok(account.can_afford(tool.cost()))
    }
}

#[async_trait::async_trait]
impl ReservationUseCase for BillingService {
    #[instrument(skip(self, description))]
    async fn reserve_credits(
        &self,
        user_id: &UserId,
        tool: Tool,
        description: String,
    ) -> AppResult<Reservation> {
        self.store.reserve(user_id, tool, &description).await
    }

    #[instrument(skip(self))]
    async fn confirm_reservation(&self, id: &ReservationId) -> AppResult<bool> {
        self.store.confirm(id).await
    }

    #[instrument(skip(self, reason))]
    async fn revert_reservation(&self, id: &ReservationId, reason: String) -> AppResult<bool> {
        self.store.revert(id, &reason).await
    }
}
