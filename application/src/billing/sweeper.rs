use time::OffsetDateTime;
use tracing::{debug, instrument, warn};

use crate::config::SweepSettings;
use crate::error::AppResult;
use crate::ports::outgoing::credit_store::DynCreditStorePort;

const SWEEP_REVERT_REASON: &str = "hold expired without resolution";

/// Auto-reverts reservations a caller abandoned mid-flow (navigated
/// away between reserve and resolve). Reverting goes through the
/// store's ordinary `revert` primitive so the ledger rules stay in one
/// place.
pub struct ReservationSweeper {
    store: DynCreditStorePort,
    settings: SweepSettings,
}

impl ReservationSweeper {
    pub fn new(store: DynCreditStorePort, settings: SweepSettings) -> Self {
        Self { store, settings }
    }

    /// Revert every hold older than the configured TTL. Returns how
    /// many were actually released; holds resolved by a racing confirm
    /// or revert are skipped by the store's status check.
    #[instrument(skip(self))]
    pub async fn sweep_once(&self) -> AppResult<usize> {
        let cutoff = OffsetDateTime::now_utc() - self.settings.hold_ttl;
        let stale = self.store.find_stale_reservation_ids(cutoff).await?;

        let mut swept = 0;
        for id in stale {
            match self.store.revert(&id, SWEEP_REVERT_REASON).await {
                Ok(true) => {
                    warn!(reservation = %id, "Swept stale hold, credits restored");
                    swept += 1;
                }
                Ok(false) => {
                    debug!(reservation = %id, "Stale hold resolved before sweep");
                }
                Err(err) => {
                    warn!(reservation = %id, error = %err, "Failed to sweep stale hold");
                }
            }
        }

        Ok(swept)
    }
}
