use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use time::OffsetDateTime;
use tracing::{debug, instrument};
use uuid::Uuid;

use domain::account::{CreditAccount, UserId};
use domain::reservation::{Reservation, ReservationId, ReservationStatus};
use domain::tool::Tool;

use careerdesk_application::{
    error::{AppError, AppResult},
    ports::outgoing::credit_store::CreditStorePort,
};

use super::utils::{PostgresExecutor, begin_transaction, commit_transaction, db_error};

pub struct PostgresCreditStoreAdapter {
    pool: PgPool,
    executor: PostgresExecutor,
    signup_grant: i32,
}

impl PostgresCreditStoreAdapter {
    pub fn new(pool: PgPool, query_timeout_secs: u64, signup_grant: i32) -> Self {
        Self {
            pool,
            executor: PostgresExecutor::new(query_timeout_secs),
            signup_grant,
        }
    }
}

fn account_from_row(user_id: UserId, row: &PgRow) -> AppResult<CreditAccount> {
    let balance: i32 = row.try_get("balance").map_err(|e| AppError::DatabaseError {
        message: format!("Failed to get balance: {}", e),
    })?;
    let reserved_total: i32 =
        row.try_get("reserved_total")
            .map_err(|e| AppError::DatabaseError {
                message: format!("Failed to get reserved_total: {}", e),
            })?;
    let updated_at: OffsetDateTime =
        row.try_get("updated_at").map_err(|e| AppError::DatabaseError {
            message: format!("Failed to get updated_at: {}", e),
        })?;

    Ok(CreditAccount {
        user_id,
        balance,
        reserved_total,
        updated_at,
    })
}

#[async_trait::async_trait]
impl CreditStorePort for PostgresCreditStoreAdapter {
    #[instrument(skip(self))]
    async fn get_account(&self, user_id: &UserId) -> AppResult<CreditAccount> {
        let now = OffsetDateTime::now_utc();
        let row = self
            .executor
            .execute_with_timeout(
                || async {
                    sqlx::query(
                        r"
                    INSERT INTO credit_accounts (user_id, balance, reserved_total, updated_at)
                    VALUES ($1, $2, 0, $3)
                    ON CONFLICT (user_id) DO NOTHING
                    ",
                    )
                    .bind(user_id.as_uuid())
                    .bind(self.signup_grant)
                    .bind(now)
                    .execute(&self.pool)
                    .await?;

                    sqlx::query(
                        r"
                    SELECT balance, reserved_total, updated_at
                    FROM credit_accounts
                    WHERE user_id = $1
                    ",
                    )
                    .bind(user_id.as_uuid())
                    .fetch_one(&self.pool)
                    .await
                },
                &format!("Failed to load account for user {}", user_id.as_uuid()),
            )
            .await?;

        account_from_row(user_id.clone(), &row)
    }

    /// The account row is locked for the whole check-and-hold so two
    /// concurrent reservations serialize instead of jointly drawing
    /// past the available balance.
    #[instrument(skip(self, description))]
    async fn reserve(
        &self,
        user_id: &UserId,
        tool: Tool,
        description: &str,
    ) -> AppResult<Reservation> {
        let mut tx = begin_transaction(&self.pool).await?;
        let now = OffsetDateTime::now_utc();

        sqlx::query(
            r"
            INSERT INTO credit_accounts (user_id, balance, reserved_total, updated_at)
            VALUES ($1, $2, 0, $3)
            ON CONFLICT (user_id) DO NOTHING
            ",
        )
        .bind(user_id.as_uuid())
        .bind(self.signup_grant)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to ensure account exists", e))?;

        let row = sqlx::query(
            r"
            SELECT balance, reserved_total, updated_at
            FROM credit_accounts
            WHERE user_id = $1
            FOR UPDATE
            ",
        )
        .bind(user_id.as_uuid())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to lock account for reservation", e))?;

        let mut account = account_from_row(user_id.clone(), &row)?;
        account
            .place_hold(tool.cost(), now)
            .map_err(|err| AppError::InsufficientCredits {
                message: err.to_string(),
            })?;

        sqlx::query(
            r"
            UPDATE credit_accounts
            SET reserved_total = $1, updated_at = $2
            WHERE user_id = $3
            ",
        )
        .bind(account.reserved_total)
        .bind(now)
        .bind(user_id.as_uuid())
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to record hold", e))?;

        let reservation = Reservation::new_hold(user_id.clone(), tool, description.to_string(), now);
        sqlx::query(
            r"
            INSERT INTO reservations (id, user_id, tool, amount, status, description, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(reservation.id.as_uuid())
        .bind(user_id.as_uuid())
        .bind(reservation.tool.as_str())
        .bind(reservation.amount)
        .bind(reservation.status.as_str())
        .bind(&reservation.description)
        .bind(reservation.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to insert reservation", e))?;

        commit_transaction(tx).await?;

        debug!(
            reservation = %reservation.id,
            amount = reservation.amount,
            available = account.available(),
            "Reserved {} credits for user {}",
            reservation.amount,
            user_id.as_uuid()
        );

        Ok(reservation)
    }

    /// The status guard in the UPDATE makes a second confirm (or a
    /// confirm racing the sweeper) a no-op instead of a double charge.
    #[instrument(skip(self))]
    async fn confirm(&self, id: &ReservationId) -> AppResult<bool> {
        let mut tx = begin_transaction(&self.pool).await?;
        let now = OffsetDateTime::now_utc();

        let row = sqlx::query(
            r"
            UPDATE reservations
            SET status = $2, resolved_at = $3
            WHERE id = $1 AND status = $4
            RETURNING user_id, amount
            ",
        )
        .bind(id.as_uuid())
        .bind(ReservationStatus::Confirmed.as_str())
        .bind(now)
        .bind(ReservationStatus::Reserved.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to confirm reservation", e))?;

        let Some(row) = row else {
            debug!(reservation = %id, "Confirm skipped, hold not open");
            return Ok(false);
        };

        let user_uuid: Uuid = row.try_get("user_id").map_err(|e| AppError::DatabaseError {
            message: format!("Failed to get user_id: {}", e),
        })?;
        let amount: i32 = row.try_get("amount").map_err(|e| AppError::DatabaseError {
            message: format!("Failed to get amount: {}", e),
        })?;

        sqlx::query(
            r"
            UPDATE credit_accounts
            SET balance = balance - $1, reserved_total = reserved_total - $1, updated_at = $2
            WHERE user_id = $3
            ",
        )
        .bind(amount)
        .bind(now)
        .bind(user_uuid)
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to capture hold", e))?;

        commit_transaction(tx).await?;

        debug!(reservation = %id, amount, "Confirmed reservation, charged {} credits", amount);
        Ok(true)
    }

    #[instrument(skip(self, reason))]
    async fn revert(&self, id: &ReservationId, reason: &str) -> AppResult<bool> {
        let mut tx = begin_transaction(&self.pool).await?;
        let now = OffsetDateTime::now_utc();

        let row = sqlx::query(
            r"
            UPDATE reservations
            SET status = $2, resolved_at = $3, reason = $4
            WHERE id = $1 AND status = $5
            RETURNING user_id, amount
            ",
        )
        .bind(id.as_uuid())
        .bind(ReservationStatus::Reverted.as_str())
        .bind(now)
        .bind(reason)
        .bind(ReservationStatus::Reserved.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to revert reservation", e))?;

        let Some(row) = row else {
            debug!(reservation = %id, "Revert skipped, hold not open");
            return Ok(false);
        };

        let user_uuid: Uuid = row.try_get("user_id").map_err(|e| AppError::DatabaseError {
            message: format!("Failed to get user_id: {}", e),
        })?;
        let amount: i32 = row.try_get("amount").map_err(|e| AppError::DatabaseError {
            message: format!("Failed to get amount: {}", e),
        })?;

        sqlx::query(
            r"
            UPDATE credit_accounts
            SET reserved_total = reserved_total - $1, updated_at = $2
            WHERE user_id = $3
            ",
        )
        .bind(amount)
        .bind(now)
        .bind(user_uuid)
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to release hold", e))?;

        commit_transaction(tx).await?;

        debug!(reservation = %id, amount, "Reverted reservation, released {} credits", amount);
        Ok(true)
    }

    #[instrument(skip(self))]
    async fn find_stale_reservation_ids(
        &self,
        older_than: OffsetDateTime,
    ) -> AppResult<Vec<ReservationId>> {
        let rows = self
            .executor
            .execute_with_timeout(
                || {
                    sqlx::query(
                        r"
                    SELECT id
                    FROM reservations
                    WHERE status = $1 AND created_at < $2
                    ",
                    )
                    .bind(ReservationStatus::Reserved.as_str())
                    .bind(older_than)
                    .fetch_all(&self.pool)
                },
                "Failed to query stale reservations",
            )
            .await?;

        rows.into_iter()
            .map(|row| {
                let id: Uuid = row.try_get("id").map_err(|e| AppError::DatabaseError {
                    message: format!("Failed to get reservation id: {}", e),
                })?;
                Ok(ReservationId::from_uuid(id))
            })
            .collect()
    }
}
