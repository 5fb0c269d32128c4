use serde::Serialize;
use time::OffsetDateTime;

use domain::account::CreditAccount;
use domain::matching::{PracticeMatch, ResultSource};
use domain::reservation::Reservation;

use careerdesk_application::ports::incoming::matching::MatchOutcome;

#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    #[must_use]
    pub fn success_with_data(data: Option<T>) -> Self {
        Self {
            ok: true,
            error: None,
            data,
        }
    }

    #[must_use]
    pub fn error(message: String) -> Self {
        Self {
            ok: false,
            error: Some(message),
            data: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreditSummaryResponse {
    pub balance: i32,
    pub reserved: i32,
    pub available: i32,
}

impl From<CreditAccount> for CreditSummaryResponse {
    fn from(account: CreditAccount) -> Self {
        Self {
            balance: account.balance,
            reserved: account.reserved_total,
            available: account.available(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreditCheckResponse {
    pub tool: String,
    pub cost: i32,
    pub allowed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReservationResponse {
    #[serde(rename = "reservationId")]
    pub reservation_id: String,
    pub tool: String,
    pub amount: i32,
    pub status: String,
    pub created_at: OffsetDateTime,
}

impl From<Reservation> for ReservationResponse {
    fn from(reservation: Reservation) -> Self {
        Self {
            reservation_id: reservation.id.to_string(),
            tool: reservation.tool.as_str().to_string(),
            amount: reservation.amount,
            status: reservation.status.as_str().to_string(),
            created_at: reservation.created_at,
        }
    }
}

/// Confirm/revert result: false means the hold was already resolved
/// and nothing changed.
#[derive(Debug, Clone, Serialize)]
pub struct ResolutionResponse {
    pub resolved: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchResponse {
    pub practices: Vec<PracticeMatch>,
    pub source: ResultSource,
    #[serde(rename = "fromCache")]
    pub from_cache: bool,
    pub charged: bool,
}

impl From<MatchOutcome> for MatchResponse {
    fn from(outcome: MatchOutcome) -> Self {
        Self {
            practices: outcome.practices.practices,
            source: outcome.source,
            from_cache: outcome.from_cache,
            charged: outcome.charged,
        }
    }
}
