use thiserror::Error;

use crate::reservation::ReservationStatus;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Unknown tool type: {0}")]
    UnknownTool(String),

    #[error("Unknown reservation status: {0}")]
    UnknownReservationStatus(String),

    #[error("Unknown result source: {0}")]
    UnknownResultSource(String),

    #[error("Reservation already resolved as {status}")]
    HoldAlreadyResolved { status: ReservationStatus },
}

pub type DomainResult<T> = Result<T, DomainError>;
